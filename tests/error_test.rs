//! Tests for error types

use spamtree::Error;

#[test]
fn test_schema_error_lists_expected_columns() {
    let error = Error::Schema("missing required column 'Spam'".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Schema error"));
    assert!(error_str.contains("'Spam'"));
    assert!(error_str.contains("Expected columns: Body, Sender, Spam"));
}

#[test]
fn test_feature_error() {
    let error = Error::Feature("unseen sender 'x@y.z'".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Feature error"));
    assert!(error_str.contains("x@y.z"));
}

#[test]
fn test_configuration_error() {
    let error = Error::Configuration("num_runs must be in [50, 200], got 10".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Configuration error"));
    assert!(error_str.contains("got 10"));
}

#[test]
fn test_invalid_input_error() {
    let error = Error::InvalidInput("k must be positive".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid input"));
    assert!(error_str.contains("k must be positive"));
}

#[test]
fn test_storage_error() {
    let error = Error::Storage("file not found".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Storage error"));
    assert!(error_str.contains("file not found"));
}

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let error: Error = io_error.into();
    let error_str = format!("{error}");
    assert!(error_str.contains("IO error"));
}

#[test]
fn test_json_error_conversion() {
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error: Error = json_error.into();
    assert!(matches!(error, Error::Json(_)));
    assert!(format!("{error}").contains("JSON error"));
}

#[test]
fn test_arrow_error_conversion() {
    let arrow_error = arrow::error::ArrowError::CsvError("bad row".to_string());
    let error: Error = arrow_error.into();
    assert!(matches!(error, Error::Arrow(_)));
    assert!(format!("{error}").contains("bad row"));
}

#[test]
fn test_other_error() {
    let error = Error::Other("custom error message".to_string());
    let error_str = format!("{error}");
    assert_eq!(error_str, "custom error message");
}

#[test]
fn test_error_debug() {
    let error = Error::InvalidInput("test".to_string());
    let debug_str = format!("{error:?}");
    assert!(debug_str.contains("InvalidInput"));
}

#[test]
fn test_config_json_errors_map_to_variants() {
    use spamtree::config::Config;

    assert!(matches!(Config::from_json("not json"), Err(Error::Json(_))));
    assert!(matches!(
        Config::from_json(r#"{"test_size": 0.33}"#),
        Err(Error::Configuration(_))
    ));
    assert!(matches!(
        Config::from_json(r#"{"max_depth": 7}"#),
        Err(Error::Configuration(_))
    ));
}
