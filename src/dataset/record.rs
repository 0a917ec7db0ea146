//! Email Record - one row of the spam/ham dataset

use serde::{Deserialize, Serialize};

/// A single email as read from the dataset.
///
/// Immutable once built; the feature builder only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRecord {
    body: String,
    sender: String,
    body_length: Option<i64>,
    is_spam: bool,
}

impl EmailRecord {
    /// Create a record without a body length.
    ///
    /// # Arguments
    ///
    /// * `body` - Email body text
    /// * `sender` - Sender address or name
    /// * `is_spam` - Ground-truth label
    #[must_use]
    pub fn new(body: impl Into<String>, sender: impl Into<String>, is_spam: bool) -> Self {
        Self {
            body: body.into(),
            sender: sender.into(),
            body_length: None,
            is_spam,
        }
    }

    /// Attach a body length value.
    #[must_use]
    pub const fn with_body_length(mut self, body_length: i64) -> Self {
        self.body_length = Some(body_length);
        self
    }

    /// Get the body text.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Get the sender.
    #[must_use]
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Get the body length, if the row carries one.
    #[must_use]
    pub const fn body_length(&self) -> Option<i64> {
        self.body_length
    }

    /// Get the spam label.
    #[must_use]
    pub const fn is_spam(&self) -> bool {
        self.is_spam
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_record_new() {
        let record = EmailRecord::new("hello there", "alice@example.com", false);
        assert_eq!(record.body(), "hello there");
        assert_eq!(record.sender(), "alice@example.com");
        assert_eq!(record.body_length(), None);
        assert!(!record.is_spam());
    }

    #[test]
    fn test_email_record_body_length() {
        let record = EmailRecord::new("win", "spam@example.com", true).with_body_length(3);
        assert_eq!(record.body_length(), Some(3));
        assert!(record.is_spam());
    }
}
