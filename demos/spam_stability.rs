//! Spam Stability Demo
//!
//! Loads an email dataset, runs the repeated decision-tree evaluation and
//! prints the report as text (or JSON with `--json`).
//!
//! Run with:
//!   cargo run --example spam_stability -- emails__dataset.csv [config.json] [--json]
//!
//! Logging follows `RUST_LOG`, e.g. `RUST_LOG=spamtree=debug`.

use anyhow::{bail, Context};
use spamtree::config::Config;
use spamtree::dataset::Dataset;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("spamtree=info")),
        )
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let json = args.iter().any(|a| a == "--json");
    args.retain(|a| a != "--json");

    let Some(data_path) = args.first() else {
        bail!("usage: spam_stability <dataset.csv|dataset.parquet> [config.json] [--json]");
    };

    let dataset = if data_path.ends_with(".parquet") {
        Dataset::load_parquet(data_path)
    } else {
        Dataset::load_csv(data_path)
    }
    .with_context(|| format!("loading {data_path}"))?;

    let config = match args.get(1) {
        Some(path) => {
            let raw = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
            Config::from_json(&raw)?
        }
        None => Config::default(),
    };

    let report = spamtree::pipeline::run(&dataset, &config)?;

    if json {
        println!("{}", report.to_json_pretty()?);
    } else {
        println!("{report}");

        println!("== Most extreme runs ==");
        for row in report.results().outliers(3)? {
            println!(
                "run {:>3}: accuracy {:.4}, z {:+.3}",
                row.run_index(),
                row.accuracy(),
                row.z_score().unwrap_or(0.0)
            );
        }
    }

    Ok(())
}
