//! Evaluation results
//!
//! ```text
//! ResultSet (1) ──< TrialResult (N)          [evaluator output]
//!     │
//!     └── stats::aggregate ──> ScoredTrial (N) [trial + accuracy z-score]
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use spamtree::results::{ResultSet, TrialResult, TrialStatus};
//!
//! let trial = TrialResult::builder(1, 0.92, 0.91)
//!     .sizes(70, 30)
//!     .status(TrialStatus::Ok)
//!     .build();
//!
//! let results = ResultSet::new(42, vec![trial]);
//! assert_eq!(results.len(), 1);
//! ```

mod outliers;
mod scored;
mod set;
mod trial;

pub use outliers::top_outliers;
pub use scored::ScoredTrial;
pub use set::ResultSet;
pub use trial::{TrialResult, TrialResultBuilder, TrialStatus};
