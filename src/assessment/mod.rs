//! Water risk assessment
//!
//! - `comparator`: inclusive range comparison
//! - `types`: measurement sets, risk levels, findings
//! - `engine`: threshold rules turning measurements into an assessment

pub mod comparator;
pub mod engine;
pub mod types;

pub use comparator::{compare_to_range, RangeComparison, RangeFit};
pub use engine::{assess, AssessError, RiskAssessor};
pub use types::{Assessment, Finding, MeasurementSet, RiskLevel};
