//! Title grading: signal extraction from result pages and the A/B/C policy.

pub mod classifier;
pub mod domain;
pub mod extract;
pub mod policy;

pub use classifier::BookClassifier;
pub use domain::{ClassificationRecord, Grade, SearchSignal};
pub use policy::GradePolicy;
