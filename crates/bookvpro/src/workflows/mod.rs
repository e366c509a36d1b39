pub mod grading;
pub mod jobs;
