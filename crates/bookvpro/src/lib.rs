//! Grades book titles by how crowded their search results are.
//!
//! Each title is looked up on the Naver book search vertical, the seller count
//! and representative-card marker are scraped out of the result page, and an
//! optional keyword-tool lookup adds monthly search volume. The grading policy
//! turns those signals into an A/B/C label.

pub mod config;
pub mod error;
pub mod export;
pub mod integrations;
pub mod telemetry;
pub mod workflows;
