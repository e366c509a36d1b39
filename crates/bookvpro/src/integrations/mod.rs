//! Outbound lookups against third-party search services.
//!
//! The grading workflow only sees the traits declared here, so tests and the
//! CLI can swap the Naver clients for fixtures.

pub mod naver;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error raised by any outbound search lookup.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream returned status {status}")]
    Status { status: u16 },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("request signing failed: {0}")]
    Signing(String),
}

/// Source of raw search-result markup for a book title.
#[async_trait]
pub trait ResultPageSource: Send + Sync {
    async fn fetch_result_page(&self, title: &str) -> Result<String, SearchError>;

    /// Public URL a person can open to see the same result page.
    fn result_link(&self, title: &str) -> String;
}

/// Monthly query counts from a keyword advertising tool.
#[async_trait]
pub trait KeywordVolumeSource: Send + Sync {
    /// `Ok(None)` means the tool had no entry for the keyword.
    async fn monthly_volume(&self, keyword: &str) -> Result<Option<u64>, SearchError>;
}

/// Structured book catalog search.
#[async_trait]
pub trait BookCatalog: Send + Sync {
    async fn search_books(&self, keyword: &str, display: u8)
        -> Result<BookSearchPage, SearchError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookListing {
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub isbn: String,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSearchPage {
    pub total: u64,
    pub items: Vec<BookListing>,
}
