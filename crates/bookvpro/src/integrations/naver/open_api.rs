use async_trait::async_trait;
use serde::Deserialize;

use super::{ensure_success, join_url};
use crate::config::OpenApiCredentials;
use crate::integrations::{BookCatalog, BookListing, BookSearchPage, SearchError};
use crate::workflows::grading::extract::strip_tags;

const BOOK_SEARCH_PATH: &str = "/v1/search/book.json";

/// Client for the developer open search API (book vertical).
#[derive(Clone)]
pub struct OpenBookSearchClient {
    client: reqwest::Client,
    credentials: OpenApiCredentials,
}

impl std::fmt::Debug for OpenBookSearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenBookSearchClient")
            .field("base_url", &self.credentials.base_url)
            .finish_non_exhaustive()
    }
}

impl OpenBookSearchClient {
    pub fn new(client: reqwest::Client, credentials: OpenApiCredentials) -> Self {
        Self {
            client,
            credentials,
        }
    }
}

#[async_trait]
impl BookCatalog for OpenBookSearchClient {
    async fn search_books(
        &self,
        keyword: &str,
        display: u8,
    ) -> Result<BookSearchPage, SearchError> {
        let display = display.clamp(1, 100).to_string();
        let response = self
            .client
            .get(join_url(&self.credentials.base_url, BOOK_SEARCH_PATH))
            .query(&[("query", keyword), ("display", display.as_str())])
            .header("X-Naver-Client-Id", &self.credentials.client_id)
            .header("X-Naver-Client-Secret", &self.credentials.client_secret)
            .send()
            .await?;

        let payload: BookSearchResponse = ensure_success(response)?
            .json()
            .await
            .map_err(|err| SearchError::Decode(err.to_string()))?;

        Ok(payload.into_page())
    }
}

#[derive(Debug, Deserialize)]
struct BookSearchResponse {
    #[serde(default)]
    total: u64,
    #[serde(default)]
    items: Vec<BookItem>,
}

#[derive(Debug, Deserialize)]
struct BookItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    publisher: String,
    #[serde(default)]
    isbn: String,
    #[serde(default)]
    discount: String,
}

impl BookSearchResponse {
    fn into_page(self) -> BookSearchPage {
        let items = self
            .items
            .into_iter()
            .map(|item| BookListing {
                title: strip_tags(&item.title),
                author: strip_tags(&item.author),
                publisher: strip_tags(&item.publisher),
                isbn: item.isbn,
                link: item.link,
                discount: item.discount.trim().parse().ok(),
            })
            .collect();

        BookSearchPage {
            total: self.total,
            items,
        }
    }
}
