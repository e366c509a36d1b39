use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use tracing::debug;

use super::{ensure_success, join_url};
use crate::config::SearchAdCredentials;
use crate::integrations::{KeywordVolumeSource, SearchError};

type HmacSha256 = Hmac<Sha256>;

const KEYWORD_TOOL_URI: &str = "/keywordstool";

/// Keyword tool client for the search advertising API.
///
/// Every request is signed with HMAC-SHA256 over `"{timestamp}.{method}.{uri}"`
/// using the account secret, base64 encoded.
#[derive(Clone)]
pub struct SearchAdClient {
    client: reqwest::Client,
    credentials: SearchAdCredentials,
}

impl std::fmt::Debug for SearchAdClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchAdClient")
            .field("base_url", &self.credentials.base_url)
            .field("customer_id", &self.credentials.customer_id)
            .finish_non_exhaustive()
    }
}

impl SearchAdClient {
    pub fn new(client: reqwest::Client, credentials: SearchAdCredentials) -> Self {
        Self {
            client,
            credentials,
        }
    }
}

pub(crate) fn sign_request(
    secret_key: &str,
    timestamp_millis: i64,
    method: &str,
    uri: &str,
) -> Result<String, SearchError> {
    let message = format!("{timestamp_millis}.{method}.{uri}");
    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .map_err(|err| SearchError::Signing(err.to_string()))?;
    mac.update(message.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// The keyword tool rejects hints containing whitespace and reports
/// related keywords without it.
fn compact_keyword(keyword: &str) -> String {
    keyword.split_whitespace().collect::<String>().to_lowercase()
}

#[async_trait]
impl KeywordVolumeSource for SearchAdClient {
    async fn monthly_volume(&self, keyword: &str) -> Result<Option<u64>, SearchError> {
        let hint = compact_keyword(keyword);
        if hint.is_empty() {
            return Ok(None);
        }

        let timestamp = chrono::Utc::now().timestamp_millis();
        let signature = sign_request(&self.credentials.secret_key, timestamp, "GET", KEYWORD_TOOL_URI)?;

        debug!(%hint, "querying keyword tool");
        let response = self
            .client
            .get(join_url(&self.credentials.base_url, KEYWORD_TOOL_URI))
            .query(&[("hintKeywords", hint.as_str()), ("showDetail", "1")])
            .header("X-Timestamp", timestamp.to_string())
            .header("X-API-KEY", &self.credentials.api_key)
            .header("X-Customer", &self.credentials.customer_id)
            .header("X-Signature", signature)
            .send()
            .await?;

        let payload: KeywordToolResponse = ensure_success(response)?
            .json()
            .await
            .map_err(|err| SearchError::Decode(err.to_string()))?;

        Ok(payload.volume_for(&hint))
    }
}

#[derive(Debug, Deserialize)]
struct KeywordToolResponse {
    #[serde(rename = "keywordList", default)]
    keyword_list: Vec<KeywordStat>,
}

impl KeywordToolResponse {
    fn volume_for(&self, hint: &str) -> Option<u64> {
        self.keyword_list
            .iter()
            .find(|stat| compact_keyword(&stat.rel_keyword) == hint)
            .map(|stat| stat.pc.value() + stat.mobile.value())
    }
}

#[derive(Debug, Deserialize)]
struct KeywordStat {
    #[serde(rename = "relKeyword")]
    rel_keyword: String,
    #[serde(rename = "monthlyPcQcCnt", default)]
    pc: QueryCount,
    #[serde(rename = "monthlyMobileQcCnt", default)]
    mobile: QueryCount,
}

/// Low counts are reported as the string `"< 10"` instead of a number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QueryCount {
    Exact(u64),
    Text(String),
}

impl Default for QueryCount {
    fn default() -> Self {
        Self::Exact(0)
    }
}

impl QueryCount {
    fn value(&self) -> u64 {
        match self {
            QueryCount::Exact(count) => *count,
            QueryCount::Text(text) => {
                let digits: String = text.chars().filter(char::is_ascii_digit).collect();
                digits.parse().unwrap_or(0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signs_timestamp_method_and_uri() {
        let signature =
            sign_request("secret-key", 1_700_000_000_000, "GET", "/keywordstool").expect("signs");
        assert_eq!(signature, "W36UoKa4A2YA0CeiPcIkr6EEjdpEfLZmO+/k+2kP8CY=");
    }

    #[test]
    fn sums_pc_and_mobile_counts_for_matching_keyword() {
        let payload: KeywordToolResponse = serde_json::from_str(
            r#"{"keywordList":[
                {"relKeyword":"해리포터세트","monthlyPcQcCnt":120,"monthlyMobileQcCnt":880},
                {"relKeyword":"해리포터","monthlyPcQcCnt":5300,"monthlyMobileQcCnt":"< 10"}
            ]}"#,
        )
        .expect("payload parses");

        assert_eq!(payload.volume_for(&compact_keyword("해리 포터")), Some(5310));
        assert_eq!(payload.volume_for("반지의제왕"), None);
    }

    #[test]
    fn compact_keyword_drops_whitespace_and_case() {
        assert_eq!(compact_keyword("  Clean  Code \t"), "cleancode");
    }
}
