//! Naver news search API client.

use async_trait::async_trait;
use chrono::DateTime;
use ns_core::config::SearchConfig;
use ns_core::logging::truncate_for_log;
use ns_core::{clamp_display, Error, Result, SearchCandidate, SearchProvider};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, instrument};

#[derive(Debug, Deserialize)]
struct NaverApiResponse {
    items: Option<Vec<NaverItem>>,
}

#[derive(Debug, Deserialize)]
struct NaverItem {
    title: String,
    link: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "originallink")]
    original_link: Option<String>,
    #[serde(default, rename = "pubDate")]
    pub_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NaverApiError {
    #[serde(rename = "errorMessage")]
    error_message: String,
}

impl From<NaverItem> for SearchCandidate {
    fn from(item: NaverItem) -> Self {
        let published_at = item
            .pub_date
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc2822(raw).ok());
        SearchCandidate {
            title: item.title,
            link: item.link,
            original_link: item.original_link.filter(|l| !l.is_empty()),
            description: item.description,
            published_at,
        }
    }
}

/// Query gateway backed by the Naver open API.
#[derive(Debug, Clone)]
pub struct NaverSearchClient {
    client: Client,
    config: SearchConfig,
}

impl NaverSearchClient {
    pub fn new(config: SearchConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }
}

/// Rejects blank queries and returns the trimmed text.
pub fn validate_query(query: &str) -> Result<&str> {
    let query = query.trim();
    if query.is_empty() {
        return Err(Error::InvalidInput("query must not be empty".to_string()));
    }
    Ok(query)
}

#[async_trait]
impl SearchProvider for NaverSearchClient {
    #[instrument(skip(self, display_count), fields(endpoint = %self.config.endpoint, display = display_count))]
    async fn search(&self, query: &str, display_count: u32) -> Result<Vec<SearchCandidate>> {
        let query = validate_query(query)?;
        // Checked before any I/O so a missing credential never reaches the network.
        let (client_id, client_secret) = self.config.credentials()?;
        let display_str = clamp_display(display_count, self.config.max_display).to_string();

        debug!(%query, display = %display_str, "Sending search request to Naver");
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("query", query),
                ("display", display_str.as_str()),
                ("start", "1"),
                ("sort", "sim"),
            ])
            .header("X-Naver-Client-Id", client_id)
            .header("X-Naver-Client-Secret", client_secret)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Network error during Naver request");
                Error::upstream(None, format!("Naver API error: {e}"))
            })?;

        let status = response.status();
        // Read raw bytes: the provider's declared charset is not trusted.
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::upstream(Some(status.as_u16()), format!("Naver API error: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<NaverApiError>(&body)
                .map(|e| e.error_message)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            error!(
                status = status.as_u16(),
                message = %truncate_for_log(&message, 200),
                "Naver API error"
            );
            return Err(Error::upstream(Some(status.as_u16()), message));
        }

        let parsed: NaverApiResponse = serde_json::from_slice(&body).map_err(|e| {
            error!(error = %e, "Failed to parse Naver response");
            Error::upstream(Some(status.as_u16()), format!("Invalid response from Naver API: {e}"))
        })?;

        let items = parsed.items.ok_or_else(|| {
            Error::upstream(Some(status.as_u16()), "Invalid response from Naver API: missing items")
        })?;

        debug!(result_count = items.len(), "Search completed successfully");
        Ok(items.into_iter().map(SearchCandidate::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_query() {
        assert_eq!(validate_query("  주식 ").unwrap(), "주식");
        assert!(matches!(validate_query("   "), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_item_into_candidate() {
        let item: NaverItem = serde_json::from_str(
            r#"{
                "title": "잊고 있던 미수령 <b>주식</b> 433억, 주인 찾았다",
                "originallink": "https://www.newsis.com/view/NISX20251023_0003374173",
                "link": "https://n.news.naver.com/mnews/article/003/0013553420?sid=101",
                "description": "경기도에 사는 40대 A씨는",
                "pubDate": "Thu, 23 Oct 2025 14:15:00 +0900"
            }"#,
        )
        .unwrap();
        let candidate = SearchCandidate::from(item);
        assert_eq!(candidate.title, "잊고 있던 미수령 <b>주식</b> 433억, 주인 찾았다");
        assert_eq!(
            candidate.original_link.as_deref(),
            Some("https://www.newsis.com/view/NISX20251023_0003374173")
        );
        let published = candidate.published_at.unwrap();
        assert_eq!(published.to_rfc3339(), "2025-10-23T14:15:00+09:00");
    }

    #[test]
    fn test_item_with_bad_date() {
        let item: NaverItem =
            serde_json::from_str(r#"{"title": "t", "link": "l", "pubDate": "yesterday"}"#).unwrap();
        let candidate = SearchCandidate::from(item);
        assert!(candidate.published_at.is_none());
        assert!(candidate.description.is_none());
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_before_request() {
        let client = NaverSearchClient::new(SearchConfig {
            endpoint: "http://127.0.0.1:9/unreachable".to_string(),
            ..Default::default()
        })
        .unwrap();
        let err = client.search("주식", 5).await.unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
