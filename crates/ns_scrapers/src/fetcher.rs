use async_trait::async_trait;
use ns_core::config::{AllowedDomains, FetchConfig};
use ns_core::{FetchFailure, FetchResult, FetchedPage, PageFetcher, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::redirect::Policy;
use reqwest::Client;
use tracing::{debug, instrument, warn};

/// Publishers serve different markup to unknown clients, so present as a desktop browser.
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                              AppleWebKit/537.36 (KHTML, like Gecko) \
                              Chrome/123.0 Safari/537.36";
pub const ACCEPT_LANGUAGE_VALUE: &str = "ko-KR,ko;q=0.9";

/// Fetches candidate pages and gates them on the post-redirect domain.
#[derive(Debug, Clone)]
pub struct ArticleFetcher {
    client: Client,
    allowed_domains: AllowedDomains,
}

impl ArticleFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .redirect(Policy::limited(config.max_redirects))
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            allowed_domains: config.allowed_domains.clone(),
        })
    }
}

fn classify(error: reqwest::Error) -> FetchFailure {
    if error.is_timeout() {
        FetchFailure::Timeout
    } else {
        FetchFailure::Transport(error.to_string())
    }
}

#[async_trait]
impl PageFetcher for ArticleFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> FetchResult {
        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(error = %e, "Fetch failed");
            classify(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "Non-success status");
            return Err(FetchFailure::Status(status.as_u16()));
        }

        let final_url = response.url().to_string();
        if !self.allowed_domains.allows(&final_url) {
            debug!(%final_url, "Final URL outside allowed domains");
            return Err(FetchFailure::WrongDomain(final_url));
        }

        let html = response.text().await.map_err(classify)?;
        debug!(bytes = html.len(), %final_url, "Fetched page");
        Ok(FetchedPage { final_url, html })
    }
}
