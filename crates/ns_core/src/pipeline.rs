use async_trait::async_trait;
use crate::types::{FetchResult, SearchCandidate};
use crate::Result;

#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Returns up to `display` candidates for `query`, in provider order.
    async fn search(&self, query: &str, display: u32) -> Result<Vec<SearchCandidate>>;
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches one candidate page. Failures are values, never errors.
    async fn fetch(&self, url: &str) -> FetchResult;
}
