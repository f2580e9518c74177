use std::sync::Arc;

use ns_core::{clamp_display, AppConfig, Assembly, DropReason, Result, SearchProvider};
use tracing::{info, warn};

use crate::assembler::ResultAssembler;
use crate::fetcher::ArticleFetcher;
use crate::gateway::{validate_query, NaverSearchClient};
use crate::scrapers::{utils, ArticleExtractor, NaverArticleExtractor};

/// Runs the whole pipeline: one search, then one fetch and extraction per candidate.
pub struct SearchManager {
    provider: Arc<dyn SearchProvider>,
    assembler: ResultAssembler,
    max_display: u32,
}

impl SearchManager {
    pub fn new(provider: Arc<dyn SearchProvider>, assembler: ResultAssembler, max_display: u32) -> Self {
        Self {
            provider,
            assembler,
            max_display: max_display.max(1),
        }
    }

    /// Wires the Naver gateway, the HTTP fetcher and the Naver extractor from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let provider = Arc::new(NaverSearchClient::new(config.search.clone())?);
        let fetcher = Arc::new(ArticleFetcher::new(&config.fetch)?);
        let extractor: Arc<dyn ArticleExtractor> = Arc::new(NaverArticleExtractor::new());
        info!(
            "🦗 Extractor initialized for {} (allowed domains: {})",
            extractor.source(),
            config.fetch.allowed_domains.as_slice().join(", ")
        );
        let assembler = ResultAssembler::new(fetcher, extractor, &config.assembly);
        Ok(Self::new(provider, assembler, config.search.max_display))
    }

    /// Fatal errors (bad input, configuration, upstream) propagate; candidate
    /// failures only shrink the result.
    pub async fn search(&self, query: &str, display: u32) -> Result<Assembly> {
        let query = validate_query(query)?;
        let clamped = clamp_display(display, self.max_display);

        info!("🔍 Searching for '{}' (display {})", query, clamped);
        let candidates = self.provider.search(query, clamped).await?;
        info!("📰 Found {} candidates", candidates.len());

        let assembly = self.assembler.assemble(candidates).await;
        info!(
            "✅ Accepted {} articles, dropped {}",
            assembly.response.total,
            assembly.dropped.len()
        );
        Ok(assembly)
    }

    /// Fetches and extracts one URL outside of a search.
    pub async fn scrape_url(&self, url: &str) -> Result<std::result::Result<String, DropReason>> {
        let url = utils::parse_url(url)?;
        let extractor = self.assembler.extractor();
        if !extractor.can_handle(url.as_str()) {
            warn!("⚠️ {} is not a known {} page, trying anyway", url, extractor.source());
        }
        Ok(self.assembler.fetch_text(url.as_str()).await)
    }
}
