use std::collections::HashSet;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use ns_core::config::AssemblyConfig;
use ns_core::{
    clean_title, trimmed_len, Article, Assembly, DropReason, DroppedCandidate, ExtractionMiss,
    PageFetcher, SearchCandidate, SearchResponse,
};
use tracing::{debug, info, instrument};

use crate::scrapers::ArticleExtractor;

/// Folds per-candidate fetch and extraction outcomes into one ordered response.
pub struct ResultAssembler {
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn ArticleExtractor>,
    min_text_chars: usize,
    concurrency: usize,
}

impl ResultAssembler {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        extractor: Arc<dyn ArticleExtractor>,
        config: &AssemblyConfig,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            min_text_chars: config.min_text_chars,
            concurrency: config.concurrency.max(1),
        }
    }

    /// Fetches and extracts every candidate at most once, up to `concurrency`
    /// at a time. Output order always follows candidate order.
    #[instrument(skip_all, fields(candidates = candidates.len()))]
    pub async fn assemble(&self, candidates: Vec<SearchCandidate>) -> Assembly {
        let mut seen = HashSet::new();
        let marked: Vec<(SearchCandidate, bool)> = candidates
            .into_iter()
            .map(|candidate| {
                let duplicate = !seen.insert(candidate.link.clone());
                (candidate, duplicate)
            })
            .collect();

        let outcomes: Vec<(SearchCandidate, Result<Article, DropReason>)> = stream::iter(marked)
            .map(|(candidate, duplicate)| async move {
                if duplicate {
                    return (candidate, Err(DropReason::Duplicate));
                }
                let outcome = self.process(&candidate).await;
                (candidate, outcome)
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut articles = Vec::new();
        let mut dropped = Vec::new();
        for (candidate, outcome) in outcomes {
            match outcome {
                Ok(article) => articles.push(article),
                Err(reason) => {
                    debug!(link = %candidate.link, %reason, "Dropped candidate");
                    dropped.push(DroppedCandidate {
                        link: candidate.link,
                        title: clean_title(&candidate.title),
                        reason,
                    });
                }
            }
        }

        info!(accepted = articles.len(), dropped = dropped.len(), "Assembled search response");
        Assembly {
            response: SearchResponse::new(articles),
            dropped,
        }
    }

    async fn process(&self, candidate: &SearchCandidate) -> Result<Article, DropReason> {
        let text = self.fetch_text(&candidate.link).await?;
        Ok(Article {
            title: clean_title(&candidate.title),
            link: candidate.link.clone(),
            text,
        })
    }

    pub fn extractor(&self) -> &dyn ArticleExtractor {
        self.extractor.as_ref()
    }

    /// Fetch, extract and length-check one page.
    pub async fn fetch_text(&self, url: &str) -> Result<String, DropReason> {
        let page = self.fetcher.fetch(url).await?;
        let text = self
            .extractor
            .extract(&page.html)
            .ok_or(ExtractionMiss::NoContainer)?;

        let len = trimmed_len(&text);
        if len <= self.min_text_chars {
            return Err(ExtractionMiss::TooShort(len).into());
        }
        Ok(text.trim().to_string())
    }
}
