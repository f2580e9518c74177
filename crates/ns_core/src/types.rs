use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::DropReason;

/// Emphasis markers the search provider wraps around matched terms.
const TITLE_MARKUP: [&str; 2] = ["<b>", "</b>"];

/// A search-provider hit before its page has been fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCandidate {
    pub title: String,
    pub link: String,
    pub original_link: Option<String>,
    pub description: Option<String>,
    /// Advisory only; never used for ordering.
    pub published_at: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// Where the request ended up after redirects.
    pub final_url: String,
    pub html: String,
}

pub type FetchResult = std::result::Result<FetchedPage, crate::error::FetchFailure>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub link: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub total: usize,
    pub articles: Vec<Article>,
}

impl SearchResponse {
    pub fn new(articles: Vec<Article>) -> Self {
        Self {
            total: articles.len(),
            articles,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedCandidate {
    pub link: String,
    pub title: String,
    pub reason: DropReason,
}

/// Outcome of assembling one batch of candidates: the accepted articles plus
/// the reasons every other candidate was left out.
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    pub response: SearchResponse,
    pub dropped: Vec<DroppedCandidate>,
}

/// Removes the provider's emphasis markers from a title, leaving every other
/// character untouched.
pub fn clean_title(title: &str) -> String {
    TITLE_MARKUP
        .iter()
        .fold(title.to_string(), |acc, marker| acc.replace(marker, ""))
}

/// Clamps a requested result count into `1..=max`.
pub fn clamp_display(requested: u32, max: u32) -> u32 {
    requested.clamp(1, max.max(1))
}

/// Character count after trimming, the measure used for the minimum-length rule.
pub fn trimmed_len(text: &str) -> usize {
    text.trim().chars().count()
}
