use lazy_static::lazy_static;
use scraper::{Html, Selector};

use crate::scrapers::{utils, ArticleExtractor};

lazy_static! {
    /// Mobile article body first, then the desktop layout.
    static ref CONTAINERS: Vec<Selector> = ["#dic_area", "#newsct_article"]
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect();
    static ref EXCLUDED: Selector =
        Selector::parse("script, style, .media_end_correction, .copyright, figure").unwrap();
}

/// Extractor for articles served from Naver News.
#[derive(Debug, Clone, Default)]
pub struct NaverArticleExtractor;

impl NaverArticleExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl ArticleExtractor for NaverArticleExtractor {
    fn source(&self) -> &str {
        "Naver News"
    }

    fn extract(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        utils::extract_container_text(&document, &CONTAINERS, &EXCLUDED)
    }

    fn can_handle(&self, url: &str) -> bool {
        url.contains("news.naver.com")
    }
}
