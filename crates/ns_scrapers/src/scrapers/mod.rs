pub mod korea;
pub use korea::naver::NaverArticleExtractor;

/// Turns a publisher page into plain article text.
///
/// Implementations are pure: the same HTML always yields the same text, and
/// `None` means the page is not an article this extractor knows.
pub trait ArticleExtractor: Send + Sync {
    /// Returns the name of the news source
    fn source(&self) -> &str;

    fn extract(&self, html: &str) -> Option<String>;

    /// Returns true if this extractor knows the layout served at the given URL
    fn can_handle(&self, url: &str) -> bool;
}

/// Common utilities for extractors
pub(crate) mod utils {
    use ns_core::{Error, Result};
    use scraper::node::Node;
    use scraper::{ElementRef, Html, Selector};
    use url::Url;

    pub fn parse_url(url: &str) -> Result<Url> {
        Url::parse(url).map_err(|e| Error::InvalidInput(format!("Failed to parse URL: {}", e)))
    }

    /// Finds the first container matching one of `containers` (in priority
    /// order) and linearizes it, skipping every subtree matched by `excluded`.
    pub fn extract_container_text(
        document: &Html,
        containers: &[Selector],
        excluded: &Selector,
    ) -> Option<String> {
        let container = containers
            .iter()
            .find_map(|selector| document.select(selector).next())?;

        let mut lines = Vec::new();
        collect_lines(container, excluded, &mut lines);

        let text = lines.join("\n").trim().to_string();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Each non-blank text node becomes its own trimmed line; `<br>` only
    /// ever separates lines, so it contributes no text of its own.
    fn collect_lines(element: ElementRef<'_>, excluded: &Selector, lines: &mut Vec<String>) {
        for child in element.children() {
            if let Some(child_element) = ElementRef::wrap(child) {
                if excluded.matches(&child_element) || child_element.value().name() == "br" {
                    continue;
                }
                collect_lines(child_element, excluded, lines);
            } else if let Node::Text(text) = child.value() {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    lines.push(trimmed.to_string());
                }
            }
        }
    }
}
