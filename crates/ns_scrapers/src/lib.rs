pub mod assembler;
pub mod cli;
pub mod fetcher;
pub mod gateway;
pub mod manager;
pub mod scrapers;

pub use assembler::ResultAssembler;
pub use fetcher::ArticleFetcher;
pub use gateway::NaverSearchClient;
pub use manager::SearchManager;
pub use scrapers::{ArticleExtractor, NaverArticleExtractor};

pub use cli::{handle_search, handle_url, SearchArgs, UrlArgs};

pub mod prelude {
    pub use super::scrapers::ArticleExtractor;
    pub use super::SearchManager;
    pub use ns_core::{Article, Error, Result, SearchResponse};
}
