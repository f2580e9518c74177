pub mod naver;

pub use naver::NaverArticleExtractor;
