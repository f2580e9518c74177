use async_trait::async_trait;
use crate::types::Article;
use crate::Result;

#[async_trait]
pub trait InferenceModel: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    /// Run a free-form prompt over a set of accepted articles.
    async fn analyze(&self, prompt: &str, articles: &[Article]) -> Result<String>;
}

/// Speech-to-text. The resulting text is meant to be used as a search query.
#[async_trait]
pub trait Transcriber: Send + Sync + std::fmt::Debug {
    async fn transcribe(&self, audio: Vec<u8>, filename: &str) -> Result<String>;
}
