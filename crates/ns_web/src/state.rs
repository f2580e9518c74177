use std::sync::Arc;
use ns_core::{InferenceModel, Transcriber};
use ns_scrapers::SearchManager;

pub struct AppState {
    pub manager: Arc<SearchManager>,
    /// `None` when no model is configured; `/analyze` then answers 503.
    pub inference_model: Option<Arc<dyn InferenceModel>>,
    pub transcriber: Option<Arc<dyn Transcriber>>,
}
