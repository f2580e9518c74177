pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod types;

pub use config::AppConfig;
pub use error::{DropReason, Error, ExtractionMiss, FetchFailure, Result};
pub use models::{InferenceModel, Transcriber};
pub use pipeline::{PageFetcher, SearchProvider};
pub use types::{
    clamp_display, clean_title, trimmed_len, Article, Assembly, DroppedCandidate, FetchResult,
    FetchedPage, SearchCandidate, SearchResponse,
};
