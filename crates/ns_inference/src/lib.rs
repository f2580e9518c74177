pub mod models;

pub use models::{create_model, create_transcriber};
pub use ns_core::{InferenceModel, Transcriber};

pub mod prelude {
    pub use super::models::{create_model, create_transcriber, DummyModel, OpenAiModel};
    pub use ns_core::config::InferenceConfig;
    pub use ns_core::{Article, Error, InferenceModel, Result, Transcriber};
}
