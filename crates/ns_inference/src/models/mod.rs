use std::sync::Arc;
use ns_core::config::InferenceConfig;
use ns_core::{Error, InferenceModel, Result, Transcriber};

pub mod dummy;
pub mod openai;

pub use dummy::DummyModel;
pub use openai::OpenAiModel;

/// Builds the model named by `config.model` ("openai" or "dummy").
pub fn create_model(config: &InferenceConfig) -> Result<Arc<dyn InferenceModel>> {
    match config.model.to_ascii_lowercase().as_str() {
        "openai" => Ok(Arc::new(OpenAiModel::new(config)?)),
        "dummy" => Ok(Arc::new(DummyModel::new())),
        other => Err(Error::Configuration(format!(
            "Unknown model '{}'. Available models: openai, dummy",
            other
        ))),
    }
}

/// Builds the speech-to-text backend. Only the OpenAI model can transcribe.
pub fn create_transcriber(config: &InferenceConfig) -> Result<Arc<dyn Transcriber>> {
    match config.model.to_ascii_lowercase().as_str() {
        "openai" => Ok(Arc::new(OpenAiModel::new(config)?)),
        other => Err(Error::Configuration(format!(
            "Model '{}' cannot transcribe audio. Available models: openai",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_model() {
        let dummy = create_model(&InferenceConfig {
            model: "dummy".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(dummy.name(), "Dummy");

        let openai = create_model(&InferenceConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(openai.name(), "OpenAI");

        let missing_key = create_model(&InferenceConfig::default());
        assert!(matches!(missing_key, Err(Error::Configuration(_))));

        let unknown = create_model(&InferenceConfig {
            model: "gpt-j".to_string(),
            ..Default::default()
        });
        assert!(matches!(unknown, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_create_transcriber() {
        let config = InferenceConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        assert!(create_transcriber(&config).is_ok());

        let dummy = create_transcriber(&InferenceConfig {
            model: "dummy".to_string(),
            ..config
        });
        assert!(matches!(dummy, Err(Error::Configuration(msg)) if msg.contains("cannot transcribe")));
    }
}
