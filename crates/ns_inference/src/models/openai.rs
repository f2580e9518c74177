use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use ns_core::config::InferenceConfig;
use ns_core::logging::truncate_for_log;
use ns_core::{Article, Error, InferenceModel, Result, Transcriber};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Chat-completions client for OpenAI and compatible endpoints.
pub struct OpenAiModel {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
    model_name: String,
    transcription_model: String,
}

impl OpenAiModel {
    pub fn new(config: &InferenceConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| Error::Configuration("OPENAI_API_KEY is not set".to_string()))?;
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client: Arc::new(client),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model_name: config.model_name.clone(),
            transcription_model: config.transcription_model.clone(),
        })
    }

    /// Every failure talking to the provider is an inference error, whatever layer it came from.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response> {
        let response = request
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "OpenAI request failed");
                Error::Inference(format!("OpenAI request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                status = status.as_u16(),
                body = %truncate_for_log(&body, 200),
                "OpenAI API error"
            );
            return Err(Error::Inference(format!(
                "OpenAI API error ({}): {}",
                status.as_u16(),
                body
            )));
        }
        Ok(response)
    }
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| Error::Inference(format!("Invalid response from OpenAI API: {e}")))
}

impl fmt::Debug for OpenAiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model_name", &self.model_name)
            .field("transcription_model", &self.transcription_model)
            .finish()
    }
}

#[async_trait]
impl InferenceModel for OpenAiModel {
    fn name(&self) -> &str {
        "OpenAI"
    }

    #[instrument(skip_all, fields(model = %self.model_name, articles = articles.len()))]
    async fn analyze(&self, prompt: &str, articles: &[Article]) -> Result<String> {
        // The prompt steers; the articles travel as the user turn, verbatim JSON.
        let request = ChatRequest {
            model: self.model_name.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: serde_json::to_string_pretty(articles)?,
                },
            ],
        };

        let response = self
            .send(
                self.client
                    .post(format!("{}/chat/completions", self.base_url))
                    .json(&request),
            )
            .await?;

        let response: ChatResponse = decode(response).await?;
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::Inference("OpenAI API returned no choices".to_string()))?;

        debug!(chars = content.chars().count(), "Analysis generated");
        Ok(content)
    }
}

#[async_trait]
impl Transcriber for OpenAiModel {
    #[instrument(skip(self, audio), fields(model = %self.transcription_model, bytes = audio.len()))]
    async fn transcribe(&self, audio: Vec<u8>, filename: &str) -> Result<String> {
        if audio.is_empty() {
            return Err(Error::InvalidInput("audio must not be empty".to_string()));
        }
        let filename = if filename.trim().is_empty() {
            "audio.wav"
        } else {
            filename
        };

        let form = Form::new()
            .text("model", self.transcription_model.clone())
            .part("file", Part::bytes(audio).file_name(filename.to_string()));

        let response = self
            .send(
                self.client
                    .post(format!("{}/audio/transcriptions", self.base_url))
                    .multipart(form),
            )
            .await?;

        let transcription: TranscriptionResponse = decode(response).await?;
        let text = transcription.text.trim().to_string();
        debug!(chars = text.chars().count(), "Audio transcribed");
        Ok(text)
    }
}
