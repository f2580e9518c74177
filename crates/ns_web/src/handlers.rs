use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, QueryRejection},
        Multipart, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ns_core::{Article, Error, SearchResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};
use crate::AppState;

const DEFAULT_DISPLAY: u32 = 10;

/// Error body shared by every endpoint: `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    Core(Error),
    /// The named optional backend is not configured on this server.
    Unavailable(&'static str),
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        ApiError::Core(error)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidInput(rejection.body_text()).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidInput(rejection.body_text()).into()
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Error::InvalidInput(rejection.body_text()).into()
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Error::InvalidInput(format!("Invalid multipart body: {err}")).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Unavailable(what) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("No {what} is configured"),
            ),
            ApiError::Core(err) => {
                let status = match err {
                    Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
                    Error::Upstream { .. } => StatusCode::BAD_GATEWAY,
                    Error::Inference(_) => StatusCode::BAD_GATEWAY,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.to_string())
            }
        };
        if matches!(&self, ApiError::Core(err) if err.is_client_error()) {
            warn!(%status, %message, "Request rejected");
        } else {
            error!(%status, %message, "Request failed");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub display: Option<u32>,
    #[serde(default)]
    pub include_dropped: bool,
}

#[derive(Debug, Serialize)]
pub struct DroppedView {
    pub title: String,
    pub link: String,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct SearchBody {
    #[serde(flatten)]
    pub response: SearchResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dropped: Option<Vec<DroppedView>>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub prompt: String,
    /// Articles to analyze; when absent, `query` is searched first.
    #[serde(default)]
    pub articles: Option<Vec<Article>>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub display: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub model: String,
    pub analysis: String,
}

#[derive(Debug, Deserialize)]
pub struct TranscribeParams {
    /// Run a news search with the transcribed text.
    #[serde(default)]
    pub search: bool,
    pub display: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<SearchResponse>,
}

pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Naver News Search API" }))
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchBody>, ApiError> {
    let Query(params) = params?;
    let query = params.query.unwrap_or_default();
    let display = params.display.unwrap_or(DEFAULT_DISPLAY);
    let assembly = state.manager.search(&query, display).await?;

    let dropped = params.include_dropped.then(|| {
        assembly
            .dropped
            .into_iter()
            .map(|d| DroppedView {
                title: d.title,
                link: d.link,
                reason: d.reason.to_string(),
            })
            .collect()
    });

    Ok(Json(SearchBody {
        response: assembly.response,
        dropped,
    }))
}

pub async fn analyze(
    State(state): State<Arc<AppState>>,
    request: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(AnalyzeRequest {
        prompt,
        articles,
        query,
        display,
    }) = request?;

    if prompt.trim().is_empty() {
        return Err(Error::InvalidInput("prompt must not be empty".to_string()).into());
    }
    if articles.is_none() && query.is_none() {
        return Err(Error::InvalidInput("either articles or query is required".to_string()).into());
    }
    let model = state
        .inference_model
        .clone()
        .ok_or(ApiError::Unavailable("inference model"))?;

    let articles = match articles {
        Some(articles) => articles,
        None => {
            let query = query.unwrap_or_default();
            let display = display.unwrap_or(DEFAULT_DISPLAY);
            state.manager.search(&query, display).await?.response.articles
        }
    };

    let analysis = model.analyze(&prompt, &articles).await?;
    Ok(Json(AnalyzeResponse {
        model: model.name().to_string(),
        analysis,
    }))
}

/// Accepts a multipart upload with the recording in a `file` field.
pub async fn transcribe(
    State(state): State<Arc<AppState>>,
    params: Result<Query<TranscribeParams>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TranscribeResponse>, ApiError> {
    let Query(params) = params?;
    let mut multipart = multipart?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let audio = field.bytes().await?;
        upload = Some((audio.to_vec(), filename));
        break;
    }
    let (audio, filename) = upload
        .ok_or_else(|| Error::InvalidInput("multipart field 'file' is required".to_string()))?;

    let transcriber = state
        .transcriber
        .clone()
        .ok_or(ApiError::Unavailable("transcription model"))?;

    let text = transcriber.transcribe(audio, &filename).await?;
    info!("🎤 Transcribed {} chars", text.chars().count());

    let results = if params.search {
        let display = params.display.unwrap_or(DEFAULT_DISPLAY);
        Some(state.manager.search(&text, display).await?.response)
    } else {
        None
    };

    Ok(Json(TranscribeResponse { text, results }))
}
