use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A required setting (credential, endpoint, numeric knob) is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The search provider failed or answered with something we cannot use.
    #[error("Upstream error{}: {message}", status_suffix(.status))]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        Error::Upstream {
            status,
            message: message.into(),
        }
    }

    /// True for failures caused by the caller rather than by this service or its providers.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

/// Why a single candidate page could not be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("wrong domain: {0}")]
    WrongDomain(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionMiss {
    #[error("no known content container")]
    NoContainer,

    #[error("extracted text too short ({0} chars)")]
    TooShort(usize),
}

/// Reason a candidate was left out of a response. Never fatal to the request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchFailure),

    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionMiss),

    #[error("duplicate link")]
    Duplicate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_display() {
        let err = Error::upstream(Some(401), "Authentication failed");
        assert_eq!(err.to_string(), "Upstream error (401): Authentication failed");

        let err = Error::upstream(None, "missing items");
        assert_eq!(err.to_string(), "Upstream error: missing items");
    }

    #[test]
    fn test_drop_reason_from() {
        let reason: DropReason = FetchFailure::Status(404).into();
        assert_eq!(reason.to_string(), "fetch failed: unexpected status 404");

        let reason: DropReason = ExtractionMiss::TooShort(12).into();
        assert_eq!(reason, DropReason::Extraction(ExtractionMiss::TooShort(12)));
    }

    #[test]
    fn test_is_client_error() {
        assert!(Error::InvalidInput("empty query".into()).is_client_error());
        assert!(!Error::Configuration("missing key".into()).is_client_error());
    }
}
