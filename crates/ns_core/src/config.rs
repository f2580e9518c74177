use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::{Error, Result};

pub const DEFAULT_SEARCH_URL: &str = "https://openapi.naver.com/v1/search/news.json";
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";
pub const DEFAULT_ALLOWED_DOMAINS: [&str; 2] = ["n.news.naver.com", "news.naver.com"];

/// Hosts a fetched page must resolve to before its content is trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedDomains(Vec<String>);

impl AllowedDomains {
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            domains
                .into_iter()
                .map(|d| d.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        )
    }

    /// Exact host match or a subdomain of an entry.
    pub fn allows(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();
        self.0
            .iter()
            .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Default for AllowedDomains {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_DOMAINS)
    }
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub endpoint: String,
    pub timeout: Duration,
    pub max_display: u32,
}

impl SearchConfig {
    /// Returns the credential pair, or a configuration error naming what is missing.
    pub fn credentials(&self) -> Result<(&str, &str)> {
        match (self.client_id.as_deref(), self.client_secret.as_deref()) {
            (Some(id), Some(secret)) => Ok((id, secret)),
            _ => Err(Error::Configuration(
                "NAVER_API_KEY or NAVER_SECRET_KEY not found in environment variables".to_string(),
            )),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            endpoint: DEFAULT_SEARCH_URL.to_string(),
            timeout: Duration::from_secs(20),
            max_display: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub allowed_domains: AllowedDomains,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            allowed_domains: AllowedDomains::default(),
            max_redirects: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssemblyConfig {
    pub min_text_chars: usize,
    pub concurrency: usize,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            min_text_chars: 50,
            concurrency: 4,
        }
    }
}

#[derive(Clone)]
pub struct InferenceConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: String,
    pub model_name: String,
    /// Speech-to-text model used by `/transcribe`.
    pub transcription_model: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model_name", &self.model_name)
            .field("transcription_model", &self.transcription_model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            model: "openai".to_string(),
            api_key: None,
            base_url: DEFAULT_OPENAI_URL.to_string(),
            model_name: DEFAULT_OPENAI_MODEL.to_string(),
            transcription_model: DEFAULT_TRANSCRIPTION_MODEL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub search: SearchConfig,
    pub fetch: FetchConfig,
    pub assembly: AssemblyConfig,
    pub inference: InferenceConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        config.search.client_id = get("NAVER_API_KEY");
        config.search.client_secret = get("NAVER_SECRET_KEY");
        if let Some(endpoint) = get("NAVER_SEARCH_URL") {
            config.search.endpoint = endpoint;
        }
        if let Some(secs) = parse_var::<u64>(&get, "NS_SEARCH_TIMEOUT_SECS")? {
            config.search.timeout = Duration::from_secs(secs);
        }
        if let Some(max) = parse_var::<u32>(&get, "NS_MAX_DISPLAY")? {
            config.search.max_display = max.max(1);
        }

        if let Some(secs) = parse_var::<u64>(&get, "NS_FETCH_TIMEOUT_SECS")? {
            config.fetch.timeout = Duration::from_secs(secs);
        }
        if let Some(domains) = get("NS_ALLOWED_DOMAINS") {
            config.fetch.allowed_domains = AllowedDomains::new(domains.split(','));
        }

        if let Some(min) = parse_var::<usize>(&get, "NS_MIN_TEXT_CHARS")? {
            config.assembly.min_text_chars = min;
        }
        if let Some(concurrency) = parse_var::<usize>(&get, "NS_CONCURRENCY")? {
            config.assembly.concurrency = concurrency.max(1);
        }

        config.inference.api_key = get("OPENAI_API_KEY");
        if let Some(base_url) = get("OPENAI_BASE_URL") {
            config.inference.base_url = base_url;
        }
        if let Some(model_name) = get("OPENAI_MODEL") {
            config.inference.model_name = model_name;
        }
        if let Some(model) = get("OPENAI_TRANSCRIPTION_MODEL") {
            config.inference.transcription_model = model;
        }
        if let Some(model) = get("NS_MODEL") {
            config.inference.model = model;
        }

        if let Some(host) = get("NS_HOST") {
            config.server.host = host;
        }
        if let Some(port) = parse_var::<u16>(&get, "NS_PORT")? {
            config.server.port = port;
        }

        Ok(config)
    }

    /// Checks everything a search request needs, so a misconfigured process
    /// fails before it accepts traffic.
    pub fn validate(&self) -> Result<()> {
        self.search.credentials()?;
        if self.fetch.allowed_domains.as_slice().is_empty() {
            return Err(Error::Configuration("NS_ALLOWED_DOMAINS is empty".to_string()));
        }
        Url::parse(&self.search.endpoint)
            .map_err(|e| Error::Configuration(format!("Invalid NAVER_SEARCH_URL: {e}")))?;
        Ok(())
    }
}

fn parse_var<T>(get: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| Error::Configuration(format!("Invalid {key} '{raw}': {e}")))
        })
        .transpose()
}
