//! HTTP client for the news Q&A API: health check and ask.

use log::{debug, warn};

use crate::locale::Language;
use crate::messages::{Answer, AskRequest, HealthStatus};

/// Port the API server listens on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 5000;

/// Pick the API base URL for a client running on `host`.
///
/// Loopback hosts always target `localhost`; any other host is assumed to run
/// the API on the same machine. Plain HTTP only.
pub fn resolve_base_url(host: &str, port: u16) -> String {
    let host = host.trim();
    if host == "localhost" || host == "127.0.0.1" {
        format!("http://localhost:{}", port)
    } else {
        format!("http://{}:{}", host, port)
    }
}

/// Failure of a health check or ask request.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server could not be reached at all.
    #[error("{0}")]
    Unreachable(#[from] reqwest::Error),
    /// Non-2xx HTTP status.
    #[error("Server error: {0}")]
    Server(u16),
    /// 2xx body flagged `status: "error"`.
    #[error("{0}")]
    Application(String),
    /// 2xx body that is not a valid answer.
    #[error("invalid response: {0}")]
    Decode(String),
}

/// API client bound to one base URL.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// `base_url` is e.g. `http://localhost:5000`; a trailing slash is ignored.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn health_url(&self) -> String {
        format!("{}/api/health", self.base_url)
    }

    pub fn ask_url(&self) -> String {
        format!("{}/api/ask", self.base_url)
    }

    /// `GET /api/health`. Any 2xx counts as reachable, whatever the body.
    pub async fn health(&self) -> Result<(), ClientError> {
        let url = self.health_url();
        debug!("health check: GET {}", url);
        let resp = self.http.get(&url).send().await.map_err(|e| {
            warn!("health check failed: {}", e);
            ClientError::from(e)
        })?;
        let status = resp.status();
        if !status.is_success() {
            warn!("health check returned {}", status);
            return Err(ClientError::Server(status.as_u16()));
        }
        match resp.json::<HealthStatus>().await {
            Ok(h) => debug!(
                "server healthy (status={}, version={})",
                h.status.as_deref().unwrap_or("?"),
                h.version.as_deref().unwrap_or("?")
            ),
            Err(e) => debug!("health body not understood: {}", e),
        }
        Ok(())
    }

    /// `POST /api/ask` with `{message, language}`.
    pub async fn ask(&self, message: &str, language: Language) -> Result<Answer, ClientError> {
        let url = self.ask_url();
        debug!("ask: POST {} (language={})", url, language);
        let resp = self
            .http
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&AskRequest::new(message, language))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            warn!("ask returned {}", status);
            return Err(ClientError::Server(status.as_u16()));
        }

        let body = resp.text().await?;
        let answer: Answer =
            serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))?;
        if answer.is_error() {
            let detail = answer
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "Unknown error occurred".to_string());
            warn!("ask answered with error: {}", detail);
            return Err(ClientError::Application(detail));
        }
        debug!(
            "ask answered: institutional={}, {} articles",
            answer.is_institutional,
            answer.context.len()
        );
        Ok(answer)
    }
}
