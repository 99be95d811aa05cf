//! HTTP message types for `/api/ask` and `/api/health`. Client ↔ server JSON.

use serde::{Deserialize, Deserializer, Serialize};

use crate::locale::Language;

/// Client → server: body of `POST /api/ask`.
#[derive(Debug, Clone, Serialize)]
pub struct AskRequest<'a> {
    pub message: &'a str,
    pub language: Language,
}

impl<'a> AskRequest<'a> {
    pub fn new(message: &'a str, language: Language) -> Self {
        Self { message, language }
    }
}

/// Server → client: answer to an ask request.
///
/// The server reports success as `"success"`; only `"error"` marks a failed answer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Answer {
    pub status: String,
    pub is_institutional: bool,
    pub message: Option<String>,
    pub context: Vec<Article>,
    pub total_results: u64,
}

impl Answer {
    pub fn is_error(&self) -> bool {
        self.status == "error"
    }
}

/// One news article in an answer's context.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Article {
    #[serde(default, deserialize_with = "non_blank")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "non_blank")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "non_blank")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "non_blank")]
    pub category: Option<String>,
    #[serde(default)]
    pub language: Language,
}

/// Server → client: health endpoint body. Only used for logging.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    pub status: Option<String>,
    pub version: Option<String>,
}

/// Blank strings and nulls both mean "absent".
fn non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}
