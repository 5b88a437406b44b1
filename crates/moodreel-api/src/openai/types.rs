//! Suggestion records, chat-completion wire types, and provider errors.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// User-facing message for replies that cannot be decoded.
pub const UNEXPECTED_FORMAT_MESSAGE: &str =
    "Unexpected response format from the recommendation service.";

/// Error code the provider uses when the account has run out of credit.
const QUOTA_EXHAUSTED_CODE: &str = "insufficient_quota";

// --- Suggestion ---

/// A single movie suggestion as produced by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// Movie title (non-empty).
    pub title: String,
    /// Release year.
    #[serde(
        default,
        deserialize_with = "lenient_integer",
        skip_serializing_if = "Option::is_none"
    )]
    pub year: Option<i32>,
    /// Up to four short genre names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    /// Concise synopsis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synopsis: Option<String>,
    /// Runtime in minutes.
    #[serde(
        default,
        deserialize_with = "lenient_integer",
        skip_serializing_if = "Option::is_none"
    )]
    pub runtime_minutes: Option<u32>,
    /// Up to three streaming services or outlets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub where_to_watch: Option<Vec<String>>,
    /// Up to three reasons to watch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch_reasons: Option<Vec<String>>,
    /// How the title fits the requested mood.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood_fit: Option<String>,
}

impl Suggestion {
    /// Creates a suggestion with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year: None,
            genres: None,
            synopsis: None,
            runtime_minutes: None,
            where_to_watch: None,
            watch_reasons: None,
            mood_fit: None,
        }
    }
}

/// Reads an optional integer the provider may send as a whole float or a
/// numeric string. Anything else, including out-of-range values, is `None`.
fn lenient_integer<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(integer_from_value)
        .and_then(|n| T::try_from(n).ok()))
}

fn integer_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() <= 1e15)
                .and_then(|f| format!("{f:.0}").parse().ok())
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Result of a suggestion call that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestOutcome {
    /// The provider replied with 0-5 suggestions.
    Completed(Vec<Suggestion>),
    /// The caller canceled the call before it settled.
    Canceled,
}

// --- Errors ---

/// Error reported by the provider, or a reply that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ProviderError {
    /// Human-readable message.
    pub message: String,
    /// Provider error code (falls back to the error `type`).
    pub code: Option<String>,
    /// HTTP status of the reply.
    pub status: Option<u16>,
}

impl ProviderError {
    /// Error for a success reply whose content is not the expected JSON.
    #[must_use]
    pub fn unexpected_format(status: u16) -> Self {
        Self {
            message: String::from(UNEXPECTED_FORMAT_MESSAGE),
            code: None,
            status: Some(status),
        }
    }

    /// Whether the provider reported an exhausted quota.
    #[must_use]
    pub fn is_quota_exhausted(&self) -> bool {
        self.code.as_deref() == Some(QUOTA_EXHAUSTED_CODE)
    }
}

/// Failure of a suggestion call.
#[derive(Debug, thiserror::Error)]
pub enum SuggestError {
    /// Non-success status or malformed reply.
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// Connection or body-read failure.
    #[error("suggestion request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The request could not be assembled.
    #[error("suggestion request could not be built: {0}")]
    Internal(String),
}

// --- Chat completion request ---

/// Body of `POST chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatCompletionRequest {
    /// Model identifier.
    pub model: String,
    /// System + user messages.
    pub messages: Vec<ChatMessage>,
    /// Structured-output contract.
    pub response_format: serde_json::Value,
    /// Sampling temperature.
    pub temperature: f32,
}

/// A single chat message.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatMessage {
    /// `system` or `user`.
    pub role: &'static str,
    /// Message text.
    pub content: String,
}

// --- Chat completion response ---

/// Body of a successful `chat/completions` reply.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    /// Completion choices; only the first is used.
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

/// A single completion choice.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatChoice {
    /// Assistant message.
    pub message: ResponseMessage,
}

/// Assistant message of a choice.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ResponseMessage {
    /// Plain text or typed parts.
    #[serde(default)]
    pub content: Option<MessageContent>,
}

/// Message content: either a string or a list of typed parts.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum MessageContent {
    /// Plain string content.
    Text(String),
    /// Typed content parts.
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Returns the text to parse: the string itself, or the first `text` part.
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            Self::Parts(parts) => parts
                .into_iter()
                .find(|part| part.kind == "text")
                .and_then(|part| part.text),
        }
    }
}

/// A typed content part.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ContentPart {
    /// Part type (`text`, `refusal`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Text payload for `text` parts.
    #[serde(default)]
    pub text: Option<String>,
}

/// JSON object the assistant is instructed to return.
///
/// Items stay untyped so one malformed entry does not sink the reply.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RecommendationsPayload {
    /// Suggested titles, decoded one by one.
    pub recommendations: Vec<Value>,
}

// --- Error response ---

/// Error reply body.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorEnvelope {
    /// Error details.
    pub error: Option<ErrorBody>,
}

/// Error details.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    /// Error message.
    #[serde(default)]
    pub message: Option<String>,
    /// Error code; a string for most providers, sometimes a number.
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    /// Error type.
    #[serde(default, rename = "type")]
    pub error_type: Option<String>,
}

impl ErrorBody {
    /// Returns the code as a string, falling back to the error type.
    pub fn code_or_type(&self) -> Option<String> {
        let code = match &self.code {
            Some(serde_json::Value::String(code)) => Some(code.clone()),
            Some(serde_json::Value::Number(code)) => Some(code.to_string()),
            _ => None,
        };
        code.or_else(|| self.error_type.clone())
    }
}
