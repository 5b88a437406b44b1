//! `OpenAiClient` - chat-completions client implementation.

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use tokio_util::sync::CancellationToken;
use tracing::instrument;
use url::Url;

use super::api::SuggestionApi;
use super::schema::{MAX_RECOMMENDATIONS, SYSTEM_INSTRUCTION, response_format};
use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ErrorEnvelope, MessageContent,
    ProviderError, RecommendationsPayload, SuggestError, SuggestOutcome, Suggestion,
};

/// Default base URL for the OpenAI API v1.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";

/// Default chat model.
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default sampling temperature.
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Completion endpoint, relative to the base URL.
const COMPLETIONS_PATH: &str = "chat/completions";

/// OpenAI chat-completions client.
///
/// Holds no credential; the caller passes one per request.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OpenAiClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Model identifier.
    model: String,
    /// Sampling temperature.
    temperature: f32,
}

/// Builder for `OpenAiClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OpenAiClientBuilder {
    base_url: Option<Url>,
    model: Option<String>,
    temperature: Option<f32>,
    user_agent: Option<String>,
}

impl OpenAiClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            model: None,
            temperature: None,
            user_agent: None,
        }
    }

    /// Overrides the base URL (compatible providers, wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the model identifier (default: `gpt-4o-mini`).
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the sampling temperature (default: 0.7).
    #[must_use]
    pub const fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<OpenAiClient> {
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            Url::parse(DEFAULT_BASE_URL).context("invalid default base URL")?
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .build()
            .context("failed to build HTTP client")?;

        Ok(OpenAiClient {
            http_client,
            base_url,
            model: self.model.unwrap_or_else(|| String::from(DEFAULT_MODEL)),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        })
    }
}

impl OpenAiClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> OpenAiClientBuilder {
        OpenAiClientBuilder::new()
    }

    /// Returns the configured model identifier.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Builds the request body for `prompt`.
    fn completion_request(&self, prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: String::from(SYSTEM_INSTRUCTION),
                },
                ChatMessage {
                    role: "user",
                    content: String::from(prompt),
                },
            ],
            response_format: response_format(),
            temperature: self.temperature,
        }
    }

    /// Sends one completion request and decodes the suggestions.
    #[instrument(skip_all)]
    async fn post_completion(
        &self,
        prompt: &str,
        credential: &str,
    ) -> Result<Vec<Suggestion>, SuggestError> {
        let url = self
            .base_url
            .join(COMPLETIONS_PATH)
            .map_err(|e| SuggestError::Internal(format!("failed to join URL path: {e}")))?;

        tracing::debug!(url = %url, model = %self.model, "Suggestion request");

        let response = self
            .http_client
            .post(url)
            .bearer_auth(credential)
            .json(&self.completion_request(prompt))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let error = provider_error_from_body(status, &body);
            tracing::warn!(
                status = status.as_u16(),
                code = error.code.as_deref().unwrap_or("-"),
                "Suggestion provider returned an error"
            );
            return Err(error.into());
        }

        let suggestions = parse_completion(status, &body)?;
        tracing::info!(count = suggestions.len(), "Suggestions received");
        Ok(suggestions)
    }
}

impl SuggestionApi for OpenAiClient {
    #[instrument(skip_all)]
    async fn suggest(
        &self,
        prompt: &str,
        credential: &str,
        cancel: CancellationToken,
    ) -> Result<SuggestOutcome, SuggestError> {
        if cancel.is_cancelled() {
            return Ok(SuggestOutcome::Canceled);
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::debug!("Suggestion request canceled");
                Ok(SuggestOutcome::Canceled)
            }
            result = self.post_completion(prompt, credential) => {
                result.map(SuggestOutcome::Completed)
            }
        }
    }
}

/// Builds a `ProviderError` from a non-success reply.
///
/// Uses `error.message` when the body carries one, otherwise a generic
/// status-coded message.
fn provider_error_from_body(status: StatusCode, body: &str) -> ProviderError {
    let details = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error);

    let code = details.as_ref().and_then(|d| d.code_or_type());
    let message = details
        .and_then(|d| d.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            format!(
                "Recommendation request failed with status {}.",
                status.as_u16()
            )
        });

    ProviderError {
        message,
        code,
        status: Some(status.as_u16()),
    }
}

/// Decodes a successful completion body into at most five suggestions.
fn parse_completion(status: StatusCode, body: &str) -> Result<Vec<Suggestion>, ProviderError> {
    let unexpected = |reason: &str| {
        tracing::warn!(reason, "Suggestion provider returned an unexpected format");
        ProviderError::unexpected_format(status.as_u16())
    };

    let response: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|_| unexpected("completion body is not JSON"))?;

    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .and_then(MessageContent::into_text)
        .ok_or_else(|| unexpected("no text content in first choice"))?;

    let payload: RecommendationsPayload = serde_json::from_str(&text)
        .map_err(|_| unexpected("content is not a recommendations object"))?;

    let total = payload.recommendations.len();
    let suggestions: Vec<Suggestion> = payload
        .recommendations
        .into_iter()
        .filter_map(|item| {
            serde_json::from_value::<Suggestion>(item)
                .inspect_err(|error| {
                    tracing::warn!(%error, "Dropping malformed suggestion");
                })
                .ok()
        })
        .filter(|s| !s.title.trim().is_empty())
        .take(MAX_RECOMMENDATIONS)
        .collect();

    if suggestions.len() < total {
        tracing::debug!(
            received = total,
            kept = suggestions.len(),
            "Dropped malformed, blank, or excess suggestions"
        );
    }

    Ok(suggestions)
}
