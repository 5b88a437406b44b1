//! OpenAI chat-completions client module.
//!
//! Sends a single structured-output request per search and decodes the
//! assistant's JSON reply into `Suggestion` records.

mod api;
mod client;
mod schema;
mod types;

pub use api::{LocalSuggestionApi, SuggestionApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{OpenAiClient, OpenAiClientBuilder};
pub use schema::{MAX_RECOMMENDATIONS, SYSTEM_INSTRUCTION, recommendation_schema, response_format};
pub use types::{
    ProviderError, SuggestError, SuggestOutcome, Suggestion, UNEXPECTED_FORMAT_MESSAGE,
};
