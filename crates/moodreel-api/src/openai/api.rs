//! `SuggestionApi` trait definition.
#![allow(clippy::future_not_send)]

use tokio_util::sync::CancellationToken;

use super::types::{SuggestError, SuggestOutcome};

/// Movie suggestion provider.
///
/// Abstracts the provider call so the search orchestrator can be driven by
/// a fake in tests. Uses `trait_variant::make` to generate a `Send`-bound
/// async trait; implement `SuggestionApi` to get both variants.
#[trait_variant::make(SuggestionApi: Send)]
pub trait LocalSuggestionApi {
    /// Requests up to five movie suggestions for `prompt`.
    ///
    /// Resolves to `SuggestOutcome::Canceled` when `cancel` fires before
    /// the call settles.
    ///
    /// # Errors
    ///
    /// Returns `SuggestError::Provider` for non-success statuses and
    /// malformed replies, other variants for transport failures.
    async fn suggest(
        &self,
        prompt: &str,
        credential: &str,
        cancel: CancellationToken,
    ) -> Result<SuggestOutcome, SuggestError>;
}
