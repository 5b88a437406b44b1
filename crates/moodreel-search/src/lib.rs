//! Mood-driven movie search for moodreel.
//!
//! Turns free-text mood descriptions into debounced, single-flight
//! suggestion requests and shapes the replies into display cards.

/// Display records and the metadata line formatter.
pub mod display;
/// Static mood catalogue.
pub mod mood;
/// Debounced single-flight search orchestrator.
pub mod orchestrator;
/// Prompt derivation.
pub mod prompt;
/// Search view state.
pub mod state;

pub use display::{DisplayMovie, MovieSource, format_meta_line, to_display_movie};
pub use mood::{Mood, UnknownMood};
pub use orchestrator::{DEFAULT_DEBOUNCE, SearchOrchestrator, SearchOrchestratorBuilder};
pub use prompt::{MIN_QUERY_CHARS, build_prompt};
pub use state::{
    CONFIG_ERROR_MESSAGE, GENERIC_ERROR_MESSAGE, NO_MATCHES_MESSAGE, QUOTA_ERROR_MESSAGE, SearchState,
    SearchStatus,
};
