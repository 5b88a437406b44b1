//! Observable search state and its derived view values.

use serde::Serialize;

use crate::display::DisplayMovie;
use crate::mood::Mood;

/// Shown when no credential is configured.
pub const CONFIG_ERROR_MESSAGE: &str =
    "Add an OpenAI API key to enable AI-powered recommendations.";
/// Shown when the provider returns an empty list.
pub const NO_MATCHES_MESSAGE: &str = "No matches found. Try expanding your description.";
/// Shown when the provider reports an exhausted quota.
pub const QUOTA_ERROR_MESSAGE: &str =
    "The recommendation service has no remaining quota. Check your plan and billing details.";
/// Shown for failures that carry no provider message.
pub const GENERIC_ERROR_MESSAGE: &str =
    "Something went wrong while fetching recommendations. Please try again.";

/// Lifecycle of the current search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// Nothing running, nothing shown.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// Results are available.
    Ready,
    /// The last attempt failed.
    Error,
}

/// Snapshot of a search session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchState {
    /// Query text as typed.
    pub query: String,
    /// Selected mood.
    pub mood: Option<Mood>,
    /// Current status.
    pub status: SearchStatus,
    /// Message for the user. Set with `Error`, or with `Idle` for "no matches".
    pub error: Option<String>,
    /// Results of the last settled request.
    pub movies: Vec<DisplayMovie>,
}

impl SearchState {
    /// First movie, featured prominently.
    #[must_use]
    pub fn highlight(&self) -> Option<&DisplayMovie> {
        self.movies.first()
    }

    /// Every movie after the highlight.
    #[must_use]
    pub fn supporting(&self) -> &[DisplayMovie] {
        self.movies.get(1..).unwrap_or_default()
    }

    /// Whether AI results are on display.
    #[must_use]
    pub const fn is_using_ai(&self) -> bool {
        !self.movies.is_empty()
    }

    /// Whether the last attempt has produced an outcome worth reporting.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        match self.status {
            SearchStatus::Ready | SearchStatus::Error => true,
            SearchStatus::Idle => self.error.is_some(),
            SearchStatus::Loading => false,
        }
    }

    pub(crate) fn reset_results(&mut self) {
        self.movies.clear();
        self.status = SearchStatus::Idle;
        self.error = None;
    }

    pub(crate) fn start_loading(&mut self) {
        self.status = SearchStatus::Loading;
        self.error = None;
    }

    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.movies.clear();
        self.status = SearchStatus::Error;
        self.error = Some(message.into());
    }

    pub(crate) fn show(&mut self, movies: Vec<DisplayMovie>) {
        if movies.is_empty() {
            self.movies.clear();
            self.status = SearchStatus::Idle;
            self.error = Some(String::from(NO_MATCHES_MESSAGE));
        } else {
            self.movies = movies;
            self.status = SearchStatus::Ready;
            self.error = None;
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::indexing_slicing)]

    use moodreel_api::openai::Suggestion;

    use super::*;

    fn movies(titles: &[&str]) -> Vec<DisplayMovie> {
        titles
            .iter()
            .map(|title| DisplayMovie::from(Suggestion::new(*title)))
            .collect()
    }

    #[test]
    fn test_default_is_idle_and_empty() {
        // Arrange & Act
        let state = SearchState::default();

        // Assert
        assert_eq!(state.status, SearchStatus::Idle);
        assert!(state.query.is_empty());
        assert!(state.mood.is_none());
        assert!(state.error.is_none());
        assert!(!state.is_using_ai());
        assert!(!state.is_settled());
        assert!(state.highlight().is_none());
        assert!(state.supporting().is_empty());
    }

    #[test]
    fn test_show_splits_highlight_and_supporting() {
        // Arrange
        let mut state = SearchState::default();

        // Act
        state.show(movies(&["One", "Two", "Three"]));

        // Assert
        assert_eq!(state.status, SearchStatus::Ready);
        assert_eq!(state.highlight().map(|m| m.title.as_str()), Some("One"));
        let rest: Vec<&str> = state.supporting().iter().map(|m| m.title.as_str()).collect();
        assert_eq!(rest, vec!["Two", "Three"]);
        assert!(state.is_using_ai());
        assert!(state.is_settled());
    }

    #[test]
    fn test_show_single_movie_has_no_supporting() {
        // Arrange
        let mut state = SearchState::default();

        // Act
        state.show(movies(&["Solo"]));

        // Assert
        assert!(state.highlight().is_some());
        assert!(state.supporting().is_empty());
    }

    #[test]
    fn test_show_empty_is_idle_with_message() {
        // Arrange
        let mut state = SearchState::default();
        state.show(movies(&["Old"]));

        // Act
        state.show(Vec::new());

        // Assert
        assert_eq!(state.status, SearchStatus::Idle);
        assert_eq!(state.error.as_deref(), Some(NO_MATCHES_MESSAGE));
        assert!(state.movies.is_empty());
        assert!(state.is_settled());
    }

    #[test]
    fn test_fail_clears_movies() {
        // Arrange
        let mut state = SearchState::default();
        state.show(movies(&["Old"]));

        // Act
        state.fail(GENERIC_ERROR_MESSAGE);

        // Assert
        assert_eq!(state.status, SearchStatus::Error);
        assert_eq!(state.error.as_deref(), Some(GENERIC_ERROR_MESSAGE));
        assert!(!state.is_using_ai());
    }

    #[test]
    fn test_start_loading_keeps_movies_and_clears_error() {
        // Arrange
        let mut state = SearchState::default();
        state.show(movies(&["Kept"]));
        state.error = Some(String::from("stale"));

        // Act
        state.start_loading();

        // Assert
        assert_eq!(state.status, SearchStatus::Loading);
        assert!(state.error.is_none());
        assert_eq!(state.movies.len(), 1);
        assert!(!state.is_settled());
    }

    #[test]
    fn test_serializes_status_in_snake_case() {
        // Arrange
        let mut state = SearchState {
            mood: Some(Mood::FeelGood),
            ..SearchState::default()
        };
        state.show(movies(&["One"]));

        // Act
        let value = serde_json::to_value(&state).unwrap_or_default();

        // Assert
        assert_eq!(value["status"], "ready");
        assert_eq!(value["mood"], "Feel-Good");
        assert_eq!(value["movies"][0]["source"], "ai");
    }
}
