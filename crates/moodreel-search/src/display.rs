//! Display records derived from provider suggestions.

use moodreel_api::openai::Suggestion;
use serde::Serialize;

/// Overview shown when a suggestion has neither synopsis nor reasons.
pub const OVERVIEW_PLACEHOLDER: &str = "No synopsis available.";

/// Separator between metadata parts.
const META_SEPARATOR: &str = " · ";

/// Where a display record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MovieSource {
    /// Generated by the AI suggestion provider.
    Ai,
}

/// A movie card ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayMovie {
    /// Movie title.
    pub title: String,
    /// Release year.
    pub year: Option<i32>,
    /// Genre names, possibly empty.
    pub genres: Vec<String>,
    /// Synopsis, or a stand-in derived from the reasons.
    pub overview: String,
    /// Runtime in minutes.
    pub runtime: Option<u32>,
    /// Streaming services, possibly empty.
    pub where_to_watch: Vec<String>,
    /// Reasons to watch, possibly empty.
    pub watch_reasons: Vec<String>,
    /// Provenance tag.
    pub source: MovieSource,
}

impl From<&Suggestion> for DisplayMovie {
    fn from(suggestion: &Suggestion) -> Self {
        let reasons = suggestion
            .watch_reasons
            .clone()
            .filter(|reasons| !reasons.is_empty());

        let overview = match (&suggestion.synopsis, &reasons) {
            (Some(synopsis), _) if !synopsis.trim().is_empty() => synopsis.clone(),
            (_, Some(reasons)) => reasons.join(" "),
            _ => String::from(OVERVIEW_PLACEHOLDER),
        };

        let watch_reasons = reasons
            .or_else(|| suggestion.mood_fit.clone().map(|fit| vec![fit]))
            .unwrap_or_default();

        Self {
            title: suggestion.title.clone(),
            year: suggestion.year,
            genres: suggestion.genres.clone().unwrap_or_default(),
            overview,
            runtime: suggestion.runtime_minutes,
            where_to_watch: suggestion.where_to_watch.clone().unwrap_or_default(),
            watch_reasons,
            source: MovieSource::Ai,
        }
    }
}

impl From<Suggestion> for DisplayMovie {
    fn from(suggestion: Suggestion) -> Self {
        Self::from(&suggestion)
    }
}

/// Maps a suggestion onto a display record.
#[must_use]
pub fn to_display_movie(suggestion: &Suggestion) -> DisplayMovie {
    DisplayMovie::from(suggestion)
}

/// Joins year, genres, and runtime into a single metadata line.
///
/// Absent parts are omitted; returns an empty string when all are absent.
#[must_use]
pub fn format_meta_line(movie: &DisplayMovie) -> String {
    let mut parts = Vec::with_capacity(3);
    if let Some(year) = movie.year {
        parts.push(year.to_string());
    }
    if !movie.genres.is_empty() {
        parts.push(movie.genres.join(", "));
    }
    if let Some(runtime) = movie.runtime {
        parts.push(format!("{runtime} min"));
    }
    parts.join(META_SEPARATOR)
}
