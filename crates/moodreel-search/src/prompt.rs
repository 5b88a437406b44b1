//! Prompt derivation from the query text and mood selection.

use crate::mood::Mood;

/// Minimum trimmed query length, in UTF-16 code units, that triggers a search.
pub const MIN_QUERY_CHARS: usize = 2;

/// Builds the user prompt for `query` and `mood`.
///
/// Returns an empty string when the trimmed query is shorter than
/// `MIN_QUERY_CHARS`, meaning no search should run.
#[must_use]
pub fn build_prompt(query: &str, mood: Option<Mood>) -> String {
    let trimmed = query.trim();
    if trimmed.encode_utf16().count() < MIN_QUERY_CHARS {
        return String::new();
    }

    let mut clauses = vec![format!(
        "Recommend up to five distinct, high-quality, widely recommended movies for \
         someone who is in the mood for \"{trimmed}\". Give each a concise synopsis."
    )];
    if let Some(mood) = mood {
        clauses.push(format!(
            "Every title must match the \"{}\" mood.",
            mood.label()
        ));
    }
    clauses.push(String::from(
        "Respond strictly in the provided JSON schema and nothing else.",
    ));

    clauses.join(" ")
}
