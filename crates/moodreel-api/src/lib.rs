//! Suggestion provider client library for moodreel.
//!
//! Talks to an OpenAI-compatible chat-completions endpoint and returns
//! structured movie suggestions.

/// OpenAI chat-completions client.
pub mod openai;
