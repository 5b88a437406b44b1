//! Structured-output contract sent with every completion request.

use serde_json::{Value, json};

/// Upper bound on suggestions kept from a single reply.
pub const MAX_RECOMMENDATIONS: usize = 5;

/// System instruction constraining the assistant's role.
pub const SYSTEM_INSTRUCTION: &str = "You are a film curator who recommends movies for a \
    viewer's mood. Only recommend real, released feature films. Keep synopses concise and \
    spoiler-free. Reply with JSON only, following the provided schema exactly.";

/// Name under which the schema is registered with the provider.
const SCHEMA_NAME: &str = "movie_recommendations";

/// Returns the JSON schema for `{ "recommendations": Suggestion[] }`.
#[must_use]
pub fn recommendation_schema() -> Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["recommendations"],
        "properties": {
            "recommendations": {
                "type": "array",
                "minItems": 1,
                "maxItems": MAX_RECOMMENDATIONS,
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "required": ["title"],
                    "properties": {
                        "title": { "type": "string", "minLength": 1, "maxLength": 120 },
                        "year": { "type": "integer", "minimum": 1888, "maximum": 2100 },
                        "genres": {
                            "type": "array",
                            "minItems": 1,
                            "maxItems": 4,
                            "items": { "type": "string", "maxLength": 32 }
                        },
                        "synopsis": { "type": "string", "maxLength": 400 },
                        "runtimeMinutes": { "type": "integer", "minimum": 30, "maximum": 400 },
                        "whereToWatch": {
                            "type": "array",
                            "minItems": 1,
                            "maxItems": 3,
                            "items": { "type": "string", "maxLength": 60 }
                        },
                        "watchReasons": {
                            "type": "array",
                            "minItems": 1,
                            "maxItems": 3,
                            "items": { "type": "string", "maxLength": 140 }
                        },
                        "moodFit": { "type": "string", "maxLength": 160 }
                    }
                }
            }
        }
    })
}

/// Returns the `response_format` request field wrapping the schema.
#[must_use]
pub fn response_format() -> Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": SCHEMA_NAME,
            "strict": false,
            "schema": recommendation_schema(),
        }
    })
}
