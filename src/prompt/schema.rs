// Fixed JSON schemas embedded in structured prompts
//
// Only the top-level `required` list is enforced locally (see
// `structured::recover`); the rest of the schema is a prompting aid.

use once_cell::sync::Lazy;
use serde_json::{json, Value};

/// A named declarative schema
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    name: &'static str,
    body: Value,
}

impl Schema {
    pub fn new(name: &'static str, body: Value) -> Self {
        Self { name, body }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn as_value(&self) -> &Value {
        &self.body
    }

    /// Top-level keys the schema marks as required, in declaration order
    pub fn required_keys(&self) -> Vec<String> {
        self.body
            .get("required")
            .and_then(Value::as_array)
            .map(|keys| {
                keys.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Pretty-printed form, as embedded in the user message
    pub fn to_pretty_string(&self) -> String {
        format!("{:#}", self.body)
    }
}

static GENERAL_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new(
        "general_schema",
        json!({
            "type": "object",
            "properties": {
                "task": {
                    "type": "string",
                    "enum": ["qa", "summarize", "extract", "classify", "unknown", "story"]
                },
                "answer": {
                    "type": "object",
                    "properties": {
                        "text": { "type": "string" }
                    },
                    "required": ["text"],
                    "additionalProperties": false
                },
                "key_points": {
                    "type": "array",
                    "items": { "type": "string" }
                },
                "entities": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "type": { "type": "string" },
                            "text": { "type": "string" }
                        },
                        "required": ["type", "text"],
                        "additionalProperties": false
                    }
                },
                "confidence": { "type": "number", "minimum": 0, "maximum": 1 },
                "citations": {
                    "type": "array",
                    "items": { "type": "string" }
                }
            },
            "required": ["task", "answer"],
            "additionalProperties": false
        }),
    )
});

static STORY_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new(
        "story_schema",
        json!({
            "type": "object",
            "properties": {
                "task": { "type": "string", "enum": ["story"] },
                "title": { "type": "string" },
                "genre": { "type": "string" },
                "themes": { "type": "array", "items": { "type": "string" } },
                "synopsis": { "type": "string" },
                "word_count": { "type": "number" },
                "story": { "type": "string" }
            },
            "required": ["task", "title", "genre", "themes", "synopsis", "word_count", "story"],
            "additionalProperties": false
        }),
    )
});

/// Schema for non-creative structured requests (QA, summaries, extraction, ...)
pub fn general_schema() -> &'static Schema {
    &GENERAL_SCHEMA
}

/// Schema for structured fiction
pub fn story_schema() -> &'static Schema {
    &STORY_SCHEMA
}
