// Task-aware prompt builder
//
// Four fixed branches keyed by (structured, creative):
// - structured + creative: strict JSON story against story_schema
// - creative only: narrative text, no meta-commentary
// - structured only: strict JSON answer against general_schema
// - neither: the request verbatim under a concise-assistant system prompt

use super::schema::{general_schema, story_schema, Schema};
use crate::classifier::{strip_structured_marker, TaskShape};

/// Length constraint for generated stories
pub const STORY_WORD_RANGE: &str = "350–600";

const STRICT_JSON_RULES: &str = "You are an assistant that outputs STRICT JSON only. No prose. \
     Validate against the provided JSON Schema. Do not include any keys not present in the schema. \
     Do NOT include markdown or code fences.";

const FICTION_SYSTEM: &str = "You are an award-winning fiction writer. Output ONLY the final narrative text. \
     No outlines, no analysis, no bullets, no headings.";

const CONCISE_SYSTEM: &str = "You are a concise, helpful assistant. Provide the answer directly. \
     Include only minimal reasoning strictly needed. Do NOT reveal chain-of-thought.";

/// System/user message pair for one request, plus the schema it embeds
#[derive(Debug, Clone, PartialEq)]
pub struct PromptBundle {
    /// Request text as embedded in `user` (marker stripped, trimmed)
    pub request: String,
    pub system: String,
    pub user: String,
    pub schema: Option<&'static Schema>,
}

impl PromptBundle {
    pub fn schema_name(&self) -> Option<&'static str> {
        self.schema.map(Schema::name)
    }

    /// Keys the reply must carry at top level (empty for text requests)
    pub fn required_keys(&self) -> Vec<String> {
        self.schema.map(Schema::required_keys).unwrap_or_default()
    }
}

/// Build the prompt bundle for a request.
///
/// A leading structured-output marker is stripped before the text is
/// embedded; the mode already carries that instruction.
pub fn build(raw_prompt: &str, shape: TaskShape) -> PromptBundle {
    let request = strip_structured_marker(raw_prompt).trim();

    match (shape.structured, shape.creative) {
        (true, true) => structured_story(request),
        (false, true) => story(request),
        (true, false) => structured_answer(request),
        (false, false) => PromptBundle {
            request: request.to_string(),
            system: CONCISE_SYSTEM.to_string(),
            user: request.to_string(),
            schema: None,
        },
    }
}

fn structured_story(request: &str) -> PromptBundle {
    let schema = story_schema();
    let user = format!(
        "Generate a structured story JSON for the following request: \"{request}\".\n\n\
         JSON Schema ({name}):\n{body}\n\n\
         Rules:\n\
         - Output ONLY a JSON object that validates against {name}.\n\
         - story must be {range} words, past tense, single POV, show-don't-tell, clear arc.\n\
         - No extra commentary. No markdown. No code fences.",
        name = schema.name(),
        body = schema.to_pretty_string(),
        range = STORY_WORD_RANGE,
    );

    PromptBundle {
        request: request.to_string(),
        system: format!(
            "{STRICT_JSON_RULES} For text fields, provide concise and coherent content."
        ),
        user,
        schema: Some(schema),
    }
}

fn story(request: &str) -> PromptBundle {
    let user = format!(
        "Write a complete short story based on this request:\n\"{request}\"\n\n\
         Requirements:\n\
         - {range} words\n\
         - Past tense, single point of view\n\
         - Show, don't tell; vivid sensory detail\n\
         - Clear arc: setup → conflict → resolution\n\
         - No lists, no bullet points, no headings, no step-by-step notes\n\
         - Output ONLY the story text",
        range = STORY_WORD_RANGE,
    );

    PromptBundle {
        request: request.to_string(),
        system: FICTION_SYSTEM.to_string(),
        user,
        schema: None,
    }
}

fn structured_answer(request: &str) -> PromptBundle {
    let schema = general_schema();
    let user = format!(
        "Answer the user's request in structured JSON.\n\
         User request: \"{request}\"\n\n\
         JSON Schema ({name}):\n{body}\n\n\
         Rules:\n\
         - Output ONLY a JSON object that validates against {name}.\n\
         - Use task one of: qa, summarize, extract, classify, unknown.\n\
         - key_points: concise bullets; entities: key items with type and text; confidence: 0–1.\n\
         - No extra commentary. No markdown. No code fences.",
        name = schema.name(),
        body = schema.to_pretty_string(),
    );

    PromptBundle {
        request: request.to_string(),
        system: format!("{STRICT_JSON_RULES} For text fields, be concise and helpful."),
        user,
        schema: Some(schema),
    }
}
