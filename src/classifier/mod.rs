// Task classification
//
// Decides the {creative, structured} shape of a request from its raw text.
// Both checks are plain pattern matches; extending the keyword table never
// touches the control flow.

use once_cell::sync::Lazy;
use regex::Regex;

/// Literal token that, at the very start of a prompt, requests structured output.
pub const STRUCTURED_MARKER: &str = "/json";

/// Narrative-genre keywords that mark a request as creative.
///
/// Matched case-insensitively on word boundaries; inner spaces match any run
/// of whitespace.
pub const NARRATIVE_KEYWORDS: &[&str] = &[
    "story",
    "short story",
    "narrative",
    "fiction",
    "tale",
    "fable",
    "bedtime",
    "poem",
    "poetry",
    "novella",
    "scene",
    "screenplay",
    "creative writing",
];

static NARRATIVE_PATTERN: Lazy<Regex> = Lazy::new(|| keyword_pattern(NARRATIVE_KEYWORDS));

// Phrases that request structured output anywhere in the prompt. Unlike the
// narrative keywords these are substring matches; only "json" must end a word.
static STRUCTURED_PHRASE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)as\s+json\b|structured\s+output")
        .expect("structured phrases produce a valid pattern")
});

static MARKER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)^{}\b\s*", regex::escape(STRUCTURED_MARKER)))
        .expect("structured marker produces a valid pattern")
});

/// Build a case-insensitive, word-bounded alternation over a keyword table.
fn keyword_pattern(keywords: &[&str]) -> Regex {
    let alternatives = keywords
        .iter()
        .map(|keyword| {
            keyword
                .split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect::<Vec<_>>()
        .join("|");

    Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives))
        .expect("keyword table produces a valid pattern")
}

/// Shape of a single request. Derived per request, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskShape {
    pub creative: bool,
    pub structured: bool,
}

impl TaskShape {
    /// Short label used in logs and the transcript
    pub fn label(&self) -> &'static str {
        match (self.structured, self.creative) {
            (true, true) => "structured-creative",
            (true, false) => "structured",
            (false, true) => "creative",
            (false, false) => "general",
        }
    }
}

/// Classify a prompt. Total over any input; the empty string is `{false, false}`.
pub fn classify(text: &str) -> TaskShape {
    TaskShape {
        creative: is_creative(text),
        structured: wants_structured_output(text),
    }
}

/// True if the text mentions any narrative-genre keyword
pub fn is_creative(text: &str) -> bool {
    NARRATIVE_PATTERN.is_match(text)
}

/// True if the text starts with the marker or asks for JSON / structured output
pub fn wants_structured_output(text: &str) -> bool {
    has_structured_marker(text) || STRUCTURED_PHRASE_PATTERN.is_match(text)
}

/// True if the text begins with the structured-output marker token
pub fn has_structured_marker(text: &str) -> bool {
    MARKER_PATTERN.is_match(text)
}

/// Remove a leading structured-output marker (and the whitespace after it).
///
/// Text without the marker is returned unchanged.
pub fn strip_structured_marker(text: &str) -> &str {
    match MARKER_PATTERN.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_plain() {
        assert_eq!(classify(""), TaskShape::default());
    }

    #[test]
    fn test_every_keyword_is_creative() {
        for keyword in NARRATIVE_KEYWORDS {
            let prompt = format!("Please give me a {} about the sea", keyword);
            assert!(classify(&prompt).creative, "keyword '{}' not detected", keyword);
        }
    }

    #[test]
    fn test_creative_is_case_insensitive() {
        assert!(is_creative("Tell me a STORY"));
        assert!(is_creative("A Bedtime tale"));
        assert!(is_creative("some creative   writing please"));
    }

    #[test]
    fn test_creative_respects_word_boundaries() {
        assert!(!is_creative("What is the history of Rome?"));
        assert!(!is_creative("Explain the scenery tradeoffs"));
        assert!(!is_creative("retail sales numbers"));
    }

    #[test]
    fn test_plain_question_is_neither() {
        let shape = classify("What is the capital of France?");
        assert!(!shape.creative);
        assert!(!shape.structured);
        assert_eq!(shape.label(), "general");
    }

    #[test]
    fn test_marker_prefix_is_structured() {
        assert!(classify("/json list three primes").structured);
        assert!(classify("/JSON list three primes").structured);
    }

    #[test]
    fn test_marker_must_lead_the_text() {
        assert!(!has_structured_marker("please /json list primes"));
        assert!(!has_structured_marker("/jsonify this"));
    }

    #[test]
    fn test_phrases_are_structured() {
        assert!(wants_structured_output("Summarize this as JSON"));
        assert!(wants_structured_output("give me the answer as   json please"));
        assert!(wants_structured_output("I need Structured Output for this"));
        assert!(!wants_structured_output("the json format is nice"));
    }

    #[test]
    fn test_phrases_match_inside_longer_words() {
        assert!(classify("Give me structured outputs for these cities").structured);
        assert!(classify("list the ideas json-style").structured);
        assert!(wants_structured_output("Return unstructured output as structured output"));
        // "json" itself must still end a word
        assert!(!wants_structured_output("please reply as JSONL lines"));
    }

    #[test]
    fn test_structured_story_has_both_flags() {
        let shape = classify("/json write a short story about a fox");
        assert!(shape.creative);
        assert!(shape.structured);
        assert_eq!(shape.label(), "structured-creative");
    }

    #[test]
    fn test_strip_marker() {
        assert_eq!(strip_structured_marker("/json   list primes"), "list primes");
        assert_eq!(strip_structured_marker("/Json list"), "list");
        assert_eq!(strip_structured_marker("/json"), "");
    }

    #[test]
    fn test_strip_marker_leaves_other_text_alone() {
        assert_eq!(strip_structured_marker("answer as json"), "answer as json");
        assert_eq!(strip_structured_marker("/jsonify me"), "/jsonify me");
    }
}
