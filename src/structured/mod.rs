// Structured output recovery
//
// Models routinely wrap valid JSON in commentary or code fences even when
// told not to. Recovery is tolerant of that surrounding noise but strict
// about the payload: the extracted object must parse and must carry every
// required top-level key.

use serde_json::{Map, Value};

use crate::errors::ParseError;

/// A recovered top-level JSON object
pub type StructuredObject = Map<String, Value>;

/// Recover a JSON object from raw model text and check its required keys.
///
/// 1. Parse the whole text strictly.
/// 2. Otherwise take the first `{` and scan to the brace that brings the
///    nesting depth back to zero; parse that slice strictly.
/// 3. Fail listing every required key missing at top level.
pub fn recover(raw_text: &str, required_keys: &[String]) -> Result<StructuredObject, ParseError> {
    let object = match serde_json::from_str::<Value>(raw_text.trim()) {
        Ok(Value::Object(object)) => object,
        _ => extract_object(raw_text)?,
    };

    let missing = missing_keys(&object, required_keys);
    if !missing.is_empty() {
        tracing::debug!("Recovered object is missing keys: {:?}", missing);
        return Err(ParseError::MissingKeys(missing));
    }

    Ok(object)
}

/// Required keys absent from the object's top level, in the order given
pub fn missing_keys(object: &StructuredObject, required_keys: &[String]) -> Vec<String> {
    required_keys
        .iter()
        .filter(|key| !object.contains_key(key.as_str()))
        .cloned()
        .collect()
}

/// Bracket-balanced extraction of the first object in the text.
///
/// Braces are counted without regard to string literals.
fn extract_object(text: &str) -> Result<StructuredObject, ParseError> {
    let start = text.find('{').ok_or(ParseError::NoObject)?;
    let end = balanced_end(&text[start..])
        .map(|offset| start + offset)
        .ok_or(ParseError::Malformed)?;

    let candidate = &text[start..=end];
    tracing::debug!("Extracted JSON candidate ({} bytes)", candidate.len());

    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(ParseError::NoObject),
        Err(e) => Err(ParseError::InvalidJson(e.to_string())),
    }
}

/// Byte offset of the brace closing the object that opens at offset 0
fn balanced_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, byte) in text.bytes().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
