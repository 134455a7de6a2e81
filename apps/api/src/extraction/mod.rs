//! Tolerant JSON extraction: turns free-form model text into a JSON object.
//!
//! Pipeline: strip code fences → take the leftmost-`{` to rightmost-`}` span →
//! parse, or repair and parse. Extraction never fails the caller: anything that cannot
//! be recovered comes back as [`ExtractedPayload::Unparsed`] carrying the raw text.
//!
//! The span is deliberately not brace-matched. Trailing prose that itself contains
//! `{...}` widens the span; the repair stages then recover what they can.

pub mod repair;

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)```[ \t]*(?:json)?").expect("code fence pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractError {
    #[error("no JSON object found in model output")]
    NoObject,

    #[error("model output parsed to a JSON value that is not an object")]
    NotAnObject,

    #[error("model output could not be repaired into JSON: {0}")]
    Parse(String),
}

/// Best-effort structured view of one model response.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedPayload {
    Object(Map<String, Value>),
    /// Nothing usable was recovered. Callers fall back to original content.
    Unparsed { raw: String, reason: ExtractError },
}

impl ExtractedPayload {
    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        match self {
            ExtractedPayload::Object(map) => Some(map),
            ExtractedPayload::Unparsed { .. } => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, ExtractedPayload::Object(_))
    }
}

/// Where the text returned by [`extract_text_field`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSource {
    Structured,
    Raw,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextExtraction {
    pub text: String,
    pub source: TextSource,
}

/// Extracts a JSON object from raw model output.
pub fn extract(raw: &str) -> ExtractedPayload {
    match try_extract(raw) {
        Ok(map) => ExtractedPayload::Object(map),
        Err(reason) => {
            warn!(
                "Could not extract JSON from model output ({reason}); keeping {} chars of raw text",
                raw.len()
            );
            ExtractedPayload::Unparsed {
                raw: raw.to_string(),
                reason,
            }
        }
    }
}

/// Extracts a single free-text field, falling back to the whole raw text.
///
/// Only for callers expecting exactly one text field (a cover letter): if the field is
/// missing, blank, or not a string, the entire trimmed response is treated as the text.
pub fn extract_text_field(raw: &str, field: &str) -> TextExtraction {
    let structured = extract(raw)
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string);

    match structured {
        Some(text) => TextExtraction {
            text,
            source: TextSource::Structured,
        },
        None => {
            debug!("Field '{field}' not found in model output, using raw text");
            TextExtraction {
                text: raw.trim().to_string(),
                source: TextSource::Raw,
            }
        }
    }
}

fn try_extract(raw: &str) -> Result<Map<String, Value>, ExtractError> {
    let unfenced = strip_code_fences(raw);
    let span = object_span(&unfenced).ok_or(ExtractError::NoObject)?;

    let value = match serde_json::from_str::<Value>(span) {
        Ok(value) => value,
        Err(_) => {
            let repaired = repair::repair(span);
            debug!("Model output needed repair before parsing");
            serde_json::from_str::<Value>(&repaired).map_err(|e| ExtractError::Parse(e.to_string()))?
        }
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ExtractError::NotAnObject),
    }
}

/// Removes ```` ``` ```` and ```` ```json ```` markers wherever they appear.
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text, "").into_owned()
}

/// Leftmost `{` through rightmost `}`. With no closing brace after the opening one
/// (truncated output) the span runs to the end of the text.
pub fn object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    match text.rfind('}') {
        Some(end) if end > start => Some(&text[start..=end]),
        _ => Some(&text[start..]),
    }
}
