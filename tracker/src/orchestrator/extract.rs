//! Structured extraction from free-text model responses
//!
//! Models are asked for JSON-only output but routinely wrap it in code
//! fences or prose. Extraction strips enclosing backticks, takes the
//! substring between the first `{` and the last `}`, and parses it into
//! the caller's typed output struct.

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Reasons a model response could not be turned into a role output
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Empty model response")]
    Empty,

    #[error("No JSON object found in response")]
    NoJsonObject,

    #[error("Invalid JSON in response: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Parse the JSON object embedded in `text` into `T`.
pub fn extract_json<T: DeserializeOwned>(text: &str) -> Result<T, ExtractError> {
    let cleaned = text.trim();
    if cleaned.is_empty() {
        return Err(ExtractError::Empty);
    }

    let cleaned = if cleaned.starts_with("```") {
        cleaned.trim_matches('`')
    } else {
        cleaned
    };

    let start = cleaned.find('{').ok_or(ExtractError::NoJsonObject)?;
    let end = cleaned.rfind('}').ok_or(ExtractError::NoJsonObject)?;
    if end < start {
        return Err(ExtractError::NoJsonObject);
    }

    Ok(serde_json::from_str(&cleaned[start..=end])?)
}
