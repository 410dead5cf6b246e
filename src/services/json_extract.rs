use serde_json::Value;
use thiserror::Error;

/// Models sometimes wrap the JSON they were told to emit in prose or code
/// fences. Recovery is two-tier: parse the trimmed text directly, then parse
/// the slice between the first `{` and the last `}`. Both failures keep the
/// original text for diagnostics.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JsonExtractError {
    #[error("model output is not valid JSON: {reason}")]
    Unparseable { reason: String, raw: String },

    #[error("model output contains no JSON object")]
    NoJsonObject { raw: String },
}

impl JsonExtractError {
    pub fn raw_text(&self) -> &str {
        match self {
            JsonExtractError::Unparseable { raw, .. } => raw,
            JsonExtractError::NoJsonObject { raw } => raw,
        }
    }
}

pub fn extract_json(raw: &str) -> Result<Value, JsonExtractError> {
    let trimmed = raw.trim();

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    let start = trimmed.find('{');
    let end = trimmed.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => serde_json::from_str(&trimmed[start..=end])
            .map_err(|err| JsonExtractError::Unparseable {
                reason: err.to_string(),
                raw: raw.to_string(),
            }),
        _ => Err(JsonExtractError::NoJsonObject {
            raw: raw.to_string(),
        }),
    }
}
