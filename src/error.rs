use serde::Serialize;
use std::fmt;

/// `max_score`/`total_points` was non-positive or a numeric input was not
/// a real number.
pub const INVALID_SCORE: &str = "invalid_score";
/// A percentage outside `[0, 100]` reached the letter mapper.
pub const OUT_OF_RANGE: &str = "out_of_range";
/// A record was type-valid but violated a hard invariant (missing required
/// field, contradictory fields, value outside the table vocabulary).
pub const MALFORMED_RECORD: &str = "malformed_record";

/// The engine's one error shape. The `code` is a stable machine string the
/// calling layer can match on or ship across the JSON boundary as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl EngineError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn invalid_score(message: impl Into<String>) -> Self {
        Self::new(INVALID_SCORE, message)
    }

    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::new(OUT_OF_RANGE, message)
    }

    pub fn malformed_record(message: impl Into<String>) -> Self {
        Self::new(MALFORMED_RECORD, message)
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for EngineError {}
