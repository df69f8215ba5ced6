pub mod chat;
pub mod quiz;

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Message is required")]
    MessageRequired,
    #[error("Invalid conversation history")]
    InvalidHistory,
    #[error("Topic is required")]
    TopicRequired,
    #[error("Invalid difficulty level")]
    InvalidDifficulty,
    #[error("Count must be a positive integer")]
    InvalidCount,
    #[error("Count must not exceed {0}")]
    CountTooLarge(u32),
}

/// Parses a request body as JSON. Missing or malformed bodies read as an empty object.
pub fn parse_body(bytes: &[u8]) -> Value {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(v @ Value::Object(_)) => v,
        _ => Value::Object(Default::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn malformed_bodies_become_empty_objects() {
        assert_eq!(parse_body(b""), json!({}));
        assert_eq!(parse_body(b"not json"), json!({}));
        assert_eq!(parse_body(b"[1,2]"), json!({}));
        assert_eq!(parse_body(br#"{"message":"hi"}"#), json!({"message": "hi"}));
    }
}
