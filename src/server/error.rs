use axum::{ http::StatusCode, response::{ IntoResponse, Response }, Json };
use serde_json::{ json, Value };
use thiserror::Error;

use crate::llm::LlmError;
use crate::models::ValidationError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Not found")]
    NotFound,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Server missing API key")]
    MissingApiKey,

    #[error("Invalid response from AI provider")]
    InvalidUpstreamResponse(Value),

    #[error("AI generation failed")]
    Upstream(#[source] LlmError),

    #[error("Failed to generate quiz")]
    QuizGeneration,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidUpstreamResponse(_) => StatusCode::BAD_GATEWAY,
            ApiError::MissingApiKey | ApiError::Upstream(_) | ApiError::QuizGeneration =>
                StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::InvalidUpstreamResponse(raw) =>
                json!({ "error": "Invalid response from AI provider", "details": raw }),
            ApiError::Upstream(e) => json!({ "error": "AI generation failed", "message": e.to_string() }),
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: ApiError) -> (StatusCode, Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_errors_are_bad_requests() {
        let (status, body) = body_json(ValidationError::MessageRequired.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Message is required"}));
    }

    #[tokio::test]
    async fn upstream_errors_expose_only_the_message() {
        let err = ApiError::Upstream(LlmError::Api { status: 429, message: "rate limited".into() });
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "AI generation failed");
        assert_eq!(body["message"], "LLM API error (429): rate limited");
    }

    #[tokio::test]
    async fn invalid_upstream_carries_details() {
        let (status, body) = body_json(ApiError::InvalidUpstreamResponse(json!({"odd": 1}))).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body, json!({"error": "Invalid response from AI provider", "details": {"odd": 1}}));
    }
}
