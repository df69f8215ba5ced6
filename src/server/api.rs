use crate::config::prompt::build_quiz_prompt;
use crate::llm::chat::{ ChatClient, ChatMessage };
use crate::models::chat::{ ChatRequest, ChatResponse };
use crate::models::quiz::{ QuizItem, QuizRequest };
use crate::models::parse_body;
use crate::quiz::parse_quiz_items;
use super::error::ApiError;
use super::AppState;
use std::sync::Arc;
use axum::{
    body::Bytes,
    extract::State,
    http::{ header, HeaderValue, Method, StatusCode },
    response::{ IntoResponse, Response },
    routing::{ get, post },
    Json,
    Router,
};
use serde_json::{ json, Value };
use tower_http::cors::{ Any, CorsLayer };
use tower_http::set_header::SetResponseHeaderLayer;
use log::{ debug, error, warn };

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route(
            "/generate-chat",
            post(generate_chat_handler).options(preflight_handler).fallback(method_not_allowed)
        )
        .route(
            "/generate-quiz",
            post(generate_quiz_handler).options(preflight_handler).fallback(method_not_allowed)
        )
        .route("/health", get(health_handler))
        .fallback(fallback_handler)
        .layer(cors)
        // CorsLayer adds methods/headers to preflights only; every response carries them.
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*")
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS")
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type")
        ))
        .with_state(state)
}

impl AppState {
    fn client(&self) -> Result<&Arc<dyn ChatClient>, ApiError> {
        self.chat_client.as_ref().ok_or_else(|| {
            error!("Missing CO_API_KEY");
            ApiError::MissingApiKey
        })
    }
}

async fn preflight_handler() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn fallback_handler(method: Method) -> Response {
    if method == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        ApiError::NotFound.into_response()
    }
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn generate_chat_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ChatResponse>, ApiError> {
    let client = state.client()?;
    let req = ChatRequest::from_value(&parse_body(&body))?;
    let messages = req.to_messages(&state.system_prompt);
    debug!("Chat request with {} prior turn(s)", req.conversation_history.len());

    let reply = client
        .chat(&messages, state.settings.chat_temperature).await
        .map_err(|e| {
            error!("Handler error: {}", e);
            ApiError::Upstream(e)
        })?;

    match reply.text() {
        Some(text) => Ok(Json(ChatResponse::now(text))),
        None => {
            error!("Invalid response from AI provider: {}", reply.raw());
            Err(ApiError::InvalidUpstreamResponse(reply.into_raw()))
        }
    }
}

async fn generate_quiz_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Vec<QuizItem>>, ApiError> {
    let client = state.client()?;
    let req = QuizRequest::from_value(&parse_body(&body), state.settings.quiz_max_count)?;
    let prompt = build_quiz_prompt(&req.topic, req.difficulty, req.count);
    debug!("Quiz request: topic={:?} difficulty={} count={}", req.topic, req.difficulty, req.count);

    let reply = client
        .chat(&[ChatMessage::user(prompt)], state.settings.quiz_temperature).await
        .map_err(|e| {
            error!("Quiz generation failed: {}", e);
            ApiError::QuizGeneration
        })?;

    let text = reply.text().ok_or_else(|| {
        error!("Quiz generation returned no text: {}", reply.raw());
        ApiError::QuizGeneration
    })?;

    let items = parse_quiz_items(&text).map_err(|e| {
        error!("Quiz parsing failed: {}", e);
        ApiError::QuizGeneration
    })?;

    if items.len() != req.count as usize {
        warn!("Quiz asked for {} item(s), returning {}", req.count, items.len());
    }

    Ok(Json(items))
}
