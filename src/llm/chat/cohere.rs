use async_trait::async_trait;
use log::debug;
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION } };
use serde::Serialize;
use serde_json::Value;

use super::{ ChatClient, ChatMessage, ChatReply };
use crate::llm::{ LlmConfig, LlmError };

const CHAT_ROUTE: &str = "/v2/chat";

pub struct CohereChatClient {
    http: HttpClient,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct CohereChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

impl CohereChatClient {
    pub fn new(api_key: &str, model: String, base_url: String) -> Result<Self, LlmError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|_|
            LlmError::Config("API key contains characters not allowed in a header".to_string())
        )?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = HttpClient::builder().default_headers(headers).build()?;

        Ok(Self { http, model, base_url })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config.api_key
            .as_deref()
            .ok_or_else(|| LlmError::Config("Cohere API key is required".to_string()))?;

        Self::new(api_key, config.model.clone(), config.base_url.clone())
    }

    fn chat_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), CHAT_ROUTE)
    }
}

/// Pulls a human readable message out of an error body, falling back to the raw text.
fn api_error_message(body: &str) -> String {
    serde_json
        ::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl ChatClient for CohereChatClient {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        temperature: f32
    ) -> Result<ChatReply, LlmError> {
        let url = self.chat_url();
        let req = CohereChatRequest {
            model: &self.model,
            messages,
            temperature,
        };

        debug!("Sending {} message(s) to {} (model {})", messages.len(), url, self.model);

        let resp = self.http.post(&url).json(&req).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let raw: Value = serde_json::from_str(&body)?;
        Ok(ChatReply::new(raw))
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        Some(self.base_url.clone())
    }
}
