use chrono::{ SecondsFormat, Utc };
use serde::{ Deserialize, Serialize };
use serde_json::Value;

use super::ValidationError;
use crate::llm::chat::ChatMessage;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatTurn {
    #[serde(default)]
    pub role: Value,
    pub content: String,
}

impl ChatTurn {
    /// Anything other than the string "user" is treated as an assistant turn.
    pub fn to_message(&self) -> ChatMessage {
        if self.role.as_str() == Some("user") {
            ChatMessage::user(self.content.clone())
        } else {
            ChatMessage::assistant(self.content.clone())
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    pub conversation_history: Vec<ChatTurn>,
}

impl ChatRequest {
    pub fn from_value(body: &Value) -> Result<Self, ValidationError> {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .ok_or(ValidationError::MessageRequired)?
            .to_string();

        let conversation_history = match body.get("conversationHistory") {
            None | Some(Value::Null) => Vec::new(),
            Some(history) =>
                Vec::<ChatTurn>::deserialize(history).map_err(|_| ValidationError::InvalidHistory)?,
        };

        Ok(Self { message, conversation_history })
    }

    /// System instruction, then prior turns oldest first, then the new user message.
    pub fn to_messages(&self, system_prompt: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.conversation_history.len() + 2);
        messages.push(ChatMessage::system(system_prompt));
        messages.extend(self.conversation_history.iter().map(ChatTurn::to_message));
        messages.push(ChatMessage::user(self.message.clone()));
        messages
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub timestamp: String,
}

impl ChatResponse {
    pub fn now(response: String) -> Self {
        Self {
            response,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}
