pub mod cohere;

use async_trait::async_trait;
use serde::{ Deserialize, Serialize };
use serde_json::Value;
use std::sync::Arc;
use super::{ LlmConfig, LlmError };
use self::cohere::CohereChatClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct Generation {
    text: String,
}

/// Known reply layouts, tried in declaration order.
#[derive(Deserialize)]
#[serde(untagged)]
enum ReplyShape {
    Messages {
        message: ReplyMessage,
    },
    Text {
        text: String,
    },
    Generations {
        generations: Vec<Generation>,
    },
}

/// A successful reply from the inference service. The raw payload is kept
/// so callers can surface it when no text can be extracted.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    raw: Value,
}

impl ChatReply {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }

    /// First non-empty text in the reply, or `None` for an unrecognised shape.
    pub fn text(&self) -> Option<String> {
        let shape = ReplyShape::deserialize(&self.raw).ok()?;
        let text = match shape {
            ReplyShape::Messages { message } =>
                message.content
                    .into_iter()
                    .find(|block| block.block_type == "text")
                    .and_then(|block| block.text),
            ReplyShape::Text { text } => Some(text),
            ReplyShape::Generations { generations } =>
                generations.into_iter().next().map(|g| g.text),
        };
        text.filter(|t| !t.is_empty())
    }
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        temperature: f32
    ) -> Result<ChatReply, LlmError>;

    fn get_model(&self) -> String;
    fn get_base_url(&self) -> Option<String>;
}

pub fn new_client(config: &LlmConfig) -> Result<Arc<dyn ChatClient>, LlmError> {
    let client = CohereChatClient::from_config(config)?;
    Ok(Arc::new(client))
}
