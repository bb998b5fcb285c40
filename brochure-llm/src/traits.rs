use async_trait::async_trait;
use brochure_common::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::structured;

/// How the provider is asked to shape its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    #[default]
    Text,
    /// Provider-enforced JSON object output.
    JsonObject,
}

/// One system + user exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub response_format: ResponseFormat,
}

impl ChatRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>, temperature: f32) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature,
            response_format: ResponseFormat::Text,
        }
    }

    pub fn json_object(mut self) -> Self {
        self.response_format = ResponseFormat::JsonObject;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Assistant message text; empty when the provider returned no content.
    pub content: String,
    pub model: Option<String>,
    pub tokens_used: Option<u32>,
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Submit one chat completion and return the assistant's message.
    async fn complete_chat(&self, request: &ChatRequest) -> Result<ChatResponse>;

    /// Get the model name being used
    fn model_name(&self) -> &str;

    /// Best-effort structured extraction.
    ///
    /// Tries a JSON-constrained call first; if its output does not parse,
    /// re-asks without the constraint and pulls the first brace-delimited
    /// span out of the free text. Fails with `BrochureError::Parse` when
    /// neither attempt yields valid JSON.
    async fn chat_json(&self, system: &str, user: &str, temperature: f32) -> Result<Value> {
        structured::complete_json(self, system, user, temperature).await
    }

    /// Free-text completion, returned untouched.
    async fn chat_markdown(&self, system: &str, user: &str, temperature: f32) -> Result<String> {
        let response = self
            .complete_chat(&ChatRequest::new(system, user, temperature))
            .await?;
        Ok(response.content)
    }
}
