use crate::traits::{ChatClient, ChatRequest, ChatResponse, ResponseFormat};
use async_trait::async_trait;
use brochure_common::{BrochureError, Result};
use brochure_http::{Auth, HttpClient, HttpError, RequestOpts};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1/";

pub struct OpenAiClient {
    client: HttpClient,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [WireMessage<'a>; 2],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<WireResponseFormat>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct WireResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: u32,
}

impl OpenAiClient {
    /// Create a new client for the given API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let client = HttpClient::new(OPENAI_API_BASE).map_err(http_to_brochure)?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Point the client at an OpenAI-compatible gateway.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        let base = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let timeout = self.client.default_timeout;
        let retries = self.client.max_retries;
        self.client = HttpClient::new(&base)
            .map_err(http_to_brochure)?
            .with_timeout(timeout)
            .with_retries(retries);
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = self.client.with_timeout(timeout);
        self
    }

    pub fn with_retries(mut self, retries: usize) -> Self {
        self.client = self.client.with_retries(retries);
        self
    }
}

#[async_trait]
impl ChatClient for OpenAiClient {
    async fn complete_chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: [
                WireMessage {
                    role: "system",
                    content: &request.system,
                },
                WireMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
            response_format: match request.response_format {
                ResponseFormat::Text => None,
                ResponseFormat::JsonObject => Some(WireResponseFormat {
                    kind: "json_object",
                }),
            },
        };

        tracing::debug!(
            model = %self.model,
            temperature = request.temperature,
            format = ?request.response_format,
            "llm.chat.start"
        );

        let resp: ChatCompletionResponse = self
            .client
            .post_json_opts(
                "chat/completions",
                &body,
                RequestOpts {
                    auth: Some(Auth::Bearer(&self.api_key)),
                    ..Default::default()
                },
            )
            .await
            .map_err(http_to_brochure)?;

        let choice = resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| BrochureError::Provider("completion returned no choices".into()))?;
        let content = choice.message.content.unwrap_or_default();

        tracing::debug!(chars = content.chars().count(), "llm.chat.done");

        Ok(ChatResponse {
            content,
            model: resp.model,
            tokens_used: resp.usage.map(|u| u.total_tokens),
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn http_to_brochure(e: HttpError) -> BrochureError {
    match e {
        HttpError::Network(_) => BrochureError::Network(e.to_string()),
        HttpError::Url(_) | HttpError::Build(_) => BrochureError::Configuration(e.to_string()),
        HttpError::Api { .. } | HttpError::Decode(..) => BrochureError::Provider(e.to_string()),
    }
}
