//! Two-attempt JSON extraction from a chat model.
//!
//! ```text
//! Strict  --(valid JSON)------------------------> done
//!    |  (content does not parse)
//!    v
//! Relaxed --(first {...} span parses)-----------> done
//!    |  (span does not parse)
//!    v
//! BrochureError::Parse
//! ```
//!
//! Provider and network failures are never retried here; only a parse
//! failure moves the machine forward.

use brochure_common::{BrochureError, Result};
use regex::Regex;
use serde_json::Value;

use crate::traits::{ChatClient, ChatRequest};

/// Appended to the user prompt on the relaxed attempt.
pub const RELAXED_SUFFIX: &str = "\n\nReturn ONLY JSON.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonAttempt {
    /// JSON response format requested; the content must parse as-is.
    Strict,
    /// No response format; the first brace-delimited span is parsed.
    Relaxed,
}

impl JsonAttempt {
    pub fn request(self, system: &str, user: &str, temperature: f32) -> ChatRequest {
        match self {
            Self::Strict => ChatRequest::new(system, user, temperature).json_object(),
            Self::Relaxed => {
                ChatRequest::new(system, format!("{user}{RELAXED_SUFFIX}"), temperature)
            }
        }
    }

    /// Parse the model output for this attempt. An empty answer counts as `{}`.
    pub fn extract(self, content: &str) -> std::result::Result<Value, serde_json::Error> {
        let candidate = match self {
            Self::Strict => content.trim(),
            Self::Relaxed => first_brace_span(content).unwrap_or("{}"),
        };
        if candidate.is_empty() {
            return Ok(Value::Object(Default::default()));
        }
        serde_json::from_str(candidate)
    }

    pub fn next(self) -> Option<Self> {
        match self {
            Self::Strict => Some(Self::Relaxed),
            Self::Relaxed => None,
        }
    }
}

/// Greedy span from the first `{` to the last `}`.
pub fn first_brace_span(text: &str) -> Option<&str> {
    let re = Regex::new(r"(?s)\{.*\}").ok()?;
    re.find(text).map(|m| m.as_str())
}

pub async fn complete_json<C>(
    client: &C,
    system: &str,
    user: &str,
    temperature: f32,
) -> Result<Value>
where
    C: ChatClient + ?Sized,
{
    let mut attempt = JsonAttempt::Strict;
    loop {
        tracing::debug!(?attempt, model = client.model_name(), "llm.json.attempt");
        let response = client
            .complete_chat(&attempt.request(system, user, temperature))
            .await?;

        match attempt.extract(&response.content) {
            Ok(value) => return Ok(value),
            Err(err) => match attempt.next() {
                Some(next) => {
                    tracing::warn!(?attempt, error = %err, "llm.json.fallback");
                    attempt = next;
                }
                None => {
                    tracing::warn!(?attempt, error = %err, "llm.json.failed");
                    return Err(BrochureError::Parse(format!(
                        "model output is not valid JSON: {err}"
                    )));
                }
            },
        }
    }
}
