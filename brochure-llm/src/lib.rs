//! Chat-model integration for the brochure pipeline.
//!
//! This crate exposes a provider-agnostic [`traits::ChatClient`] interface,
//! the two-attempt JSON extraction used for link selection
//! ([`structured`]), and an OpenAI Chat Completions client.
//!
//! # Examples
//! ```no_run
//! use brochure_common::Result;
//! use brochure_llm::{openai::OpenAiClient, traits::ChatClient, GENERATION_TEMPERATURE};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! let client = OpenAiClient::new("sk-...", "gpt-4o-mini")?;
//! let text = client
//!     .chat_markdown("You write brochures.", "Company name: Acme", GENERATION_TEMPERATURE)
//!     .await?;
//! assert!(!text.is_empty());
//! # Ok(())
//! # }
//! ```
pub mod openai;
pub mod structured;
pub mod traits;

use brochure_common::Result;
use brochure_config::Settings;
use openai::OpenAiClient;
use std::sync::Arc;
use traits::ChatClient;

/// Sampling temperature for link selection.
pub const SELECTION_TEMPERATURE: f32 = 0.2;
/// Sampling temperature for brochure writing.
pub const GENERATION_TEMPERATURE: f32 = 0.4;

/// Build the configured chat client. Fails with a configuration error when
/// no API key is available.
pub fn client_from_settings(settings: &Settings) -> Result<Arc<dyn ChatClient>> {
    let key = settings.require_api_key()?;
    let client = OpenAiClient::new(key, settings.openai_chat_model.clone())?
        .with_base_url(&settings.openai_base_url)?
        .with_timeout(settings.llm_timeout())
        .with_retries(settings.http_retries);
    Ok(Arc::new(client))
}
