//! Comment synthesis for tsdocbot
//!
//! This crate turns documentation work items into JSDoc text using a
//! language model behind the [`CommentSynthesizer`] trait.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use tsdocbot_core::config::{LlmConfig, LLM_PROVIDERS};
use tsdocbot_core::error::{Error, Result};

pub mod error;
pub mod formatting;
pub mod json;
mod mock;
mod openai;
pub mod prompts;

pub use error::LlmError;
pub use formatting::format_doc_comment;
pub use mock::MockSynthesizer;
pub use openai::OpenAiSynthesizer;
pub use prompts::{PullRequestContent, PullRequestContext};

/// Trait for comment synthesis providers
///
/// Implementations take a complete prompt and return free text. They may
/// fail with a transient error, which callers are free to retry.
#[async_trait]
pub trait CommentSynthesizer: Send + Sync {
    async fn synthesize(&self, prompt: &str) -> Result<String>;
}

/// Create a synthesizer based on configuration
pub fn create_synthesizer(config: &LlmConfig) -> Result<Arc<dyn CommentSynthesizer>> {
    match config.provider.as_str() {
        "openai" => {
            let api_key = config.resolve_api_key().ok_or_else(|| {
                Error::config("OpenAI API key required. Set llm.api_key or OPENAI_API_KEY env var")
            })?;
            info!("Creating OpenAI-compatible synthesizer");
            Ok(Arc::new(OpenAiSynthesizer::new(config, api_key)?))
        }
        "mock" => {
            info!("Creating mock synthesizer");
            Ok(Arc::new(MockSynthesizer::new()))
        }
        other => Err(Error::config(format!(
            "Unknown LLM provider: '{other}'. Valid providers: {}",
            LLM_PROVIDERS.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_synthesizer_rejects_unknown_provider() {
        let config = LlmConfig {
            provider: "llama".to_string(),
            ..Default::default()
        };
        let err = create_synthesizer(&config).err().expect("Expected an error");
        assert!(err.to_string().contains("Unknown LLM provider"));
    }

    #[test]
    fn test_create_synthesizer_openai_with_key() {
        let config = LlmConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        assert!(create_synthesizer(&config).is_ok());
    }

    #[test]
    fn test_create_synthesizer_mock() {
        let config = LlmConfig {
            provider: "mock".to_string(),
            ..Default::default()
        };
        assert!(create_synthesizer(&config).is_ok());
    }
}
