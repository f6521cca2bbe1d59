//! Mock synthesizer for tests and dry runs

use crate::CommentSynthesizer;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tsdocbot_core::error::{Error, Result};

#[derive(Debug, Default)]
struct MockState {
    prompts: Vec<String>,
    responses: Vec<(String, String)>,
    failures: Vec<String>,
}

/// Deterministic synthesizer that records every prompt it receives
///
/// Without a scripted response it answers with a one-line summary derived
/// from the prompt's `Name:` or `Class name:` line.
#[derive(Debug, Clone, Default)]
pub struct MockSynthesizer {
    state: Arc<Mutex<MockState>>,
}

impl MockSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer prompts containing `needle` with `response`
    pub fn with_response(self, needle: impl Into<String>, response: impl Into<String>) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.responses.push((needle.into(), response.into()));
        }
        self
    }

    /// Fail permanently on prompts containing `needle`
    pub fn failing_on(self, needle: impl Into<String>) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.failures.push(needle.into());
        }
        self
    }

    /// Every prompt received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|state| state.prompts.clone())
            .unwrap_or_default()
    }

    fn default_response(prompt: &str) -> String {
        let subject = prompt
            .lines()
            .find_map(|line| {
                line.strip_prefix("Name: ")
                    .or_else(|| line.strip_prefix("Class name: "))
            })
            .unwrap_or("this declaration");
        format!("Documentation for {subject}.")
    }
}

#[async_trait]
impl CommentSynthesizer for MockSynthesizer {
    async fn synthesize(&self, prompt: &str) -> Result<String> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| Error::synthesis(format!("Mock synthesizer lock poisoned: {e}")))?;
        state.prompts.push(prompt.to_string());

        if let Some(needle) = state.failures.iter().find(|n| prompt.contains(n.as_str())) {
            return Err(Error::synthesis(format!(
                "Mock synthesis failure for prompt containing '{needle}'"
            )));
        }

        if let Some((_, response)) = state
            .responses
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
        {
            return Ok(response.clone());
        }

        Ok(Self::default_response(prompt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_prompts_and_scripts_responses() {
        let mock = MockSynthesizer::new()
            .with_response("Name: add", "Adds numbers.")
            .failing_on("Name: explode");

        assert_eq!(
            mock.synthesize("Name: add\n").await.expect("Failed"),
            "Adds numbers."
        );
        assert_eq!(
            mock.synthesize("Class name: Wallet\n").await.expect("Failed"),
            "Documentation for Wallet."
        );
        assert!(mock.synthesize("Name: explode\n").await.is_err());
        assert_eq!(mock.prompts().len(), 3);
    }
}
