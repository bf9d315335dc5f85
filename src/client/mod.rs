//! GLM chat-completion client
//!
//! This module provides access to the external completion service:
//! - `GlmClient`: the real HTTP client
//! - `MockCompletionClient`: canned responses for tests and offline use

mod glm;
mod mock;

pub use glm::GlmClient;
pub use mock::MockCompletionClient;

use crate::error::Result;
use async_trait::async_trait;

/// A single request against the chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            prompt: prompt.into(),
            temperature,
            max_tokens,
        }
    }
}

/// Trait for the completion backend (allows mocking)
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Send one user-role prompt and return the generated text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}
