//! Mock completion client for testing
//!
//! Provides canned replies without network calls:
//! - Unit tests for classifier, advisor and generator
//! - Failure simulation for the fallback paths
//! - Optional latency for timing-sensitive tests

use crate::client::{ChatCompletion, CompletionRequest};
use crate::error::{Result, SentimentError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

/// Mock completion backend with queued replies
pub struct MockCompletionClient {
    replies: RwLock<VecDeque<String>>,
    default_reply: String,
    prompts: Arc<RwLock<Vec<String>>>,
    simulate_failures: bool,
    latency_ms: u64,
}

impl MockCompletionClient {
    pub fn new() -> Self {
        Self {
            replies: RwLock::new(VecDeque::new()),
            default_reply: "中性".to_string(),
            prompts: Arc::new(RwLock::new(Vec::new())),
            simulate_failures: false,
            latency_ms: 0,
        }
    }

    /// Queue a reply; queued replies are consumed in order before the default.
    pub fn with_reply(self, reply: &str) -> Self {
        self.replies.write().unwrap().push_back(reply.to_string());
        self
    }

    /// Reply returned once the queue is drained.
    pub fn with_default_reply(mut self, reply: &str) -> Self {
        self.default_reply = reply.to_string();
        self
    }

    pub fn with_failures(mut self) -> Self {
        self.simulate_failures = true;
        self
    }

    pub fn with_latency(mut self, ms: u64) -> Self {
        self.latency_ms = ms;
        self
    }

    /// Prompts seen so far, for assertions.
    pub fn prompts(&self) -> Arc<RwLock<Vec<String>>> {
        self.prompts.clone()
    }

    async fn simulate_latency(&self) {
        if self.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.latency_ms)).await;
        }
    }
}

impl Default for MockCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatCompletion for MockCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.simulate_latency().await;
        self.prompts.write().unwrap().push(request.prompt.clone());

        if self.simulate_failures {
            return Err(SentimentError::Api("Mock failure".into()));
        }

        let queued = self.replies.write().unwrap().pop_front();
        Ok(queued.unwrap_or_else(|| self.default_reply.clone()))
    }
}
