//! HTTP client for the GLM-4 chat-completions API

use crate::client::{ChatCompletion, CompletionRequest};
use crate::config::GlmConfig;
use crate::error::{Result, SentimentError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// GLM chat-completions client
pub struct GlmClient {
    http: Client,
    api_url: String,
    api_key: String,
    model: String,
}

// ============ Request/Response types ============

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl GlmClient {
    /// Create a client from config
    pub fn new(config: &GlmConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(SentimentError::Config("GLM API key is empty".into()));
        }

        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl ChatCompletion for GlmClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: request.prompt.clone(),
            }],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let resp = self
            .http
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        tracing::debug!("GLM raw response: {}", truncate(&text, 500));

        if !status.is_success() {
            return Err(SentimentError::Api(format!(
                "HTTP {} from completion endpoint: {}",
                status,
                truncate(&text, 200)
            )));
        }

        let response: ChatResponse = serde_json::from_str(&text)?;

        response
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| SentimentError::Api("Empty response from GLM".into()))
    }
}

/// Cut a string to at most `max_chars` characters without splitting a
/// multi-byte character.
fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let body = ChatRequest {
            model: "glm-4".to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "你好".to_string(),
            }],
            temperature: 0.1,
            max_tokens: 10,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "glm-4");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "你好");
        assert_eq!(json["max_tokens"], 10);
    }

    #[test]
    fn test_response_content_path() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"积极"}}],"usage":{"total_tokens":5}}"#;
        let resp: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.choices[0].message.content, "积极");
    }

    #[test]
    fn test_truncate_multibyte() {
        let text = "积极".repeat(300);
        let cut = truncate(&text, 200);
        assert_eq!(cut.chars().count(), 200);

        let short = "中性";
        assert_eq!(truncate(short, 500), short);
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let cfg = GlmConfig {
            api_url: "https://example.com/chat".to_string(),
            api_key: "  ".to_string(),
            model: "glm-4".to_string(),
            timeout_secs: 5,
        };
        assert!(matches!(
            GlmClient::new(&cfg),
            Err(SentimentError::Config(_))
        ));
    }
}
