//! Two-stage sentiment classification
//!
//! API mode delegates to the GLM chat endpoint with a constraining prompt;
//! local mode tallies a fixed keyword lexicon. API failures never propagate
//! as errors: they collapse into the `ApiError` label the caller branches on.

mod lexicon;

pub use lexicon::{NEGATIVE_WORDS, POSITIVE_WORDS};

use crate::client::{ChatCompletion, CompletionRequest};
use crate::config::AnalysisConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Sentiment label for a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    /// The external service could not produce a usable answer.
    ApiError,
}

impl Sentiment {
    /// Chinese display form, as shown to users.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "积极",
            Sentiment::Negative => "消极",
            Sentiment::Neutral => "中性",
            Sentiment::ApiError => "API错误",
        }
    }

    pub fn is_negative(&self) -> bool {
        matches!(self, Sentiment::Negative)
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which engine produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Engine {
    /// The GLM API answered.
    Api,
    /// Local keyword rules.
    Rules,
    /// The API call failed.
    Failed,
}

impl Engine {
    /// Marker shown next to results.
    pub fn marker(&self) -> &'static str {
        match self {
            Engine::Api => "🤖",
            Engine::Rules => "📊",
            Engine::Failed => "❌",
        }
    }
}

/// Outcome of classifying one comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub engine: Engine,
}

/// Classifier over the completion service, with the local rules as the
/// second stage.
pub struct Classifier {
    client: Arc<dyn ChatCompletion>,
    config: AnalysisConfig,
}

impl Classifier {
    pub fn new(client: Arc<dyn ChatCompletion>, config: AnalysisConfig) -> Self {
        Self { client, config }
    }

    /// Classify with the configured mode.
    pub async fn classify(&self, text: &str) -> Classification {
        if self.config.use_api {
            self.classify_api(text).await
        } else {
            classify_local(text)
        }
    }

    /// Ask the GLM API for a label. Transport and protocol failures are
    /// converted into the `ApiError` outcome, never returned as `Err`.
    pub async fn classify_api(&self, text: &str) -> Classification {
        let request = CompletionRequest::new(
            build_prompt(text),
            self.config.classify_temperature,
            self.config.classify_max_tokens,
        );

        match self.client.complete(&request).await {
            Ok(answer) => parse_reply(&answer),
            Err(e) => {
                tracing::warn!("classification call failed: {}", e);
                Classification {
                    sentiment: Sentiment::ApiError,
                    confidence: 0.0,
                    engine: Engine::Failed,
                }
            }
        }
    }
}

fn build_prompt(text: &str) -> String {
    format!(
        "请分析以下微博评论的情感倾向，只回复'积极'、'消极'或'中性'：{}",
        text
    )
}

/// Map a model answer onto a label. First match wins: a reply mentioning
/// both 积极 and 消极 counts as positive.
fn parse_reply(answer: &str) -> Classification {
    let mut rng = rand::rng();

    if answer.contains("积极") {
        Classification {
            sentiment: Sentiment::Positive,
            confidence: 0.85 + rng.random_range(0.05..=0.15),
            engine: Engine::Api,
        }
    } else if answer.contains("消极") {
        Classification {
            sentiment: Sentiment::Negative,
            confidence: 0.85 + rng.random_range(0.05..=0.15),
            engine: Engine::Api,
        }
    } else {
        Classification {
            sentiment: Sentiment::Neutral,
            confidence: 0.7,
            engine: Engine::Api,
        }
    }
}

/// Lexicon fallback: presence-count both word lists over the lowercased
/// text; the higher count wins, a tie is neutral.
pub fn classify_local(text: &str) -> Classification {
    let lower = text.to_lowercase();
    let pos_count = lexicon::count_hits(&lower, POSITIVE_WORDS);
    let neg_count = lexicon::count_hits(&lower, NEGATIVE_WORDS);

    if pos_count > neg_count {
        Classification {
            sentiment: Sentiment::Positive,
            confidence: lexicon::rule_confidence(pos_count),
            engine: Engine::Rules,
        }
    } else if neg_count > pos_count {
        Classification {
            sentiment: Sentiment::Negative,
            confidence: lexicon::rule_confidence(neg_count),
            engine: Engine::Rules,
        }
    } else {
        Classification {
            sentiment: Sentiment::Neutral,
            confidence: 0.5,
            engine: Engine::Rules,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockCompletionClient;

    fn api_classifier(mock: MockCompletionClient) -> Classifier {
        Classifier::new(Arc::new(mock), AnalysisConfig::default())
    }

    #[test]
    fn test_local_positive() {
        let result = classify_local("今天很开心，对生活特别满意");
        assert_eq!(result.sentiment, Sentiment::Positive);
        assert_eq!(result.engine, Engine::Rules);
        assert!(result.confidence > 0.6 && result.confidence <= 0.9);
        // Two lexicon hits
        assert!((result.confidence - 0.76).abs() < 1e-9);
    }

    #[test]
    fn test_local_negative() {
        let result = classify_local("压力太大了，很焦虑");
        assert_eq!(result.sentiment, Sentiment::Negative);
        assert!((result.confidence - 0.76).abs() < 1e-9);
    }

    #[test]
    fn test_local_tie_is_neutral() {
        let result = classify_local("今天开心过，也失望过");
        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert!((result.confidence - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_local_empty_is_neutral() {
        let result = classify_local("");
        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert!((result.confidence - 0.5).abs() < 1e-9);
        assert_eq!(result.engine, Engine::Rules);
    }

    #[test]
    fn test_local_no_lexicon_words_is_neutral() {
        let result = classify_local("今天在公司上班");
        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert!((result.confidence - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_local_confidence_capped() {
        // All ten positive words present
        let text = POSITIVE_WORDS.join("，");
        let result = classify_local(&text);
        assert_eq!(result.sentiment, Sentiment::Positive);
        assert!((result.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_parse_priority_positive_first() {
        // A verbose reply mentioning both labels counts as positive
        let result = parse_reply("这条评论既有积极也有消极的成分");
        assert_eq!(result.sentiment, Sentiment::Positive);
    }

    #[test]
    fn test_parse_confidence_ranges() {
        for _ in 0..50 {
            let pos = parse_reply("积极");
            assert!(pos.confidence >= 0.90 && pos.confidence <= 1.0);

            let neg = parse_reply("消极");
            assert!(neg.confidence >= 0.90 && neg.confidence <= 1.0);
        }

        let neu = parse_reply("中性");
        assert_eq!(neu.sentiment, Sentiment::Neutral);
        assert!((neu.confidence - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_parse_unrecognized_reply_is_neutral() {
        let result = parse_reply("无法判断");
        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert!((result.confidence - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_prompt_constrains_answer() {
        let prompt = build_prompt("服务态度真差");
        assert!(prompt.contains("只回复"));
        assert!(prompt.ends_with("服务态度真差"));
    }

    #[tokio::test]
    async fn test_api_mode_positive() {
        let classifier = api_classifier(MockCompletionClient::new().with_reply("积极"));
        let result = classifier.classify_api("今天天气真好").await;
        assert_eq!(result.sentiment, Sentiment::Positive);
        assert_eq!(result.engine, Engine::Api);
    }

    #[tokio::test]
    async fn test_api_failure_never_raises() {
        let classifier = api_classifier(MockCompletionClient::new().with_failures());
        let result = classifier.classify_api("随便一条评论").await;
        assert_eq!(result.sentiment, Sentiment::ApiError);
        assert!((result.confidence - 0.0).abs() < 1e-9);
        assert_eq!(result.engine, Engine::Failed);
    }

    #[tokio::test]
    async fn test_classify_respects_mode_switch() {
        let mock = MockCompletionClient::new().with_default_reply("积极");
        let config = AnalysisConfig {
            use_api: false,
            ..AnalysisConfig::default()
        };
        let classifier = Classifier::new(Arc::new(mock), config);

        // Local mode ignores the API reply entirely
        let result = classifier.classify("压力好大").await;
        assert_eq!(result.sentiment, Sentiment::Negative);
        assert_eq!(result.engine, Engine::Rules);
    }

    #[test]
    fn test_labels_display_chinese() {
        assert_eq!(Sentiment::Positive.to_string(), "积极");
        assert_eq!(Sentiment::Negative.to_string(), "消极");
        assert_eq!(Sentiment::Neutral.to_string(), "中性");
        assert_eq!(Sentiment::ApiError.to_string(), "API错误");
    }
}
