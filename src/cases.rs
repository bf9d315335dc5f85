//! Example-comment generation
//!
//! Asks the completion service for a fresh Weibo comment of a chosen
//! emotional category, used as demo and study material.

use crate::client::{ChatCompletion, CompletionRequest};
use crate::config::AnalysisConfig;
use crate::error::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Emotional category of a generated example comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum CaseCategory {
    Joy,
    Anxiety,
    Irony,
    Mixed,
    Neutral,
}

impl CaseCategory {
    /// Chinese display form.
    pub fn label(&self) -> &'static str {
        match self {
            CaseCategory::Joy => "开心喜悦",
            CaseCategory::Anxiety => "焦虑压力",
            CaseCategory::Irony => "反讽表达",
            CaseCategory::Mixed => "混合情感",
            CaseCategory::Neutral => "中性评价",
        }
    }

    /// What the study of this category looks at.
    pub fn focus(&self) -> &'static str {
        match self {
            CaseCategory::Joy => "明确积极情感，包含成就感和喜悦情绪",
            CaseCategory::Anxiety => "典型负面情绪，包含压力和焦虑表达",
            CaseCategory::Irony => "反讽表达识别，表面积极实际消极",
            CaseCategory::Mixed => "混合情感处理，需要综合判断",
            CaseCategory::Neutral => "无明显情感倾向的表达",
        }
    }

    fn prompt(&self) -> String {
        let lead = match self {
            CaseCategory::Joy => {
                "生成一条表达开心喜悦情感的微博评论，要真实自然，包含日常生活中的开心事："
            }
            CaseCategory::Anxiety => {
                "生成一条表达焦虑压力情感的微博评论，要真实自然，反映现实压力："
            }
            CaseCategory::Irony => {
                "生成一条使用反讽语气的微博评论，表面积极实际消极，要幽默犀利："
            }
            CaseCategory::Mixed => {
                "生成一条包含混合情感的微博评论，既有积极也有消极因素："
            }
            CaseCategory::Neutral => {
                "生成一条情感中性的微博评论，没有明显倾向，客观描述："
            }
        };
        format!("{}只回复微博评论内容，不要其他说明，不要用引号", lead)
    }
}

impl fmt::Display for CaseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Generates example comments through the completion service.
pub struct CaseGenerator {
    client: Arc<dyn ChatCompletion>,
    temperature: f32,
    max_tokens: u32,
}

impl CaseGenerator {
    pub fn new(client: Arc<dyn ChatCompletion>, config: &AnalysisConfig) -> Self {
        Self {
            client,
            temperature: config.generate_temperature,
            max_tokens: config.generate_max_tokens,
        }
    }

    /// Generate one comment of the given category. Failures propagate: the
    /// host owns the retry message.
    pub async fn generate(&self, category: CaseCategory) -> Result<String> {
        let request =
            CompletionRequest::new(category.prompt(), self.temperature, self.max_tokens);
        let reply = self.client.complete(&request).await?;
        Ok(strip_quotes(&reply))
    }
}

/// Models sometimes wrap the comment in quotes despite the prompt.
fn strip_quotes(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '"' | '“' | '”'))
        .collect::<String>()
        .trim()
        .to_string()
}
