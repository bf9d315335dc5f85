//! Advice generation for flagged comments
//!
//! One prompt per category, single attempt; any failure falls back to a
//! canned template so the caller always receives three non-empty lines.

use crate::client::{ChatCompletion, CompletionRequest};
use crate::config::AnalysisConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The three kinds of advice offered for a flagged comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdviceCategory {
    /// Emotional relief.
    Comfort,
    /// A small concrete step to take now.
    Action,
    /// Professional help line.
    Hotline,
}

impl AdviceCategory {
    pub const ALL: [AdviceCategory; 3] = [
        AdviceCategory::Comfort,
        AdviceCategory::Action,
        AdviceCategory::Hotline,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            AdviceCategory::Comfort => "情绪疏导",
            AdviceCategory::Action => "行动建议",
            AdviceCategory::Hotline => "求助热线",
        }
    }

    fn prompt(&self, text: &str) -> String {
        match self {
            AdviceCategory::Comfort => format!(
                "一位微博用户写道：{}。请用一句温暖的话安抚对方的情绪，直接回复内容，不要其他说明：",
                text
            ),
            AdviceCategory::Action => format!(
                "一位微博用户写道：{}。请给出一条当下就能做的小行动帮助对方缓解情绪，直接回复内容，不要其他说明：",
                text
            ),
            AdviceCategory::Hotline => format!(
                "一位微博用户情绪低落，写道：{}。请用一句话提醒对方可以拨打心理援助热线寻求专业帮助，直接回复内容，不要其他说明：",
                text
            ),
        }
    }

    fn templates(&self) -> &'static [&'static str] {
        match self {
            AdviceCategory::Comfort => &[
                "你的感受是真实且重要的，此刻的难过不代表以后也会一直这样。",
                "辛苦了，允许自己先停下来喘口气，情绪会慢慢过去的。",
                "你已经撑了很久了，现在的疲惫不是你的错。",
            ],
            AdviceCategory::Action => &[
                "试着放下手机，喝一杯温水，做三次深呼吸。",
                "给信任的朋友或家人发条消息，说说现在的感受。",
                "出门散步十分钟，让身体先动起来。",
            ],
            AdviceCategory::Hotline => &[
                "可以拨打全国心理援助热线 12356，有专业人员愿意倾听。",
                "北京心理危机研究与干预中心热线 010-82951332 全天开通。",
                "如果情绪难以承受，请及时拨打 12356 寻求专业帮助。",
            ],
        }
    }
}

/// One piece of advice for a flagged comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advice {
    pub category: AdviceCategory,
    pub text: String,
    /// True when the text came from a canned template instead of the model.
    pub canned: bool,
}

/// Generates advice through the completion service with template fallback.
pub struct RiskAdvisor {
    client: Arc<dyn ChatCompletion>,
    temperature: f32,
    max_tokens: u32,
}

impl RiskAdvisor {
    pub fn new(client: Arc<dyn ChatCompletion>, config: &AnalysisConfig) -> Self {
        Self {
            client,
            temperature: config.generate_temperature,
            max_tokens: config.generate_max_tokens,
        }
    }

    /// One advice per category, in a fixed order. A failed call falls back
    /// to a canned template for that category; single attempt, no retry.
    pub async fn advise(&self, text: &str) -> Vec<Advice> {
        let mut advice = Vec::with_capacity(AdviceCategory::ALL.len());

        for category in AdviceCategory::ALL {
            let request =
                CompletionRequest::new(category.prompt(text), self.temperature, self.max_tokens);

            let item = match self.client.complete(&request).await {
                Ok(reply) if !reply.trim().is_empty() => Advice {
                    category,
                    text: reply.trim().to_string(),
                    canned: false,
                },
                Ok(_) => fallback(category),
                Err(e) => {
                    tracing::warn!("advice call failed for {:?}: {}", category, e);
                    fallback(category)
                }
            };
            advice.push(item);
        }

        advice
    }
}

/// Template-only advice for hosts running without an API client.
pub fn canned_advice() -> Vec<Advice> {
    AdviceCategory::ALL.iter().map(|&c| fallback(c)).collect()
}

fn fallback(category: AdviceCategory) -> Advice {
    let templates = category.templates();
    let mut rng = rand::rng();
    let text = templates[rng.random_range(0..templates.len())].to_string();
    Advice {
        category,
        text,
        canned: true,
    }
}
