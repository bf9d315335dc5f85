//! High-risk screening for negative comments
//!
//! A comment classified negative whose text contains one of the configured
//! phrases is flagged; flagged comments get three pieces of advice from the
//! advisor.

mod advisor;

pub use advisor::{canned_advice, Advice, AdviceCategory, RiskAdvisor};

use crate::classifier::Sentiment;

/// Phrases that mark a negative comment as high risk. Matched exactly as
/// written, as substrings.
pub const HIGH_RISK_PHRASES: &[&str] = &[
    "不想活",
    "想死",
    "自杀",
    "活不下去",
    "活着没意思",
    "结束生命",
    "撑不下去",
    "轻生",
];

/// True iff the comment was classified negative and contains at least one
/// high-risk phrase.
pub fn is_high_risk(sentiment: Sentiment, text: &str) -> bool {
    sentiment.is_negative() && HIGH_RISK_PHRASES.iter().any(|&p| text.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_with_phrase_is_flagged() {
        assert!(is_high_risk(Sentiment::Negative, "压力太大了，真的不想活了"));
        assert!(is_high_risk(Sentiment::Negative, "撑不下去了"));
    }

    #[test]
    fn test_negative_without_phrase_is_not_flagged() {
        assert!(!is_high_risk(Sentiment::Negative, "今天心情很差，很失望"));
    }

    #[test]
    fn test_phrase_without_negative_label_is_not_flagged() {
        // The screen runs only on negative classifications
        assert!(!is_high_risk(Sentiment::Neutral, "电影里主角想死的桥段很好笑"));
        assert!(!is_high_risk(Sentiment::Positive, "自杀式发言成功逗笑全场"));
        assert!(!is_high_risk(Sentiment::ApiError, "不想活了"));
    }

    #[test]
    fn test_phrases_match_exactly_as_written() {
        // Substring match only: an interrupted phrase does not count
        assert!(!is_high_risk(Sentiment::Negative, "不想 活成这样"));
        assert!(is_high_risk(Sentiment::Negative, "已经不想活成这样了"));
    }
}
