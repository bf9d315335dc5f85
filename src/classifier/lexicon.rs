//! Fixed keyword lexicons for the rule-based fallback

/// Words counted as positive evidence.
pub const POSITIVE_WORDS: &[&str] = &[
    "好", "开心", "喜欢", "满意", "棒", "优秀", "推荐", "高兴", "幸福", "爱",
];

/// Words counted as negative evidence.
pub const NEGATIVE_WORDS: &[&str] = &[
    "差", "失望", "压力", "焦虑", "难受", "讨厌", "崩溃", "生气", "愤怒", "垃圾",
];

/// Number of lexicon words present in the text. Each word counts at most
/// once no matter how often it repeats.
pub(crate) fn count_hits(text: &str, words: &[&str]) -> usize {
    words.iter().filter(|&&w| text.contains(w)).count()
}

/// 0.6 base plus 0.08 per hit, capped at +0.3.
pub(crate) fn rule_confidence(hits: usize) -> f64 {
    0.6 + (hits as f64 * 0.08).min(0.3)
}
