use serde::{Deserialize, Serialize};

/// Coarse correctness reading of a feedback string, used for coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackTone {
    Positive,
    Negative,
    Neutral,
}

/// Substring lists driving [`classify_feedback`]. Matching is
/// case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackKeywords {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

impl Default for FeedbackKeywords {
    fn default() -> Self {
        Self {
            positive: vec!["correct".into(), "Well done".into(), "Great job".into()],
            negative: vec!["incorrect".into(), "wrong".into()],
        }
    }
}

/// Negative keywords are checked before positive ones, so "incorrect"
/// is negative even though it contains "correct". The web dashboard this
/// replaces checked positive keywords first and showed it as positive.
pub fn classify_feedback(feedback: &str, keywords: &FeedbackKeywords) -> FeedbackTone {
    let hit = |list: &[String]| {
        list.iter()
            .any(|k| !k.is_empty() && feedback.contains(k.as_str()))
    };
    if hit(keywords.negative.as_slice()) {
        FeedbackTone::Negative
    } else if hit(keywords.positive.as_slice()) {
        FeedbackTone::Positive
    } else {
        FeedbackTone::Neutral
    }
}
