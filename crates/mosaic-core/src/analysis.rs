//! Request and result types shared by the analyzers, the CLI, and the HTTP boundary.

use serde::{Deserialize, Serialize};

/// Compound scores at or above this are positive.
pub const POSITIVE_THRESHOLD: f32 = 0.05;
/// Compound scores at or below this are negative.
pub const NEGATIVE_THRESHOLD: f32 = -0.05;

/// Coarse three-way sentiment category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Map a compound score onto a label.
    ///
    /// `>= 0.05` is positive, `<= -0.05` is negative, everything in between
    /// (and NaN) is neutral.
    pub fn from_compound(compound: f32) -> Self {
        if compound >= POSITIVE_THRESHOLD {
            Self::Positive
        } else if compound <= NEGATIVE_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full lexicon breakdown for one text.
///
/// `neg`, `neu` and `pos` are proportions of the valence mass and sum to ~1.0
/// for any text with at least one token; `compound` is normalized to [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentScores {
    pub neg: f32,
    pub neu: f32,
    pub pos: f32,
    pub compound: f32,
}

impl SentimentScores {
    pub fn label(&self) -> SentimentLabel {
        SentimentLabel::from_compound(self.compound)
    }
}

/// Independent probability for one emotion label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionScore {
    pub label: String,
    pub probability: f32,
}

/// The unit returned per analysis: a sentiment category and the emotion labels
/// that cleared the threshold, in vocabulary order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub sentiment: SentimentLabel,
    pub emotions: Vec<String>,
}

/// Request body accepted at the boundary. `text` is required; anything else is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyzeRequest {
    pub text: String,
}
