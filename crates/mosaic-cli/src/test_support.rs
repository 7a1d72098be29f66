//! Model stand-in for CLI and router tests.

use mosaic_ai::{
    AnalysisError, Analyzer, EmotionClassifier, EmotionModel, EmotionVocabulary, SentimentScorer,
};

/// Scores `joy` high for texts containing "love" and `sadness` for "hate";
/// fails inference for texts containing "<boom>".
pub struct KeywordModel {
    vocab: EmotionVocabulary,
}

impl KeywordModel {
    pub fn new() -> Self {
        Self {
            vocab: EmotionVocabulary::from_labels(["anger", "joy", "sadness"]).unwrap(),
        }
    }
}

impl EmotionModel for KeywordModel {
    fn vocabulary(&self) -> &EmotionVocabulary {
        &self.vocab
    }

    fn logits(&self, text: &str) -> Result<Vec<f32>, AnalysisError> {
        if text.contains("<boom>") {
            return Err(AnalysisError::Inference("forward pass: device lost".into()));
        }
        let lower = text.to_lowercase();
        let score = |hit: bool| if hit { 3.0 } else { -6.0 };
        Ok(vec![
            score(lower.contains("furious")),
            score(lower.contains("love")),
            score(lower.contains("hate")),
        ])
    }
}

pub fn analyzer() -> Analyzer {
    Analyzer::new(
        SentimentScorer::default(),
        EmotionClassifier::with_default_threshold(Box::new(KeywordModel::new())),
    )
}
