//! Multi-label emotion detection.
//!
//! Each label is scored independently: the model's raw logits pass through a
//! per-label sigmoid (not a softmax), so several emotions can clear the
//! threshold at once and none excludes another.

use mosaic_core::{DEFAULT_EMOTION_THRESHOLD, EmotionScore};
use tracing::debug;

use crate::error::AnalysisError;
use crate::labels::EmotionVocabulary;

/// A loaded text-classification model producing one logit per vocabulary label.
///
/// Implementations are shared read-only across threads; any state the forward
/// pass mutates must be guarded internally.
pub trait EmotionModel: Send + Sync {
    fn vocabulary(&self) -> &EmotionVocabulary;

    /// Raw (pre-sigmoid) scores, one per vocabulary entry, in vocabulary order.
    fn logits(&self, text: &str) -> Result<Vec<f32>, AnalysisError>;
}

pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Thresholds a model's per-label probabilities into a label set.
pub struct EmotionClassifier {
    model: Box<dyn EmotionModel>,
    threshold: f32,
}

impl EmotionClassifier {
    pub fn new(model: Box<dyn EmotionModel>, threshold: f32) -> Self {
        Self { model, threshold }
    }

    pub fn with_default_threshold(model: Box<dyn EmotionModel>) -> Self {
        Self::new(model, DEFAULT_EMOTION_THRESHOLD)
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn vocabulary(&self) -> &EmotionVocabulary {
        self.model.vocabulary()
    }

    /// Labels whose probability strictly exceeds the configured threshold.
    pub fn detect(&self, text: &str) -> Result<Vec<String>, AnalysisError> {
        self.detect_with_threshold(text, self.threshold)
    }

    pub fn detect_with_threshold(
        &self,
        text: &str,
        threshold: f32,
    ) -> Result<Vec<String>, AnalysisError> {
        let labels: Vec<String> = self
            .scores(text)?
            .into_iter()
            .filter(|s| s.probability > threshold)
            .map(|s| s.label)
            .collect();
        debug!(threshold, detected = labels.len(), "emotion detection");
        Ok(labels)
    }

    /// Independent probability for every label, in vocabulary order.
    ///
    /// Blank text is not sent to the model; every label scores 0.0.
    pub fn scores(&self, text: &str) -> Result<Vec<EmotionScore>, AnalysisError> {
        let vocab = self.model.vocabulary();
        if text.trim().is_empty() {
            return Ok(vocab
                .iter()
                .map(|label| EmotionScore {
                    label: label.to_string(),
                    probability: 0.0,
                })
                .collect());
        }

        let logits = self.model.logits(text)?;
        if logits.len() != vocab.len() {
            return Err(AnalysisError::Inference(format!(
                "model returned {} logits for {} labels",
                logits.len(),
                vocab.len()
            )));
        }
        if let Some(pos) = logits.iter().position(|l| !l.is_finite()) {
            return Err(AnalysisError::Inference(format!(
                "non-finite logit {} for label {:?}",
                logits[pos],
                vocab.get(pos).unwrap_or_default()
            )));
        }

        Ok(vocab
            .iter()
            .zip(logits)
            .map(|(label, logit)| EmotionScore {
                label: label.to_string(),
                probability: sigmoid(logit),
            })
            .collect())
    }
}
