//! Analyzer configuration. All resource locations are explicit; nothing is
//! resolved relative to the working directory.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default probability an emotion must strictly exceed to be reported.
pub const DEFAULT_EMOTION_THRESHOLD: f32 = 0.05;

/// Default tokenizer truncation length (RoBERTa-base supports 512 positions).
pub const DEFAULT_MAX_LENGTH: usize = 512;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("emotion threshold must be a finite value in [0, 1], got {0}")]
    InvalidThreshold(f32),

    #[error("max_length must be greater than zero")]
    ZeroMaxLength,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Directory holding `model.onnx`, `tokenizer.json` and `config.json`.
    pub model_dir: PathBuf,
    /// Replacement lexicon in VADER text format. `None` uses the embedded table.
    #[serde(default)]
    pub lexicon_path: Option<PathBuf>,
    #[serde(default = "default_threshold")]
    pub emotion_threshold: f32,
    /// Token limit; longer inputs are truncated from the end.
    #[serde(default)]
    pub max_length: Option<usize>,
}

fn default_threshold() -> f32 {
    DEFAULT_EMOTION_THRESHOLD
}

impl AnalyzerConfig {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            lexicon_path: None,
            emotion_threshold: DEFAULT_EMOTION_THRESHOLD,
            max_length: None,
        }
    }

    pub fn with_lexicon(mut self, path: impl Into<PathBuf>) -> Self {
        self.lexicon_path = Some(path.into());
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.emotion_threshold = threshold;
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Effective truncation length.
    pub fn max_length(&self) -> usize {
        self.max_length.unwrap_or(DEFAULT_MAX_LENGTH)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = self.emotion_threshold;
        if !t.is_finite() || !(0.0..=1.0).contains(&t) {
            return Err(ConfigError::InvalidThreshold(t));
        }
        if self.max_length == Some(0) {
            return Err(ConfigError::ZeroMaxLength);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AnalyzerConfig::new("models/go-emotions");
        assert_eq!(config.emotion_threshold, 0.05);
        assert_eq!(config.max_length(), 512);
        assert!(config.lexicon_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_thresholds() {
        for t in [-0.1, 1.5, f32::NAN, f32::INFINITY] {
            let config = AnalyzerConfig::new("m").with_threshold(t);
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidThreshold(_))),
                "threshold {t} should be rejected"
            );
        }
    }

    #[test]
    fn threshold_bounds_are_inclusive() {
        assert!(AnalyzerConfig::new("m").with_threshold(0.0).validate().is_ok());
        assert!(AnalyzerConfig::new("m").with_threshold(1.0).validate().is_ok());
    }

    #[test]
    fn rejects_zero_max_length() {
        let config = AnalyzerConfig::new("m").with_max_length(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroMaxLength));
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: AnalyzerConfig =
            serde_json::from_str(r#"{"model_dir": "/opt/models/go-emotions"}"#).unwrap();
        assert_eq!(config.model_dir, PathBuf::from("/opt/models/go-emotions"));
        assert_eq!(config.emotion_threshold, DEFAULT_EMOTION_THRESHOLD);
        assert_eq!(config.max_length, None);
    }
}
