//! Emotion label vocabulary owned by the classification model.
//!
//! Read from the Hugging Face `config.json` shipped next to the ONNX export,
//! where `id2label` maps output positions to label names:
//!
//! ```json
//! { "id2label": { "0": "admiration", "1": "amusement", ... } }
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::error::{AnalysisError, VocabularyError};

#[derive(Deserialize)]
struct ModelConfig {
    id2label: HashMap<String, String>,
}

/// Ordered, duplicate-free list of label names. Position `i` names logit `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmotionVocabulary {
    labels: Vec<String>,
}

impl EmotionVocabulary {
    /// Build from labels already in output order.
    pub fn from_labels<I, S>(labels: I) -> Result<Self, VocabularyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            return Err(VocabularyError::Empty);
        }
        {
            let mut seen = HashSet::new();
            for label in &labels {
                if !seen.insert(label.as_str()) {
                    return Err(VocabularyError::DuplicateLabel(label.clone()));
                }
            }
        }
        Ok(Self { labels })
    }

    /// Parse the `id2label` map from a model `config.json`.
    pub fn from_model_config(path: &Path) -> Result<Self, AnalysisError> {
        let text = std::fs::read_to_string(path).map_err(|e| AnalysisError::model_load(path, e))?;
        Self::from_config_json(&text).map_err(|e| AnalysisError::model_load(path, e))
    }

    /// Ids must be exactly `0..n`.
    pub fn from_config_json(json: &str) -> Result<Self, VocabularyError> {
        let config: ModelConfig = serde_json::from_str(json)?;

        let mut by_id: Vec<(usize, String)> = config
            .id2label
            .into_iter()
            .map(|(id, label)| {
                id.parse::<usize>()
                    .map(|id| (id, label))
                    .map_err(|_| VocabularyError::NonNumericId(id))
            })
            .collect::<Result<_, _>>()?;
        by_id.sort_by_key(|(id, _)| *id);

        for (expected, (id, _)) in by_id.iter().enumerate() {
            if *id != expected {
                return Err(VocabularyError::MissingId(expected));
            }
        }

        Self::from_labels(by_id.into_iter().map(|(_, label)| label))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}
