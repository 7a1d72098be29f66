use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Input bytes are not valid UTF-8 text.
    #[error("input is not valid UTF-8: {0}")]
    InvalidInput(#[from] std::str::Utf8Error),

    /// Startup only: the emotion model or its vocabulary could not be loaded.
    #[error("failed to load model from {path}: {reason}")]
    ModelLoad { path: PathBuf, reason: String },

    /// Startup only: a replacement lexicon could not be loaded.
    #[error("failed to load lexicon from {path}: {reason}")]
    LexiconLoad { path: PathBuf, reason: String },

    #[error("invalid configuration: {0}")]
    Config(#[from] mosaic_core::ConfigError),

    /// Per request: the forward pass failed or produced an unusable output.
    #[error("inference failed: {0}")]
    Inference(String),

    #[error("analyzer is already initialized")]
    AlreadyInitialized,
}

/// A malformed line in a lexicon table. Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("line {line}: missing valence column")]
    MissingValence { line: usize },

    #[error("line {line}: bad valence {value:?}: {source}")]
    BadValence {
        line: usize,
        value: String,
        source: std::num::ParseFloatError,
    },

    #[error("line {line}: empty token")]
    EmptyToken { line: usize },
}

/// An emotion vocabulary that cannot name the model's outputs.
#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("vocabulary is empty")]
    Empty,

    #[error("duplicate label {0:?}")]
    DuplicateLabel(String),

    #[error("non-numeric label id {0:?}")]
    NonNumericId(String),

    #[error("label ids are not contiguous: missing id {0}")]
    MissingId(usize),

    #[error("parse config.json: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalysisError {
    pub(crate) fn model_load(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::ModelLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn lexicon_load(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::LexiconLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// True for errors that can only happen while starting up.
    pub fn is_startup(&self) -> bool {
        matches!(
            self,
            Self::ModelLoad { .. } | Self::LexiconLoad { .. } | Self::Config(_)
        )
    }
}
