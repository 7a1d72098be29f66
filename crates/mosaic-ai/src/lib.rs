//! Text analysis: lexicon sentiment scoring and multi-label emotion detection.

mod analyzer;
mod emotion;
mod error;
mod labels;
mod lexicon;
mod sentiment;

pub use analyzer::{Analyzer, AnalyzerCell};
pub use emotion::{EmotionClassifier, EmotionModel, sigmoid};
pub use error::{AnalysisError, LexiconError, VocabularyError};
pub use labels::EmotionVocabulary;
pub use lexicon::Lexicon;
pub use sentiment::SentimentScorer;

#[cfg(feature = "onnx")]
mod onnx;
#[cfg(feature = "onnx")]
pub use onnx::OnnxEmotionModel;
