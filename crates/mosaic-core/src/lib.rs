pub mod analysis;
pub mod config;

pub use analysis::{AnalysisResult, AnalyzeRequest, EmotionScore, SentimentLabel, SentimentScores};
pub use config::{AnalyzerConfig, ConfigError, DEFAULT_EMOTION_THRESHOLD, DEFAULT_MAX_LENGTH};
