//! Analysis orchestrator: sentiment and emotions for one text, merged into one record.

use std::sync::{Arc, OnceLock};

use mosaic_core::AnalysisResult;
#[cfg(feature = "onnx")]
use mosaic_core::AnalyzerConfig;
use tracing::debug;

use crate::emotion::EmotionClassifier;
use crate::error::AnalysisError;
use crate::sentiment::SentimentScorer;

/// Composes the lexicon scorer and the emotion classifier.
///
/// Holds no per-call state, so one instance serves any number of concurrent
/// callers. Either both halves succeed or the call fails; there is no
/// partially-populated result.
pub struct Analyzer {
    sentiment: SentimentScorer,
    emotions: EmotionClassifier,
}

impl Analyzer {
    pub fn new(sentiment: SentimentScorer, emotions: EmotionClassifier) -> Self {
        Self {
            sentiment,
            emotions,
        }
    }

    /// Load the lexicon and emotion model named by `config`.
    #[cfg(feature = "onnx")]
    pub fn load(config: &AnalyzerConfig) -> Result<Self, AnalysisError> {
        use crate::lexicon::Lexicon;
        use crate::onnx::OnnxEmotionModel;

        config.validate()?;

        let lexicon = match &config.lexicon_path {
            Some(path) => Lexicon::from_file(path)?,
            None => Lexicon::builtin(),
        };
        let model = OnnxEmotionModel::load(&config.model_dir, config.max_length())?;

        Ok(Self::new(
            SentimentScorer::new(Arc::new(lexicon)),
            EmotionClassifier::new(Box::new(model), config.emotion_threshold),
        ))
    }

    pub fn emotions(&self) -> &EmotionClassifier {
        &self.emotions
    }

    pub fn analyze(&self, text: &str) -> Result<AnalysisResult, AnalysisError> {
        // Sentiment scoring cannot fail; emotion detection may.
        let sentiment = self.sentiment.classify(text);
        let emotions = self.emotions.detect(text)?;
        debug!(
            chars = text.len(),
            sentiment = %sentiment,
            emotions = emotions.len(),
            "analyzed text"
        );
        Ok(AnalysisResult {
            sentiment,
            emotions,
        })
    }

    /// Analyze raw bytes, rejecting anything that is not UTF-8.
    pub fn analyze_bytes(&self, bytes: &[u8]) -> Result<AnalysisResult, AnalysisError> {
        let text = std::str::from_utf8(bytes)?;
        self.analyze(text)
    }

    /// Analyze each text in order. The first failure aborts the batch.
    pub fn analyze_batch(&self, texts: &[&str]) -> Result<Vec<AnalysisResult>, AnalysisError> {
        texts.iter().map(|text| self.analyze(text)).collect()
    }
}

/// Init-once holder for the process-wide [`Analyzer`].
///
/// Empty until [`init`](Self::init) succeeds, read-only afterwards.
/// [`is_ready`](Self::is_ready) is the signal hosts use to gate traffic.
#[derive(Default)]
pub struct AnalyzerCell {
    inner: OnceLock<Arc<Analyzer>>,
}

impl AnalyzerCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `load` and store its result. A second successful init is rejected;
    /// a failed load leaves the cell empty.
    pub fn init<F>(&self, load: F) -> Result<Arc<Analyzer>, AnalysisError>
    where
        F: FnOnce() -> Result<Analyzer, AnalysisError>,
    {
        if self.inner.get().is_some() {
            return Err(AnalysisError::AlreadyInitialized);
        }
        let analyzer = Arc::new(load()?);
        self.inner
            .set(analyzer.clone())
            .map_err(|_| AnalysisError::AlreadyInitialized)?;
        Ok(analyzer)
    }

    pub fn get(&self) -> Option<Arc<Analyzer>> {
        self.inner.get().cloned()
    }

    pub fn is_ready(&self) -> bool {
        self.inner.get().is_some()
    }
}
