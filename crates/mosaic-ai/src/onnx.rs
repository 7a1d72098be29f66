//! ONNX Runtime backend for sequence-classification emotion models.
//!
//! Targets multi-label exports such as `SamLowe/roberta-base-go_emotions`
//! (28 labels). The model directory must contain `model.onnx`,
//! `tokenizer.json`, and the Hugging Face `config.json` carrying `id2label`.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::info;

use crate::emotion::EmotionModel;
use crate::error::AnalysisError;
use crate::labels::EmotionVocabulary;

/// Emotion classifier running on ONNX Runtime.
///
/// The session needs exclusive access to run, so it sits behind a mutex held
/// only for the forward pass; tokenization runs unlocked.
pub struct OnnxEmotionModel {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    vocabulary: EmotionVocabulary,
    /// BERT-style graphs take `token_type_ids`; RoBERTa exports do not.
    token_type_ids: bool,
}

impl OnnxEmotionModel {
    /// Load from a directory containing `model.onnx`, `tokenizer.json` and `config.json`.
    ///
    /// Inputs longer than `max_length` tokens are truncated from the end.
    pub fn load(model_dir: &Path, max_length: usize) -> Result<Self, AnalysisError> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");
        let config_path = model_dir.join("config.json");

        for path in [&model_path, &tokenizer_path, &config_path] {
            if !path.exists() {
                return Err(AnalysisError::model_load(path, "file not found"));
            }
        }

        let vocabulary = EmotionVocabulary::from_model_config(&config_path)?;

        let session = Session::builder()
            .map_err(|e| AnalysisError::model_load(&model_path, e))?
            .commit_from_file(&model_path)
            .map_err(|e| AnalysisError::model_load(&model_path, e))?;

        let output = session
            .outputs()
            .first()
            .ok_or_else(|| AnalysisError::model_load(&model_path, "model declares no outputs"))?;
        // Cross-check label count against the declared output shape when known.
        if let Some(width) = infer_width(output.dtype())
            && width != vocabulary.len()
        {
            return Err(AnalysisError::model_load(
                &model_path,
                format!(
                    "model emits {width} logits but config.json lists {} labels",
                    vocabulary.len()
                ),
            ));
        }

        let token_type_ids = session
            .inputs()
            .iter()
            .any(|input| input.name() == "token_type_ids");

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| AnalysisError::model_load(&tokenizer_path, e))?;
        tokenizer
            .with_truncation(Some(tokenizers::TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|e| AnalysisError::model_load(&tokenizer_path, e))?;
        // Single-text inference: no padding.
        tokenizer.with_padding(None);

        info!(
            labels = vocabulary.len(),
            max_length,
            token_type_ids,
            model = %model_path.display(),
            "loaded emotion model"
        );
        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            vocabulary,
            token_type_ids,
        })
    }
}

impl EmotionModel for OnnxEmotionModel {
    fn vocabulary(&self) -> &EmotionVocabulary {
        &self.vocabulary
    }

    fn logits(&self, text: &str) -> Result<Vec<f32>, AnalysisError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| AnalysisError::Inference(format!("tokenize: {e}")))?;

        let seq_len = encoding.get_ids().len();
        let shape = [1i64, seq_len as i64];
        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();

        let ids_tensor = Tensor::from_array((shape, input_ids.into_boxed_slice()))
            .map_err(|e| AnalysisError::Inference(format!("input_ids tensor: {e}")))?;
        let mask_tensor = Tensor::from_array((shape, attention_mask.into_boxed_slice()))
            .map_err(|e| AnalysisError::Inference(format!("attention_mask tensor: {e}")))?;

        let type_tensor = if self.token_type_ids {
            let type_ids: Vec<i64> = encoding.get_type_ids().iter().map(|&t| t as i64).collect();
            let tensor = Tensor::from_array((shape, type_ids.into_boxed_slice()))
                .map_err(|e| AnalysisError::Inference(format!("token_type_ids tensor: {e}")))?;
            Some(tensor)
        } else {
            None
        };

        let mut session = self
            .session
            .lock()
            .map_err(|_| AnalysisError::Inference("session lock poisoned".into()))?;

        let outputs = match type_tensor {
            Some(type_tensor) => session.run(ort::inputs![
                "input_ids" => ids_tensor,
                "attention_mask" => mask_tensor,
                "token_type_ids" => type_tensor,
            ]),
            None => session.run(ort::inputs![
                "input_ids" => ids_tensor,
                "attention_mask" => mask_tensor,
            ]),
        };
        let outputs =
            outputs.map_err(|e| AnalysisError::Inference(format!("forward pass: {e}")))?;

        // Logits: [1, n_labels].
        if outputs.len() == 0 {
            return Err(AnalysisError::Inference("model produced no outputs".into()));
        }
        let (output_shape, output_data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| AnalysisError::Inference(format!("extract logits: {e}")))?;
        let dims: &[i64] = output_shape;
        let n_labels = self.vocabulary.len();
        if dims.len() != 2 || dims[0] != 1 || dims[1] as usize != n_labels {
            return Err(AnalysisError::Inference(format!(
                "unexpected output shape: {dims:?}, expected [1, {n_labels}]"
            )));
        }

        Ok(output_data.to_vec())
    }
}

/// Label count from the declared output type, if the graph fixes it.
fn infer_width(output_type: &ort::value::ValueType) -> Option<usize> {
    match output_type {
        ort::value::ValueType::Tensor { shape, .. } => shape
            .last()
            .and_then(|&d| if d > 0 { Some(d as usize) } else { None }),
        _ => None,
    }
}
