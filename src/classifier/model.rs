use std::collections::HashMap;
use std::sync::Arc;

use ndarray::{s, Array4};
use ort::session::Session;
use ort::value::Tensor;
use serde::Serialize;

use super::error::ClassifierError;
use super::preprocess::preprocess_image;
use crate::mapping::ClassMapping;

/// Number of ranked predictions returned by default.
pub const DEFAULT_TOP_K: usize = 3;

/// A ranked class prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Model output index of the class
    pub index: u32,
    /// Human-readable class name
    pub label: String,
    /// Model score for the class, as a percentage
    pub confidence: f32,
}

/// A thread-safe pollen grain image classifier backed by an ONNX model.
///
/// # Thread Safety
///
/// This type is automatically `Send + Sync` because all of its fields are
/// thread-safe: `String` and `usize` are `Send + Sync`, and `Session` and
/// `ClassMapping` are wrapped in `Arc`. A loaded classifier is read-only;
/// per-request failures never mutate it.
#[derive(Debug)]
pub struct Classifier {
    pub model_path: String,
    pub session: Arc<Session>,
    pub classes: Arc<ClassMapping>,
    pub top_k: usize,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl Classifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Returns information about the classifier's current state
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            model_path: self.model_path.clone(),
            num_classes: self.classes.len(),
            class_labels: self.classes.names().map(str::to_string).collect(),
            top_k: self.top_k,
        }
    }

    /// Classifies an encoded image and returns the ranked top predictions.
    ///
    /// # Arguments
    /// * `image_bytes` - The encoded image (JPEG, PNG, ...)
    ///
    /// # Returns
    /// At most `top_k` predictions sorted descending by confidence. The
    /// first entry is the primary classification.
    pub fn classify(&self, image_bytes: &[u8]) -> Result<Vec<Prediction>, ClassifierError> {
        let scores = self.scores(image_bytes)?;
        Ok(top_predictions(&scores, &self.classes, self.top_k))
    }

    /// Runs the forward pass and returns the raw score vector, one entry
    /// per class.
    ///
    /// Scores are used as-is: the model's output layer is expected to
    /// already be a probability distribution, and nothing is rescaled or
    /// thresholded here.
    pub fn scores(&self, image_bytes: &[u8]) -> Result<Vec<f32>, ClassifierError> {
        if image_bytes.is_empty() {
            return Err(ClassifierError::Image("input image is empty".into()));
        }

        let input = preprocess_image(image_bytes)?;
        self.run_model(input)
    }

    fn run_model(&self, input: Array4<f32>) -> Result<Vec<f32>, ClassifierError> {
        let input_name = self
            .session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| ClassifierError::Model("model has no inputs".into()))?;

        let input_dyn = input.into_dyn();
        let input_view = input_dyn.as_standard_layout();

        let mut input_tensors = HashMap::new();
        input_tensors.insert(
            input_name.as_str(),
            Tensor::from_array(&input_view).map_err(|e| {
                ClassifierError::Prediction(format!("failed to create input tensor: {}", e))
            })?,
        );

        let outputs = self
            .session
            .run(input_tensors)
            .map_err(|e| ClassifierError::Prediction(format!("failed to run model: {}", e)))?;
        let output = outputs[0].try_extract_tensor::<f32>().map_err(|e| {
            ClassifierError::Prediction(format!("failed to extract output tensor: {}", e))
        })?;

        // The model emits one row of class scores per batch entry, and the
        // batch is always 1 here.
        let shape = output.shape();
        if shape.len() != 2 || shape[0] != 1 {
            return Err(ClassifierError::Prediction(format!(
                "unexpected output shape {:?}, expected [1, num_classes]",
                shape
            )));
        }

        Ok(output.slice(s![0, ..]).iter().copied().collect())
    }
}

/// Ranks a raw score vector and resolves the top `top_k` entries to
/// labeled predictions. Confidence is the score expressed as a
/// percentage.
///
/// The sort is stable and descending, so equal scores keep their original
/// index order. Indices missing from the mapping fall back to the
/// synthetic `Class {idx}` label.
pub fn top_predictions(scores: &[f32], classes: &ClassMapping, top_k: usize) -> Vec<Prediction> {
    let mut indices: Vec<usize> = (0..scores.len()).collect();
    indices.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    indices
        .into_iter()
        .take(top_k)
        .map(|idx| Prediction {
            index: idx as u32,
            label: classes.label_for(idx as u32),
            confidence: scores[idx] * 100.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn five_class_mapping() -> ClassMapping {
        ClassMapping::from_json(
            r#"{"0": "anadenanthera", "1": "arecaceae", "2": "cecropia", "3": "combretum", "4": "croton"}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_top_k_selection_and_order() {
        let scores = [0.1, 0.5, 0.05, 0.3, 0.05];
        let top = top_predictions(&scores, &five_class_mapping(), 3);

        let indices: Vec<u32> = top.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![1, 3, 0]);
        assert!((top[0].confidence - 50.0).abs() < 1e-4);
        assert!((top[1].confidence - 30.0).abs() < 1e-4);
        assert!((top[2].confidence - 10.0).abs() < 1e-4);
        assert_eq!(top[0].label, "arecaceae");
    }

    #[test]
    fn test_ties_keep_index_order() {
        let scores = [0.25, 0.25, 0.5];
        let top = top_predictions(&scores, &five_class_mapping(), 3);
        let indices: Vec<u32> = top.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![2, 0, 1]);
    }

    #[test]
    fn test_top_k_larger_than_class_count() {
        let scores = [0.7, 0.3];
        let top = top_predictions(&scores, &five_class_mapping(), 10);
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn test_missing_index_uses_fallback_label() {
        let mapping = ClassMapping::from_json(r#"{"0": "anadenanthera"}"#).unwrap();
        let scores = [0.2, 0.8];
        let top = top_predictions(&scores, &mapping, 2);
        assert_eq!(top[0].label, "Class 1");
        assert_eq!(top[1].label, "anadenanthera");
    }
}
