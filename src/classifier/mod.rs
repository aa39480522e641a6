pub mod builder;
mod error;
mod model;
mod preprocess;

pub use builder::ClassifierBuilder;
pub use error::ClassifierError;
pub use model::{top_predictions, Classifier, Prediction, DEFAULT_TOP_K};
pub use preprocess::{preprocess_image, tensor_from_image, INPUT_SIZE};

/// Information about the current state and configuration of a classifier
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Path to the ONNX model file
    pub model_path: String,
    /// Number of classes in the mapping
    pub num_classes: usize,
    /// Class names, in mapping order
    pub class_labels: Vec<String>,
    /// Number of ranked predictions returned per image
    pub top_k: usize,
}
