use crate::assets::AssetError;

/// Represents the different types of errors that can occur in the image
/// classifier. Each variant maps to one stage of the pipeline so the
/// presentation layer can report where a request failed.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    /// The model or class mapping could not be prepared or read from disk
    #[error("asset error: {0}")]
    Asset(#[from] AssetError),
    /// The uploaded bytes could not be decoded or preprocessed
    #[error("image error: {0}")]
    Image(String),
    /// The ONNX model could not be loaded or is structurally unusable
    #[error("model error: {0}")]
    Model(String),
    /// The classifier was misconfigured during the build phase
    #[error("build error: {0}")]
    Build(String),
    /// The forward pass or output extraction failed
    #[error("prediction error: {0}")]
    Prediction(String),
}

impl From<ort::Error> for ClassifierError {
    fn from(err: ort::Error) -> Self {
        ClassifierError::Model(err.to_string())
    }
}
