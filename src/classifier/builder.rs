use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{info, warn};
use ort::session::Session;

use super::error::ClassifierError;
use super::model::{Classifier, DEFAULT_TOP_K};
use crate::assets::{AssetError, AssetStore};
use crate::mapping::ClassMapping;
use crate::runtime::{create_session_builder, RuntimeConfig};

/// A builder for constructing a Classifier with a fluent interface.
#[derive(Debug)]
pub struct ClassifierBuilder {
    model_path: Option<PathBuf>,
    mapping: Option<ClassMapping>,
    session: Option<Session>,
    top_k: usize,
    runtime_config: RuntimeConfig,
}

impl Default for ClassifierBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassifierBuilder {
    /// Creates a new empty ClassifierBuilder with default configuration
    pub fn new() -> Self {
        Self {
            model_path: None,
            mapping: None,
            session: None,
            top_k: DEFAULT_TOP_K,
            runtime_config: RuntimeConfig::default(),
        }
    }

    /// Sets the runtime configuration for ONNX model execution
    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    /// Sets how many ranked predictions `classify` returns (default 3)
    ///
    /// # Errors
    /// Returns a validation-style `BuildError` when `top_k` is zero.
    pub fn with_top_k(mut self, top_k: usize) -> Result<Self, ClassifierError> {
        if top_k == 0 {
            return Err(ClassifierError::Build(
                "top_k must be at least 1".to_string(),
            ));
        }
        self.top_k = top_k;
        Ok(self)
    }

    /// Loads the model and class mapping from an [`AssetStore`], running
    /// the first-use bootstrap (archive decompression) if needed.
    ///
    /// # Errors
    /// * `Asset` - neither model form exists, the mapping is missing or
    ///   malformed, or decompression failed
    /// * `Build` - a model was already configured on this builder
    /// * `Model` - the ONNX file failed to load or has no usable I/O
    pub fn with_assets(mut self, assets: &AssetStore) -> Result<Self, ClassifierError> {
        if self.model_path.is_some() {
            return Err(ClassifierError::Build(
                "Model already set on this builder".to_string(),
            ));
        }

        let model_path = assets.ensure_model_ready()?;
        let mapping = assets.load_class_mapping()?;
        info!(
            "Class mapping loaded from {:?} ({} classes)",
            assets.mapping_path(),
            mapping.len()
        );

        self.load_model(&model_path)?;
        self.model_path = Some(model_path);
        self.mapping = Some(mapping);
        Ok(self)
    }

    /// Loads the model and class mapping from explicit file paths,
    /// bypassing the archive bootstrap.
    pub fn with_model_file<P: AsRef<Path>, Q: AsRef<Path>>(
        mut self,
        model_path: P,
        mapping_path: Q,
    ) -> Result<Self, ClassifierError> {
        let model_path = model_path.as_ref();
        let mapping_path = mapping_path.as_ref();

        if self.model_path.is_some() {
            return Err(ClassifierError::Build(
                "Model already set on this builder".to_string(),
            ));
        }
        if !model_path.exists() {
            return Err(ClassifierError::Model(format!(
                "Model file not found: {}",
                model_path.display()
            )));
        }
        if !mapping_path.exists() {
            return Err(ClassifierError::Asset(AssetError::MappingMissing(
                mapping_path.to_path_buf(),
            )));
        }

        let mapping = ClassMapping::from_path(mapping_path)
            .map_err(AssetError::from)
            .map_err(ClassifierError::from)?;

        self.load_model(model_path)?;
        self.model_path = Some(model_path.to_path_buf());
        self.mapping = Some(mapping);
        Ok(self)
    }

    fn load_model(&mut self, model_path: &Path) -> Result<(), ClassifierError> {
        // Session creation goes through the singleton ort environment.
        let session = create_session_builder(&self.runtime_config)?
            .commit_from_file(model_path)
            .map_err(|e| {
                ClassifierError::Model(format!(
                    "failed to load model {}: {}",
                    model_path.display(),
                    e
                ))
            })?;

        Self::validate_model(&session)?;
        info!("Model loaded and validated from {}", model_path.display());

        self.session = Some(session);
        Ok(())
    }

    /// Validates that the model has the expected input/output structure:
    /// one image input and at least one output for the class scores.
    fn validate_model(session: &Session) -> Result<(), ClassifierError> {
        if session.inputs.is_empty() {
            return Err(ClassifierError::Model(
                "Model must have an image input, found none".to_string(),
            ));
        }
        if session.inputs.len() > 1 {
            warn!(
                "Model has {} inputs; only the first will be fed",
                session.inputs.len()
            );
        }
        if session.outputs.is_empty() {
            return Err(ClassifierError::Model(
                "Model must have at least 1 output for class scores".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds and returns the final Classifier instance
    ///
    /// # Errors
    /// Returns `Build` when no model and mapping have been configured.
    pub fn build(self) -> Result<Classifier, ClassifierError> {
        let model_path = self
            .model_path
            .ok_or_else(|| ClassifierError::Build("No model configured".to_string()))?;
        let session = self
            .session
            .ok_or_else(|| ClassifierError::Build("No ONNX model loaded".to_string()))?;
        let mapping = self
            .mapping
            .ok_or_else(|| ClassifierError::Build("No class mapping loaded".to_string()))?;

        Ok(Classifier {
            model_path: model_path.to_string_lossy().to_string(),
            session: Arc::new(session),
            classes: Arc::new(mapping),
            top_k: self.top_k,
        })
    }
}
