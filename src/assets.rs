//! On-disk model assets and the first-run bootstrap.
//!
//! The demo ships its model as a gzip archive next to the class mapping.
//! [`AssetStore::ensure_model_ready`] decompresses the archive the first
//! time it runs; on later runs the decompressed file is found on disk and
//! the step is a no-op.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use log::info;

use crate::mapping::{ClassMapping, MappingError};

/// Compressed model artifact shipped with the demo. Optional once the
/// decompressed file exists.
pub const MODEL_ARCHIVE: &str = "pollen_classifier_model.onnx.gz";
/// Decompressed model file, created from the archive if absent.
pub const MODEL_FILE: &str = "pollen_classifier_model.onnx";
/// JSON object mapping decimal index keys to class names.
pub const CLASS_MAPPING_FILE: &str = "class_mapping.json";

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("model unavailable: no model file or compressed archive found in {dir:?}")]
    ModelMissing { dir: PathBuf },
    #[error("class mapping not found at {0:?}")]
    MappingMissing(PathBuf),
    #[error("class mapping error: {0}")]
    Mapping(#[from] MappingError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Locates the classifier's on-disk assets and prepares them for loading.
#[derive(Debug, Clone)]
pub struct AssetStore {
    assets_dir: PathBuf,
}

impl AssetStore {
    pub fn new<P: AsRef<Path>>(assets_dir: P) -> Self {
        Self {
            assets_dir: assets_dir.as_ref().to_path_buf(),
        }
    }

    pub fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }

    pub fn model_path(&self) -> PathBuf {
        self.assets_dir.join(MODEL_FILE)
    }

    pub fn archive_path(&self) -> PathBuf {
        self.assets_dir.join(MODEL_ARCHIVE)
    }

    pub fn mapping_path(&self) -> PathBuf {
        self.assets_dir.join(CLASS_MAPPING_FILE)
    }

    /// Guarantees the decompressed model file exists before load is
    /// attempted, decompressing the shipped archive if needed.
    ///
    /// Idempotent: once the decompressed file exists, later calls perform
    /// no work. Fails with [`AssetError::ModelMissing`] when neither form
    /// of the model is present.
    pub fn ensure_model_ready(&self) -> Result<PathBuf, AssetError> {
        let model_path = self.model_path();
        if model_path.exists() {
            info!("Model already present at {:?}", model_path);
            return Ok(model_path);
        }

        let archive_path = self.archive_path();
        if !archive_path.exists() {
            return Err(AssetError::ModelMissing {
                dir: self.assets_dir.clone(),
            });
        }

        info!("Decompressing {:?} to {:?}", archive_path, model_path);
        let mut decoder = GzDecoder::new(File::open(&archive_path)?);
        let mut out = File::create(&model_path)?;
        if let Err(e) = io::copy(&mut decoder, &mut out) {
            // A truncated model file must not survive to the next run,
            // where it would pass the exists() check.
            drop(out);
            let _ = fs::remove_file(&model_path);
            return Err(e.into());
        }
        info!("Model decompressed successfully");

        Ok(model_path)
    }

    /// Loads the class mapping shipped next to the model.
    pub fn load_class_mapping(&self) -> Result<ClassMapping, AssetError> {
        let path = self.mapping_path();
        if !path.exists() {
            return Err(AssetError::MappingMissing(path));
        }
        Ok(ClassMapping::from_path(&path)?)
    }
}
