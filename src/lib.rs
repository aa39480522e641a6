//! A pollen grain image classifier backed by ONNX models, with a
//! single-page web demo.
//!
//! The library covers the full pipeline: preparing the on-disk model
//! assets (decompressing the shipped archive on first run), loading the
//! class mapping, preprocessing an uploaded image into the tensor the
//! model expects, and ranking the model's output scores into labeled
//! top-k predictions.
//!
//! # Basic Usage
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use palyno::{AssetStore, Classifier};
//!
//! let assets = AssetStore::new(".");
//! let classifier = Classifier::builder()
//!     .with_assets(&assets)?
//!     .build()?;
//!
//! let bytes = std::fs::read("pollen.jpg")?;
//! for prediction in classifier.classify(&bytes)? {
//!     println!("{}: {:.1}%", prediction.label, prediction.confidence);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! The classifier is loaded once and read-only afterwards. It is
//! `Send + Sync` and can be shared across threads (or server handlers)
//! using `Arc`:
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use palyno::{AssetStore, Classifier};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let classifier = Arc::new(Classifier::builder()
//!     .with_assets(&AssetStore::new("."))?
//!     .build()?);
//!
//! let mut handles = vec![];
//! for _ in 0..3 {
//!     let classifier = Arc::clone(&classifier);
//!     handles.push(thread::spawn(move || {
//!         let bytes = std::fs::read("pollen.jpg").unwrap();
//!         classifier.classify(&bytes).unwrap();
//!     }));
//! }
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! # Ok(())
//! # }
//! ```

pub mod assets;
pub mod classifier;
pub mod mapping;
mod runtime;
pub mod server;

pub use assets::{AssetError, AssetStore};
pub use classifier::{
    preprocess_image, tensor_from_image, top_predictions, Classifier, ClassifierBuilder,
    ClassifierError, ClassifierInfo, Prediction, DEFAULT_TOP_K, INPUT_SIZE,
};
pub use mapping::{ClassMapping, MappingError};
pub use runtime::{create_session_builder, OptLevel, RuntimeConfig};

pub fn init_logger() {
    env_logger::init();
}
