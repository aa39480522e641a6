//! The index-to-name table for the model's output classes.
//!
//! `class_mapping.json` is a JSON object whose keys are decimal class
//! indices and whose values are class names, e.g.
//! `{"0": "anadenanthera", "1": "arecaceae"}`. Key order in the file is
//! meaningful: listings (such as the demo sidebar) follow it.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("class mapping must be a JSON object of index to class name")]
    NotAnObject,
    #[error("invalid class index key {key:?}")]
    BadKey { key: String },
    #[error("class name for index {index} must be a string")]
    BadValue { index: u32 },
    #[error("class mapping contains no classes")]
    Empty,
}

/// Ordered lookup table from model output index to human-readable class
/// name. Immutable after load.
#[derive(Debug, Clone)]
pub struct ClassMapping {
    entries: Vec<(u32, String)>,
    by_index: HashMap<u32, usize>,
}

impl ClassMapping {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, MappingError> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, MappingError> {
        Self::from_value(serde_json::from_reader(reader)?)
    }

    pub fn from_json(text: &str) -> Result<Self, MappingError> {
        Self::from_value(serde_json::from_str(text)?)
    }

    fn from_value(value: serde_json::Value) -> Result<Self, MappingError> {
        // serde_json is built with `preserve_order`, so iterating the
        // object visits keys in file order.
        let object = value.as_object().ok_or(MappingError::NotAnObject)?;

        let mut entries = Vec::with_capacity(object.len());
        let mut by_index = HashMap::with_capacity(object.len());
        for (key, value) in object {
            let index: u32 = key
                .trim()
                .parse()
                .map_err(|_| MappingError::BadKey { key: key.clone() })?;
            let name = value
                .as_str()
                .ok_or(MappingError::BadValue { index })?
                .to_string();
            by_index.insert(index, entries.len());
            entries.push((index, name));
        }

        if entries.is_empty() {
            return Err(MappingError::Empty);
        }

        Ok(Self { entries, by_index })
    }

    /// Class name for `index`, or the synthetic `Class {index}` label when
    /// the mapping has no entry for it.
    pub fn label_for(&self, index: u32) -> String {
        match self.get(index) {
            Some(name) => name.to_string(),
            None => format!("Class {}", index),
        }
    }

    pub fn get(&self, index: u32) -> Option<&str> {
        self.by_index
            .get(&index)
            .map(|&slot| self.entries[slot].1.as_str())
    }

    /// Class names in the order they appear in the source file.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, name)| name.as_str())
    }

    /// `(index, name)` pairs in file order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.entries.iter().map(|(index, name)| (*index, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
