//! Data source for the author collection
//!
//! The collection is read once from a static JSON resource holding an
//! array of records.

use crate::model::Record;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure while reading the record collection
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Short error kind for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Io { .. } => "IoError",
            FetchError::Parse { .. } => "ParseError",
        }
    }
}

/// Something that can produce the full record collection
pub trait DataSource: Send + Sync {
    fn fetch(&self) -> Result<Vec<Record>, FetchError>;

    /// Human readable location, shown in the status bar
    fn describe(&self) -> String;
}

/// Reads records from a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataSource for JsonFileSource {
    fn fetch(&self) -> Result<Vec<Record>, FetchError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| FetchError::Io {
            path: self.path.clone(),
            source,
        })?;

        serde_json::from_str(&contents).map_err(|source| FetchError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
