//! YAML document storage.
//!
//! Mapping key order survives a load/save cycle; comments do not.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_yaml::Value;
use thiserror::Error;

use crate::schema::SchemaDocument;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("file not found: {}", .path.display())]
    NotFound { path: PathBuf },
    #[error("failed to parse YAML file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("failed to serialize YAML for {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("I/O error on {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Loads and saves YAML documents on disk.
pub struct YamlStorage;

impl YamlStorage {
    /// Load an untyped document.
    pub fn load(path: impl AsRef<Path>) -> Result<Value> {
        Self::load_as(path)
    }

    /// Save any serializable value, creating parent directories as needed.
    pub fn save<T: Serialize + ?Sized>(data: &T, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = serde_yaml::to_string(data).map_err(|source| StorageError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(path, text).map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("saved {}", path.display());
        Ok(())
    }

    /// Load and deserialize a document into `T`.
    pub fn load_as<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound {
                path: path.to_path_buf(),
            },
            _ => StorageError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;
        log::debug!("loaded {} ({} bytes)", path.display(), text.len());

        serde_yaml::from_str(&text).map_err(|source| StorageError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a schema document. Every table, column and enum is validated while
    /// deserializing; violations surface as [`StorageError::Parse`].
    pub fn load_document(path: impl AsRef<Path>) -> Result<SchemaDocument> {
        Self::load_as(path)
    }

    pub fn save_document(document: &SchemaDocument, path: impl AsRef<Path>) -> Result<()> {
        Self::save(document, path)
    }

    /// Parse a schema document held in memory.
    pub fn parse_document(source: &str) -> std::result::Result<SchemaDocument, serde_yaml::Error> {
        serde_yaml::from_str(source)
    }
}
