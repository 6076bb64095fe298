//! JSON array documents on disk (packages.json, installed.json)
//!
//! A document is loaded once, mutated in memory and written back
//! wholesale on an explicit [`JsonDocument::save`]. A missing file loads
//! as an empty collection.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::descriptor::PackageDescriptor;
use super::error::StoreError;

/// The available-packages catalog document
pub type CatalogStore = JsonDocument<PackageDescriptor>;

/// The installed-packages document
pub type InstalledStore = JsonDocument<PackageDescriptor>;

/// An ordered collection backed by a JSON array file
#[derive(Debug, Clone)]
pub struct JsonDocument<T> {
    path: PathBuf,
    items: Vec<T>,
}

impl<T> JsonDocument<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Load the document or start empty if the file does not exist
    pub fn load_or_empty(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if !path.exists() {
            tracing::debug!("No document at {}, starting empty", path.display());
            return Ok(Self {
                path,
                items: Vec::new(),
            });
        }

        let content = std::fs::read_to_string(&path).map_err(|source| StoreError::Read {
            path: path.clone(),
            source,
        })?;

        let items = serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: path.clone(),
            source,
        })?;

        Ok(Self { path, items })
    }

    /// Save the collection, pretty-printed
    pub fn save(&self) -> Result<(), StoreError> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        }

        let content =
            serde_json::to_string_pretty(&self.items).map_err(|source| StoreError::Serialize {
                path: self.path.clone(),
                source,
            })?;

        std::fs::write(&self.path, content).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!("Saved {} entries to {}", self.items.len(), self.path.display());
        Ok(())
    }
}

impl<T> JsonDocument<T> {
    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current collection
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Mutable access to the collection
    pub fn items_mut(&mut self) -> &mut Vec<T> {
        &mut self.items
    }

    /// Replace the whole collection
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
