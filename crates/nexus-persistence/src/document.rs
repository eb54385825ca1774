//! Single-document JSON store.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::atomic::{atomic_write_json, read_json_optional};
use crate::error::Result;

/// Persists one serializable document at a fixed path.
///
/// The document is usually a whole collection (`Vec<Reminder>`,
/// `HashMap<String, Vec<TelegramMessage>>`) owned by an in-memory layer
/// that calls [`JsonStore::save`] after each mutation.
#[derive(Debug, Clone)]
pub struct JsonStore<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Creates a store for the document at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the document, `None` if it was never saved.
    pub fn load(&self) -> Result<Option<T>> {
        read_json_optional(&self.path)
    }

    /// Saves the document atomically.
    pub fn save(&self, document: &T) -> Result<()> {
        atomic_write_json(&self.path, document)?;
        debug!(path = %self.path.display(), "saved document");
        Ok(())
    }
}

impl<T> JsonStore<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Loads the document, or the default value if it was never saved.
    pub fn load_or_default(&self) -> Result<T> {
        Ok(self.load()?.unwrap_or_default())
    }
}
