//! Persistence layer for Nexus.
//!
//! The backend keeps its working state in memory. When persistence is
//! enabled, each collection is mirrored to a single JSON document that is
//! rewritten atomically (write to temp file, then rename) after every
//! mutation.
//!
//! # Example
//!
//! ```no_run
//! use nexus_persistence::JsonStore;
//!
//! let store: JsonStore<Vec<String>> = JsonStore::new("/tmp/nexus/notes.json");
//! store.save(&vec!["hello".to_string()]).unwrap();
//! let notes = store.load_or_default().unwrap();
//! assert_eq!(notes.len(), 1);
//! ```

pub mod atomic;
pub mod document;
pub mod error;

pub use document::JsonStore;
pub use error::{PersistenceError, Result};
