//! Environment loading helpers.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, info, warn};

use crate::config;

/// What [`load_env_files`] found.
///
/// Env files are read before logging is configured, so the outcome is kept
/// and reported once a subscriber exists.
#[derive(Debug, Default)]
pub struct EnvFiles {
    pub loaded: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl EnvFiles {
    /// Load one file, recording the outcome.
    pub fn load(&mut self, path: &Path) {
        match dotenvy::from_path(path) {
            Ok(()) => self.loaded.push(path.to_path_buf()),
            Err(e) => self.failed.push((path.to_path_buf(), e.to_string())),
        }
    }

    /// Report the outcome through `tracing`.
    pub fn log(&self) {
        for path in &self.loaded {
            info!(path = %path.display(), "loaded env file");
        }
        for (path, error) in &self.failed {
            warn!(path = %path.display(), error = %error, "failed to load env file");
        }
        if self.loaded.is_empty() && self.failed.is_empty() {
            debug!("no env files found");
        }
    }
}

/// Load environment files.
///
/// The config directory's `.env.local` is read first, then a local
/// `.env.local` or `.env`. Variables already present are never overridden.
pub fn load_env_files() -> EnvFiles {
    let mut files = EnvFiles::default();

    let env_path = config::env_file();
    if env_path.exists() {
        files.load(&env_path);
    }

    match dotenvy::from_filename(".env.local").or_else(|_| dotenvy::dotenv()) {
        Ok(path) => files.loaded.push(path),
        Err(e) if e.not_found() => {}
        Err(e) => files.failed.push((PathBuf::from(".env"), e.to_string())),
    }

    files
}

/// Read a variable, treating empty or whitespace-only values as unset.
pub fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read and parse a variable. Unparseable values are logged and ignored.
pub fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    let raw = env_var(name)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(name, value = %raw, "ignoring unparseable environment variable");
            None
        }
    }
}
