//! Shared configuration paths for Nexus.
//!
//! # Storage Structure
//!
//! All application data is stored under `~/.nexus/`:
//!
//! ```text
//! ~/.nexus/
//! ├── config/       # .env.local with API keys and tokens
//! └── state/        # Persisted reminders, history, relayed messages
//! ```
//!
//! # Environment Variables
//!
//! - `NEXUS_STATE_DIR`: Override the base state directory
//! - `NEXUS_CONFIG_DIR`: Override the config directory

use std::path::PathBuf;
use std::sync::OnceLock;

/// Environment variable for custom state directory.
pub const STATE_DIR_ENV: &str = "NEXUS_STATE_DIR";

/// Environment variable for custom config directory.
pub const CONFIG_DIR_ENV: &str = "NEXUS_CONFIG_DIR";

/// Default state directory name under home.
const DEFAULT_STATE_DIR: &str = ".nexus";

const CONFIG_SUBDIR: &str = "config";
const STATE_SUBDIR: &str = "state";

static STATE_DIR_CACHE: OnceLock<PathBuf> = OnceLock::new();

/// Get the Nexus state directory.
///
/// Resolved once, in order:
/// 1. `NEXUS_STATE_DIR` environment variable if set
/// 2. `~/.nexus` if home directory is available
/// 3. `.nexus` in current directory as fallback
pub fn state_dir() -> PathBuf {
    STATE_DIR_CACHE
        .get_or_init(|| {
            std::env::var(STATE_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    dirs::home_dir()
                        .map(|h| h.join(DEFAULT_STATE_DIR))
                        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
                })
        })
        .clone()
}

/// Get the user config directory.
pub fn config_dir() -> PathBuf {
    std::env::var(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| state_dir().join(CONFIG_SUBDIR))
}

/// Get the runtime state directory.
pub fn runtime_state_dir() -> PathBuf {
    state_dir().join(STATE_SUBDIR)
}

/// Persisted reminder book.
pub fn reminders_file() -> PathBuf {
    runtime_state_dir().join("reminders.json")
}

/// Persisted per-user activity history.
pub fn history_file() -> PathBuf {
    runtime_state_dir().join("history.json")
}

/// Persisted Telegram relay conversations.
pub fn telegram_messages_file() -> PathBuf {
    runtime_state_dir().join("telegram_messages.json")
}

/// Environment file for secrets (API keys, tokens).
pub fn env_file() -> PathBuf {
    config_dir().join(".env.local")
}

/// Ensure the config and state directories exist.
///
/// # Errors
/// Returns an error if any directory cannot be created.
pub fn ensure_all_dirs() -> std::io::Result<()> {
    std::fs::create_dir_all(config_dir())?;
    std::fs::create_dir_all(runtime_state_dir())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment variables can't be isolated across parallel tests, so these
    // check file and directory names rather than full paths.

    #[test]
    fn test_state_dir() {
        let dir = state_dir();
        assert!(dir.is_absolute() || dir.ends_with(".nexus"));
    }

    #[test]
    fn test_runtime_state_dir_name() {
        assert!(runtime_state_dir().ends_with("state"));
    }

    #[test]
    fn test_state_file_names() {
        assert!(reminders_file().ends_with("reminders.json"));
        assert!(history_file().ends_with("history.json"));
        assert!(telegram_messages_file().ends_with("telegram_messages.json"));
    }

    #[test]
    fn test_env_file_name() {
        assert!(env_file().ends_with(".env.local"));
    }
}
