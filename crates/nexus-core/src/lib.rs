//! Nexus Core - shared configuration for the Nexus backend crates.
//!
//! - **config**: state directory layout and well-known file paths
//! - **env**: `.env` loading and typed environment lookups

pub mod config;
pub mod env;

pub use config::{
    config_dir, ensure_all_dirs, env_file, history_file, reminders_file, runtime_state_dir,
    state_dir, telegram_messages_file,
};
pub use env::{env_parse, env_var, load_env_files, EnvFiles};
