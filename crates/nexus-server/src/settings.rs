//! Server settings resolved from the command line and environment.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use nexus_api::{parse_origins, ApiConfig, DEFAULT_PORT};
use nexus_scheduler::SchedulerConfig;

/// Nexus assistant backend - reminders, Telegram relay and Q&A over HTTP
#[derive(Parser, Debug, Clone)]
#[command(name = "nexus-server")]
#[command(about = "HTTP backend for the Nexus assistant web client")]
pub struct Args {
    /// Address to bind to
    #[arg(long, env = "NEXUS_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Comma separated allowed CORS origins, `*` for any
    #[arg(long, env = "NEXUS_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Seconds between reminder polls
    #[arg(long, env = "NEXUS_POLL_SECS", default_value_t = 30)]
    pub poll_secs: u64,

    /// Minutes a reminder may still be sent after its time
    #[arg(long, env = "NEXUS_GRACE_MINUTES", default_value_t = 5)]
    pub grace_minutes: u64,

    /// Delivery attempts per reminder
    #[arg(long, env = "NEXUS_MAX_ATTEMPTS", default_value_t = 3)]
    pub max_attempts: u32,

    /// Seconds to wait for one reminder send before giving up on it
    #[arg(long, env = "NEXUS_SEND_TIMEOUT_SECS", default_value_t = 30)]
    pub send_timeout_secs: u64,

    /// Keep reminders, history and relayed messages in the state directory
    #[arg(long, env = "NEXUS_PERSIST")]
    pub persist: bool,

    /// Do not listen for replies in the Telegram chat
    #[arg(long)]
    pub no_telegram_listener: bool,

    /// Document used for college questions, text or PDF
    #[arg(long, env = "NEXUS_COLLEGE_DOC")]
    pub college_doc: Option<PathBuf>,

    /// JSON file of hospital question/answer pairs
    #[arg(long, env = "NEXUS_HOSPITAL_DATA")]
    pub hospital_data: Option<PathBuf>,

    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(self.host.clone(), self.port)
            .with_cors_origins(parse_origins(&self.cors_origins))
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig::new()
            .with_poll_interval(Duration::from_secs(self.poll_secs.max(1)))
            .with_grace(Duration::from_secs(self.grace_minutes * 60))
            .with_max_attempts(self.max_attempts)
            .with_send_timeout(Duration::from_secs(self.send_timeout_secs.max(1)))
    }

    /// Tracing filter for the verbosity level.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "nexus=info,tower_http=warn,teloxide=warn",
            1 => "nexus=debug,tower_http=info,teloxide=info",
            2 => "nexus=trace,tower_http=debug,teloxide=debug",
            _ => "trace",
        }
    }
}
