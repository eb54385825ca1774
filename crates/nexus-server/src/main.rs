//! Nexus backend binary.
//!
//! Start the server with:
//! ```bash
//! GEMINI_API_KEY=xxx TELEGRAM_BOT_TOKEN=xxx TELEGRAM_CHAT_ID=123 cargo run -p nexus-server -- --persist
//! ```

mod settings;

use std::sync::Arc;

use clap::Parser;
use nexus_api::{serve, AppState, HistoryLog};
use nexus_assistant::{ChatService, CollegeAdvisor, GeminiClient, HospitalKnowledge, TextGenerator};
use nexus_core::config;
use nexus_notify::{NotifierRegistry, TelegramNotifier, TwilioConfig, TwilioWhatsApp};
use nexus_persistence::JsonStore;
use nexus_scheduler::{ReminderBook, Scheduler};
use nexus_telegram::{MessageLog, RelayError, TelegramRelay, TELEGRAM_BOT_TOKEN_ENV};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use settings::Args;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Env files first so clap sees their values; reported once logging is up
    let env_files = nexus_core::load_env_files();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(args.log_filter()))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    env_files.log();

    if args.persist {
        config::ensure_all_dirs()?;
        info!(dir = %config::runtime_state_dir().display(), "persisting state");
    }

    let (reminders, history, messages) = open_stores(args.persist)?;

    let relay = match TelegramRelay::from_env(Arc::clone(&messages)) {
        Ok(relay) => Some(Arc::new(relay)),
        Err(RelayError::NoToken) => {
            info!("TELEGRAM_BOT_TOKEN not set, Telegram disabled");
            None
        }
        Err(e) => {
            warn!(error = %e, "Telegram relay disabled");
            None
        }
    };

    let mut notifiers = NotifierRegistry::new();
    match TwilioConfig::from_env() {
        Some(twilio) => notifiers.register(Arc::new(TwilioWhatsApp::new(twilio))),
        None => warn!("Twilio credentials not set, WhatsApp reminders cannot be delivered"),
    }
    if let Some(relay) = &relay {
        notifiers.register(Arc::new(TelegramNotifier::from_bot(relay.bot().clone())));
    } else if let Some(token) = nexus_core::env_var(TELEGRAM_BOT_TOKEN_ENV) {
        notifiers.register(Arc::new(TelegramNotifier::new(token)));
    }

    let mut scheduler = Scheduler::new(args.scheduler_config(), Arc::clone(&reminders), notifiers);
    spawn_history_recorder(&scheduler, Arc::clone(&history));
    scheduler.start()?;

    let api_config = args.api_config();
    let mut state = AppState::new(
        api_config.clone(),
        reminders,
        scheduler.notifiers(),
        history,
        messages,
    )
    .with_hospital(load_hospital(&args));

    match GeminiClient::from_env() {
        Ok(client) => {
            let generator: Arc<dyn TextGenerator> = Arc::new(client);
            state = state
                .with_chat(ChatService::new(Arc::clone(&generator)))
                .with_college(CollegeAdvisor::load(generator, args.college_doc.as_deref()));
        }
        Err(e) => warn!(error = %e, "Gemini disabled"),
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let listener = match &relay {
        Some(relay) if !args.no_telegram_listener => {
            Some(tokio::spawn(Arc::clone(relay).listen(shutdown_rx)))
        }
        _ => None,
    };
    if let Some(relay) = relay {
        state = state.with_relay(relay);
    }

    let served = serve(api_config, state, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
        }
        info!("shutdown requested");
    })
    .await;

    let _ = shutdown_tx.send(true);
    if let Some(listener) = listener {
        let _ = listener.await;
    }
    scheduler.shutdown().await?;

    served?;
    info!("Nexus server stopped");
    Ok(())
}

type Stores = (Arc<ReminderBook>, Arc<HistoryLog>, Arc<MessageLog>);

fn open_stores(persist: bool) -> Result<Stores, Box<dyn std::error::Error>> {
    if !persist {
        return Ok((
            Arc::new(ReminderBook::in_memory()),
            Arc::new(HistoryLog::in_memory()),
            Arc::new(MessageLog::in_memory()),
        ));
    }

    Ok((
        Arc::new(ReminderBook::with_store(JsonStore::new(config::reminders_file()))?),
        Arc::new(HistoryLog::with_store(JsonStore::new(config::history_file()))?),
        Arc::new(MessageLog::with_store(JsonStore::new(
            config::telegram_messages_file(),
        ))?),
    ))
}

fn load_hospital(args: &Args) -> HospitalKnowledge {
    let Some(path) = args.hospital_data.as_deref() else {
        return HospitalKnowledge::builtin();
    };

    match HospitalKnowledge::load(path) {
        Ok(knowledge) => {
            info!(path = %path.display(), pairs = knowledge.len(), "hospital data loaded");
            knowledge
        }
        Err(e) => {
            warn!(error = %e, "using built-in hospital data");
            HospitalKnowledge::builtin()
        }
    }
}

/// Record delivery outcomes in the owning user's history.
fn spawn_history_recorder(scheduler: &Scheduler, history: Arc<HistoryLog>) {
    let mut events = scheduler.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    let Some(user_id) = event.reminder().user_id.clone() else {
                        continue;
                    };
                    if let Err(e) = history.record(user_id, event.describe()).await {
                        warn!(error = %e, "failed to record reminder outcome");
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "history recorder fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}
