//! Relay between web users and a Telegram chat.

use std::sync::Arc;

use nexus_core::env_var;
use nexus_models::{Sender, TelegramMessage};
use nexus_notify::parse_chat_id;
use teloxide::dispatching::UpdateFilterExt;
use teloxide::prelude::*;
use teloxide::types::ChatId;
use teloxide::utils::command::BotCommands;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::error::{RelayError, Result};
use crate::message_log::MessageLog;
use crate::routes::ReplyRoutes;

/// Environment variable for the bot token.
pub const TELEGRAM_BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

/// Environment variable for the relay chat.
pub const TELEGRAM_CHAT_ID_ENV: &str = "TELEGRAM_CHAT_ID";

/// Display name of acknowledgements stored for the web user.
pub const BOT_NAME: &str = "Telegram Bot";

/// Acknowledgement text stored after a successful relay.
pub const RELAY_ACK: &str = "Message sent successfully!";

/// Text posted to Telegram for a web message.
pub fn relay_text(name: &str, msg: &str) -> String {
    format!("{}: {}", name.trim(), msg.trim())
}

/// Bot commands that can be invoked with /.
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Start the bot and get help")]
    Start,

    #[command(description = "Show help message")]
    Help,

    #[command(description = "Show the id of this chat")]
    Id,
}

/// Forwards web messages to one Telegram chat and records replies.
pub struct TelegramRelay {
    bot: Bot,
    chat_id: ChatId,
    log: Arc<MessageLog>,
    routes: Mutex<ReplyRoutes>,
}

impl TelegramRelay {
    pub fn new(bot: Bot, chat_id: ChatId, log: Arc<MessageLog>) -> Self {
        Self {
            bot,
            chat_id,
            log,
            routes: Mutex::new(ReplyRoutes::new()),
        }
    }

    /// Create a relay from `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHAT_ID`.
    pub fn from_env(log: Arc<MessageLog>) -> Result<Self> {
        let token = env_var(TELEGRAM_BOT_TOKEN_ENV).ok_or(RelayError::NoToken)?;
        let chat = env_var(TELEGRAM_CHAT_ID_ENV).ok_or(RelayError::NoChat)?;
        let chat_id = parse_chat_id(&chat).map_err(|_| RelayError::InvalidChatId(chat))?;
        Ok(Self::new(Bot::new(token), chat_id, log))
    }

    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    pub fn log(&self) -> &Arc<MessageLog> {
        &self.log
    }

    /// Post `msg` from `name` to the chat on behalf of `user_id`.
    ///
    /// Both the outgoing message and the acknowledgement are logged for the
    /// user. Returns the acknowledgement.
    pub async fn send(&self, name: &str, msg: &str, user_id: &str) -> Result<TelegramMessage> {
        let sent = self
            .bot
            .send_message(self.chat_id, relay_text(name, msg))
            .await?;

        info!(
            chat_id = %self.chat_id,
            message_id = sent.id.0,
            user_id,
            "relayed message to Telegram"
        );

        self.routes.lock().await.remember(sent.id.0, user_id);
        self.log
            .append(TelegramMessage::new(Sender::User, name, msg, user_id))
            .await?;
        self.log
            .append(TelegramMessage::new(Sender::Bot, BOT_NAME, RELAY_ACK, user_id))
            .await
    }

    /// Record text received in the chat, attributing it to a web user.
    pub async fn record_inbound(
        &self,
        reply_to: Option<i32>,
        author: &str,
        text: &str,
    ) -> Result<TelegramMessage> {
        let user_id = self.routes.lock().await.resolve(reply_to);
        debug!(user_id = %user_id, author, "recording inbound Telegram message");
        self.log
            .append(TelegramMessage::new(Sender::Bot, author, text, user_id))
            .await
    }

    /// Receive updates until `shutdown` flips to true.
    pub async fn listen(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        info!(chat_id = %self.chat_id, "starting Telegram listener");

        let relay_for_commands = Arc::clone(&self);
        let relay_for_messages = Arc::clone(&self);

        let handler = dptree::entry()
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
                        let relay = Arc::clone(&relay_for_commands);
                        async move { handle_command(bot, msg, cmd, relay).await }
                    }),
            )
            .branch(
                Update::filter_message()
                    .filter(|msg: Message| msg.text().is_some_and(|t| !t.starts_with('/')))
                    .endpoint(move |msg: Message| {
                        let relay = Arc::clone(&relay_for_messages);
                        async move { handle_message(msg, relay).await }
                    }),
            );

        let mut dispatcher = Dispatcher::builder(self.bot.clone(), handler)
            .default_handler(|upd| async move {
                debug!("Unhandled update: {:?}", upd.kind);
            })
            .build();

        let token = dispatcher.shutdown_token();
        tokio::spawn(async move {
            while !*shutdown.borrow() {
                if shutdown.changed().await.is_err() {
                    break;
                }
            }
            match token.shutdown() {
                Ok(stopped) => stopped.await,
                Err(e) => debug!(error = %e, "Telegram listener was not running"),
            }
        });

        dispatcher.dispatch().await;
        info!("Telegram listener stopped");
    }
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    relay: Arc<TelegramRelay>,
) -> ResponseResult<()> {
    debug!(chat_id = %msg.chat.id, "Command matched: {:?}", cmd);

    let text = match cmd {
        Command::Start => format!(
            "Hi! I relay messages from the Nexus assistant into this chat.\n\n\
            Reply to a relayed message and the answer is shown to its sender.\n\
            Relay chat: {}\n\n{}",
            relay.chat_id,
            Command::descriptions()
        ),
        Command::Help => Command::descriptions().to_string(),
        Command::Id => format!("This chat's id is {}", msg.chat.id),
    };

    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

async fn handle_message(msg: Message, relay: Arc<TelegramRelay>) -> ResponseResult<()> {
    if msg.chat.id != relay.chat_id {
        debug!(chat_id = %msg.chat.id, "ignoring message from another chat");
        return Ok(());
    }

    let Some(text) = msg.text() else {
        return Ok(());
    };

    let author = msg
        .from
        .as_ref()
        .map(|u| u.full_name())
        .unwrap_or_else(|| "Telegram".to_string());
    let reply_to = msg.reply_to_message().map(|m| m.id.0);

    if let Err(e) = relay.record_inbound(reply_to, &author, text).await {
        warn!(error = %e, "failed to record inbound Telegram message");
    }
    Ok(())
}
