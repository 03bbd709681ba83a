use super::{help_handler, start_handler, stats_handler};
use crate::models::{OutboundMessage, Update};
use crate::AppState;
use anyhow::Result;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Stats,
    Help,
    Other,
}

impl Command {
    /// Commands match the whole message text exactly.
    pub fn parse(text: Option<&str>) -> Self {
        match text {
            Some("/start") => Command::Start,
            Some("/stats") => Command::Stats,
            Some("/help") => Command::Help,
            _ => Command::Other,
        }
    }
}

/// Provisions the sender and answers their command.
///
/// Storage failures are returned; reply delivery failures are only logged.
pub async fn process_update(state: &AppState, update: Update) -> Result<()> {
    let Some(message) = update.message else {
        debug!(update_id = update.update_id, "Update without message ignored");
        return Ok(());
    };
    let Some(from) = &message.from else {
        debug!(update_id = update.update_id, "Message without sender ignored");
        return Ok(());
    };

    if from.is_bot {
        return Ok(());
    }

    let chat_id = message.chat.id;
    let user = state.store.login_user(from).await?;
    let command = Command::parse(message.text.as_deref());
    info!(
        telegram_id = user.telegram_id,
        chat_id = chat_id,
        command = ?command,
        "Handling bot message"
    );

    let reply = match command {
        Command::Start => start_handler::welcome(chat_id, &user, &state.webapp_url),
        Command::Stats => stats_handler::stats(chat_id, &user),
        Command::Help => help_handler::help(chat_id),
        Command::Other => help_handler::fallback(chat_id),
    };

    deliver_reply(state, &reply).await;
    Ok(())
}

async fn deliver_reply(state: &AppState, reply: &OutboundMessage) {
    let Some(messenger) = &state.messenger else {
        debug!(chat_id = reply.chat_id, "Bot token not configured, reply dropped");
        return;
    };

    if let Err(err) = messenger.deliver(reply).await {
        warn!(chat_id = reply.chat_id, "Failed to deliver reply: {err:?}");
    }
}
