mod telegram;

pub use telegram::TelegramApi;

use crate::models::OutboundMessage;
use anyhow::Result;
use async_trait::async_trait;

/// One-way delivery of bot replies.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn deliver(&self, message: &OutboundMessage) -> Result<()>;
}

#[async_trait]
impl Messenger for TelegramApi {
    async fn deliver(&self, message: &OutboundMessage) -> Result<()> {
        self.send_message(message.chat_id, &message.text, message.reply_markup.as_ref())
            .await?;
        Ok(())
    }
}
