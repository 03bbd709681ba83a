use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct Update {
    #[serde(default)]
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub text: Option<String>,
    pub from: Option<User>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// A player row as stored in `users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DbUser {
    pub id: i64,
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub coins: i64,
    pub level: i64,
    pub xp: i64,
    pub xp_to_next_level: i64,
    pub achievements_count: i64,
    #[serde(skip)]
    pub last_login: Option<String>,
}

impl DbUser {
    /// Name used when greeting the player in chat.
    pub fn greeting_name(&self) -> &str {
        non_empty(&self.first_name)
            .or_else(|| non_empty(&self.username))
            .unwrap_or("игрок")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderRow {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub coins: i64,
    pub level: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub name: String,
    pub coins: i64,
    pub level: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    pub game_name: Option<String>,
    pub coins_earned: i64,
    pub xp_earned: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOutcome {
    pub coins: i64,
    pub level: i64,
    pub xp: i64,
    pub xp_to_next_level: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Purchased { coins: i64 },
    InsufficientFunds { coins: i64 },
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InlineKeyboardButton {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_app: Option<WebAppInfo>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WebAppInfo {
    pub url: String,
}

/// A reply queued for delivery to a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub chat_id: i64,
    pub text: String,
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Serialize)]
pub struct SendMessageRequest<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    pub parse_mode: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<&'a InlineKeyboardMarkup>,
}

#[derive(Deserialize)]
pub struct TelegramResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    #[allow(dead_code)]
    pub error_code: Option<i32>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SentMessage {
    pub message_id: i64,
}

pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
