use crate::models::{DbUser, InlineKeyboardButton, InlineKeyboardMarkup, OutboundMessage, WebAppInfo};
use crate::utils::escape_html;

pub const OPEN_GAME_BUTTON: &str = "🎮 Открыть Game Bot";

/// Greeting with the player's summary and a button that opens the mini-app.
pub fn welcome(chat_id: i64, user: &DbUser, webapp_url: &str) -> OutboundMessage {
    let text = format!(
        "👋 Привет, <b>{}</b>!

Добро пожаловать в Game Bot! 🎮

💰 Твой баланс: {} монет
📊 Уровень: {}
🏆 Достижений: {}

Нажми кнопку ниже, чтобы начать играть!",
        escape_html(user.greeting_name()),
        user.coins,
        user.level,
        user.achievements_count
    );

    let keyboard = InlineKeyboardMarkup {
        inline_keyboard: vec![vec![InlineKeyboardButton {
            text: OPEN_GAME_BUTTON.to_string(),
            web_app: Some(WebAppInfo {
                url: webapp_url.to_string(),
            }),
        }]],
    };

    OutboundMessage {
        chat_id,
        text,
        reply_markup: Some(keyboard),
    }
}
