use crate::models::OutboundMessage;

pub const HELP_TEXT: &str = r#"❓ <b>Доступные команды:</b>

/start - Открыть игру
/stats - Твоя статистика
/help - Помощь

🎮 <b>Что можно делать:</b>
• Играть в мини-игры
• Выполнять квесты
• Покупать предметы в магазине
• Соревноваться с другими игроками"#;

pub const FALLBACK_TEXT: &str = "Используй /start чтобы открыть игру! 🎮";

pub fn help(chat_id: i64) -> OutboundMessage {
    OutboundMessage {
        chat_id,
        text: HELP_TEXT.to_string(),
        reply_markup: None,
    }
}

pub fn fallback(chat_id: i64) -> OutboundMessage {
    OutboundMessage {
        chat_id,
        text: FALLBACK_TEXT.to_string(),
        reply_markup: None,
    }
}
