use crate::models::{DbUser, OutboundMessage};

pub fn stats(chat_id: i64, user: &DbUser) -> OutboundMessage {
    let text = format!(
        "📊 <b>Твоя статистика</b>

💰 Монет: {}
📈 Уровень: {}
⚡ Опыт: {}/{}
🏆 Достижений: {}",
        user.coins, user.level, user.xp, user.xp_to_next_level, user.achievements_count
    );

    OutboundMessage {
        chat_id,
        text,
        reply_markup: None,
    }
}
