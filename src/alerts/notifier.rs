//! Telegram notifier for sending alert messages

use crate::logger::{self, LogTag};
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, ParseMode, Recipient};

/// Destination for formatted alert text
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), String>;
}

/// Telegram notifier for sending messages
pub struct TelegramNotifier {
    bot: Bot,
    recipient: Recipient,
}

impl TelegramNotifier {
    /// Create a new Telegram notifier
    ///
    /// # Arguments
    /// * `bot_token` - Telegram bot token from @BotFather
    /// * `chat_id` - Numeric chat ID, or `@channel` username
    pub fn new(bot_token: &str, chat_id: &str) -> Result<Self, String> {
        if bot_token.is_empty() {
            return Err("Bot token is empty".to_string());
        }

        Ok(Self {
            bot: Bot::new(bot_token),
            recipient: parse_recipient(chat_id)?,
        })
    }
}

/// Numeric ids become `ChatId`, `@name` becomes a channel username
pub fn parse_recipient(chat_id: &str) -> Result<Recipient, String> {
    let chat_id = chat_id.trim();
    if chat_id.is_empty() {
        return Err("Chat ID is empty".to_string());
    }

    if chat_id.starts_with('@') {
        return Ok(Recipient::ChannelUsername(chat_id.to_string()));
    }

    let parsed: i64 = chat_id
        .parse()
        .map_err(|e| format!("Invalid chat ID '{}': {}", chat_id, e))?;
    Ok(Recipient::Id(ChatId(parsed)))
}

#[async_trait]
impl AlertSink for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), String> {
        self.bot
            .send_message(self.recipient.clone(), text)
            .parse_mode(ParseMode::Html)
            .await
            .map_err(|e| format!("Failed to send Telegram message: {}", e))?;

        logger::debug(
            LogTag::Telegram,
            &format!("Sent Telegram alert (length={})", text.len()),
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recipient() {
        assert_eq!(
            parse_recipient("-1001234").unwrap(),
            Recipient::Id(ChatId(-1001234))
        );
        assert_eq!(
            parse_recipient("@alerts").unwrap(),
            Recipient::ChannelUsername("@alerts".to_string())
        );
        assert!(parse_recipient("").is_err());
        assert!(parse_recipient("alerts").is_err());
    }
}
