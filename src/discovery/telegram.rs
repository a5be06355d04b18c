//! Channel posts read through the Telegram Bot API
//!
//! The bot must be a member of the source channel to receive its posts.
//! `getUpdates` hands out each update once; the stored offset acknowledges
//! everything already read.

use crate::logger::{self, LogTag};
use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};
use teloxide::prelude::*;
use teloxide::types::UpdateKind;

/// Source of recent message texts, oldest first
#[async_trait]
pub trait MessageSource: Send + Sync {
    async fn recent_messages(&self, limit: usize) -> Result<Vec<String>, String>;
}

pub struct TelegramChannelSource {
    bot: Bot,
    channel_username: String,
    last_update_offset: AtomicI64,
}

impl TelegramChannelSource {
    pub fn new(bot_token: &str, channel_username: &str) -> Result<Self, String> {
        if bot_token.is_empty() {
            return Err("Bot token is empty".to_string());
        }

        let channel_username = normalize_username(channel_username);
        if channel_username.is_empty() {
            return Err("Channel username is empty".to_string());
        }

        Ok(Self {
            bot: Bot::new(bot_token),
            channel_username,
            last_update_offset: AtomicI64::new(0),
        })
    }

    fn is_source_channel(&self, username: Option<&str>) -> bool {
        username
            .map(|u| normalize_username(u) == self.channel_username)
            .unwrap_or(false)
    }
}

fn normalize_username(username: &str) -> String {
    username.trim().trim_start_matches('@').to_ascii_lowercase()
}

#[async_trait]
impl MessageSource for TelegramChannelSource {
    async fn recent_messages(&self, limit: usize) -> Result<Vec<String>, String> {
        let current_offset = self.last_update_offset.load(Ordering::SeqCst);
        let mut request = self
            .bot
            .get_updates()
            .timeout(0)
            .limit(limit.clamp(1, 100) as u8);
        if current_offset > 0 {
            request = request.offset(current_offset as i32);
        }

        let updates = request
            .await
            .map_err(|e| format!("Failed to fetch Telegram updates: {}", e))?;

        let mut texts = Vec::new();
        for update in updates {
            self.last_update_offset
                .store(update.id.0 as i64 + 1, Ordering::SeqCst);

            if let UpdateKind::ChannelPost(message) = update.kind {
                if !self.is_source_channel(message.chat.username()) {
                    continue;
                }
                if let Some(text) = message.text().or_else(|| message.caption()) {
                    texts.push(text.to_string());
                }
            }
        }

        logger::debug(
            LogTag::Telegram,
            &format!(
                "Read {} posts from @{} (next offset {})",
                texts.len(),
                self.channel_username,
                self.last_update_offset.load(Ordering::SeqCst)
            ),
        );

        if texts.len() > limit {
            texts.drain(..texts.len() - limit);
        }
        Ok(texts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_match_ignores_at_and_case() {
        let source = TelegramChannelSource::new("123:abc", "@PumpListings").unwrap();
        assert!(source.is_source_channel(Some("pumplistings")));
        assert!(source.is_source_channel(Some("@PumpListings")));
        assert!(!source.is_source_channel(Some("other")));
        assert!(!source.is_source_channel(None));
    }

    #[test]
    fn test_requires_channel() {
        assert!(TelegramChannelSource::new("123:abc", " ").is_err());
        assert!(TelegramChannelSource::new("", "chan").is_err());
    }
}
