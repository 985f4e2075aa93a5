//! Chat platform collaborator
//!
//! Everything the command handlers need from Telegram sits behind
//! [`ChatPlatform`] so the handlers can run against a mock in tests.

use crate::utils::spawn_retrying;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use teloxide::prelude::*;
use teloxide::types::{ChatMember, ChatPermissions};
use thiserror::Error;
use tracing::error;

/// Errors returned by the chat platform
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// Telegram rejected the request; carries the API message verbatim
    #[error("{0}")]
    Api(String),
}

impl From<teloxide::RequestError> for PlatformError {
    fn from(e: teloxide::RequestError) -> Self {
        Self::Api(e.to_string())
    }
}

/// Membership status of a user in a chat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRole {
    /// Chat creator
    Owner,
    /// Administrator
    Administrator,
    /// Regular member
    Member,
    /// Member with restrictions applied
    Restricted,
    /// Not in the chat
    Left,
    /// Banned from the chat
    Banned,
}

impl MemberRole {
    /// Owners and administrators
    #[must_use]
    pub const fn is_privileged(self) -> bool {
        matches!(self, Self::Owner | Self::Administrator)
    }
}

impl From<&ChatMember> for MemberRole {
    fn from(member: &ChatMember) -> Self {
        if member.is_owner() {
            Self::Owner
        } else if member.is_administrator() {
            Self::Administrator
        } else if member.is_restricted() {
            Self::Restricted
        } else if member.is_left() {
            Self::Left
        } else if member.is_banned() {
            Self::Banned
        } else {
            Self::Member
        }
    }
}

/// Permissions applied by `/mute`: sending messages, media, polls, other
/// messages, link previews, changing chat info, inviting and pinning are
/// all revoked.
#[must_use]
pub fn mute_permissions() -> ChatPermissions {
    ChatPermissions::empty()
}

/// Interface to the chat platform
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Role of `user_id` in `chat_id`
    async fn member_role(&self, chat_id: ChatId, user_id: UserId)
        -> Result<MemberRole, PlatformError>;
    /// Handles of the chat administrators; admins without a handle are skipped
    async fn administrator_handles(&self, chat_id: ChatId) -> Result<Vec<String>, PlatformError>;
    /// Apply `permissions` to the user until `until`
    async fn restrict(
        &self,
        chat_id: ChatId,
        user_id: UserId,
        permissions: ChatPermissions,
        until: DateTime<Utc>,
    ) -> Result<(), PlatformError>;
    /// Fire-and-forget notification. Returns without waiting for delivery;
    /// failures are logged, not returned
    async fn send_message(&self, chat_id: ChatId, text: String);
}

/// Whether `user_id` may run admin commands. A lookup error is logged and
/// answered with `false`.
pub async fn is_administrator<P>(platform: &P, chat_id: ChatId, user_id: UserId) -> bool
where
    P: ChatPlatform + ?Sized,
{
    match platform.member_role(chat_id, user_id).await {
        Ok(role) => role.is_privileged(),
        Err(e) => {
            error!("Admin check for user {user_id} in chat {chat_id} failed: {e}");
            false
        }
    }
}

/// Administrator handles, or an empty list if the lookup fails.
pub async fn list_administrators<P>(platform: &P, chat_id: ChatId) -> Vec<String>
where
    P: ChatPlatform + ?Sized,
{
    match platform.administrator_handles(chat_id).await {
        Ok(handles) => handles,
        Err(e) => {
            error!("Failed to fetch administrators of chat {chat_id}: {e}");
            Vec::new()
        }
    }
}

/// [`ChatPlatform`] backed by the Telegram Bot API
#[derive(Clone)]
pub struct TelegramPlatform {
    bot: Bot,
}

impl TelegramPlatform {
    /// Wrap a teloxide bot
    #[must_use]
    pub const fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatPlatform for TelegramPlatform {
    async fn member_role(
        &self,
        chat_id: ChatId,
        user_id: UserId,
    ) -> Result<MemberRole, PlatformError> {
        let member = self.bot.get_chat_member(chat_id, user_id).await?;
        Ok(MemberRole::from(&member))
    }

    async fn administrator_handles(&self, chat_id: ChatId) -> Result<Vec<String>, PlatformError> {
        let admins = self.bot.get_chat_administrators(chat_id).await?;
        Ok(admins
            .into_iter()
            .filter_map(|member| member.user.username)
            .collect())
    }

    async fn restrict(
        &self,
        chat_id: ChatId,
        user_id: UserId,
        permissions: ChatPermissions,
        until: DateTime<Utc>,
    ) -> Result<(), PlatformError> {
        self.bot
            .restrict_chat_member(chat_id, user_id, permissions)
            .until_date(until)
            .await?;
        Ok(())
    }

    async fn send_message(&self, chat_id: ChatId, text: String) {
        let bot = self.bot.clone();
        spawn_retrying(format!("notification to chat {chat_id}"), move || {
            let bot = bot.clone();
            let text = text.clone();
            async move {
                bot.send_message(chat_id, text)
                    .await
                    .map(|_| ())
                    .map_err(|e| anyhow::anyhow!("Telegram send error: {e}"))
            }
        });
    }
}
