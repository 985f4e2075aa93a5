//! Command dispatch and activity tracking for inbound messages.

use super::commands::Command;
use super::moderation::mute_user;
use super::platform::{is_administrator, list_administrators, ChatPlatform};
use crate::activity::{format_unsafe_list, ActivityReport, ChatRegistry, UserKey};
use crate::config::Settings;
use anyhow::Result;
use teloxide::types::{ChatId, Message, UserId};
use teloxide::utils::command::BotCommands;
use tracing::info;

/// Who sent a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    /// Platform user id
    pub id: UserId,
    /// Public handle, if the user has one
    pub handle: Option<String>,
}

impl Sender {
    /// Sender of `msg`, if the message has one (channel posts don't)
    #[must_use]
    pub fn from_message(msg: &Message) -> Option<Self> {
        msg.from.as_ref().map(|user| Self {
            id: user.id,
            handle: user.username.clone(),
        })
    }

    /// Normalized key used by the tracker and directory
    #[must_use]
    pub fn key(&self) -> UserKey {
        UserKey::for_sender(self.handle.as_deref(), self.id.0)
    }
}

/// What a non-command message carried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity<'a> {
    /// Plain text
    Text(&'a str),
    /// Video with its caption (empty if none)
    Video(&'a str),
    /// Anything else; only the sender is recorded
    Other,
}

impl<'a> Activity<'a> {
    /// Classify a Telegram message
    #[must_use]
    pub fn from_message(msg: &'a Message) -> Self {
        if msg.video().is_some() {
            Self::Video(msg.caption().unwrap_or(""))
        } else if let Some(text) = msg.text() {
            Self::Text(text)
        } else {
            Self::Other
        }
    }
}

/// Reply for `/start_count` and `/show_count`
#[must_use]
pub fn format_report(report: ActivityReport) -> String {
    format!(
        "Total Users Sent Links: {}\nTotal Links: {}",
        report.users, report.links
    )
}

/// Records the sender in the chat's directory and tallies the message.
///
/// The directory is updated whether or not an activity window is open.
pub async fn record_activity(
    registry: &ChatRegistry,
    chat_id: ChatId,
    sender: &Sender,
    activity: Activity<'_>,
) {
    let key = sender.key();
    let state = registry.get_or_create(chat_id.0).await;
    let mut state = state.lock().await;

    state.directory.observe(key.clone(), sender.id.0);
    match activity {
        Activity::Text(text) => state.tracker.record_text_message(&key, text),
        Activity::Video(caption) => state.tracker.record_video(&key, caption),
        Activity::Other => {}
    }
}

/// Runs `cmd` for `sender`, replying through `platform`.
///
/// Non-admins get the denial message and nothing changes.
///
/// # Errors
///
/// Currently infallible; the `Result` keeps the dispatcher signature uniform.
pub async fn handle_command<P>(
    platform: &P,
    registry: &ChatRegistry,
    settings: &Settings,
    chat_id: ChatId,
    sender: &Sender,
    cmd: Command,
) -> Result<()>
where
    P: ChatPlatform + ?Sized,
{
    record_activity(registry, chat_id, sender, Activity::Other).await;

    if cmd.is_public() {
        platform
            .send_message(chat_id, Command::descriptions().to_string())
            .await;
        return Ok(());
    }

    if !is_administrator(platform, chat_id, sender.id).await {
        info!(
            "⛔️ User {} ({}) is not an admin of chat {chat_id}. Command {cmd:?} denied.",
            sender.id,
            sender.key()
        );
        platform
            .send_message(chat_id, settings.denial_message.clone())
            .await;
        return Ok(());
    }

    info!("Admin {} runs {cmd:?} in chat {chat_id}", sender.key());

    let reply = match cmd {
        Command::Help => Command::descriptions().to_string(),
        Command::StartCount => {
            let state = registry.get_or_create(chat_id.0).await;
            let mut state = state.lock().await;
            state.tracker.start_counting();
            format_report(state.tracker.report())
        }
        Command::ShowCount => {
            let state = registry.get_or_create(chat_id.0).await;
            let report = state.lock().await.tracker.report();
            format_report(report)
        }
        Command::StartActivity => {
            let state = registry.get_or_create(chat_id.0).await;
            state.lock().await.tracker.start_activity();
            "Start your activities and send your SR with a caption 'AD' or 'Done'.".to_string()
        }
        Command::Verify => {
            // Fetched before locking; used once and not stored.
            let admins = list_administrators(platform, chat_id).await;
            let state = registry.get_or_create(chat_id.0).await;
            let mut state = state.lock().await;
            let unsafe_users = state.tracker.verify(admins.as_slice());
            info!(
                "Verify in chat {chat_id}: {} unsafe user(s)",
                unsafe_users.len()
            );
            format_unsafe_list(unsafe_users)
        }
        Command::Clear => {
            let state = registry.get_or_create(chat_id.0).await;
            state.lock().await.tracker.clear();
            "Cleared all data. Ready for a new session.".to_string()
        }
        Command::Mute(args) => {
            let default_label = settings.default_mute_duration.as_str();
            let default_secs = settings.default_mute_seconds();
            match mute_user(platform, registry, chat_id, &args, default_label, default_secs).await
            {
                Ok(reply) => reply,
                Err(e) => e.to_string(),
            }
        }
    };

    platform.send_message(chat_id, reply).await;
    Ok(())
}
