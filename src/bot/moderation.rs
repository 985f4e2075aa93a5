//! The `/mute` pipeline: resolve the handle, refuse admins, restrict.
//!
//! Every failure is terminal for the invocation and is reported to the
//! issuer; nothing here is retried.

use super::commands::MuteArgs;
use super::platform::{mute_permissions, ChatPlatform, PlatformError};
use crate::activity::{ChatRegistry, UserKey};
use chrono::{DateTime, TimeDelta, Utc};
use teloxide::types::{ChatId, UserId};
use thiserror::Error;
use tracing::{info, warn};

/// Why a mute did not happen. `Display` is the reply shown in the chat.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MuteError {
    /// Handle never seen in this chat
    #[error("Unable to locate @{0} in our records. Ensure the user has interacted with the bot recently.")]
    UnknownUser(UserKey),
    /// Target is an owner or administrator
    #[error("Cannot mute @{0} (Admin).")]
    Protected(UserKey),
    /// Membership lookup failed
    #[error("Error retrieving user info: {0}")]
    Lookup(PlatformError),
    /// Telegram refused the restriction
    #[error("Failed to mute @{target}: {source}")]
    Restrict {
        /// Target handle
        target: UserKey,
        /// Underlying error
        source: PlatformError,
    },
}

/// Absolute expiry `secs` after `now`, saturating at the largest
/// representable timestamp.
#[must_use]
pub fn expiry_after(now: DateTime<Utc>, secs: u64) -> DateTime<Utc> {
    i64::try_from(secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Mutes `args.target` in `chat_id`.
///
/// Returns the success reply, or the reason the mute was not applied.
/// No chat state is mutated either way.
///
/// # Errors
///
/// See [`MuteError`].
pub async fn mute_user<P>(
    platform: &P,
    registry: &ChatRegistry,
    chat_id: ChatId,
    args: &MuteArgs,
    default_label: &str,
    default_secs: u64,
) -> Result<String, MuteError>
where
    P: ChatPlatform + ?Sized,
{
    let target = &args.target;
    let (label, secs) = args.resolve_duration(default_label, default_secs);

    let resolved = match registry.get(chat_id.0).await {
        Some(state) => state.lock().await.directory.resolve(target.as_str()),
        None => None,
    };
    let Some(user_id) = resolved.map(UserId) else {
        info!("Mute target @{target} is unknown in chat {chat_id}");
        return Err(MuteError::UnknownUser(target.clone()));
    };

    let role = platform
        .member_role(chat_id, user_id)
        .await
        .map_err(MuteError::Lookup)?;
    if role.is_privileged() {
        info!("Refusing to mute admin @{target} in chat {chat_id}");
        return Err(MuteError::Protected(target.clone()));
    }

    let until = expiry_after(Utc::now(), secs);
    platform
        .restrict(chat_id, user_id, mute_permissions(), until)
        .await
        .map_err(|source| {
            warn!("Restricting @{target} in chat {chat_id} failed: {source}");
            MuteError::Restrict {
                target: target.clone(),
                source,
            }
        })?;

    info!("Muted @{target} ({user_id}) in chat {chat_id} until {until}");
    Ok(format!("Muted @{target} for {label}."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::platform::{MemberRole, MockChatPlatform};
    use mockall::predicate::eq;

    const CHAT: ChatId = ChatId(-100);

    async fn registry_with(handle: &str, id: u64) -> ChatRegistry {
        let registry = ChatRegistry::new();
        let state = registry.get_or_create(CHAT.0).await;
        state
            .lock()
            .await
            .directory
            .observe(UserKey::from_handle(handle), id);
        registry
    }

    fn args(input: &str) -> MuteArgs {
        MuteArgs::parse(input).expect("valid mute args")
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        assert_eq!(expiry_after(now, 600) - now, TimeDelta::seconds(600));
        assert_eq!(expiry_after(now, u64::MAX), DateTime::<Utc>::MAX_UTC);
    }

    #[tokio::test]
    async fn test_unknown_user_touches_nothing() {
        let registry = ChatRegistry::new();
        let platform = MockChatPlatform::new();

        let result = mute_user(&platform, &registry, CHAT, &args("@ghost"), "48h", 172_800).await;
        assert_eq!(
            result,
            Err(MuteError::UnknownUser(UserKey::from_handle("ghost")))
        );
        assert_eq!(
            result.map_err(|e| e.to_string()),
            Err("Unable to locate @ghost in our records. Ensure the user has interacted with the bot recently.".to_string())
        );
    }

    #[tokio::test]
    async fn test_admin_is_protected() {
        let registry = registry_with("boss", 7).await;
        let mut platform = MockChatPlatform::new();
        platform
            .expect_member_role()
            .with(eq(CHAT), eq(UserId(7)))
            .returning(|_, _| Ok(MemberRole::Administrator));
        platform.expect_restrict().never();

        let result = mute_user(&platform, &registry, CHAT, &args("@Boss"), "48h", 172_800).await;
        assert_eq!(result.map_err(|e| e.to_string()), Err("Cannot mute @boss (Admin).".to_string()));
    }

    #[tokio::test]
    async fn test_lookup_failure_is_reported_verbatim() {
        let registry = registry_with("bob", 7).await;
        let mut platform = MockChatPlatform::new();
        platform
            .expect_member_role()
            .returning(|_, _| Err(PlatformError::Api("Bad Request: user not found".into())));

        let result = mute_user(&platform, &registry, CHAT, &args("@bob"), "48h", 172_800).await;
        assert_eq!(
            result.map_err(|e| e.to_string()),
            Err("Error retrieving user info: Bad Request: user not found".to_string())
        );
    }

    #[tokio::test]
    async fn test_mute_with_explicit_duration() {
        let registry = registry_with("bob", 7).await;
        let mut platform = MockChatPlatform::new();
        platform
            .expect_member_role()
            .returning(|_, _| Ok(MemberRole::Member));
        let before = Utc::now();
        platform
            .expect_restrict()
            .withf(move |chat, user, perms, until| {
                *chat == CHAT
                    && *user == UserId(7)
                    && perms.is_empty()
                    && *until >= before + TimeDelta::seconds(600)
                    && *until <= Utc::now() + TimeDelta::seconds(600)
            })
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        let result = mute_user(&platform, &registry, CHAT, &args("@bob 10m"), "48h", 172_800).await;
        assert_eq!(result, Ok("Muted @bob for 10m.".to_string()));
    }

    #[tokio::test]
    async fn test_mute_uses_default_duration() {
        let registry = registry_with("bob", 7).await;
        let mut platform = MockChatPlatform::new();
        platform
            .expect_member_role()
            .returning(|_, _| Ok(MemberRole::Member));
        platform
            .expect_restrict()
            .withf(|_, _, _, until| *until > Utc::now() + TimeDelta::hours(47))
            .returning(|_, _, _, _| Ok(()));

        let result = mute_user(&platform, &registry, CHAT, &args("@bob"), "48h", 172_800).await;
        assert_eq!(result, Ok("Muted @bob for 48h.".to_string()));
    }

    #[tokio::test]
    async fn test_oversized_duration_mutes_indefinitely() {
        let registry = registry_with("bob", 7).await;
        let mut platform = MockChatPlatform::new();
        platform
            .expect_member_role()
            .returning(|_, _| Ok(MemberRole::Member));
        platform
            .expect_restrict()
            .withf(|_, _, _, until| *until == DateTime::<Utc>::MAX_UTC)
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        let result = mute_user(
            &platform,
            &registry,
            CHAT,
            &args("@bob 99999999999999999999d"),
            "48h",
            172_800,
        )
        .await;
        assert_eq!(
            result,
            Ok("Muted @bob for 99999999999999999999d.".to_string())
        );
    }

    #[tokio::test]
    async fn test_restrict_failure() {
        let registry = registry_with("bob", 7).await;
        let mut platform = MockChatPlatform::new();
        platform
            .expect_member_role()
            .returning(|_, _| Ok(MemberRole::Member));
        platform
            .expect_restrict()
            .returning(|_, _, _, _| Err(PlatformError::Api("not enough rights".into())));

        let result = mute_user(&platform, &registry, CHAT, &args("@bob"), "48h", 172_800).await;
        assert_eq!(
            result.map_err(|e| e.to_string()),
            Err("Failed to mute @bob: not enough rights".to_string())
        );
    }
}
