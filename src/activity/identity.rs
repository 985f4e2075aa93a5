//! User keys and the handle -> numeric id directory.

use std::collections::HashMap;
use std::fmt;

/// Normalized (lower-cased) identity of a chat participant.
///
/// Built from the user's handle, or `user-<id>` when the user has none.
/// Every read and write goes through this type so lookups stay consistent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserKey(String);

impl UserKey {
    /// Normalizes a handle. A leading `@` is stripped.
    #[must_use]
    pub fn from_handle(handle: &str) -> Self {
        let handle = handle.strip_prefix('@').unwrap_or(handle);
        Self(handle.to_lowercase())
    }

    /// Key for a sender: the handle if present, otherwise `User-<id>`.
    #[must_use]
    pub fn for_sender(handle: Option<&str>, user_id: u64) -> Self {
        match handle {
            Some(handle) if !handle.is_empty() => Self::from_handle(handle),
            _ => Self::from_handle(&format!("User-{user_id}")),
        }
    }

    /// Normalized string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps handles to platform user ids, fed by every observed message.
///
/// The directory only grows: it is not touched by `clear` or `start_count`.
/// Users who never spoke are not resolvable, and a handle that changes hands
/// resolves to whoever used it last.
#[derive(Debug, Default, Clone)]
pub struct IdentityDirectory {
    ids: HashMap<UserKey, u64>,
}

impl IdentityDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records (or overwrites) the id behind `key`.
    pub fn observe(&mut self, key: UserKey, user_id: u64) {
        self.ids.insert(key, user_id);
    }

    /// Resolves a handle (with or without `@`, any case).
    #[must_use]
    pub fn resolve(&self, handle: &str) -> Option<u64> {
        self.ids.get(&UserKey::from_handle(handle)).copied()
    }

    /// Number of known users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if nobody has been observed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
