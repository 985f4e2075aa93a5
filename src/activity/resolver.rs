//! Unsafe-user computation.

use super::identity::UserKey;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Users who shared links but posted no qualifying video and are not admins.
///
/// Admins are matched by normalized handle only, so an admin who renamed
/// themselves after the admin list was fetched can be misclassified.
#[must_use]
pub fn compute_unsafe<S: AsRef<str>>(
    link_counts: &BTreeMap<UserKey, u32>,
    video_posters: &HashSet<UserKey>,
    admin_handles: &[S],
) -> BTreeSet<UserKey> {
    let admins: HashSet<UserKey> = admin_handles
        .iter()
        .map(|h| UserKey::from_handle(h.as_ref()))
        .collect();

    link_counts
        .keys()
        .filter(|user| !video_posters.contains(*user) && !admins.contains(*user))
        .cloned()
        .collect()
}

/// Renders the verify reply: a 1-indexed `@handle` list or the all-clear.
#[must_use]
pub fn format_unsafe_list(unsafe_users: &BTreeSet<UserKey>) -> String {
    if unsafe_users.is_empty() {
        return "Cheers! Everyone is SAFE.".to_string();
    }
    let lines: Vec<String> = unsafe_users
        .iter()
        .enumerate()
        .map(|(i, user)| format!("{}. @{user}", i + 1))
        .collect();
    format!("Unsafe list:\n{}", lines.join("\n"))
}
