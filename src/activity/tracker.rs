//! Per-chat activity window bookkeeping.

use super::identity::UserKey;
use super::resolver::compute_unsafe;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::debug;

/// Caption fragments that mark a video as a completed activity.
///
/// Matched case-insensitively as substrings, so "advertisement" counts too.
pub const COMPLETION_MARKERS: &[&str] = &["ad", "done", "all done"];

/// Snapshot returned by [`ActivityTracker::report`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityReport {
    /// Distinct users who shared at least one link.
    pub users: usize,
    /// Display figure shown as "Total Links". Always `users * 2`,
    /// not the sum of per-user counts.
    pub links: usize,
}

/// Link and video tallies for one chat.
///
/// Tallying is gated by a single on/off flag: `start_count` and
/// `start_activity` switch it on, `clear` switches it off.
#[derive(Debug, Default, Clone)]
pub struct ActivityTracker {
    link_counts: BTreeMap<UserKey, u32>,
    video_posters: HashSet<UserKey>,
    unsafe_users: BTreeSet<UserKey>,
    active: bool,
}

impl ActivityTracker {
    /// Creates an idle tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wipes link counts and turns tallying on.
    pub fn start_counting(&mut self) {
        self.link_counts.clear();
        self.active = true;
    }

    /// Turns tallying on without touching existing counts.
    pub fn start_activity(&mut self) {
        self.active = true;
    }

    /// Counts a text message if it contains `http`.
    pub fn record_text_message(&mut self, user: &UserKey, text: &str) {
        if !self.active || !text.contains("http") {
            return;
        }
        let count = self.link_counts.entry(user.clone()).or_insert(0);
        *count += 1;
        debug!("Link from {user} counted ({count} total)");
    }

    /// Marks `user` as having posted a qualifying video.
    pub fn record_video(&mut self, user: &UserKey, caption: &str) {
        if !self.active {
            return;
        }
        let caption = caption.to_lowercase();
        if COMPLETION_MARKERS.iter().any(|m| caption.contains(m)) {
            debug!("Completion video from {user} accepted");
            self.video_posters.insert(user.clone());
        }
    }

    /// Resets every tally and turns tallying off.
    pub fn clear(&mut self) {
        self.link_counts.clear();
        self.video_posters.clear();
        self.unsafe_users.clear();
        self.active = false;
    }

    /// Current user count and the derived "total links" figure.
    #[must_use]
    pub fn report(&self) -> ActivityReport {
        let users = self.link_counts.len();
        ActivityReport {
            users,
            links: users * 2,
        }
    }

    /// Recomputes the unsafe set against `admin_handles` and keeps it
    /// until the next verify or clear.
    pub fn verify<S: AsRef<str>>(&mut self, admin_handles: &[S]) -> &BTreeSet<UserKey> {
        self.unsafe_users = compute_unsafe(&self.link_counts, &self.video_posters, admin_handles);
        &self.unsafe_users
    }

    /// Whether messages are currently being tallied.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Links counted per user in the current window.
    #[must_use]
    pub const fn link_counts(&self) -> &BTreeMap<UserKey, u32> {
        &self.link_counts
    }

    /// Users who posted a qualifying video.
    #[must_use]
    pub const fn video_posters(&self) -> &HashSet<UserKey> {
        &self.video_posters
    }

    /// Result of the last verify.
    #[must_use]
    pub const fn unsafe_users(&self) -> &BTreeSet<UserKey> {
        &self.unsafe_users
    }
}
