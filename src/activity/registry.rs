//! Per-chat state registry
//!
//! Each chat gets its own tracker and identity directory, created on first use.
//! Transport-agnostic: keyed by the raw chat identifier.

use super::identity::IdentityDirectory;
use super::tracker::ActivityTracker;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

/// State bundle owned by one chat.
#[derive(Debug, Default)]
pub struct ChatState {
    /// Link/video tallies for the current activity window.
    pub tracker: ActivityTracker,
    /// Handle -> user id map; survives `clear`.
    pub directory: IdentityDirectory,
}

/// Registry of chat states
pub struct ChatRegistry {
    chats: RwLock<HashMap<i64, Arc<Mutex<ChatState>>>>,
}

impl Default for ChatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            chats: RwLock::new(HashMap::new()),
        }
    }

    /// Get the state for `chat_id`, creating an empty one if needed
    pub async fn get_or_create(&self, chat_id: i64) -> Arc<Mutex<ChatState>> {
        {
            let chats = self.chats.read().await;
            if let Some(state) = chats.get(&chat_id) {
                return state.clone();
            }
        }

        let mut chats = self.chats.write().await;
        chats
            .entry(chat_id)
            .or_insert_with(|| {
                info!("Tracking new chat {chat_id}");
                Arc::new(Mutex::new(ChatState::default()))
            })
            .clone()
    }

    /// Get state if the chat has been seen
    pub async fn get(&self, chat_id: i64) -> Option<Arc<Mutex<ChatState>>> {
        let chats = self.chats.read().await;
        chats.get(&chat_id).cloned()
    }

    /// Number of chats with state
    pub async fn len(&self) -> usize {
        self.chats.read().await.len()
    }

    /// Returns true if no chat has been seen
    pub async fn is_empty(&self) -> bool {
        self.chats.read().await.is_empty()
    }
}
