#![deny(missing_docs)]
//! Activity-window moderation bot for Telegram group chats.
//!
//! Counts link shares and completion videos during an admin-declared window,
//! lists users who shared links without a completion video, and mutes users
//! on request.

/// Activity tracking core.
pub mod activity;
/// Telegram transport.
pub mod bot;
/// Configuration management.
pub mod config;
/// Utility functions.
pub mod utils;
