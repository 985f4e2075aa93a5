/// Admin command definitions and argument parsing
pub mod commands;
/// Command dispatch and message tracking
pub mod handlers;
/// The mute pipeline
pub mod moderation;
/// Chat platform abstraction and its Telegram implementation
pub mod platform;
/// Telegram runtime entrypoint
pub mod runner;

pub use platform::{ChatPlatform, TelegramPlatform};
