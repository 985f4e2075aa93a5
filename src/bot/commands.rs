//! Admin command surface

use crate::activity::{parse_duration, UserKey};
use lazy_regex::regex_captures;
use teloxide::utils::command::{BotCommands, ParseError};

/// Supported commands for the bot
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "snake_case", description = "Supported commands:")]
pub enum Command {
    /// List commands
    #[command(description = "Show this help.")]
    Help,
    /// Reset link counts and start a counting window
    #[command(description = "Reset link counts and start counting.")]
    StartCount,
    /// Report users who sent links
    #[command(description = "Show link counts.")]
    ShowCount,
    /// Resume tallying without wiping counts
    #[command(description = "Start the activity.")]
    StartActivity,
    /// List users with links but no completion video
    #[command(description = "List unsafe users.")]
    Verify,
    /// Reset all tallies and stop counting
    #[command(description = "Clear all data.")]
    Clear,
    /// Mute a user by handle
    #[command(
        description = "Mute a user: /mute @username [10m|2h|1d].",
        parse_with = parse_mute_args
    )]
    Mute(MuteArgs),
}

impl Command {
    /// Commands anyone may run. Everything else needs admin rights.
    #[must_use]
    pub const fn is_public(&self) -> bool {
        matches!(self, Self::Help)
    }

    /// Parses a message text, ignoring any `@botname` suffix on the command.
    ///
    /// Groups often run several bots and members address commands to
    /// whichever one they picked from the menu, so the suffix is not checked.
    #[must_use]
    pub fn parse_text(text: &str) -> Option<Self> {
        let head_end = text.find(char::is_whitespace).unwrap_or(text.len());
        let (head, rest) = text.split_at(head_end);
        let name = head.split_once('@').map_or(head, |(name, _)| name);
        Self::parse(&format!("{name}{rest}"), "").ok()
    }
}

/// Arguments of `/mute`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MuteArgs {
    /// Target, normalized
    pub target: UserKey,
    /// Duration token as typed (`10m`), if any
    pub duration: Option<String>,
}

impl MuteArgs {
    /// Parses `@handle [<digits><s|m|h|d>]`.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let (_, handle, duration) =
            regex_captures!(r"^@(\S+)(?:\s+(\d+[smhd]))?$", input.trim())?;
        Some(Self {
            target: UserKey::from_handle(handle),
            duration: (!duration.is_empty()).then(|| duration.to_string()),
        })
    }

    /// Duration label and seconds. The default pair is used as a whole when
    /// no token was typed, so the label always matches the applied length.
    #[must_use]
    pub fn resolve_duration(&self, default_label: &str, default_secs: u64) -> (String, u64) {
        self.duration
            .as_deref()
            .and_then(|token| parse_duration(token).map(|secs| (token.to_string(), secs)))
            .unwrap_or_else(|| (default_label.to_string(), default_secs))
    }
}

fn parse_mute_args(input: String) -> Result<(MuteArgs,), ParseError> {
    MuteArgs::parse(&input).map(|args| (args,)).ok_or_else(|| {
        ParseError::IncorrectFormat("expected `@username [duration]`".into())
    })
}
