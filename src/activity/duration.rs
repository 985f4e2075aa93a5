//! Compact duration strings (`10m`, `2h`, `1d`) used by the mute command.

use lazy_regex::regex_captures;

/// Seconds in one minute.
pub const MINUTE: u64 = 60;
/// Seconds in one hour.
pub const HOUR: u64 = 60 * MINUTE;
/// Seconds in one day.
pub const DAY: u64 = 24 * HOUR;

/// Converts a `<digits><unit>` string into seconds.
///
/// The unit is one of `s`, `m`, `h`, `d` and must terminate the string.
/// There is no upper bound: values too large for `u64` seconds saturate at
/// `u64::MAX` rather than wrapping or failing.
///
/// # Examples
///
/// ```
/// use activity_warden::activity::parse_duration;
///
/// assert_eq!(parse_duration("10m"), Some(600));
/// assert_eq!(parse_duration("10x"), None);
/// ```
#[must_use]
pub fn parse_duration(text: &str) -> Option<u64> {
    let (_, digits, unit) = regex_captures!(r"(\d+)([smhd])$", text)?;
    // Only digits reach here, so a parse failure means overflow.
    let value = digits.parse::<u64>().unwrap_or(u64::MAX);
    let factor = match unit {
        "s" => 1,
        "m" => MINUTE,
        "h" => HOUR,
        "d" => DAY,
        _ => return None,
    };
    Some(value.saturating_mul(factor))
}
