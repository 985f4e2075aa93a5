//! Activity window core: tallies, unsafe-user computation, identity lookup
//! and duration parsing. Free of any transport concerns.

/// Duration string parsing for the mute command.
pub mod duration;
/// User keys and the handle directory.
pub mod identity;
/// Per-chat state registry.
pub mod registry;
/// Unsafe-user computation and formatting.
pub mod resolver;
/// Link/video tallies for one chat.
pub mod tracker;

pub use duration::parse_duration;
pub use identity::{IdentityDirectory, UserKey};
pub use registry::{ChatRegistry, ChatState};
pub use resolver::{compute_unsafe, format_unsafe_list};
pub use tracker::{ActivityReport, ActivityTracker};
