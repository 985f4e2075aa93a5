use activity_warden::activity::{
    compute_unsafe, format_unsafe_list, parse_duration, ActivityReport, ActivityTracker,
    ChatRegistry, UserKey,
};
use activity_warden::bot::commands::{Command, MuteArgs};
use std::collections::{BTreeMap, HashSet};
use teloxide::utils::command::BotCommands;

fn key(handle: &str) -> UserKey {
    UserKey::from_handle(handle)
}

#[test]
fn test_duration_table() {
    let cases = [
        ("10m", Some(600)),
        ("2h", Some(7200)),
        ("1d", Some(86400)),
        ("5s", Some(5)),
        ("abc", None),
        ("10x", None),
    ];
    for (input, expected) in cases {
        assert_eq!(parse_duration(input), expected, "input {input:?}");
    }
}

#[test]
fn test_counting_window() {
    let mut tracker = ActivityTracker::new();
    tracker.start_counting();
    tracker.record_text_message(&key("alice"), "check http://x");
    tracker.record_text_message(&key("alice"), "http://y");

    assert_eq!(tracker.link_counts().get(&key("alice")), Some(&2));
    assert_eq!(tracker.report(), ActivityReport { users: 1, links: 2 });
}

#[test]
fn test_video_before_start_is_ignored() {
    let mut tracker = ActivityTracker::new();
    tracker.record_video(&key("bob"), "Done!");
    assert!(tracker.video_posters().is_empty());
}

#[test]
fn test_unsafe_examples() {
    let links: BTreeMap<UserKey, u32> = [(key("alice"), 1), (key("bob"), 1)].into_iter().collect();
    let videos: HashSet<UserKey> = [key("bob")].into_iter().collect();
    let result = compute_unsafe(&links, &videos, &[] as &[String]);
    assert_eq!(result.into_iter().collect::<Vec<_>>(), vec![key("alice")]);

    let links: BTreeMap<UserKey, u32> = [(key("alice"), 1)].into_iter().collect();
    let result = compute_unsafe(&links, &HashSet::new(), &["alice"]);
    assert!(result.is_empty());
    assert_eq!(format_unsafe_list(&result), "Cheers! Everyone is SAFE.");
}

#[tokio::test]
async fn test_clear_keeps_directory() {
    let registry = ChatRegistry::new();
    let state = registry.get_or_create(-42).await;
    let mut state = state.lock().await;

    state.tracker.start_counting();
    state.directory.observe(key("alice"), 11);
    state.tracker.record_text_message(&key("alice"), "http://x");
    state.tracker.clear();

    assert_eq!(state.tracker.report(), ActivityReport { users: 0, links: 0 });
    assert_eq!(state.directory.resolve("@Alice"), Some(11));
}

#[test]
fn test_command_surface() {
    assert_eq!(Command::parse("/clear@warden_bot", "warden_bot").ok(), Some(Command::Clear));
    assert_eq!(
        Command::parse("/mute @Bob 2h", "warden_bot").ok(),
        Some(Command::Mute(MuteArgs {
            target: key("bob"),
            duration: Some("2h".to_string()),
        }))
    );
    assert!(Command::parse("/mute @bob soon", "warden_bot").is_err());
    assert_eq!(Command::parse_text("/show_count@some_other_bot"), Some(Command::ShowCount));
}
