use chrono::{Duration, TimeZone, Utc};
use nightowl_core::report::{format_duration, stringify_interactions};
use nightowl_core::{InteractionOutcome, RunReport, SessionState, Source};

fn t0() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
}

fn session_with(start: chrono::DateTime<Utc>, rows: &[(&str, bool, u32)]) -> SessionState {
    let mut s = SessionState::new(start);
    for (source, ok, likes) in rows {
        let src: Source = source.parse().unwrap();
        let o = if *ok {
            InteractionOutcome::success().with_likes(*likes)
        } else {
            InteractionOutcome::failed("private")
        };
        s.record_interaction(&src, &o, start).unwrap();
    }
    s
}

#[test]
fn totals_are_keywise_sums() {
    let mut s1 = session_with(t0(), &[("@alice", true, 2), ("@alice", false, 0), ("#cats", true, 1)]);
    s1.finish(t0() + Duration::minutes(10)).unwrap();
    let mut s2 = session_with(
        t0() + Duration::hours(1),
        &[("@bob", true, 2), ("@alice", true, 2)],
    );
    s2.record_unfollow().unwrap();
    let sessions = vec![s1.clone(), s2.clone()];

    let report = RunReport::build(&sessions, t0() + Duration::hours(1) + Duration::minutes(5));

    for key in ["@alice", "@bob", "#cats"] {
        let expected: u64 = sessions
            .iter()
            .map(|s| s.total_interactions().get(key).copied().unwrap_or(0))
            .sum();
        assert_eq!(report.totals.total_interactions.get(key).copied(), Some(expected));
    }
    assert_eq!(report.totals.successful_interactions.get("@alice"), Some(&2));
    assert_eq!(report.totals.likes, 7);
    assert_eq!(report.totals.unfollowed, 1);
    assert_eq!(report.totals.sessions, 2);
    assert_eq!(report.totals.completed_sessions, 1);
    // 10 minutes finished + 5 minutes still running.
    assert_eq!(report.totals.duration_secs, 15 * 60);
    assert!(!report.sessions[1].finished);
    assert_eq!(report.sessions[1].index, 2);
}

#[test]
fn report_is_side_effect_free() {
    let sessions = vec![session_with(t0(), &[("@alice", true, 1)])];
    let before = sessions.clone();
    let a = RunReport::build(&sessions, t0() + Duration::minutes(1));
    let b = RunReport::build(&sessions, t0() + Duration::minutes(1));
    assert_eq!(a, b);
    assert_eq!(sessions, before);
}

#[test]
fn single_session_text_has_only_totals() {
    let sessions = vec![session_with(t0(), &[("@alice", true, 2)])];
    let text = RunReport::build(&sessions, t0() + Duration::seconds(75)).render_text();
    assert!(!text.contains("SESSION #"));
    assert!(text.contains("TOTAL"));
    assert!(text.contains("Completed sessions: 0"));
    assert!(text.contains("Total duration: 0:01:15"));
    assert!(text.contains("Total interactions: @alice: 1"));
    assert!(text.contains("Total likes: 2"));
}

#[test]
fn multi_session_text_lists_each_session() {
    let mut s1 = session_with(t0(), &[]);
    s1.finish(t0() + Duration::minutes(1)).unwrap();
    let s2 = session_with(t0() + Duration::minutes(2), &[("#cats", true, 1)]);
    let text = RunReport::build(&[s1, s2], t0() + Duration::minutes(3)).render_text();
    assert!(text.contains("SESSION #1"));
    assert!(text.contains("SESSION #2"));
    assert!(text.contains("(running)"));
    assert!(text.contains("Total interactions: none"));
}

#[test]
fn session_blocks_include_comments_messages_and_stories() {
    let mut s1 = SessionState::new(t0());
    let outcome = InteractionOutcome {
        commented: true,
        messaged: true,
        stories_watched: 2,
        ..InteractionOutcome::success()
    };
    s1.record_interaction(&Source::followers("alice"), &outcome, t0()).unwrap();
    s1.finish(t0() + Duration::minutes(1)).unwrap();
    let s2 = session_with(t0() + Duration::minutes(2), &[("@bob", true, 1)]);
    let text = RunReport::build(&[s1, s2], t0() + Duration::minutes(3)).render_text();

    let (first, rest) = text.split_once("SESSION #2").unwrap();
    assert!(first.contains("Total comments: 1"));
    assert!(first.contains("Total private messages: 1"));
    assert!(first.contains("Total story watches: 2"));
    let (second, totals) = rest.split_once("TOTAL").unwrap();
    assert!(!second.contains("Total comments"));
    assert!(totals.contains("Total story watches: 2"));
}

#[test]
fn empty_run_reports_zero() {
    let report = RunReport::build(&[], t0());
    assert_eq!(report.totals.sessions, 0);
    assert_eq!(report.totals.duration_secs, 0);
    assert!(report.render_text().contains("Total likes: 0"));
}

#[test]
fn formatting_helpers() {
    assert_eq!(format_duration(3 * 3600 + 5 * 60 + 9), "3:05:09");
    assert_eq!(format_duration(-4), "0:00:00");
    let mut m = std::collections::BTreeMap::new();
    m.insert("@b".to_string(), 2);
    m.insert("#a".to_string(), 1);
    assert_eq!(stringify_interactions(&m), "#a: 1, @b: 2");
}
