use chrono::{Duration, TimeZone, Utc};
use nightowl_core::{Identity, InteractionOutcome, SessionError, SessionState, Source};

fn t0() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
}

#[test]
fn new_session_starts_empty_and_running() {
    let s = SessionState::new(t0());
    assert!(!s.is_finished());
    assert_eq!(s.total_likes(), 0);
    assert_eq!(s.interactions_sum(), 0);
    assert!(s.my_username().is_none());
}

#[test]
fn successful_interactions_never_exceed_attempts() {
    let mut s = SessionState::new(t0());
    let src = Source::followers("alice");
    let outcomes = [
        InteractionOutcome::success().with_likes(2),
        InteractionOutcome::failed("private"),
        InteractionOutcome::success().with_follow(),
        InteractionOutcome::failed("no posts"),
    ];
    for (i, o) in outcomes.iter().enumerate() {
        s.record_interaction(&src, o, t0() + Duration::seconds(i as i64)).unwrap();
        for (k, total) in s.total_interactions() {
            let ok = s.successful_interactions().get(k).copied().unwrap_or(0);
            assert!(ok <= *total);
        }
    }
    assert_eq!(s.interactions_for(&src), 4);
    assert_eq!(s.successful_for(&src), 2);
    assert_eq!(s.total_likes(), 2);
    assert_eq!(s.total_followed(), 1);
    assert_eq!(s.followed_for(&src), 1);
}

#[test]
fn counters_are_monotonic() {
    let mut s = SessionState::new(t0());
    let src = Source::hashtag("cats");
    let mut last = (0, 0, 0);
    for i in 0..10 {
        let o = if i % 3 == 0 {
            InteractionOutcome::failed("filtered")
        } else {
            InteractionOutcome::success().with_likes(1)
        };
        s.record_interaction(&src, &o, t0()).unwrap();
        if i % 4 == 0 {
            s.record_unfollow().unwrap();
        }
        let now = (s.total_likes(), s.interactions_sum(), s.total_unfollowed());
        assert!(now.0 >= last.0 && now.1 >= last.1 && now.2 >= last.2);
        last = now;
    }
}

#[test]
fn finished_session_rejects_mutation() {
    let mut s = SessionState::new(t0());
    s.finish(t0() + Duration::minutes(5)).unwrap();
    let before = s.clone();

    let err = s
        .record_interaction(&Source::followers("bob"), &InteractionOutcome::success(), t0())
        .unwrap_err();
    assert_eq!(err, SessionError::Finished(s.id()));
    assert!(s.record_unfollow().is_err());
    assert!(s.set_identity(Identity::new("me")).is_err());
    assert!(s.finish(t0() + Duration::minutes(6)).is_err());
    assert_eq!(s, before);
}

#[test]
fn finish_time_cannot_precede_start() {
    let mut s = SessionState::new(t0());
    let err = s.finish(t0() - Duration::seconds(1)).unwrap_err();
    assert!(matches!(err, SessionError::FinishBeforeStart { .. }));
    assert!(!s.is_finished());
}

#[test]
fn duration_uses_now_while_running() {
    let mut s = SessionState::new(t0());
    assert_eq!(s.duration(t0() + Duration::minutes(3)), Duration::minutes(3));
    s.finish(t0() + Duration::minutes(10)).unwrap();
    assert_eq!(s.duration(t0() + Duration::hours(2)), Duration::minutes(10));
}

#[test]
fn session_snapshot_round_trips_through_json() {
    let mut s = SessionState::new(t0());
    s.set_identity(Identity::new("night.owl")).unwrap();
    s.record_interaction(
        &Source::followers("alice"),
        &InteractionOutcome::success().with_likes(3),
        t0(),
    )
    .unwrap();
    let json = serde_json::to_string(&s).unwrap();
    let back: SessionState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, s);
}
