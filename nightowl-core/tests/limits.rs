use std::time::Duration as StdDuration;

use chrono::{Duration, TimeZone, Utc};
use nightowl_core::{
    InteractionOutcome, Limit, LimitKind, LimitRegistry, LimitScope, LimitSelector,
    LimitsConfig, SessionState, Source, ValueRange,
};

fn t0() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
}

fn liked(n: u32) -> InteractionOutcome {
    InteractionOutcome::success().with_likes(n)
}

#[test]
fn count_limits_use_greater_or_equal() {
    let mut reg = LimitRegistry::new();
    reg.register(Limit::count(LimitKind::Likes, 3));
    let mut s = SessionState::new(t0());
    let src = Source::followers("alice");

    s.record_interaction(&src, &liked(2), t0()).unwrap();
    assert!(!reg.check(&s, LimitSelector::All, None, t0()).any_reached());

    s.record_interaction(&src, &liked(1), t0()).unwrap();
    let check = reg.check(&s, LimitSelector::All, None, t0());
    assert!(check.any_reached());
    assert!(check.contains(LimitKind::Likes));
}

#[test]
fn all_selector_ors_every_limit() {
    let mut reg = LimitRegistry::new();
    reg.register(Limit::count(LimitKind::Likes, 100));
    reg.register(Limit::count(LimitKind::Follows, 1));
    let mut s = SessionState::new(t0());
    s.record_interaction(
        &Source::hashtag("cats"),
        &InteractionOutcome::success().with_follow(),
        t0(),
    )
    .unwrap();

    let all = reg.check(&s, LimitSelector::All, None, t0());
    assert_eq!(all.kinds().into_iter().collect::<Vec<_>>(), vec![LimitKind::Follows]);
    assert!(!reg
        .check(&s, LimitSelector::Kind(LimitKind::Likes), None, t0())
        .any_reached());
}

#[test]
fn per_source_limits_only_apply_to_their_source() {
    let mut reg = LimitRegistry::new();
    reg.register(Limit::count(LimitKind::SourceInteractions, 2));
    let mut s = SessionState::new(t0());
    let alice = Source::followers("alice");
    let bob = Source::followers("bob");
    s.record_interaction(&alice, &liked(0), t0()).unwrap();
    s.record_interaction(&alice, &InteractionOutcome::failed("private"), t0()).unwrap();

    let scope = LimitSelector::Scope(LimitScope::PerSource);
    assert!(reg.check(&s, scope, Some(&alice), t0()).any_reached());
    assert!(!reg.check(&s, scope, Some(&bob), t0()).any_reached());
    assert!(!reg.check(&s, scope, None, t0()).any_reached());
    assert!(!reg
        .check(&s, LimitSelector::Scope(LimitScope::Global), Some(&alice), t0())
        .any_reached());
}

#[test]
fn follow_limits_never_stop_a_job() {
    let mut reg = LimitRegistry::new();
    reg.register(Limit::count(LimitKind::Follows, 1));
    reg.register(Limit::count(LimitKind::SourceFollows, 1));
    let mut s = SessionState::new(t0());
    let alice = Source::followers("alice");
    s.record_interaction(&alice, &InteractionOutcome::success().with_follow(), t0())
        .unwrap();

    for scope in [LimitScope::Global, LimitScope::PerSource] {
        assert!(!reg
            .check(&s, LimitSelector::Scope(scope), Some(&alice), t0())
            .any_reached());
    }
    let action = reg.check(&s, LimitSelector::Scope(LimitScope::Action), Some(&alice), t0());
    assert!(action.contains(LimitKind::Follows));
    assert!(action.contains(LimitKind::SourceFollows));
    assert!(reg.is_follow_limit_reached_for_source(&s, &alice));
}

#[test]
fn session_duration_is_a_time_window() {
    let mut reg = LimitRegistry::new();
    reg.register(Limit::duration(
        LimitKind::SessionDuration,
        StdDuration::from_secs(30 * 60),
    ));
    let s = SessionState::new(t0());
    assert!(!reg
        .check(&s, LimitSelector::All, None, t0() + Duration::minutes(29))
        .any_reached());
    assert!(reg
        .check(&s, LimitSelector::All, None, t0() + Duration::minutes(30))
        .any_reached());
}

#[test]
fn idle_time_counts_from_last_interaction() {
    let mut reg = LimitRegistry::new();
    reg.register(Limit::duration(LimitKind::IdleTime, StdDuration::from_secs(600)));
    let mut s = SessionState::new(t0());
    s.record_interaction(&Source::hashtag("dogs"), &liked(1), t0() + Duration::minutes(8))
        .unwrap();

    assert!(!reg
        .check(&s, LimitSelector::All, None, t0() + Duration::minutes(15))
        .any_reached());
    assert!(reg
        .check(&s, LimitSelector::All, None, t0() + Duration::minutes(18))
        .any_reached());
}

#[test]
fn check_does_not_mutate_session() {
    let mut reg = LimitRegistry::new();
    reg.register(Limit::count(LimitKind::Likes, 0));
    let s = SessionState::new(t0());
    let before = s.clone();
    let check = reg.check_logged(&s, LimitSelector::All, None, t0());
    assert!(check.any_reached());
    assert_eq!(s, before);
}

#[test]
fn registry_from_config_registers_configured_limits() {
    let cfg = LimitsConfig {
        total_likes_limit: Some(50),
        interactions_count: Some(10),
        follow_limit: Some(5),
        session_length: Some(ValueRange::new(20, 40).unwrap()),
        ..LimitsConfig::default()
    };
    let reg = LimitRegistry::from_config(&cfg, || 5);
    assert_eq!(reg.limits().len(), 4);
    assert_eq!(
        reg.get(LimitKind::SessionDuration).map(|l| l.threshold),
        Some(nightowl_core::Threshold::Duration(StdDuration::from_secs(25 * 60)))
    );
    assert!(reg.get(LimitKind::Comments).is_none());
}

#[test]
fn follow_limit_predicate_uses_source_and_global_follows() {
    let mut reg = LimitRegistry::new();
    reg.register(Limit::count(LimitKind::SourceFollows, 1));
    let mut s = SessionState::new(t0());
    let alice = Source::followers("alice");
    let bob = Source::followers("bob");
    s.record_interaction(&alice, &InteractionOutcome::success().with_follow(), t0())
        .unwrap();

    assert!(reg.is_follow_limit_reached_for_source(&s, &alice));
    assert!(!reg.is_follow_limit_reached_for_source(&s, &bob));

    reg.register(Limit::count(LimitKind::Follows, 1));
    assert!(reg.is_follow_limit_reached_for_source(&s, &bob));
}

#[test]
fn register_replaces_same_kind() {
    let mut reg = LimitRegistry::new();
    reg.register(Limit::count(LimitKind::Likes, 10));
    reg.register(Limit::count(LimitKind::Likes, 20));
    assert_eq!(reg.limits().len(), 1);
    assert_eq!(
        reg.get(LimitKind::Likes).map(|l| l.threshold),
        Some(nightowl_core::Threshold::Count(20))
    );
}
