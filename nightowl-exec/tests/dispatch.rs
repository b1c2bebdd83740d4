mod common;

use common::MockDriver;
use nightowl_core::{
    ActionConfig, Limit, LimitKind, LimitRegistry, Percentage, SessionState,
    Source, Target, ValueRange,
};
use nightowl_exec::{sample_plan, Dispatcher};
use nightowl_store::{InteractionStore, MemoryStore};

fn follow_everyone() -> ActionConfig {
    ActionConfig {
        likes_count: ValueRange::fixed(2),
        follow_percentage: Percentage::ALWAYS,
        ..ActionConfig::default()
    }
}

#[tokio::test]
async fn declined_profile_counts_as_failed_attempt() {
    let driver = MockDriver::new("me").decline("bot42");
    let store = MemoryStore::new();
    let limits = LimitRegistry::new();
    let actions = ActionConfig::default();
    let mut rng = fastrand::Rng::with_seed(1);
    let mut session = SessionState::start_now();
    let target = Target::new("bot42", Source::hashtag("cats"));

    let outcome = Dispatcher {
        interactor: &driver,
        filter: &driver,
        store: &store,
        limits: &limits,
        actions: &actions,
        rng: &mut rng,
    }
    .dispatch(&mut session, &target)
    .await
    .unwrap();

    assert!(!outcome.succeeded);
    assert_eq!(outcome.failure.as_deref(), Some(nightowl_exec::dispatch::FILTERED));
    assert!(driver.interacted().is_empty());
    assert_eq!(session.interactions_for(&target.source), 1);
    assert_eq!(session.successful_for(&target.source), 0);
    assert!(store.was_interacted("bot42").await.unwrap());
}

#[tokio::test]
async fn follow_is_withheld_once_source_follow_limit_is_reached() {
    let driver = MockDriver::new("me");
    let store = MemoryStore::new();
    let mut limits = LimitRegistry::new();
    limits.register(Limit::count(LimitKind::SourceFollows, 1));
    let actions = follow_everyone();
    let mut rng = fastrand::Rng::with_seed(2);
    let mut session = SessionState::start_now();
    let alice = Source::followers("alice");

    let mut dispatcher = Dispatcher {
        interactor: &driver,
        filter: &driver,
        store: &store,
        limits: &limits,
        actions: &actions,
        rng: &mut rng,
    };
    let first = dispatcher
        .dispatch(&mut session, &Target::new("a", alice.clone()))
        .await
        .unwrap();
    let second = dispatcher
        .dispatch(&mut session, &Target::new("b", alice.clone()))
        .await
        .unwrap();
    let other = dispatcher
        .dispatch(&mut session, &Target::new("c", Source::followers("bob")))
        .await
        .unwrap();

    assert!(first.followed);
    assert!(!second.followed);
    assert!(second.succeeded);
    assert!(other.followed);
    assert_eq!(session.followed_for(&alice), 1);
    assert_eq!(session.total_followed(), 2);

    let followed: Vec<String> = store
        .followed_candidates(10)
        .await
        .unwrap()
        .into_iter()
        .map(|f| f.username)
        .collect();
    assert_eq!(followed, vec!["a".to_string(), "c".to_string()]);
}

#[tokio::test]
async fn over_reported_actions_are_clamped_to_the_plan() {
    let driver = MockDriver::new("me").over_report_likes(5);
    let store = MemoryStore::new();
    let limits = LimitRegistry::new();
    let actions = ActionConfig::default();
    let mut rng = fastrand::Rng::with_seed(3);
    let mut session = SessionState::start_now();

    let outcome = Dispatcher {
        interactor: &driver,
        filter: &driver,
        store: &store,
        limits: &limits,
        actions: &actions,
        rng: &mut rng,
    }
    .dispatch(&mut session, &Target::new("a", Source::hashtag("cats")))
    .await
    .unwrap();

    assert_eq!(outcome.likes, 2);
    assert_eq!(session.total_likes(), 2);
}

#[test]
fn plan_follows_the_configured_chances() {
    let mut rng = fastrand::Rng::with_seed(9);
    let actions = ActionConfig {
        likes_count: ValueRange::new(1, 3).unwrap(),
        follow_percentage: Percentage::ALWAYS,
        stories_percentage: Percentage::ALWAYS,
        stories_count: ValueRange::fixed(2),
        ..ActionConfig::default()
    };
    for _ in 0..50 {
        let plan = sample_plan(&actions, true, &mut rng);
        assert!((1..=3).contains(&plan.likes));
        assert!(plan.follow);
        assert_eq!(plan.stories, 2);
        assert!(!plan.comment);
        assert!(!plan.private_message);
    }

    let plan = sample_plan(&actions, false, &mut rng);
    assert!(!plan.follow);

    let nothing = ActionConfig {
        likes_percentage: Percentage::NEVER,
        ..ActionConfig::default()
    };
    assert_eq!(sample_plan(&nothing, true, &mut rng).likes, 0);
}

