#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use nightowl_core::{
    ActionPlan, Identity, InteractionOutcome, RunConfig, Target, UnfollowOutcome,
};
use nightowl_exec::{
    Collaborators, Device, DriverError, Event, EventSink, Flow, Interactor, Interrupt,
    InterruptHandle, MemoryReportSink, ProfileFilter, RetryConfig, RunController, SourceWalker,
    TargetVisitor, Unfollower, WalkRequest,
};
use nightowl_exec::JobError;
use nightowl_store::MemoryStore;

/// Scripted stand-in for the UI automation side.
pub struct MockDriver {
    username: String,
    sources: HashMap<String, Vec<String>>,
    failures: Mutex<HashMap<String, DriverError>>,
    declined: HashSet<String>,
    interrupt_on: Mutex<Option<(String, InterruptHandle)>>,
    calls: Mutex<Vec<String>>,
    walks: Mutex<Vec<WalkRequest>>,
    extra_likes: u32,
}

impl MockDriver {
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            sources: HashMap::new(),
            failures: Mutex::new(HashMap::new()),
            declined: HashSet::new(),
            interrupt_on: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            walks: Mutex::new(Vec::new()),
            extra_likes: 0,
        }
    }

    pub fn with_source(mut self, key: &str, users: &[&str]) -> Self {
        self.sources
            .insert(key.to_string(), users.iter().map(|u| u.to_string()).collect());
        self
    }

    pub fn with_generated_source(mut self, key: &str, count: usize) -> Self {
        let users = (0..count).map(|i| format!("{}_{i}", key.trim_start_matches(['@', '#']))).collect();
        self.sources.insert(key.to_string(), users);
        self
    }

    /// The first interaction with `username` fails with `error`.
    pub fn fail_once(self, username: &str, error: DriverError) -> Self {
        self.failures.lock().unwrap().insert(username.to_string(), error);
        self
    }

    pub fn decline(mut self, username: &str) -> Self {
        self.declined.insert(username.to_string());
        self
    }

    pub fn interrupt_on(self, username: &str, handle: InterruptHandle) -> Self {
        *self.interrupt_on.lock().unwrap() = Some((username.to_string(), handle));
        self
    }

    /// Report more likes than planned on every interaction.
    pub fn over_report_likes(mut self, extra: u32) -> Self {
        self.extra_likes = extra;
        self
    }

    fn log(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == call).count()
    }

    pub fn with_prefix(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .iter()
            .filter_map(|c| c.strip_prefix(prefix).map(str::to_string))
            .collect()
    }

    pub fn interacted(&self) -> Vec<String> {
        self.with_prefix("interact:")
    }

    pub fn walks(&self) -> Vec<WalkRequest> {
        self.walks.lock().unwrap().clone()
    }
}

#[async_trait]
impl Device for MockDriver {
    async fn open_app(&self) -> Result<(), DriverError> {
        self.log("open_app");
        Ok(())
    }

    async fn close_app(&self) -> Result<(), DriverError> {
        self.log("close_app");
        Ok(())
    }

    async fn current_username(&self) -> Result<Identity, DriverError> {
        self.log("current_username");
        Ok(Identity::new(&self.username))
    }

    async fn capture_snapshot(&self, label: &str) -> Result<(), DriverError> {
        self.log(format!("snapshot:{label}"));
        Ok(())
    }
}

#[async_trait]
impl Interactor for MockDriver {
    async fn interact(
        &self,
        target: &Target,
        plan: &ActionPlan,
    ) -> Result<InteractionOutcome, DriverError> {
        self.log(format!("interact:{}", target.username));
        {
            let mut trigger = self.interrupt_on.lock().unwrap();
            if trigger.as_ref().is_some_and(|(u, _)| u == &target.username) {
                if let Some((_, handle)) = trigger.take() {
                    handle.trigger();
                }
            }
        }
        if let Some(err) = self.failures.lock().unwrap().remove(&target.username) {
            return Err(err);
        }
        Ok(InteractionOutcome {
            succeeded: true,
            followed: plan.follow,
            likes: plan.likes + self.extra_likes,
            commented: plan.comment,
            messaged: plan.private_message,
            stories_watched: plan.stories,
            failure: None,
        })
    }
}

#[async_trait]
impl SourceWalker for MockDriver {
    async fn walk(
        &self,
        request: &WalkRequest,
        visitor: &mut dyn TargetVisitor,
    ) -> Result<(), JobError> {
        self.log(format!("walk:{}", request.source));
        self.walks.lock().unwrap().push(request.clone());
        let users = self.sources.get(&request.source.key()).cloned().unwrap_or_default();
        for user in users {
            if visitor.visit(Target::new(user, request.source.clone())).await? == Flow::Stop {
                break;
            }
            tokio::task::yield_now().await;
        }
        Ok(())
    }
}

#[async_trait]
impl Unfollower for MockDriver {
    async fn unfollow(&self, username: &str) -> Result<UnfollowOutcome, DriverError> {
        self.log(format!("unfollow:{username}"));
        Ok(UnfollowOutcome::Unfollowed)
    }
}

#[async_trait]
impl ProfileFilter for MockDriver {
    async fn should_interact(&self, target: &Target) -> Result<bool, DriverError> {
        Ok(!self.declined.contains(&target.username))
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<Event>>,
}

impl RecordingSink {
    pub fn types(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|e| e.event_type()).collect()
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn emit(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

pub fn interact_config(sources: &[&str]) -> RunConfig {
    RunConfig {
        interact: sources.iter().map(|s| s.parse().unwrap()).collect(),
        ..RunConfig::default()
    }
}

pub fn no_delay() -> RetryConfig {
    RetryConfig {
        min_delay: Duration::ZERO,
        max_delay: Duration::ZERO,
        max_attempts: None,
    }
}

pub struct Harness {
    pub driver: Arc<MockDriver>,
    pub store: Arc<MemoryStore>,
    pub reports: Arc<MemoryReportSink>,
    pub events: Arc<RecordingSink>,
}

impl Harness {
    pub fn new(driver: MockDriver) -> Self {
        Self {
            driver: Arc::new(driver),
            store: Arc::new(MemoryStore::new()),
            reports: Arc::new(MemoryReportSink::new()),
            events: Arc::new(RecordingSink::default()),
        }
    }

    pub fn controller(&self, config: RunConfig, interrupt: Interrupt) -> RunController {
        RunController::new(
            config,
            Collaborators::from_driver(self.driver.clone()),
            self.store.clone(),
            self.events.clone(),
            self.reports.clone(),
            interrupt,
        )
        .unwrap()
        .with_rng(fastrand::Rng::with_seed(7))
        .with_retry(no_delay())
    }
}
