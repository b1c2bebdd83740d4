use std::collections::BTreeSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::config::LimitsConfig;
use crate::limits::kinds::{LimitKind, LimitScope, Observed, Threshold};
use crate::session::SessionState;
use crate::types::Source;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Limit {
    pub kind: LimitKind,
    pub threshold: Threshold,
}

impl Limit {
    pub fn count(kind: LimitKind, threshold: u64) -> Self {
        Self {
            kind,
            threshold: Threshold::Count(threshold),
        }
    }

    pub fn duration(kind: LimitKind, threshold: Duration) -> Self {
        Self {
            kind,
            threshold: Threshold::Duration(threshold),
        }
    }

    pub fn scope(&self) -> LimitScope {
        self.kind.scope()
    }

    /// Read the value this limit compares against. Per-source limits observe
    /// nothing when no source is given.
    pub fn observe(
        &self,
        session: &SessionState,
        source: Option<&Source>,
        now: DateTime<Utc>,
    ) -> Option<Observed> {
        let observed = match self.kind {
            LimitKind::Likes => Observed::Count(session.total_likes()),
            LimitKind::Follows => Observed::Count(session.total_followed()),
            LimitKind::Unfollows => Observed::Count(session.total_unfollowed()),
            LimitKind::Comments => Observed::Count(session.total_comments()),
            LimitKind::PrivateMessages => Observed::Count(session.total_private_messages()),
            LimitKind::StoryWatches => Observed::Count(session.total_story_watches()),
            LimitKind::TotalInteractions => Observed::Count(session.interactions_sum()),
            LimitKind::SuccessfulInteractions => Observed::Count(session.successful_sum()),
            LimitKind::SourceInteractions => Observed::Count(session.interactions_for(source?)),
            LimitKind::SourceFollows => Observed::Count(session.followed_for(source?)),
            LimitKind::SessionDuration => {
                Observed::Elapsed(elapsed(session.start_time(), now))
            }
            LimitKind::IdleTime => {
                let since = session
                    .last_interaction_at()
                    .unwrap_or_else(|| session.start_time());
                Observed::Elapsed(elapsed(since, now))
            }
        };
        Some(observed)
    }

    /// Count limits fire at `observed >= threshold`, time limits once the
    /// window has fully elapsed. A threshold of the wrong shape never fires.
    pub fn is_reached(&self, observed: Observed) -> bool {
        match (self.threshold, observed) {
            (Threshold::Count(max), Observed::Count(v)) => v >= max,
            (Threshold::Duration(max), Observed::Elapsed(v)) => v >= max,
            _ => false,
        }
    }
}

fn elapsed(since: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (now - since).to_std().unwrap_or(Duration::ZERO)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitSelector {
    All,
    Scope(LimitScope),
    Kind(LimitKind),
}

impl LimitSelector {
    fn matches(&self, limit: &Limit) -> bool {
        match self {
            LimitSelector::All => true,
            LimitSelector::Scope(scope) => limit.scope() == *scope,
            LimitSelector::Kind(kind) => limit.kind == *kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReachedLimit {
    pub kind: LimitKind,
    pub threshold: Threshold,
    pub observed: Observed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LimitCheck {
    pub reached: Vec<ReachedLimit>,
}

impl LimitCheck {
    pub fn any_reached(&self) -> bool {
        !self.reached.is_empty()
    }

    pub fn kinds(&self) -> BTreeSet<LimitKind> {
        self.reached.iter().map(|r| r.kind).collect()
    }

    pub fn contains(&self, kind: LimitKind) -> bool {
        self.reached.iter().any(|r| r.kind == kind)
    }

    pub fn merge(mut self, other: LimitCheck) -> Self {
        for r in other.reached {
            if !self.contains(r.kind) {
                self.reached.push(r);
            }
        }
        self
    }
}

/// Registered limits for one session. Holds no counters itself; every check
/// reads the session it is given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LimitRegistry {
    limits: Vec<Limit>,
}

impl LimitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry for a new session. `session_length` is a range and
    /// is sampled here, once per session.
    pub fn from_config(cfg: &LimitsConfig, rand_u64: impl FnOnce() -> u64) -> Self {
        let mut reg = LimitRegistry::new();
        let counts = [
            (LimitKind::Likes, cfg.total_likes_limit),
            (LimitKind::Follows, cfg.total_follows_limit),
            (LimitKind::Unfollows, cfg.total_unfollows_limit),
            (LimitKind::Comments, cfg.total_comments_limit),
            (LimitKind::PrivateMessages, cfg.total_pm_limit),
            (LimitKind::StoryWatches, cfg.total_watches_limit),
            (LimitKind::TotalInteractions, cfg.total_interactions_limit),
            (
                LimitKind::SuccessfulInteractions,
                cfg.total_successful_interactions_limit,
            ),
            (LimitKind::SourceInteractions, cfg.interactions_count),
            (LimitKind::SourceFollows, cfg.follow_limit),
        ];
        for (kind, threshold) in counts {
            if let Some(n) = threshold {
                reg.register(Limit::count(kind, n));
            }
        }
        if let Some(range) = cfg.session_length {
            let minutes = range.sample(rand_u64);
            reg.register(Limit::duration(
                LimitKind::SessionDuration,
                Duration::from_secs(minutes * 60),
            ));
        }
        if let Some(minutes) = cfg.idle_timeout {
            reg.register(Limit::duration(
                LimitKind::IdleTime,
                Duration::from_secs(minutes * 60),
            ));
        }
        reg
    }

    /// Add a limit, replacing any earlier limit of the same kind.
    pub fn register(&mut self, limit: Limit) {
        self.limits.retain(|l| l.kind != limit.kind);
        self.limits.push(limit);
    }

    pub fn get(&self, kind: LimitKind) -> Option<&Limit> {
        self.limits.iter().find(|l| l.kind == kind)
    }

    pub fn limits(&self) -> &[Limit] {
        &self.limits
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }

    pub fn check(
        &self,
        session: &SessionState,
        selector: LimitSelector,
        source: Option<&Source>,
        now: DateTime<Utc>,
    ) -> LimitCheck {
        let reached = self
            .limits
            .iter()
            .filter(|l| selector.matches(l))
            .filter_map(|l| {
                let observed = l.observe(session, source, now)?;
                l.is_reached(observed).then_some(ReachedLimit {
                    kind: l.kind,
                    threshold: l.threshold,
                    observed,
                })
            })
            .collect();
        LimitCheck { reached }
    }

    /// Same as [`check`](Self::check), and logs every reached limit.
    pub fn check_logged(
        &self,
        session: &SessionState,
        selector: LimitSelector,
        source: Option<&Source>,
        now: DateTime<Utc>,
    ) -> LimitCheck {
        let result = self.check(session, selector, source, now);
        for r in &result.reached {
            info!(
                limit = r.kind.as_str(),
                threshold = %r.threshold,
                observed = %r.observed,
                source = source.map(|s| s.key()).unwrap_or_default(),
                "limit reached"
            );
        }
        result
    }

    /// Whether the per-source follow limit stops further follows from `source`.
    pub fn is_follow_limit_reached_for_source(
        &self,
        session: &SessionState,
        source: &Source,
    ) -> bool {
        let now = Utc::now();
        let per_source = self
            .check(session, LimitSelector::Kind(LimitKind::SourceFollows), Some(source), now)
            .any_reached();
        per_source
            || self
                .check(session, LimitSelector::Kind(LimitKind::Follows), None, now)
                .any_reached()
    }
}
