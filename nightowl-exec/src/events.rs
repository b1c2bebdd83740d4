use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};
use uuid::Uuid;

use nightowl_store::{InteractionStore, NewEvent};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SessionStarted {
        session_id: Uuid,
        index: usize,
    },
    SessionFinished {
        session_id: Uuid,
        interactions: u64,
        likes: u64,
    },
    JobStarted {
        session_id: Uuid,
        job: String,
        attempt_no: usize,
    },
    JobCompleted {
        session_id: Uuid,
        job: String,
    },
    JobRetryScheduled {
        session_id: Uuid,
        job: String,
        attempt_no: usize,
        delay_ms: u64,
        error: String,
    },
    JobAborted {
        session_id: Uuid,
        job: String,
        error: String,
    },
    LimitReached {
        session_id: Uuid,
        job: String,
        limits: Vec<String>,
    },
    InteractionRecorded {
        session_id: Uuid,
        username: String,
        source: String,
        succeeded: bool,
    },
    Unfollowed {
        session_id: Uuid,
        username: String,
    },
}

impl Event {
    pub fn session_id(&self) -> Uuid {
        match self {
            Event::SessionStarted { session_id, .. }
            | Event::SessionFinished { session_id, .. }
            | Event::JobStarted { session_id, .. }
            | Event::JobCompleted { session_id, .. }
            | Event::JobRetryScheduled { session_id, .. }
            | Event::JobAborted { session_id, .. }
            | Event::LimitReached { session_id, .. }
            | Event::InteractionRecorded { session_id, .. }
            | Event::Unfollowed { session_id, .. } => *session_id,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            Event::SessionStarted { .. } => "session.started",
            Event::SessionFinished { .. } => "session.finished",
            Event::JobStarted { .. } => "job.started",
            Event::JobCompleted { .. } => "job.completed",
            Event::JobRetryScheduled { .. } => "job.retry_scheduled",
            Event::JobAborted { .. } => "job.aborted",
            Event::LimitReached { .. } => "limit.reached",
            Event::InteractionRecorded { .. } => "interaction.recorded",
            Event::Unfollowed { .. } => "unfollow.recorded",
        }
    }

    /// Event fields other than the type and session id.
    pub fn payload(&self) -> JsonValue {
        match self {
            Event::SessionStarted { index, .. } => json!({ "index": index }),
            Event::SessionFinished {
                interactions,
                likes,
                ..
            } => json!({ "interactions": interactions, "likes": likes }),
            Event::JobStarted {
                job, attempt_no, ..
            } => json!({ "job": job, "attempt_no": attempt_no }),
            Event::JobCompleted { job, .. } => json!({ "job": job }),
            Event::JobRetryScheduled {
                job,
                attempt_no,
                delay_ms,
                error,
                ..
            } => json!({
                "job": job,
                "attempt_no": attempt_no,
                "delay_ms": delay_ms,
                "error": error
            }),
            Event::JobAborted { job, error, .. } => json!({ "job": job, "error": error }),
            Event::LimitReached { job, limits, .. } => json!({ "job": job, "limits": limits }),
            Event::InteractionRecorded {
                username,
                source,
                succeeded,
                ..
            } => json!({ "username": username, "source": source, "succeeded": succeeded }),
            Event::Unfollowed { username, .. } => json!({ "username": username }),
        }
    }
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: Event);
}

pub struct CompositeEventSink {
    sinks: Vec<Box<dyn EventSink>>,
}

impl Default for CompositeEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositeEventSink {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn add(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

#[async_trait]
impl EventSink for CompositeEventSink {
    async fn emit(&self, event: Event) {
        for sink in &self.sinks {
            sink.emit(event.clone()).await;
        }
    }
}

/// Appends events to the store. Write failures are dropped.
pub struct StoreEventSink {
    store: Arc<dyn InteractionStore>,
}

impl StoreEventSink {
    pub fn new(store: Arc<dyn InteractionStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl EventSink for StoreEventSink {
    async fn emit(&self, event: Event) {
        let _ = self
            .store
            .append_event(NewEvent {
                session_id: Some(event.session_id()),
                r#type: event.event_type().to_string(),
                payload: event.payload(),
            })
            .await;
    }
}

/// One JSON object per line on stdout.
pub struct StdoutEventSink;

#[async_trait]
impl EventSink for StdoutEventSink {
    async fn emit(&self, event: Event) {
        let mut json = json!({
            "type": event.event_type(),
            "session_id": event.session_id().to_string(),
        });
        if let (Some(obj), JsonValue::Object(fields)) = (json.as_object_mut(), event.payload()) {
            obj.extend(fields);
        }
        println!("{}", serde_json::to_string(&json).unwrap_or_default());
    }
}

/// Mirrors events into the log at debug level.
pub struct TracingEventSink;

#[async_trait]
impl EventSink for TracingEventSink {
    async fn emit(&self, event: Event) {
        tracing::debug!(
            event = event.event_type(),
            session_id = %event.session_id(),
            payload = %event.payload(),
            "run event"
        );
    }
}

pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: Event) {}
}
