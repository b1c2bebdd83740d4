use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use nightowl_exec::{
    CompositeEventSink, Event, EventSink, NoOpEventSink, StoreEventSink,
};
use nightowl_store::{InteractionStore, MemoryStore};
use uuid::Uuid;

struct Counting {
    seen: Arc<Mutex<Vec<&'static str>>>,
}

#[async_trait]
impl EventSink for Counting {
    async fn emit(&self, event: Event) {
        self.seen.lock().unwrap().push(event.event_type());
    }
}

#[tokio::test]
async fn composite_fans_out_to_every_sink() {
    let a = Arc::new(Mutex::new(Vec::new()));
    let b = Arc::new(Mutex::new(Vec::new()));
    let mut sink = CompositeEventSink::new();
    assert!(sink.is_empty());
    sink.add(Box::new(Counting { seen: a.clone() }));
    sink.add(Box::new(Counting { seen: b.clone() }));
    sink.add(Box::new(NoOpEventSink));

    let session_id = Uuid::new_v4();
    sink.emit(Event::SessionStarted { session_id, index: 1 }).await;
    sink.emit(Event::JobCompleted {
        session_id,
        job: "interact @alice".into(),
    })
    .await;

    assert_eq!(*a.lock().unwrap(), vec!["session.started", "job.completed"]);
    assert_eq!(*b.lock().unwrap(), vec!["session.started", "job.completed"]);
}

#[tokio::test]
async fn store_sink_appends_type_session_and_payload() {
    let store = Arc::new(MemoryStore::new());
    let sink = StoreEventSink::new(store.clone());
    let session_id = Uuid::new_v4();

    sink.emit(Event::LimitReached {
        session_id,
        job: "interact #cats".into(),
        limits: vec!["likes".into()],
    })
    .await;
    sink.emit(Event::InteractionRecorded {
        session_id,
        username: "bob".into(),
        source: "#cats".into(),
        succeeded: true,
    })
    .await;

    let events = store.events().await;
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event_type, "limit.reached");
    assert_eq!(events[0].session_id, Some(session_id));
    assert_eq!(events[0].payload["limits"][0], "likes");
    assert_eq!(events[1].payload["username"], "bob");
    assert_eq!(events[1].payload["succeeded"], true);
    assert!(events[0].id < events[1].id);

    // The sink only writes through the trait.
    assert!(store.list_sessions(10).await.unwrap().is_empty());
}

#[test]
fn retry_payload_carries_delay_and_error() {
    let e = Event::JobRetryScheduled {
        session_id: Uuid::nil(),
        job: "unfollow".into(),
        attempt_no: 2,
        delay_ms: 1500,
        error: "timeout error: ui hang".into(),
    };
    assert_eq!(e.event_type(), "job.retry_scheduled");
    let p = e.payload();
    assert_eq!(p["attempt_no"], 2);
    assert_eq!(p["delay_ms"], 1500);
    assert!(p.get("session_id").is_none());
}
