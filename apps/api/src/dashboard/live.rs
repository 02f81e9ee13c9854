//! Live, owner-scoped view of the interview collection.
//!
//! Wraps a store subscription in an owned task that applies each snapshot
//! wholesale (sorted, newest first) and publishes the result through a watch
//! channel. Consumers only ever see the read-only side; all mutation flows
//! through snapshot delivery or an explicit one-shot refresh.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{watch, Notify};
use tracing::{debug, warn};

use crate::classify::{classify, Classification, Failure};
use crate::errors::AppError;
use crate::models::interview::InterviewRecord;
use crate::session::Session;
use crate::store::{DocumentStore, SubscriptionEvent};

const SYNC_ERROR_FALLBACK: &str = "Something went wrong. Try again later.";

/// Where the subscription currently stands.
///
/// `Pending` is the subscribed-but-no-snapshot-yet window. `Failed` keeps the
/// last good list — the subscription does not tear itself down; callers retry
/// by re-subscribing. `Unsubscribed` is terminal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SyncPhase {
    Pending,
    Live,
    Failed { error: Classification },
    Unsubscribed,
}

/// One published view of the collection: sorted records plus phase.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub phase: SyncPhase,
    pub interviews: Arc<Vec<InterviewRecord>>,
}

/// Monotonic sequence for one-shot fetches. A fetch result is applied only if
/// no newer fetch has been issued since, so late responses are discarded
/// instead of clobbering fresher data.
#[derive(Debug, Default)]
pub struct FetchSequence {
    issued: AtomicU64,
}

impl FetchSequence {
    pub fn begin(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, seq: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == seq
    }
}

/// A live subscription to one owner's interviews.
///
/// `cancel` is idempotent and also runs on `Drop`, so tying the value's
/// lifetime to a consumer (an SSE connection, a test scope) is enough to tear
/// the subscription down.
pub struct LiveInterviews {
    session: Session,
    store: Arc<dyn DocumentStore>,
    tx: Arc<watch::Sender<ViewState>>,
    cancelled: Arc<AtomicBool>,
    cancel_notify: Arc<Notify>,
    fetches: FetchSequence,
}

impl LiveInterviews {
    /// Subscribes and spawns the snapshot-apply task.
    pub async fn subscribe(store: Arc<dyn DocumentStore>, session: Session) -> Self {
        let (tx, _) = watch::channel(ViewState {
            phase: SyncPhase::Pending,
            interviews: Arc::new(Vec::new()),
        });
        let tx = Arc::new(tx);
        let cancelled = Arc::new(AtomicBool::new(false));
        let cancel_notify = Arc::new(Notify::new());

        let mut subscription = store.subscribe_interviews(&session).await;

        let task_tx = Arc::clone(&tx);
        let task_notify = Arc::clone(&cancel_notify);
        let task_cancelled = Arc::clone(&cancelled);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = task_notify.notified() => break,
                    event = subscription.events.recv() => match event {
                        Some(SubscriptionEvent::Snapshot(records)) => {
                            let sorted = sort_snapshot(records);
                            // The cancelled check runs under the watch lock so a
                            // snapshot racing cancel() can never overwrite the
                            // terminal Unsubscribed state.
                            task_tx.send_modify(|state| {
                                if !task_cancelled.load(Ordering::SeqCst) {
                                    state.phase = SyncPhase::Live;
                                    state.interviews = Arc::new(sorted);
                                }
                            });
                        }
                        Some(SubscriptionEvent::Error(error)) => {
                            let classification =
                                classify(Failure::Error(error.as_ref()), SYNC_ERROR_FALLBACK);
                            warn!("interview subscription failed: {}", classification.message);
                            task_tx.send_modify(|state| {
                                if !task_cancelled.load(Ordering::SeqCst) {
                                    state.phase = SyncPhase::Failed {
                                        error: classification,
                                    };
                                }
                            });
                            break;
                        }
                        None => break,
                    },
                }
            }
        });

        Self {
            session,
            store,
            tx,
            cancelled,
            cancel_notify,
            fetches: FetchSequence::default(),
        }
    }

    /// Read-only handle onto the current view. The receiver observes every
    /// published state; the base list can never be mutated through it.
    pub fn view(&self) -> watch::Receiver<ViewState> {
        self.tx.subscribe()
    }

    /// Cancels the subscription. Idempotent; marks the view `Unsubscribed`.
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            self.tx.send_modify(|state| {
                state.phase = SyncPhase::Unsubscribed;
            });
            self.cancel_notify.notify_one();
        }
    }

    /// One-shot reload from the store, outside the subscription stream.
    ///
    /// The result is discarded when a newer refresh has been issued or the
    /// view was cancelled while the fetch was in flight.
    // Reserved for consumers that poll instead of streaming.
    #[allow(dead_code)]
    pub async fn refresh(&self) -> Result<(), AppError> {
        let seq = self.fetches.begin();
        let records = self.store.list_interviews(&self.session).await?;

        if self.cancelled.load(Ordering::SeqCst) || !self.fetches.is_current(seq) {
            debug!("discarding stale interview refresh (seq {seq})");
            return Ok(());
        }

        let sorted = sort_snapshot(records);
        let cancelled = &self.cancelled;
        let fetches = &self.fetches;
        self.tx.send_modify(|state| {
            if !cancelled.load(Ordering::SeqCst) && fetches.is_current(seq) {
                state.phase = SyncPhase::Live;
                state.interviews = Arc::new(sorted);
            }
        });
        Ok(())
    }
}

impl Drop for LiveInterviews {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Sorts a snapshot newest-first. A record without `created_at` sorts as the
/// minimum timestamp (placed last); the stable sort keeps delivery order for
/// ties.
pub fn sort_snapshot(mut records: Vec<InterviewRecord>) -> Vec<InterviewRecord> {
    records.sort_by(|a, b| sort_timestamp(b).cmp(&sort_timestamp(a)));
    records
}

fn sort_timestamp(record: &InterviewRecord) -> DateTime<Utc> {
    record.created_at.unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::store::NewInterview;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn session() -> Session {
        Session {
            user_id: Uuid::new_v4(),
        }
    }

    fn record(owner_id: Uuid, position: &str, created_at: Option<i64>) -> InterviewRecord {
        InterviewRecord {
            id: Uuid::new_v4(),
            owner_id,
            position: position.to_string(),
            description: "A role description".to_string(),
            experience_years: 1.0,
            tech_stack: "Rust".to_string(),
            questions: vec![],
            created_at: created_at.map(|secs| Utc.timestamp_opt(secs, 0).unwrap()),
            updated_at: None,
        }
    }

    fn draft(position: &str) -> NewInterview {
        NewInterview {
            position: position.to_string(),
            description: "A role description".to_string(),
            experience_years: 1.0,
            tech_stack: "Rust".to_string(),
            questions: vec![],
        }
    }

    async fn next_live_state(rx: &mut watch::Receiver<ViewState>) -> ViewState {
        loop {
            let state = rx.borrow_and_update().clone();
            if state.phase != SyncPhase::Pending {
                return state;
            }
            rx.changed().await.unwrap();
        }
    }

    #[test]
    fn test_sort_snapshot_newest_first_with_missing_timestamps_last() {
        let owner = Uuid::new_v4();
        let sorted = sort_snapshot(vec![
            record(owner, "oldest", Some(100)),
            record(owner, "untimed-a", None),
            record(owner, "newest", Some(300)),
            record(owner, "untimed-b", None),
            record(owner, "middle", Some(200)),
        ]);
        let positions: Vec<&str> = sorted.iter().map(|r| r.position.as_str()).collect();
        // Untimed records keep their delivery order at the tail.
        assert_eq!(
            positions,
            vec!["newest", "middle", "oldest", "untimed-a", "untimed-b"]
        );
    }

    #[test]
    fn test_fetch_sequence_discards_superseded_fetches() {
        let fetches = FetchSequence::default();
        let first = fetches.begin();
        let second = fetches.begin();
        assert!(!fetches.is_current(first));
        assert!(fetches.is_current(second));
    }

    #[tokio::test]
    async fn test_subscribe_goes_live_with_sorted_records() {
        let store = Arc::new(MemoryStore::new());
        let session = session();
        store.create_interview(&session, draft("First")).await.unwrap();
        store.create_interview(&session, draft("Second")).await.unwrap();

        let live =
            LiveInterviews::subscribe(store.clone() as Arc<dyn DocumentStore>, session.clone())
                .await;
        let mut rx = live.view();
        let state = next_live_state(&mut rx).await;

        assert_eq!(state.phase, SyncPhase::Live);
        assert_eq!(state.interviews.len(), 2);
        // Newest first.
        assert_eq!(state.interviews[0].position, "Second");
    }

    #[tokio::test]
    async fn test_later_snapshot_replaces_view_wholesale() {
        let store = Arc::new(MemoryStore::new());
        let session = session();
        store.create_interview(&session, draft("One")).await.unwrap();
        store.create_interview(&session, draft("Two")).await.unwrap();
        store.create_interview(&session, draft("Three")).await.unwrap();

        let live =
            LiveInterviews::subscribe(store.clone() as Arc<dyn DocumentStore>, session.clone())
                .await;
        let mut rx = live.view();
        let state = next_live_state(&mut rx).await;
        assert_eq!(state.interviews.len(), 3);

        // A shrunken snapshot fully replaces the previous one.
        let survivor = record(session.user_id, "Survivor", Some(500));
        store
            .emit_snapshot(session.user_id, vec![survivor.clone()])
            .await;
        rx.changed().await.unwrap();
        let state = rx.borrow_and_update().clone();

        assert_eq!(state.interviews.len(), 1);
        assert_eq!(state.interviews[0].id, survivor.id);
    }

    #[tokio::test]
    async fn test_subscription_error_marks_failed_and_keeps_last_list() {
        let store = Arc::new(MemoryStore::new());
        let session = session();
        store.create_interview(&session, draft("Kept")).await.unwrap();

        let live =
            LiveInterviews::subscribe(store.clone() as Arc<dyn DocumentStore>, session.clone())
                .await;
        let mut rx = live.view();
        next_live_state(&mut rx).await;

        store
            .emit_subscription_error(session.user_id, "quota exhausted while listening")
            .await;
        rx.changed().await.unwrap();
        let state = rx.borrow_and_update().clone();

        match &state.phase {
            SyncPhase::Failed { error } => {
                assert!(error.is_quota_error);
                assert_eq!(error.message, "quota exhausted while listening");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
        // The last good snapshot stays readable.
        assert_eq!(state.interviews.len(), 1);
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent_and_terminal() {
        let store = Arc::new(MemoryStore::new());
        let session = session();

        let live =
            LiveInterviews::subscribe(store.clone() as Arc<dyn DocumentStore>, session.clone())
                .await;
        let rx = live.view();

        live.cancel();
        live.cancel();
        assert_eq!(rx.borrow().phase, SyncPhase::Unsubscribed);

        // Mutations after cancellation no longer reach the view.
        store.create_interview(&session, draft("Late")).await.unwrap();
        tokio::task::yield_now().await;
        assert!(rx.borrow().interviews.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_applies_when_current_and_skips_after_cancel() {
        let store = Arc::new(MemoryStore::new());
        let session = session();
        let live =
            LiveInterviews::subscribe(store.clone() as Arc<dyn DocumentStore>, session.clone())
                .await;
        let mut rx = live.view();
        next_live_state(&mut rx).await;

        store.create_interview(&session, draft("Fresh")).await.unwrap();
        live.refresh().await.unwrap();
        assert_eq!(rx.borrow().interviews.len(), 1);

        live.cancel();
        live.refresh().await.unwrap();
        assert_eq!(rx.borrow().phase, SyncPhase::Unsubscribed);
    }
}
