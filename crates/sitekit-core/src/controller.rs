// ── Collection controller ──
//
// Owns the request lifecycle for one collection type. Every operation
// kind has its own observable `{loading, error}` pair, so a failed edit
// never blanks a rendered list and a slow list never disables a form.

use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use serde::Serialize;
use strum::Display;
use tokio::sync::watch;
use tracing::{debug, warn};

use sitekit_api::RequestGateway;

use crate::error::CoreError;
use crate::model::{Resource, ResourceKind};
use crate::page::{CollectionPage, decode_entity};
use crate::query::{CollectionQuery, build_query};

// ── Operation state ──────────────────────────────────────────────

/// The operations a controller tracks independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Generic message shown when the server supplied none.
    pub fn failure_message(self, kind: &ResourceKind) -> String {
        match self {
            Self::List => format!("Failed to fetch {}", kind.plural),
            Self::Get => format!("Failed to fetch {}", kind.singular),
            Self::Create => format!("Failed to create {}", kind.singular),
            Self::Update => format!("Failed to update {}", kind.singular),
            Self::Delete => format!("Failed to delete {}", kind.singular),
        }
    }
}

/// Observable state of one operation kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationState {
    /// A request of this kind is in flight. For mutations this is the
    /// "submitting" flag.
    pub loading: bool,
    /// Message from the most recent failure, cleared on the next success.
    pub error: Option<String>,
}

/// In-flight counter plus published state for one operation kind.
struct Tracker {
    in_flight: AtomicUsize,
    state: watch::Sender<OperationState>,
}

impl Tracker {
    fn new() -> Self {
        let (state, _) = watch::channel(OperationState::default());
        Self {
            in_flight: AtomicUsize::new(0),
            state,
        }
    }

    // The counter is only touched under the watch lock, so the published
    // `loading` flag always matches the count it was derived from.

    fn begin(&self) {
        self.state.send_modify(|s| {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            s.loading = true;
        });
    }

    fn finish(&self, error: Option<String>) {
        self.state.send_modify(|s| {
            let remaining = self.in_flight.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
            s.loading = remaining > 0;
            s.error = error;
        });
    }

    /// Settle without touching `error` (used for superseded list calls).
    fn abandon(&self) {
        self.state.send_if_modified(|_| {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            false
        });
    }

    /// Settle the newest list call: loading ends even if stale calls remain.
    fn settle_current(&self, error: Option<String>) {
        self.state.send_modify(|s| {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            s.loading = false;
            s.error = error;
        });
    }
}

// ── Fetch outcome ────────────────────────────────────────────────

/// Result of a list call that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetch<T> {
    /// The response belongs to the newest issued request.
    Current(T),
    /// A newer request was issued before this one resolved; the response
    /// was dropped without touching state.
    Superseded,
}

impl<T> Fetch<T> {
    pub fn current(self) -> Option<T> {
        match self {
            Self::Current(value) => Some(value),
            Self::Superseded => None,
        }
    }
}

// ── Controller ───────────────────────────────────────────────────

/// Request lifecycle for one collection type.
///
/// The gateway is injected at construction so tests can substitute a fake.
/// A controller is meant to back a single list view; sharing it between
/// views would let one view's requests supersede the other's.
pub struct CollectionController<R: Resource> {
    gateway: Arc<dyn RequestGateway>,
    /// Sequence number of the newest issued list request.
    list_seq: AtomicU64,
    list: Tracker,
    get: Tracker,
    create: Tracker,
    update: Tracker,
    delete: Tracker,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> CollectionController<R> {
    pub fn new(gateway: Arc<dyn RequestGateway>) -> Self {
        Self {
            gateway,
            list_seq: AtomicU64::new(0),
            list: Tracker::new(),
            get: Tracker::new(),
            create: Tracker::new(),
            update: Tracker::new(),
            delete: Tracker::new(),
            _resource: PhantomData,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        R::KIND
    }

    fn tracker(&self, op: Operation) -> &Tracker {
        match op {
            Operation::List => &self.list,
            Operation::Get => &self.get,
            Operation::Create => &self.create,
            Operation::Update => &self.update,
            Operation::Delete => &self.delete,
        }
    }

    /// Snapshot of one operation's state.
    pub fn state(&self, op: Operation) -> OperationState {
        self.tracker(op).state.borrow().clone()
    }

    /// Subscribe to one operation's state changes.
    pub fn subscribe(&self, op: Operation) -> watch::Receiver<OperationState> {
        self.tracker(op).state.subscribe()
    }

    // ── Reads ────────────────────────────────────────────────────

    /// Fetch one page.
    ///
    /// Responses are applied in issue order: if another `list` call starts
    /// before this one resolves, this one yields [`Fetch::Superseded`],
    /// whether it succeeded or failed.
    pub async fn list(
        &self,
        query: &CollectionQuery,
    ) -> Result<Fetch<CollectionPage<R>>, CoreError> {
        let seq = self.list_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.list.begin();

        let wire = build_query(query);
        debug!(resource = R::KIND.plural, seq, query = %wire.to_query_string(), "list");

        let result = match self.gateway.get(R::KIND.path, wire.params()).await {
            Ok(body) => CollectionPage::decode(body, &R::KIND, query),
            Err(e) => Err(CoreError::from(e)),
        };

        if seq != self.list_seq.load(Ordering::SeqCst) {
            debug!(resource = R::KIND.plural, seq, "discarding superseded list response");
            self.list.abandon();
            return Ok(Fetch::Superseded);
        }

        match result {
            Ok(page) => {
                self.list.settle_current(None);
                Ok(Fetch::Current(page))
            }
            Err(e) => {
                let message = e.user_message(&Operation::List.failure_message(&R::KIND));
                warn!(resource = R::KIND.plural, kind = e.kind(), error = %e, "list failed");
                self.list.settle_current(Some(message));
                Err(e)
            }
        }
    }

    /// Fetch one member. A missing id is [`CoreError::NotFound`].
    pub async fn get_one(&self, id: &str) -> Result<R, CoreError> {
        self.get.begin();
        let result = self.fetch_one(id).await;
        self.settle(Operation::Get, result)
    }

    async fn fetch_one(&self, id: &str) -> Result<R, CoreError> {
        let not_found = || CoreError::NotFound {
            resource: R::KIND.singular.to_owned(),
            id: id.to_owned(),
        };

        let body = self
            .gateway
            .get(&R::KIND.item_path(id), &[])
            .await
            .map_err(|e| if e.is_not_found() { not_found() } else { e.into() })?;

        decode_entity(body, &R::KIND)?.ok_or_else(not_found)
    }

    /// Fetch one member for display and record a view.
    ///
    /// The view is recorded in the background; its failure is logged and
    /// never reaches the caller.
    pub async fn view(&self, id: &str) -> Result<R, CoreError> {
        let entity = self.get_one(id).await?;
        self.record_view(id);
        Ok(entity)
    }

    fn record_view(&self, id: &str) {
        let Some(view_path) = R::KIND.view_path else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(resource = R::KIND.singular, id, "no runtime; view not recorded");
            return;
        };

        let gateway = Arc::clone(&self.gateway);
        let path = format!("{}/{view_path}", R::KIND.item_path(id));
        runtime.spawn(async move {
            match gateway.post(&path, &serde_json::json!({})).await {
                Ok(_) => debug!(%path, "view recorded"),
                Err(e) => warn!(%path, error = %e, "failed to record view"),
            }
        });
    }

    // ── Mutations ────────────────────────────────────────────────

    /// Create a member; returns the server's canonical representation.
    pub async fn create<P: Serialize + Sync>(&self, payload: &P) -> Result<R, CoreError> {
        self.create.begin();
        let result = async {
            let body = serde_json::to_value(payload)?;
            let created = self.gateway.post(R::KIND.path, &body).await?;
            decode_entity(created, &R::KIND)?.ok_or_else(|| CoreError::Parse {
                message: format!("create returned no {}", R::KIND.singular),
            })
        }
        .await;
        self.settle(Operation::Create, result)
    }

    /// Update a member; returns the server's canonical representation.
    pub async fn update<P: Serialize + Sync>(&self, id: &str, payload: &P) -> Result<R, CoreError> {
        self.update.begin();
        let result = async {
            let body = serde_json::to_value(payload)?;
            let updated = self
                .gateway
                .put(&R::KIND.item_path(id), &body)
                .await
                .map_err(|e| not_found_or::<R>(e, id))?;
            decode_entity(updated, &R::KIND)?.ok_or_else(|| CoreError::Parse {
                message: format!("update returned no {}", R::KIND.singular),
            })
        }
        .await;
        self.settle(Operation::Update, result)
    }

    /// Delete a member. The acknowledgment body is ignored.
    pub async fn delete(&self, id: &str) -> Result<(), CoreError> {
        self.delete.begin();
        let result = self
            .gateway
            .delete(&R::KIND.item_path(id))
            .await
            .map(drop)
            .map_err(|e| not_found_or::<R>(e, id));
        self.settle(Operation::Delete, result)
    }

    fn settle<T>(&self, op: Operation, result: Result<T, CoreError>) -> Result<T, CoreError> {
        let tracker = self.tracker(op);
        match result {
            Ok(value) => {
                tracker.finish(None);
                Ok(value)
            }
            Err(e) => {
                let message = e.user_message(&op.failure_message(&R::KIND));
                warn!(
                    resource = R::KIND.singular,
                    op = %op,
                    kind = e.kind(),
                    error = %e,
                    "operation failed"
                );
                tracker.finish(Some(message));
                Err(e)
            }
        }
    }
}

fn not_found_or<R: Resource>(err: sitekit_api::Error, id: &str) -> CoreError {
    if err.is_not_found() {
        CoreError::NotFound {
            resource: R::KIND.singular.to_owned(),
            id: id.to_owned(),
        }
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlogPost;

    #[test]
    fn failure_messages_name_the_collection() {
        let kind = &BlogPost::KIND;
        assert_eq!(Operation::List.failure_message(kind), "Failed to fetch blogs");
        assert_eq!(Operation::Get.failure_message(kind), "Failed to fetch blog");
        assert_eq!(Operation::Delete.failure_message(kind), "Failed to delete blog");
    }

    #[test]
    fn tracker_counts_overlapping_calls() {
        let tracker = Tracker::new();
        tracker.begin();
        tracker.begin();
        tracker.finish(None);
        assert!(tracker.state.borrow().loading);
        tracker.finish(Some("boom".into()));
        let state = tracker.state.borrow().clone();
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("boom"));
    }

    #[test]
    fn concurrent_finishes_never_leave_loading_set() {
        let tracker = Arc::new(Tracker::new());
        for _ in 0..200 {
            let workers: Vec<_> = (0..8)
                .map(|_| {
                    let tracker = Arc::clone(&tracker);
                    std::thread::spawn(move || {
                        tracker.begin();
                        std::thread::yield_now();
                        tracker.finish(None);
                    })
                })
                .collect();
            for worker in workers {
                worker.join().unwrap_or_else(|_| panic!("worker panicked"));
            }
            assert!(!tracker.state.borrow().loading);
            assert_eq!(tracker.in_flight.load(Ordering::SeqCst), 0);
        }
    }
}
