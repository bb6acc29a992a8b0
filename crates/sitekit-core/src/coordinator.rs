// ── Mutation-consistency coordinator ──
//
// Runs a mutation, reports its lifecycle to a `Notifier`, and on success
// invalidates the list view by refetching it from the server. A failed
// mutation leaves the list untouched.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::controller::{CollectionController, Operation};
use crate::error::{CoreError, capitalize};
use crate::list_view::{ListView, LoadOutcome};
use crate::model::Resource;

/// Lifecycle callbacks for mutations, implemented by the host UI.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn on_started(&self, message: &str);
    async fn on_succeeded(&self, message: &str);
    async fn on_failed(&self, message: &str);
}

/// Notifier that writes lifecycle messages to the tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn on_started(&self, message: &str) {
        debug!("{message}");
    }

    async fn on_succeeded(&self, message: &str) {
        info!("{message}");
    }

    async fn on_failed(&self, message: &str) {
        error!("{message}");
    }
}

fn started_message(op: Operation, singular: &str) -> String {
    let verb = match op {
        Operation::Create => "Creating",
        Operation::Update => "Updating",
        Operation::Delete => "Deleting",
        Operation::List | Operation::Get => "Loading",
    };
    format!("{verb} {singular}…")
}

fn succeeded_message(op: Operation, singular: &str) -> String {
    let done = match op {
        Operation::Create => "created",
        Operation::Update => "updated",
        Operation::Delete => "deleted",
        Operation::List | Operation::Get => "loaded",
    };
    format!("{} {done}", capitalize(singular))
}

/// Applies mutations and keeps an optional list view consistent with them.
pub struct MutationCoordinator<R: Resource> {
    controller: Arc<CollectionController<R>>,
    view: Option<ListView<R>>,
    notifier: Arc<dyn Notifier>,
}

impl<R: Resource> MutationCoordinator<R> {
    pub fn new(controller: Arc<CollectionController<R>>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            controller,
            view: None,
            notifier,
        }
    }

    /// Coordinator for the view's own controller.
    pub fn for_view(view: ListView<R>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            controller: Arc::clone(view.controller()),
            view: Some(view),
            notifier,
        }
    }

    pub fn view(&self) -> Option<&ListView<R>> {
        self.view.as_ref()
    }

    pub async fn create<P: Serialize + Sync>(&self, payload: &P) -> Result<R, CoreError> {
        self.run(Operation::Create, self.controller.create(payload)).await
    }

    pub async fn update<P: Serialize + Sync>(&self, id: &str, payload: &P) -> Result<R, CoreError> {
        self.run(Operation::Update, self.controller.update(id, payload)).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), CoreError> {
        self.run(Operation::Delete, self.controller.delete(id)).await
    }

    async fn run<T>(
        &self,
        op: Operation,
        mutation: impl Future<Output = Result<T, CoreError>> + Send,
    ) -> Result<T, CoreError> {
        let singular = R::KIND.singular;
        self.notifier.on_started(&started_message(op, singular)).await;

        match mutation.await {
            Ok(value) => {
                self.notifier
                    .on_succeeded(&succeeded_message(op, singular))
                    .await;
                self.invalidate().await;
                Ok(value)
            }
            Err(e) => {
                self.notifier
                    .on_failed(&e.user_message(&op.failure_message(&R::KIND)))
                    .await;
                Err(e)
            }
        }
    }

    /// Refetch the view. Its failure lands in the view state, not here.
    async fn invalidate(&self) {
        let Some(view) = &self.view else {
            return;
        };
        if let LoadOutcome::Failed(e) = view.refetch().await {
            debug!(resource = R::KIND.plural, error = %e, "refetch after mutation failed");
        }
    }
}
