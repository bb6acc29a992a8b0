// ── Reactive list streams ──
//
// Subscription types for consuming list view changes.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::list_view::ListViewState;
use crate::model::Resource;

/// A subscription to one list view.
///
/// Offers the snapshot taken at creation, the latest snapshot, and change
/// notification via `changed()` or by converting to a `Stream`.
pub struct ListStream<R: Resource> {
    current: ListViewState<R>,
    receiver: watch::Receiver<ListViewState<R>>,
}

impl<R: Resource> ListStream<R> {
    pub(crate) fn new(receiver: watch::Receiver<ListViewState<R>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    pub fn current(&self) -> &ListViewState<R> {
        &self.current
    }

    pub fn latest(&self) -> ListViewState<R> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change. `None` once the view is gone.
    pub async fn changed(&mut self) -> Option<ListViewState<R>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    pub fn into_stream(self) -> ListWatchStream<R> {
        ListWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` of list snapshots backed by a `watch::Receiver`.
///
/// Yields the current snapshot first, then one per change.
pub struct ListWatchStream<R: Resource> {
    inner: WatchStream<ListViewState<R>>,
}

impl<R: Resource> Stream for ListWatchStream<R> {
    type Item = ListViewState<R>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
