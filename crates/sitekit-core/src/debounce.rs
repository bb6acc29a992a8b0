// ── Debounced effect ──
//
// Trailing-edge debounce keyed on dependency identity. Each distinct key
// restarts the timer; the effect for the last key runs once the input
// has been quiet for `delay`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use tokio_util::sync::CancellationToken;
use tracing::trace;

struct Pending<K> {
    key: K,
    token: CancellationToken,
}

/// A reusable debounced effect.
///
/// Cancelling (or dropping) the debouncer cancels any pending effect and
/// refuses new ones, so nothing fires against a disposed owner.
pub struct DebouncedEffect<K> {
    delay: Duration,
    pending: ArcSwapOption<Pending<K>>,
    root: CancellationToken,
}

impl<K> DebouncedEffect<K>
where
    K: PartialEq + Send + Sync + 'static,
{
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: ArcSwapOption::empty(),
            root: CancellationToken::new(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `effect` for `key`, replacing whatever was pending.
    ///
    /// Returns `false` without rescheduling when `key` equals the pending
    /// key (the dependency did not change) or the debouncer was cancelled.
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, key: K, effect: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.root.is_cancelled() {
            return false;
        }
        let current = self.pending.load();
        if let Some(current) = &*current {
            if current.key == key && !current.token.is_cancelled() {
                return false;
            }
        }
        drop(current);

        let token = self.root.child_token();
        let next = Arc::new(Pending {
            key,
            token: token.clone(),
        });
        if let Some(previous) = self.pending.swap(Some(next)) {
            trace!("debounce timer reset");
            previous.token.cancel();
        }

        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                biased;

                () = token.cancelled() => {}
                () = tokio::time::sleep(delay) => {
                    // Fired: the same key may be scheduled again later.
                    token.cancel();
                    effect.await;
                }
            }
        });
        true
    }

    /// Drop the pending effect, if any, without disabling the debouncer.
    pub fn flush(&self) {
        if let Some(previous) = self.pending.swap(None) {
            previous.token.cancel();
        }
    }

    /// Cancel the pending effect and refuse all future ones.
    pub fn cancel(&self) {
        self.root.cancel();
        self.pending.store(None);
    }

    pub fn is_cancelled(&self) -> bool {
        self.root.is_cancelled()
    }
}

impl<K> Drop for DebouncedEffect<K> {
    fn drop(&mut self) {
        self.root.cancel();
    }
}
