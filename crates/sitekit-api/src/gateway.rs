// ── Request gateway capability ──
//
// The only suspension point of the synchronization layer. Everything
// above this trait is synchronous bookkeeping around its futures.

use async_trait::async_trait;
use serde_json::Value;

use crate::Error;

/// Ordered `(key, value)` query pairs. Order is preserved on the wire.
pub type QueryParams = [(&'static str, String)];

/// Issues HTTP calls against the backend and returns raw JSON bodies.
///
/// Paths are relative to the API base (e.g. `"blogs"`, `"blogs/42"`).
/// Implementations reject with [`Error::Api`] for non-success statuses so
/// callers can read the status and the optional server message.
#[async_trait]
pub trait RequestGateway: Send + Sync {
    async fn get(&self, path: &str, query: &QueryParams) -> Result<Value, Error>;

    async fn post(&self, path: &str, body: &Value) -> Result<Value, Error>;

    async fn put(&self, path: &str, body: &Value) -> Result<Value, Error>;

    async fn delete(&self, path: &str) -> Result<Value, Error>;
}
