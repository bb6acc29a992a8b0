// Scripted in-memory gateway for controller, list view, and coordinator tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use sitekit_api::{Error, QueryParams, RequestGateway};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// One recorded gateway call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Call {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn page(&self) -> u32 {
        self.param("page").and_then(|p| p.parse().ok()).unwrap_or(1)
    }

    /// `page=1&limit=10&...` in wire order.
    pub fn query_string(&self) -> String {
        self.query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Scripted response: an optional delay, then a result.
pub struct Reply {
    pub delay: Duration,
    pub result: Result<Value, Error>,
}

impl Reply {
    pub fn ok(body: Value) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(body),
        }
    }

    pub fn status(status: u16, message: Option<&str>) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(Error::Api {
                status,
                message: message.map(str::to_owned),
            }),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(Error::Timeout { timeout_secs: 30 }),
        }
    }

    pub fn after(mut self, millis: u64) -> Self {
        self.delay = Duration::from_millis(millis);
        self
    }
}

type Handler = Box<dyn Fn(&Call) -> Reply + Send + Sync>;

/// Gateway answering every call through a handler closure.
pub struct FakeGateway {
    calls: Mutex<Vec<Call>>,
    handler: Handler,
}

impl FakeGateway {
    pub fn new(handler: impl Fn(&Call) -> Reply + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            handler: Box::new(handler),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: Method) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method)
            .collect()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    async fn dispatch(&self, call: Call) -> Result<Value, Error> {
        let reply = (self.handler)(&call);
        self.calls.lock().unwrap().push(call);
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        reply.result
    }
}

#[async_trait]
impl RequestGateway for FakeGateway {
    async fn get(&self, path: &str, query: &QueryParams) -> Result<Value, Error> {
        let query = query
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect();
        self.dispatch(Call {
            method: Method::Get,
            path: path.to_owned(),
            query,
            body: None,
        })
        .await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, Error> {
        self.dispatch(Call {
            method: Method::Post,
            path: path.to_owned(),
            query: Vec::new(),
            body: Some(body.clone()),
        })
        .await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Value, Error> {
        self.dispatch(Call {
            method: Method::Put,
            path: path.to_owned(),
            query: Vec::new(),
            body: Some(body.clone()),
        })
        .await
    }

    async fn delete(&self, path: &str) -> Result<Value, Error> {
        self.dispatch(Call {
            method: Method::Delete,
            path: path.to_owned(),
            query: Vec::new(),
            body: None,
        })
        .await
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────

pub fn blog(id: &str) -> Value {
    json!({ "_id": id, "title": format!("Post {id}"), "status": "published" })
}

/// A `blogs` list body with ids `{prefix}{start}..{prefix}{start+count}`.
pub fn blog_page(prefix: &str, start: usize, count: usize, total: u64, total_pages: u32) -> Value {
    let items: Vec<Value> = (start..start + count)
        .map(|i| blog(&format!("{prefix}{i}")))
        .collect();
    json!({ "blogs": items, "total": total, "totalPages": total_pages })
}

/// Server-side blog store that pages, searches, and deletes like the backend.
pub struct BlogStore {
    ids: Mutex<Vec<String>>,
}

impl BlogStore {
    pub fn with_ids(count: usize) -> Arc<Self> {
        Arc::new(Self {
            ids: Mutex::new((1..=count).map(|i| format!("b{i}")).collect()),
        })
    }

    pub fn ids(&self) -> Vec<String> {
        self.ids.lock().unwrap().clone()
    }

    pub fn handle(&self, call: &Call) -> Reply {
        match call.method {
            Method::Get => {
                let limit: usize = call.param("limit").and_then(|l| l.parse().ok()).unwrap_or(10);
                let page = call.page() as usize;
                let ids = self.ids();
                let matching: Vec<&String> = ids
                    .iter()
                    .filter(|id| call.param("search").is_none_or(|s| id.contains(s)))
                    .collect();
                let total = matching.len();
                let items: Vec<Value> = matching
                    .iter()
                    .skip((page - 1) * limit)
                    .take(limit)
                    .map(|id| blog(id))
                    .collect();
                Reply::ok(json!({
                    "blogs": items,
                    "total": total,
                    "totalPages": total.div_ceil(limit),
                }))
            }
            Method::Delete => {
                let id = call.path.trim_start_matches("blogs/").to_owned();
                let mut ids = self.ids.lock().unwrap();
                let before = ids.len();
                ids.retain(|existing| *existing != id);
                if ids.len() == before {
                    Reply::status(404, Some("Blog not found"))
                } else {
                    Reply::ok(json!({ "message": "Blog deleted" }))
                }
            }
            Method::Post if call.path != "blogs" => Reply::ok(json!({})),
            Method::Post => {
                let mut ids = self.ids.lock().unwrap();
                let id = format!("b{}", ids.len() + 100);
                ids.insert(0, id.clone());
                let mut created = call.body.clone().unwrap_or_else(|| json!({}));
                created["_id"] = json!(id);
                Reply::ok(json!({ "blog": created }))
            }
            Method::Put => {
                let mut updated = call.body.clone().unwrap_or_else(|| json!({}));
                updated["_id"] = json!(call.path.trim_start_matches("blogs/"));
                Reply::ok(updated)
            }
        }
    }
}
