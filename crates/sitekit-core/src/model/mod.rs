// ── Domain model ──
//
// Resource types served by the site backend, plus the static metadata
// (`ResourceKind`) the synchronization layer needs to talk about them.

pub mod blog;
pub mod common;
pub mod project;
pub mod service;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use blog::{BlogPost, CreateBlogRequest, UpdateBlogRequest};
pub use common::PublishStatus;
pub use project::{CreateProjectRequest, Project, UpdateProjectRequest};
pub use service::{CreateServiceRequest, Service, UpdateServiceRequest};

use crate::query;

/// A server-side collection member.
///
/// `KIND` describes where the collection lives and how it is labelled;
/// `id` is the server-assigned identity used for de-duplication.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: ResourceKind;

    fn id(&self) -> &str;
}

/// Static description of one collection type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceKind {
    /// REST path relative to the API base, e.g. `"blogs"`.
    pub path: &'static str,
    /// Key holding the item array in list responses, e.g. `"blogs"`.
    pub list_key: &'static str,
    /// Key wrapping a single entity in detail/mutation responses.
    pub entity_key: &'static str,
    /// Lowercase singular label used in messages ("blog").
    pub singular: &'static str,
    /// Lowercase plural label used in messages ("blogs").
    pub plural: &'static str,
    /// UI placeholder meaning "no status filter".
    pub status_sentinel: &'static str,
    /// UI placeholder meaning "no category filter".
    pub category_sentinel: &'static str,
    /// Page size for public feeds.
    pub feed_page_size: u32,
    /// Page size for admin tables.
    pub admin_page_size: u32,
    /// Sub-path that records a view on the detail endpoint, if tracked.
    pub view_path: Option<&'static str>,
}

impl ResourceKind {
    /// Path of a single member, e.g. `blogs/42`.
    pub fn item_path(&self, id: &str) -> String {
        format!("{}/{id}", self.path)
    }

    /// Collapse a UI status selection into an optional filter.
    pub fn status_filter(&self, selection: &str) -> Option<String> {
        query::collapse_sentinel(selection, self.status_sentinel)
    }

    /// Collapse a UI category selection into an optional filter.
    pub fn category_filter(&self, selection: &str) -> Option<String> {
        query::collapse_sentinel(selection, self.category_sentinel)
    }
}

pub(crate) const DEFAULT_STATUS_SENTINEL: &str = "All Status";
pub(crate) const DEFAULT_CATEGORY_SENTINEL: &str = "All Categories";
pub(crate) const ADMIN_PAGE_SIZE: u32 = 10;
