//! Client-side synchronization for a REST-backed site.
//!
//! Keeps paginated, filterable views of server collections (blogs,
//! projects, services) consistent with the server:
//!
//! - [`build_query`] turns a [`CollectionQuery`] into wire parameters,
//!   collapsing "no filter" placeholders once at the UI boundary.
//! - [`CollectionController`] runs list/get/create/update/delete against an
//!   injected [`RequestGateway`], tracking each operation's
//!   `{loading, error}` independently and dropping stale list responses.
//! - [`ListView`] is the paginated list state machine (initial load, load
//!   more, page navigation, debounced search).
//! - [`MutationCoordinator`] refetches a view after a successful mutation
//!   and reports lifecycle messages through a [`Notifier`].

pub mod backend;
pub mod config;
pub mod controller;
pub mod coordinator;
pub mod debounce;
pub mod error;
pub mod list_view;
pub mod model;
pub mod page;
pub mod query;
pub mod stream;

pub use backend::Backend;
pub use config::{ClientConfig, TlsVerification};
pub use controller::{CollectionController, Fetch, Operation, OperationState};
pub use coordinator::{LogNotifier, MutationCoordinator, Notifier};
pub use debounce::DebouncedEffect;
pub use error::CoreError;
pub use list_view::{
    DEFAULT_SEARCH_DEBOUNCE, ListMode, ListOptions, ListPhase, ListView, ListViewState, LoadKind,
    LoadOutcome,
};
pub use model::{
    BlogPost, CreateBlogRequest, CreateProjectRequest, CreateServiceRequest, Project,
    PublishStatus, Resource, ResourceKind, Service, UpdateBlogRequest, UpdateProjectRequest,
    UpdateServiceRequest,
};
pub use page::CollectionPage;
pub use query::{CollectionQuery, FilterKey, WireQuery, build_query, collapse_sentinel};
pub use stream::{ListStream, ListWatchStream};

pub use sitekit_api::{QueryParams, RequestGateway};
