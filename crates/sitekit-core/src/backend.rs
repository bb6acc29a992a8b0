// ── Backend facade ──
//
// Entry point for consumers: holds one shared gateway and hands out
// per-view controllers, list views, and coordinators.

use std::sync::Arc;

use tracing::debug;

use sitekit_api::{HttpGateway, RequestGateway};

use crate::config::ClientConfig;
use crate::controller::CollectionController;
use crate::coordinator::{LogNotifier, MutationCoordinator, Notifier};
use crate::error::CoreError;
use crate::list_view::{ListMode, ListOptions, ListView};
use crate::model::Resource;

/// Handle to one site backend.
///
/// Cheaply cloneable. Each call to [`collection`](Self::collection) creates
/// a fresh controller, so separate views never supersede each other's
/// list requests.
#[derive(Clone)]
pub struct Backend {
    gateway: Arc<dyn RequestGateway>,
    config: Arc<ClientConfig>,
}

impl Backend {
    /// Connect over HTTP using `config`.
    pub fn new(config: ClientConfig) -> Result<Self, CoreError> {
        let gateway = HttpGateway::new(
            config.base_url.as_str(),
            &config.transport(),
            config.api_token.as_ref(),
        )?;
        debug!(base_url = %gateway.base_url(), "backend ready");
        Ok(Self::with_gateway(Arc::new(gateway), config))
    }

    /// Use a caller-supplied gateway (tests, alternative transports).
    pub fn with_gateway(gateway: Arc<dyn RequestGateway>, config: ClientConfig) -> Self {
        Self {
            gateway,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// A new controller for collection `R`.
    pub fn collection<R: Resource>(&self) -> Arc<CollectionController<R>> {
        Arc::new(CollectionController::new(Arc::clone(&self.gateway)))
    }

    /// A new list view. Configured page size and debounce fill in whatever
    /// `options` leaves unset.
    pub fn list_view<R: Resource>(&self, mut options: ListOptions) -> ListView<R> {
        if options.page_size.is_none() {
            options.page_size = match options.mode {
                ListMode::Accumulate => self.config.feed_page_size,
                ListMode::Paged => self.config.admin_page_size,
            };
        }
        if options.search_debounce.is_none() {
            options.search_debounce = Some(self.config.search_debounce);
        }
        ListView::new(self.collection(), options)
    }

    /// Coordinator bound to `view`, reporting through `notifier`.
    pub fn coordinator<R: Resource>(
        &self,
        view: &ListView<R>,
        notifier: Arc<dyn Notifier>,
    ) -> MutationCoordinator<R> {
        MutationCoordinator::for_view(view.clone(), notifier)
    }

    /// Coordinator without a view, logging lifecycle messages.
    pub fn mutations<R: Resource>(&self) -> MutationCoordinator<R> {
        MutationCoordinator::new(self.collection(), Arc::new(LogNotifier))
    }
}
