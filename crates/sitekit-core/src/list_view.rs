// ── Paginated list view ──
//
// State machine behind one rendered list: Empty -> Loading(Initial) -> Ready,
// Ready -> Loading(More) -> Ready, with Error reachable from any load and
// retaining whatever was last rendered. Owned by a single view; clones
// share the same state.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::controller::{CollectionController, Fetch, Operation};
use crate::debounce::DebouncedEffect;
use crate::error::CoreError;
use crate::model::Resource;
use crate::page::CollectionPage;
use crate::query::{CollectionQuery, FilterKey};
use crate::stream::ListStream;

/// Default trailing-edge delay for search input.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

// ── State ────────────────────────────────────────────────────────────

/// How successive pages are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    /// Public feed: "load more" appends the next page.
    Accumulate,
    /// Admin table: one page at a time, navigated with `go_to_page`.
    Paged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    /// First page for the current filters.
    Initial,
    /// Next page (append or page change).
    More,
    /// Reload after a mutation.
    Refresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPhase {
    Empty,
    Loading(LoadKind),
    Ready,
    /// The last load failed. Items from the last good load are kept.
    Error,
}

/// Snapshot of a list view.
#[derive(Debug, Clone, PartialEq)]
pub struct ListViewState<T> {
    /// Items rendered, unique by id, in server order.
    pub items: Vec<T>,
    pub current_page: u32,
    pub total_pages: u32,
    /// Never smaller than `items.len()`.
    pub total_count: u64,
    /// Filters the items were loaded for.
    pub filters: FilterKey,
    /// Latest filters asked for. Differs from `filters` while their first
    /// page is loading or after it failed.
    pub requested: FilterKey,
    pub phase: ListPhase,
    pub error: Option<String>,
}

impl<T> Default for ListViewState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current_page: 0,
            total_pages: 0,
            total_count: 0,
            filters: FilterKey::default(),
            requested: FilterKey::default(),
            phase: ListPhase::Empty,
            error: None,
        }
    }
}

impl<T> ListViewState<T> {
    pub fn has_more(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, ListPhase::Loading(_))
    }

    /// `true` once any load has been attempted.
    pub fn is_mounted(&self) -> bool {
        self.phase != ListPhase::Empty
    }

    /// `true` while the requested filters have not produced a page yet.
    pub fn has_pending_filters(&self) -> bool {
        self.requested != self.filters
    }
}

/// Outcome of a load request.
///
/// The view state already reflects the outcome; this is for callers that
/// need to branch on it (the CLI maps `Failed` to an exit code).
#[derive(Debug)]
pub enum LoadOutcome {
    /// The response was applied to the view.
    Applied,
    /// The request failed; the previous items are retained.
    Failed(CoreError),
    /// The response was stale or the view was disposed.
    Discarded,
    /// No request was issued.
    Skipped,
}

impl LoadOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    pub fn into_result(self) -> Result<bool, CoreError> {
        match self {
            Self::Applied => Ok(true),
            Self::Failed(e) => Err(e),
            Self::Discarded | Self::Skipped => Ok(false),
        }
    }
}

// ── Options ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    pub mode: ListMode,
    /// Overrides the collection's default page size for `mode`.
    pub page_size: Option<u32>,
    /// Overrides [`DEFAULT_SEARCH_DEBOUNCE`].
    pub search_debounce: Option<Duration>,
    pub initial_filters: FilterKey,
}

impl ListOptions {
    /// Public feed with "load more".
    pub fn feed() -> Self {
        Self {
            mode: ListMode::Accumulate,
            page_size: None,
            search_debounce: None,
            initial_filters: FilterKey::default(),
        }
    }

    /// Admin table with page navigation.
    pub fn admin() -> Self {
        Self {
            mode: ListMode::Paged,
            ..Self::feed()
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.search_debounce = Some(delay);
        self
    }

    pub fn with_filters(mut self, filters: FilterKey) -> Self {
        self.initial_filters = filters;
        self
    }
}

// ── View ─────────────────────────────────────────────────────────────

struct Inner<R: Resource> {
    controller: Arc<CollectionController<R>>,
    mode: ListMode,
    page_size: u32,
    state: watch::Sender<ListViewState<R>>,
    search: DebouncedEffect<Option<String>>,
    /// Bumped on every filter change and on dispose. A load applies only
    /// if the generation it started under is still current.
    generation: AtomicU64,
    disposed: AtomicBool,
}

/// Paginated, filterable view over one collection.
pub struct ListView<R: Resource> {
    inner: Arc<Inner<R>>,
}

impl<R: Resource> Clone for ListView<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Resource> ListView<R> {
    pub fn new(controller: Arc<CollectionController<R>>, options: ListOptions) -> Self {
        let page_size = options.page_size.unwrap_or(match options.mode {
            ListMode::Accumulate => R::KIND.feed_page_size,
            ListMode::Paged => R::KIND.admin_page_size,
        });
        let (state, _) = watch::channel(ListViewState {
            filters: options.initial_filters.clone(),
            requested: options.initial_filters,
            ..ListViewState::default()
        });

        Self {
            inner: Arc::new(Inner {
                controller,
                mode: options.mode,
                page_size: page_size.max(1),
                state,
                search: DebouncedEffect::new(
                    options.search_debounce.unwrap_or(DEFAULT_SEARCH_DEBOUNCE),
                ),
                generation: AtomicU64::new(0),
                disposed: AtomicBool::new(false),
            }),
        }
    }

    pub fn mode(&self) -> ListMode {
        self.inner.mode
    }

    pub fn page_size(&self) -> u32 {
        self.inner.page_size
    }

    /// Quiet period before typed search text is applied.
    pub fn search_debounce(&self) -> Duration {
        self.inner.search.delay()
    }

    pub fn controller(&self) -> &Arc<CollectionController<R>> {
        &self.inner.controller
    }

    pub fn snapshot(&self) -> ListViewState<R> {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListViewState<R>> {
        self.inner.state.subscribe()
    }

    pub fn stream(&self) -> ListStream<R> {
        ListStream::new(self.subscribe())
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::SeqCst)
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Load page 1 for the current filters, replacing any items.
    pub async fn mount(&self) -> LoadOutcome {
        self.inner.load_first(LoadKind::Initial).await
    }

    /// Cancel the pending search and make in-flight responses no-ops.
    pub fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.inner.search.cancel();
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        debug!(resource = R::KIND.plural, "list view disposed");
    }

    // ── Filters ──────────────────────────────────────────────────────

    /// Record a search keystroke.
    ///
    /// The request fires once input has been quiet for the debounce delay.
    /// Returns `true` if a search was scheduled.
    pub fn set_search(&self, text: &str) -> bool {
        if self.is_disposed() {
            return false;
        }
        let search = FilterKey::default().with_search(text).search().map(str::to_owned);

        let (requested, failed) = {
            let state = self.inner.state.borrow();
            (
                state.requested.search().map(str::to_owned),
                state.phase == ListPhase::Error,
            )
        };
        if search == requested && !failed {
            // Typed back to what is already shown or loading.
            self.inner.search.flush();
            return false;
        }

        let weak: Weak<Inner<R>> = Arc::downgrade(&self.inner);
        let text = search.clone();
        self.inner.search.schedule(search, async move {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let filters = inner
                .state
                .borrow()
                .requested
                .clone()
                .with_search(text.unwrap_or_default());
            inner.apply_filters(filters).await;
        })
    }

    /// Apply search text immediately, dropping any pending debounced search.
    pub async fn search_now(&self, text: &str) -> LoadOutcome {
        self.inner.search.flush();
        let filters = self.inner.state.borrow().requested.clone().with_search(text);
        self.inner.apply_filters(filters).await
    }

    /// Apply a status selection; the "no filter" placeholder clears it.
    pub async fn set_status_filter(&self, selection: &str) -> LoadOutcome {
        let filters = self
            .inner
            .state
            .borrow()
            .requested
            .clone()
            .with_status(R::KIND.status_filter(selection));
        self.inner.apply_filters(filters).await
    }

    /// Apply a category selection; the "no filter" placeholder clears it.
    pub async fn set_category_filter(&self, selection: &str) -> LoadOutcome {
        let filters = self
            .inner
            .state
            .borrow()
            .requested
            .clone()
            .with_category(R::KIND.category_filter(selection));
        self.inner.apply_filters(filters).await
    }

    /// Replace all filters at once.
    pub async fn set_filters(&self, filters: FilterKey) -> LoadOutcome {
        self.inner.search.flush();
        self.inner.apply_filters(filters).await
    }

    // ── Pagination ───────────────────────────────────────────────────

    /// Fetch the next page. Appends in `Accumulate` mode, replaces in
    /// `Paged` mode.
    ///
    /// Skipped unless a page has loaded, more pages exist, and no load is
    /// in flight. Also skipped while a filter change has not loaded its
    /// first page, so pages of different filters never mix.
    pub async fn load_more(&self) -> LoadOutcome {
        let (next, filters) = {
            let state = self.inner.state.borrow();
            if !state.is_mounted()
                || state.is_loading()
                || !state.has_more()
                || state.has_pending_filters()
            {
                return LoadOutcome::Skipped;
            }
            (state.current_page + 1, state.filters.clone())
        };
        let replace = self.inner.mode == ListMode::Paged;
        self.inner
            .load_page(LoadKind::More, next, replace, filters)
            .await
    }

    /// Jump to page `page` (clamped to at least 1), replacing the items.
    ///
    /// Page changes never reset filters or the generation.
    pub async fn go_to_page(&self, page: u32) -> LoadOutcome {
        let filters = self.inner.state.borrow().requested.clone();
        self.inner
            .load_page(LoadKind::More, page.max(1), true, filters)
            .await
    }

    /// Reload from the server after a mutation.
    ///
    /// `Paged` reloads the current page, stepping back if it no longer
    /// exists. `Accumulate` reloads every page shown so far and replaces
    /// the items only if all of them loaded. A filter change that has not
    /// loaded yet is retried from page 1 instead.
    pub async fn refetch(&self) -> LoadOutcome {
        let current = {
            let state = self.inner.state.borrow();
            (state.is_mounted() && !state.has_pending_filters())
                .then(|| (state.current_page.max(1), state.filters.clone()))
        };
        let Some((current, filters)) = current else {
            return self.inner.load_first(LoadKind::Initial).await;
        };

        match self.inner.mode {
            ListMode::Paged => {
                let outcome = self
                    .inner
                    .load_page(LoadKind::Refresh, current, true, filters.clone())
                    .await;
                let step_back = {
                    let state = self.inner.state.borrow();
                    outcome.is_applied()
                        && state.items.is_empty()
                        && current > 1
                        && state.total_pages < current
                };
                if step_back {
                    let last = self.inner.state.borrow().total_pages.max(1);
                    debug!(resource = R::KIND.plural, from = current, to = last, "page vanished");
                    return self
                        .inner
                        .load_page(LoadKind::Refresh, last, true, filters)
                        .await;
                }
                outcome
            }
            ListMode::Accumulate => self.inner.reload_through(current, filters).await,
        }
    }
}

impl<R: Resource> Inner<R> {
    fn is_stale(&self, generation: u64) -> bool {
        self.disposed.load(Ordering::SeqCst) || self.generation.load(Ordering::SeqCst) != generation
    }

    fn query(&self, page: u32, filters: FilterKey) -> CollectionQuery {
        CollectionQuery::new(self.page_size)
            .with_page(page)
            .with_filters(filters)
    }

    async fn apply_filters(&self, filters: FilterKey) -> LoadOutcome {
        if self.disposed.load(Ordering::SeqCst) {
            return LoadOutcome::Skipped;
        }
        {
            // A failed load is retried even for identical filters.
            let state = self.state.borrow();
            if state.is_mounted()
                && state.phase != ListPhase::Error
                && state.requested == filters
            {
                return LoadOutcome::Skipped;
            }
        }

        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.send_modify(|s| s.requested = filters);
        self.load_first(LoadKind::Initial).await
    }

    async fn load_first(&self, kind: LoadKind) -> LoadOutcome {
        let filters = self.state.borrow().requested.clone();
        self.load_page(kind, 1, true, filters).await
    }

    async fn load_page(
        &self,
        kind: LoadKind,
        page: u32,
        replace: bool,
        filters: FilterKey,
    ) -> LoadOutcome {
        if self.disposed.load(Ordering::SeqCst) {
            return LoadOutcome::Skipped;
        }
        let generation = self.generation.load(Ordering::SeqCst);
        self.state.send_modify(|s| s.phase = ListPhase::Loading(kind));

        let result = self.controller.list(&self.query(page, filters.clone())).await;
        if self.is_stale(generation) {
            debug!(resource = R::KIND.plural, page, "discarding response for old filters");
            return LoadOutcome::Discarded;
        }

        match result {
            Ok(Fetch::Current(page)) => {
                self.apply_page(page, replace, filters);
                LoadOutcome::Applied
            }
            Ok(Fetch::Superseded) => LoadOutcome::Discarded,
            Err(e) => {
                self.apply_failure(&e);
                LoadOutcome::Failed(e)
            }
        }
    }

    /// Reload pages `1..=through` sequentially, all or nothing.
    async fn reload_through(&self, through: u32, filters: FilterKey) -> LoadOutcome {
        if self.disposed.load(Ordering::SeqCst) {
            return LoadOutcome::Skipped;
        }
        let generation = self.generation.load(Ordering::SeqCst);
        self.state
            .send_modify(|s| s.phase = ListPhase::Loading(LoadKind::Refresh));

        let mut items = Vec::new();
        let mut last: Option<CollectionPage<R>> = None;
        for page in 1..=through {
            let result = self.controller.list(&self.query(page, filters.clone())).await;
            if self.is_stale(generation) {
                return LoadOutcome::Discarded;
            }
            match result {
                Ok(Fetch::Current(mut fetched)) => {
                    items.append(&mut fetched.items);
                    let exhausted = !fetched.has_more();
                    last = Some(fetched);
                    if exhausted {
                        break;
                    }
                }
                Ok(Fetch::Superseded) => return LoadOutcome::Discarded,
                Err(e) => {
                    self.apply_failure(&e);
                    return LoadOutcome::Failed(e);
                }
            }
        }

        if let Some(mut page) = last {
            page.items = items;
            self.apply_page(page, true, filters);
        }
        LoadOutcome::Applied
    }

    fn apply_page(&self, page: CollectionPage<R>, replace: bool, filters: FilterKey) {
        self.state.send_modify(|s| {
            s.filters = filters;
            if replace {
                s.items = dedupe(page.items);
            } else {
                append_unique(&mut s.items, page.items);
            }
            s.current_page = page.page;
            s.total_pages = page.total_pages;

            let shown = u64::try_from(s.items.len()).unwrap_or(u64::MAX);
            if page.total_count < shown {
                warn!(
                    resource = R::KIND.plural,
                    reported = page.total_count,
                    shown,
                    "server total below items shown; raising total"
                );
                s.total_count = shown;
            } else {
                s.total_count = page.total_count;
            }

            s.phase = ListPhase::Ready;
            s.error = None;
        });
    }

    fn apply_failure(&self, err: &CoreError) {
        let message = err.user_message(&Operation::List.failure_message(&R::KIND));
        self.state.send_modify(|s| {
            s.phase = ListPhase::Error;
            s.error = Some(message);
        });
    }
}

fn dedupe<R: Resource>(items: Vec<R>) -> Vec<R> {
    let mut out = Vec::with_capacity(items.len());
    append_unique(&mut out, items);
    out
}

fn append_unique<R: Resource>(existing: &mut Vec<R>, incoming: Vec<R>) {
    let mut seen: HashSet<String> = existing.iter().map(|item| item.id().to_owned()).collect();
    let offered = incoming.len();
    let before = existing.len();
    existing.extend(
        incoming
            .into_iter()
            .filter(|item| seen.insert(item.id().to_owned())),
    );
    let dropped = offered - (existing.len() - before);
    if dropped > 0 {
        debug!(resource = R::KIND.plural, dropped, "skipped duplicate items");
    }
}
