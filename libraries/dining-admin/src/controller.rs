//! The list controller: pagination, filtering, and mutations for one list view.
//!
//! A controller owns one [`ListState`] and is the only thing that changes
//! it. Every transition goes `Idle -> Loading -> (Loaded | Errored)` and
//! back to `Loading` on the next change. Failures are caught here: they
//! become an `Errored` phase plus a notification, or a silent return to
//! `Idle` when the gateway has already sent the user to the login view.

use crate::debounce::Debouncer;
use crate::notify::{Notification, Notifier};
use crate::state::{window, ListPhase, ListSnapshot, ListState, ResidualFilter};
use dining_client::{
    ClientError, ListQuery, ListSource, MealEditing, RestaurantModeration, UserAdministration,
};
use dining_core::{Entity, Meal, MealDraft, NewRestaurant, Restaurant, RestaurantStatus, User};
use std::marker::PhantomData;
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Filter key used by [`ListController::search`].
pub const SEARCH_KEY: &str = "search";

/// Per-list parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListConfig {
    /// Rows per page
    pub page_size: u32,
    /// Filters re-applied locally after each response
    pub residual_filters: Vec<ResidualFilter>,
    /// Quiet period before a search is sent
    pub debounce: Duration,
}

impl ListConfig {
    /// A list with no residual filters and the default 300 ms debounce.
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            residual_filters: Vec::new(),
            debounce: Duration::from_millis(300),
        }
    }

    /// Users: the server paginates and searches.
    pub fn users() -> Self {
        Self::new(100).with_debounce(Duration::from_millis(500))
    }

    /// Restaurants: the server returns everything, search is local.
    pub fn restaurants() -> Self {
        Self::new(9).with_residual(ResidualFilter::search())
    }

    /// Meals: search and restaurant filters are re-applied locally.
    pub fn meals() -> Self {
        Self::new(9)
            .with_residual(ResidualFilter::search())
            .with_residual(ResidualFilter::restaurant())
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_residual(mut self, filter: ResidualFilter) -> Self {
        self.residual_filters.push(filter);
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}

/// Receives a snapshot after every state change.
pub trait RenderSink<E>: Send + Sync {
    fn render(&self, snapshot: &ListSnapshot<E>);
}

struct Inner<E> {
    state: ListState<E>,
    /// Sequence number of the newest request; older responses are dropped
    seq: u64,
}

/// Drives one list view against a [`ListSource`].
///
/// Cloning is cheap: clones share state, so a clone moved into a debounced
/// task updates the same list.
pub struct ListController<E, S> {
    source: Arc<S>,
    config: Arc<ListConfig>,
    inner: Arc<RwLock<Inner<E>>>,
    notifier: Arc<dyn Notifier>,
    sink: Option<Arc<dyn RenderSink<E>>>,
    debouncer: Debouncer,
    _entity: PhantomData<fn() -> E>,
}

impl<E, S> Clone for ListController<E, S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            config: Arc::clone(&self.config),
            inner: Arc::clone(&self.inner),
            notifier: Arc::clone(&self.notifier),
            sink: self.sink.clone(),
            debouncer: self.debouncer.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E, S> ListController<E, S>
where
    E: Entity,
    S: ListSource<E>,
{
    pub fn new(source: S, config: ListConfig, notifier: Arc<dyn Notifier>) -> Self {
        let debouncer = Debouncer::new(config.debounce);
        Self {
            source: Arc::new(source),
            inner: Arc::new(RwLock::new(Inner {
                state: ListState::new(config.page_size),
                seq: 0,
            })),
            config: Arc::new(config),
            notifier,
            sink: None,
            debouncer,
            _entity: PhantomData,
        }
    }

    /// Render every state change into `sink`.
    pub fn with_sink(mut self, sink: Arc<dyn RenderSink<E>>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Current state with derived pagination values.
    pub fn snapshot(&self) -> ListSnapshot<E> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        ListSnapshot::from(&inner.state)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner<E>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn render(&self) {
        if let Some(sink) = &self.sink {
            sink.render(&self.snapshot());
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Set (or, with an empty value, remove) a filter and reload page 1.
    pub async fn set_filter(&self, key: &str, value: &str) {
        {
            let mut inner = self.write();
            let value = value.trim();
            if value.is_empty() {
                inner.state.filters.remove(key);
            } else {
                inner.state.filters.insert(key.to_string(), value.to_string());
            }
            inner.state.page = 1;
        }
        debug!(kind = %E::KIND, key, value, "Filter changed");
        self.refresh().await;
    }

    /// Replace several filters at once and reload page 1 with a single request.
    ///
    /// Pairs with an empty value remove that filter.
    pub async fn set_filters<I, K, V>(&self, filters: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        {
            let mut inner = self.write();
            for (key, value) in filters {
                let key = key.into();
                let value = value.as_ref().trim();
                if value.is_empty() {
                    inner.state.filters.remove(&key);
                } else {
                    inner.state.filters.insert(key, value.to_string());
                }
            }
            inner.state.page = 1;
        }
        self.refresh().await;
    }

    /// Debounced `search` filter change.
    ///
    /// The returned handle resolves to `false` when a later keystroke
    /// superseded this one.
    pub fn search(&self, value: &str) -> JoinHandle<bool> {
        let this = self.clone();
        let value = value.trim().to_string();
        self.debouncer.call(async move {
            this.set_filter(SEARCH_KEY, &value).await;
        })
    }

    /// Go to page `n`, clamped to the known pages. No-op when already there.
    pub async fn set_page(&self, n: u32) {
        {
            let mut inner = self.write();
            let last = inner.state.total_pages().max(1);
            let target = n.clamp(1, last);
            if target == inner.state.page {
                return;
            }
            inner.state.page = target;
        }
        self.refresh().await;
    }

    pub async fn first_page(&self) {
        self.set_page(1).await;
    }

    pub async fn previous_page(&self) {
        let page = self.snapshot().page;
        self.set_page(page.saturating_sub(1)).await;
    }

    pub async fn next_page(&self) {
        let page = self.snapshot().page;
        self.set_page(page.saturating_add(1)).await;
    }

    pub async fn last_page(&self) {
        let pages = self.snapshot().total_pages;
        self.set_page(pages).await;
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Fetch the current page and fit it into the state.
    ///
    /// A response that arrives after a newer request was issued is dropped.
    pub async fn refresh(&self) {
        let (mut seq, mut query) = self.begin_request(None);
        self.render();

        let mut refetched = false;
        loop {
            let result = self.source.fetch(&query).await;

            let notification = {
                let mut inner = self.write();
                if inner.seq != seq {
                    debug!(kind = %E::KIND, seq, latest = inner.seq, "Discarding stale response");
                    return;
                }

                match result {
                    Ok(fetched) => {
                        let server_total = fetched.server_total;
                        let state = &inner.state;
                        let windowed = window(
                            fetched,
                            state.page,
                            state.page_size,
                            &state.filters,
                            &self.config.residual_filters,
                        );

                        if windowed.needs_refetch && !refetched {
                            debug!(kind = %E::KIND, page = state.page, "Page no longer exists, reloading page 1");
                            drop(inner);
                            refetched = true;
                            (seq, query) = self.begin_request(Some(1));
                            continue;
                        }

                        let state = &mut inner.state;
                        state.items = windowed.items;
                        state.total_count = windowed.total_count;
                        state.page = windowed.page;
                        state.server_total = server_total;
                        state.phase = ListPhase::Loaded;
                        state.last_error = None;
                        debug!(
                            kind = %E::KIND,
                            page = state.page,
                            rows = state.items.len(),
                            total = state.total_count,
                            "List loaded"
                        );
                        None
                    }
                    Err(e) if e.is_auth() => {
                        debug!(kind = %E::KIND, "List load ended in login redirect");
                        inner.state.phase = ListPhase::Idle;
                        None
                    }
                    Err(e) => {
                        warn!(kind = %E::KIND, error = %e, "Failed to load list");
                        let message = e.user_message();
                        inner.state.phase = ListPhase::Errored;
                        inner.state.last_error = Some(message.clone());
                        Some(Notification::error(format!(
                            "Failed to load {}: {}",
                            E::KIND.collection_key(),
                            message
                        )))
                    }
                }
            };

            if let Some(notification) = notification {
                self.notifier.notify(notification);
            }
            break;
        }

        self.render();
    }

    /// Issue a new request number and build the query for the current state.
    fn begin_request(&self, page: Option<u32>) -> (u64, ListQuery) {
        let mut inner = self.write();
        if let Some(page) = page {
            inner.state.page = page;
        }
        inner.seq += 1;
        inner.state.phase = ListPhase::Loading;
        inner.state.last_error = None;

        let mut query = ListQuery::new(inner.state.page, inner.state.page_size);
        query.filters = inner.state.filters.clone();
        (inner.seq, query)
    }

    // =========================================================================
    // Local patching after successful mutations
    // =========================================================================

    fn position(items: &[E], id: &str) -> Option<usize> {
        items.iter().position(|item| item.id() == Some(id))
    }

    fn patch_item(&self, id: &str, patch: impl FnOnce(&mut E)) {
        {
            let mut inner = self.write();
            if let Some(index) = Self::position(&inner.state.items, id) {
                patch(&mut inner.state.items[index]);
            }
        }
        self.render();
    }

    /// Remove a row and shrink the total. Reloads when the page emptied out
    /// past the new last page.
    async fn remove_item(&self, id: &str) {
        let reload = {
            let mut inner = self.write();
            let state = &mut inner.state;
            if let Some(index) = Self::position(&state.items, id) {
                state.items.remove(index);
                state.total_count = state.total_count.saturating_sub(1);
                state.server_total = state.server_total.map(|t| t.saturating_sub(1));
            }
            let last = state.total_pages().max(1);
            if state.page > last {
                state.page = last;
                true
            } else {
                false
            }
        };

        if reload {
            self.refresh().await;
        } else {
            self.render();
        }
    }

    /// Put a new row at the top of the page, keeping at most a page of rows.
    fn insert_item(&self, item: E) {
        {
            let mut inner = self.write();
            let state = &mut inner.state;
            state.items.insert(0, item);
            state.items.truncate(state.page_size as usize);
            state.total_count += 1;
            state.server_total = state.server_total.map(|t| t + 1);
        }
        self.render();
    }

    fn replace_item(&self, id: &str, item: E) {
        self.patch_item(id, |current| *current = item);
    }

    fn succeeded(&self, message: &str) {
        self.notifier.notify(Notification::success(message));
    }

    fn failed(&self, err: &ClientError, fallback: &str) {
        if err.is_auth() {
            debug!(kind = %E::KIND, "Mutation ended in login redirect");
            return;
        }
        warn!(kind = %E::KIND, error = %err, "{}", fallback);
        let message = match err {
            ClientError::Api { message, .. } | ClientError::InvalidInput(message) => {
                message.clone()
            }
            _ => fallback.to_string(),
        };
        self.notifier.notify(Notification::error(message));
    }
}

// =============================================================================
// Restaurant moderation
// =============================================================================

impl<S: RestaurantModeration> ListController<Restaurant, S> {
    /// Approve a pending listing and mark its row approved.
    pub async fn approve(&self, id: &str) -> bool {
        match self.source.set_status(id, RestaurantStatus::Approved, None).await {
            Ok(()) => {
                info!(restaurant_id = %id, "Restaurant approved");
                self.patch_item(id, |r| {
                    r.status = RestaurantStatus::Approved;
                    r.rejection_reason = None;
                });
                self.succeeded("Restaurant approved successfully");
                true
            }
            Err(e) => {
                self.failed(&e, "Failed to approve restaurant");
                false
            }
        }
    }

    /// Reject a listing with a reason and mark its row rejected.
    pub async fn reject(&self, id: &str, reason: &str) -> bool {
        match self
            .source
            .set_status(id, RestaurantStatus::Rejected, Some(reason))
            .await
        {
            Ok(()) => {
                info!(restaurant_id = %id, "Restaurant rejected");
                let reason = reason.trim().to_string();
                self.patch_item(id, move |r| {
                    r.status = RestaurantStatus::Rejected;
                    r.rejection_reason = Some(reason);
                });
                self.succeeded("Restaurant rejected successfully");
                true
            }
            Err(e) => {
                self.failed(&e, "Failed to reject restaurant");
                false
            }
        }
    }

    /// Delete a listing and drop its row.
    pub async fn delete_restaurant(&self, id: &str) -> bool {
        match self.source.delete_restaurant(id).await {
            Ok(()) => {
                self.remove_item(id).await;
                self.succeeded("Restaurant deleted successfully");
                true
            }
            Err(e) => {
                self.failed(&e, "Failed to delete restaurant. Please try again.");
                false
            }
        }
    }

    /// Create a listing; the row is added locally when the server echoes
    /// the record, otherwise the list is reloaded.
    pub async fn create_restaurant(&self, restaurant: &NewRestaurant) -> bool {
        match self.source.create_restaurant(restaurant).await {
            Ok(Some(created)) => {
                self.insert_item(created);
                self.succeeded("Restaurant added successfully!");
                true
            }
            Ok(None) => {
                self.succeeded("Restaurant added successfully!");
                self.refresh().await;
                true
            }
            Err(e) => {
                self.failed(&e, "Failed to add restaurant. Please try again.");
                false
            }
        }
    }
}

// =============================================================================
// Meal editing
// =============================================================================

impl<S: MealEditing> ListController<Meal, S> {
    /// Create a meal and show it at the top of the page.
    pub async fn create_meal(&self, draft: &MealDraft) -> bool {
        match self.source.create_meal(draft).await {
            Ok(Some(created)) => {
                self.insert_item(created);
                self.succeeded("Meal created successfully");
                true
            }
            Ok(None) => {
                self.succeeded("Meal created successfully");
                self.refresh().await;
                true
            }
            Err(e) => {
                self.failed(&e, "Failed to create meal. Please try again.");
                false
            }
        }
    }

    /// Update a meal and replace its row.
    pub async fn update_meal(&self, id: &str, draft: &MealDraft) -> bool {
        match self.source.update_meal(id, draft).await {
            Ok(Some(updated)) => {
                self.replace_item(id, updated);
                self.succeeded("Meal updated successfully");
                true
            }
            Ok(None) => {
                self.patch_item(id, |meal| meal.apply_draft(draft));
                self.succeeded("Meal updated successfully");
                true
            }
            Err(e) => {
                self.failed(&e, "Failed to update meal. Please try again.");
                false
            }
        }
    }
}

// =============================================================================
// User administration
// =============================================================================

impl<S: UserAdministration> ListController<User, S> {
    /// Delete an account and drop its row.
    pub async fn delete_user(&self, id: &str) -> bool {
        match self.source.delete_user(id).await {
            Ok(()) => {
                self.remove_item(id).await;
                self.succeeded("User deleted successfully");
                true
            }
            Err(e) => {
                self.failed(&e, "Failed to delete user");
                false
            }
        }
    }
}
