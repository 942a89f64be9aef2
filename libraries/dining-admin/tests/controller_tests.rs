//! Tests for the list controller.
//!
//! Most tests drive the controller with in-memory sources; the
//! authentication tests go through the real HTTP client against a mock
//! server.

use async_trait::async_trait;
use dining_admin::{
    Level, ListConfig, ListController, ListPhase, ListSnapshot, NotificationLog, RenderSink,
};
use dining_client::{
    ClientError, DiningClient, EnvelopeShape, FetchedPage, GatewayConfig, ListQuery, ListSource,
    LoginRedirect, MealEditing, MemorySessionStore, RestaurantModeration, SessionStore,
    UserAdministration,
};
use dining_core::{
    Entity, Meal, MealDraft, NewRestaurant, Restaurant, RestaurantStatus, Session, SessionUser,
    User,
};
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Fakes
// =============================================================================

/// In-memory source. Ignores filters unless `server_search` is set, and
/// ignores pagination unless `paginate` is set.
struct FakeSource<E> {
    items: Mutex<Vec<E>>,
    server_total: Option<u64>,
    paginate: bool,
    server_search: bool,
    search_delays: bool,
    fail_fetch: AtomicBool,
    fail_mutations: AtomicBool,
    queries: Mutex<Vec<ListQuery>>,
    mutations: Mutex<Vec<String>>,
}

impl<E: Entity> FakeSource<E> {
    fn new(items: Vec<E>) -> Self {
        Self {
            items: Mutex::new(items),
            server_total: None,
            paginate: false,
            server_search: false,
            search_delays: false,
            fail_fetch: AtomicBool::new(false),
            fail_mutations: AtomicBool::new(false),
            queries: Mutex::new(Vec::new()),
            mutations: Mutex::new(Vec::new()),
        }
    }

    fn fetches(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    fn last_query(&self) -> ListQuery {
        self.queries.lock().unwrap().last().cloned().unwrap()
    }

    fn mutations(&self) -> Vec<String> {
        self.mutations.lock().unwrap().clone()
    }

    fn mutate(&self, what: String) -> Result<(), ClientError> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(ClientError::Api {
                status: 500,
                message: "Internal server error".into(),
            });
        }
        self.mutations.lock().unwrap().push(what);
        Ok(())
    }
}

#[async_trait]
impl<E: Entity> ListSource<E> for FakeSource<E> {
    async fn fetch(&self, query: &ListQuery) -> Result<FetchedPage<E>, ClientError> {
        self.queries.lock().unwrap().push(query.clone());
        let search = query.filters.get("search").cloned().unwrap_or_default();

        if self.search_delays {
            let delay = if search == "slow" { 500 } else { 10 };
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(ClientError::Api {
                status: 503,
                message: "Service unavailable".into(),
            });
        }

        let mut items = self.items.lock().unwrap().clone();
        if self.server_search {
            items.retain(|item| item.matches_search(&search));
        }
        let total = self.server_total.unwrap_or(items.len() as u64);
        if self.paginate {
            let start = ((query.page - 1) * query.limit) as usize;
            items = items.into_iter().skip(start).take(query.limit as usize).collect();
        }

        Ok(FetchedPage {
            items,
            server_total: Some(total),
            shape: EnvelopeShape::Flat,
            skipped: 0,
        })
    }
}

#[async_trait]
impl RestaurantModeration for FakeSource<Restaurant> {
    async fn set_status(
        &self,
        id: &str,
        status: RestaurantStatus,
        reason: Option<&str>,
    ) -> Result<(), ClientError> {
        self.mutate(format!("status {} {} {:?}", id, status, reason))
    }

    async fn create_restaurant(
        &self,
        restaurant: &NewRestaurant,
    ) -> Result<Option<Restaurant>, ClientError> {
        self.mutate(format!("create {}", restaurant.name))?;
        Ok(Some(Restaurant {
            restaurant_id: Some("r-new".into()),
            restaurant_name: Some(restaurant.name.clone()),
            ..Default::default()
        }))
    }

    async fn delete_restaurant(&self, id: &str) -> Result<(), ClientError> {
        self.mutate(format!("delete {}", id))
    }
}

#[async_trait]
impl MealEditing for FakeSource<Meal> {
    async fn create_meal(&self, draft: &MealDraft) -> Result<Option<Meal>, ClientError> {
        self.mutate(format!("create {}", draft.name))?;
        Ok(Some(Meal {
            id: Some("m-new".into()),
            name: Some(draft.name.clone()),
            ..Default::default()
        }))
    }

    async fn update_meal(&self, id: &str, draft: &MealDraft) -> Result<Option<Meal>, ClientError> {
        self.mutate(format!("update {} {}", id, draft.name))?;
        Ok(None)
    }
}

#[async_trait]
impl UserAdministration for FakeSource<User> {
    async fn delete_user(&self, id: &str) -> Result<(), ClientError> {
        self.mutate(format!("delete {}", id))
    }
}

#[derive(Default)]
struct CountingSink {
    renders: AtomicUsize,
}

impl<E> RenderSink<E> for CountingSink {
    fn render(&self, _snapshot: &ListSnapshot<E>) {
        self.renders.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct CountingRedirect {
    calls: AtomicUsize,
}

impl LoginRedirect for CountingRedirect {
    fn redirect_to_login(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn meal(id: usize, name: &str) -> Meal {
    Meal {
        id: Some(format!("m{}", id)),
        name: Some(name.to_string()),
        ..Default::default()
    }
}

fn pizza_and_rice() -> Vec<Meal> {
    (0..12)
        .map(|i| meal(i, &format!("Pepperoni Pizza {}", i)))
        .chain((12..32).map(|i| meal(i, &format!("Jollof Rice {}", i))))
        .collect()
}

fn pending_restaurants() -> Vec<Restaurant> {
    (1..=3)
        .map(|i| Restaurant {
            restaurant_id: Some(format!("r{}", i)),
            restaurant_name: Some(format!("Restaurant {}", i)),
            ..Default::default()
        })
        .collect()
}

fn controller<E: Entity>(
    source: FakeSource<E>,
    config: ListConfig,
) -> (ListController<E, FakeSource<E>>, Arc<NotificationLog>) {
    let log = Arc::new(NotificationLog::new());
    (ListController::new(source, config, log.clone()), log)
}

// =============================================================================
// Loading and Paging
// =============================================================================

mod paging {
    use super::*;

    #[tokio::test]
    async fn test_search_narrows_and_slices_locally() {
        let (c, _) = controller(FakeSource::new(pizza_and_rice()), ListConfig::meals());

        c.set_filter("search", "pizza").await;
        let snap = c.snapshot();
        assert_eq!(snap.phase, ListPhase::Loaded);
        assert_eq!(snap.total_count, 12);
        assert_eq!(snap.server_total, Some(32));
        assert_eq!(snap.items.len(), 9);
        assert_eq!(snap.total_pages, 2);
        assert_eq!(snap.page, 1);
        assert_eq!(c.source().last_query().filters.get("search").unwrap(), "pizza");

        c.next_page().await;
        let snap = c.snapshot();
        assert_eq!(snap.page, 2);
        assert_eq!(snap.items.len(), 3);
        assert!(snap.items.iter().all(|m| m.matches_search("pizza")));
        assert!(!snap.has_next());
    }

    #[tokio::test]
    async fn test_filter_resets_page() {
        let (c, _) = controller(FakeSource::new(pizza_and_rice()), ListConfig::meals());
        c.refresh().await;
        c.last_page().await;
        assert_eq!(c.snapshot().page, 4);

        c.set_filter("search", "rice").await;
        assert_eq!(c.snapshot().page, 1);
        assert_eq!(c.snapshot().total_count, 20);

        c.set_filter("search", "  ").await;
        assert!(c.snapshot().filters.is_empty());
        assert_eq!(c.snapshot().total_count, 32);
    }

    #[tokio::test]
    async fn test_set_filters_loads_once() {
        let mut meals = pizza_and_rice();
        for m in meals.iter_mut().take(4) {
            m.restaurant_id = Some("r1".into());
        }
        let (c, _) = controller(FakeSource::new(meals), ListConfig::meals());

        c.set_filters([("search", "pizza"), ("restaurant", "r1"), ("status", " ")])
            .await;
        let snap = c.snapshot();
        assert_eq!(c.source().fetches(), 1);
        assert_eq!(snap.total_count, 4);
        assert_eq!(snap.filters.len(), 2);
        assert!(snap.items.iter().all(|m| m.restaurant_id() == Some("r1")));
    }

    #[tokio::test]
    async fn test_set_page_clamps_and_skips_noop() {
        let (c, _) = controller(FakeSource::new(pizza_and_rice()), ListConfig::meals());
        c.refresh().await;
        assert_eq!(c.source().fetches(), 1);

        c.set_page(1).await;
        assert_eq!(c.source().fetches(), 1);

        c.set_page(99).await;
        assert_eq!(c.snapshot().page, 4);
        assert_eq!(c.snapshot().items.len(), 5);

        c.previous_page().await;
        assert_eq!(c.snapshot().page, 3);
        c.first_page().await;
        assert_eq!(c.snapshot().page, 1);
    }

    #[tokio::test]
    async fn test_server_paginated_list_uses_server_total() {
        let users: Vec<User> = (0..250)
            .map(|i| User {
                id: Some(format!("u{}", i)),
                username: Some(format!("user{}", i)),
                ..Default::default()
            })
            .collect();
        let mut source = FakeSource::new(users);
        source.paginate = true;
        let (c, _) = controller(source, ListConfig::users());

        c.refresh().await;
        c.next_page().await;
        let snap = c.snapshot();
        assert_eq!(snap.page, 2);
        assert_eq!(snap.items.len(), 100);
        assert_eq!(snap.total_count, 250);
        assert_eq!(snap.total_pages, 3);
        assert_eq!(c.source().last_query().limit, 100);
    }

    #[tokio::test]
    async fn test_stale_page_refetches_first_page() {
        let mut source = FakeSource::new(pizza_and_rice());
        source.paginate = true;
        let (c, _) = controller(source, ListConfig::new(9));
        c.refresh().await;
        c.last_page().await;
        assert_eq!(c.snapshot().page, 4);

        // The collection shrinks under us
        c.source().items.lock().unwrap().truncate(5);
        let before = c.source().fetches();
        c.refresh().await;

        let snap = c.snapshot();
        assert_eq!(snap.page, 1);
        assert_eq!(snap.items.len(), 5);
        assert_eq!(snap.total_count, 5);
        assert_eq!(c.source().fetches(), before + 2);
        assert_eq!(c.source().last_query().page, 1);
    }

    #[tokio::test]
    async fn test_refresh_is_idempotent() {
        let (c, _) = controller(FakeSource::new(pizza_and_rice()), ListConfig::meals());
        c.refresh().await;
        let first = c.snapshot();
        c.refresh().await;
        let second = c.snapshot();

        assert_eq!(first.total_count, second.total_count);
        assert_eq!(first.page, second.page);
        assert_eq!(first.items, second.items);
    }

    #[tokio::test]
    async fn test_render_sink_sees_every_change() {
        let sink = Arc::new(CountingSink::default());
        let (c, _) = controller(FakeSource::new(pizza_and_rice()), ListConfig::meals());
        let c = c.with_sink(sink.clone());

        c.refresh().await;
        // Loading, then Loaded
        assert_eq!(sink.renders.load(Ordering::SeqCst), 2);
    }
}

// =============================================================================
// Failures
// =============================================================================

mod failures {
    use super::*;

    #[tokio::test]
    async fn test_api_error_sets_errored_and_notifies() {
        let source = FakeSource::new(pizza_and_rice());
        source.fail_fetch.store(true, Ordering::SeqCst);
        let (c, log) = controller(source, ListConfig::meals());

        c.refresh().await;
        let snap = c.snapshot();
        assert_eq!(snap.phase, ListPhase::Errored);
        assert_eq!(snap.last_error.as_deref(), Some("Service unavailable"));

        let notes = log.entries();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, Level::Error);
        assert!(notes[0].message.contains("Service unavailable"));

        // Retry succeeds
        c.source().fail_fetch.store(false, Ordering::SeqCst);
        c.refresh().await;
        assert_eq!(c.snapshot().phase, ListPhase::Loaded);
        assert!(c.snapshot().last_error.is_none());
    }

    #[tokio::test]
    async fn test_401_clears_session_redirects_once_without_notification() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/meals"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "jwt expired" })))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemorySessionStore::with_session(Session::new(
            "tok",
            SessionUser {
                id: Some("1".into()),
                email: "admin@customdining.ng".into(),
                role: "admin".into(),
                name: String::new(),
            },
        )));
        let redirect = Arc::new(CountingRedirect::default());
        let client =
            DiningClient::new(GatewayConfig::new(server.uri()), store.clone(), redirect.clone())
                .unwrap();

        let log = Arc::new(NotificationLog::new());
        let c = ListController::new(client.meals(), ListConfig::meals(), log.clone());
        c.refresh().await;

        assert_eq!(c.snapshot().phase, ListPhase::Idle);
        assert!(store.get().is_none());
        assert_eq!(redirect.calls.load(Ordering::SeqCst), 1);
        assert!(log.entries().is_empty());

        // No token now: fails fast with another redirect and no request
        c.refresh().await;
        assert_eq!(c.snapshot().phase, ListPhase::Idle);
        assert_eq!(redirect.calls.load(Ordering::SeqCst), 2);
        assert!(log.entries().is_empty());
    }
}

// =============================================================================
// Concurrency
// =============================================================================

mod concurrency {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_is_discarded() {
        let items = vec![meal(1, "slow"), meal(2, "fast")];
        let mut source = FakeSource::new(items);
        source.search_delays = true;
        source.server_search = true;
        let (c, _) = controller(source, ListConfig::new(9));

        let slow = c.set_filter("search", "slow");
        let fast = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            c.set_filter("search", "fast").await;
        };
        tokio::join!(slow, fast);

        let snap = c.snapshot();
        assert_eq!(snap.phase, ListPhase::Loaded);
        assert_eq!(snap.filters.get("search").map(String::as_str), Some("fast"));
        assert_eq!(snap.items.len(), 1);
        assert_eq!(snap.items[0].name.as_deref(), Some("fast"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounced_search_sends_last_value_once() {
        let (c, _) = controller(FakeSource::new(pizza_and_rice()), ListConfig::meals());

        let mut handles = Vec::new();
        for value in ["p", "pi", "piz", "pizza"] {
            handles.push(c.search(value));
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        let mut ran = Vec::new();
        for handle in handles {
            ran.push(handle.await.unwrap());
        }

        assert_eq!(ran, vec![false, false, false, true]);
        assert_eq!(c.source().fetches(), 1);
        assert_eq!(c.source().last_query().filters.get("search").unwrap(), "pizza");
        assert_eq!(c.snapshot().total_count, 12);
    }
}

// =============================================================================
// Mutations
// =============================================================================

mod mutations {
    use super::*;

    #[tokio::test]
    async fn test_approve_patches_row_without_refetch() {
        let (c, log) = controller(FakeSource::new(pending_restaurants()), ListConfig::restaurants());
        c.refresh().await;
        assert_eq!(c.source().fetches(), 1);

        assert!(c.approve("r2").await);

        let snap = c.snapshot();
        assert_eq!(snap.items[1].status, RestaurantStatus::Approved);
        assert_eq!(snap.items[0].status, RestaurantStatus::Pending);
        assert_eq!(c.source().fetches(), 1);
        assert_eq!(c.source().mutations(), vec!["status r2 approved None"]);
        assert_eq!(log.entries()[0].level, Level::Success);
    }

    #[tokio::test]
    async fn test_reject_records_reason() {
        let (c, _) = controller(FakeSource::new(pending_restaurants()), ListConfig::restaurants());
        c.refresh().await;

        assert!(c.reject("r1", "Incomplete documents").await);
        let snap = c.snapshot();
        assert_eq!(snap.items[0].status, RestaurantStatus::Rejected);
        assert_eq!(snap.items[0].rejection_reason.as_deref(), Some("Incomplete documents"));
    }

    #[tokio::test]
    async fn test_failed_mutation_changes_nothing() {
        let (c, log) = controller(FakeSource::new(pending_restaurants()), ListConfig::restaurants());
        c.refresh().await;
        c.source().fail_mutations.store(true, Ordering::SeqCst);

        assert!(!c.approve("r1").await);

        let snap = c.snapshot();
        assert!(snap.items.iter().all(|r| r.status == RestaurantStatus::Pending));
        let notes = log.entries();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, Level::Error);
        assert_eq!(notes[0].message, "Internal server error");
        assert_eq!(c.source().fetches(), 1);
    }

    #[tokio::test]
    async fn test_delete_restaurant_decrements_total() {
        let (c, _) = controller(FakeSource::new(pending_restaurants()), ListConfig::restaurants());
        c.refresh().await;

        assert!(c.delete_restaurant("r1").await);
        let snap = c.snapshot();
        assert_eq!(snap.items.len(), 2);
        assert_eq!(snap.total_count, 2);
        assert!(snap.items.iter().all(|r| r.id() != Some("r1")));
    }

    #[tokio::test]
    async fn test_create_restaurant_inserts_at_front() {
        let (c, _) = controller(FakeSource::new(pending_restaurants()), ListConfig::restaurants());
        c.refresh().await;

        let new = NewRestaurant {
            name: "Bukka Hut".into(),
            location: "Lekki".into(),
            contact_email: "hello@bukka.ng".into(),
            user_id: "u4".into(),
            ..Default::default()
        };
        assert!(c.create_restaurant(&new).await);
        let snap = c.snapshot();
        assert_eq!(snap.items[0].display_name(), "Bukka Hut");
        assert_eq!(snap.total_count, 4);
    }

    #[tokio::test]
    async fn test_create_meal_keeps_page_size() {
        let (c, _) = controller(FakeSource::new(pizza_and_rice()), ListConfig::meals());
        c.refresh().await;
        assert_eq!(c.snapshot().items.len(), 9);

        let draft = MealDraft {
            name: "Suya Platter".into(),
            price: 5000.0,
            is_available: true,
            restaurant: "r1".into(),
            ..Default::default()
        };
        assert!(c.create_meal(&draft).await);

        let snap = c.snapshot();
        assert_eq!(snap.items.len(), 9);
        assert_eq!(snap.items[0].id.as_deref(), Some("m-new"));
        assert_eq!(snap.total_count, 33);
    }

    #[tokio::test]
    async fn test_update_meal_applies_draft_locally() {
        let (c, _) = controller(FakeSource::new(pizza_and_rice()), ListConfig::meals());
        c.refresh().await;

        let draft = MealDraft {
            name: "Margherita Pizza".into(),
            price: 4200.0,
            is_available: false,
            restaurant: "r9".into(),
            ..Default::default()
        };
        assert!(c.update_meal("m0", &draft).await);

        let snap = c.snapshot();
        assert_eq!(snap.items[0].name.as_deref(), Some("Margherita Pizza"));
        assert_eq!(snap.items[0].price, Some(4200.0));
        assert_eq!(snap.items[0].restaurant_id(), Some("r9"));
    }

    #[tokio::test]
    async fn test_delete_user() {
        let users = vec![
            User {
                id: Some("u1".into()),
                ..Default::default()
            },
            User {
                id: Some("u2".into()),
                ..Default::default()
            },
        ];
        let (c, log) = controller(FakeSource::new(users), ListConfig::users());
        c.refresh().await;

        assert!(c.delete_user("u1").await);
        assert_eq!(c.snapshot().items.len(), 1);
        assert_eq!(c.snapshot().total_count, 1);
        assert_eq!(log.entries()[0].message, "User deleted successfully");
    }
}
