//! Command implementations.
//!
//! Each command returns the text to print so `main` stays a thin dispatcher
//! and the commands can be driven against a mock API in tests.

use crate::config::AdminConfig;
use crate::error::{CliError, Result};
use dining_admin::view::{
    self, escape_html, format_datetime, format_number, TableRow,
};
use dining_admin::{Level, ListController, ListPhase, ListSnapshot, ListState, NotificationLog};
use dining_client::{
    ClientError, DashboardStats, DiningClient, FileSessionStore, ListSource, LogRedirect,
    RecentActivity,
};
use dining_core::{Entity, MealDraft, NewRestaurant};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Which list the `render` command writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ListKind {
    Users,
    Restaurants,
    Meals,
}

/// Filters and page for a list command.
#[derive(Debug, Clone, Default)]
pub struct ListRequest {
    pub page: u32,
    pub search: Option<String>,
    pub restaurant: Option<String>,
    pub status: Option<String>,
}

impl ListRequest {
    fn filters(&self) -> [(&'static str, String); 3] {
        [
            ("search", self.search.clone().unwrap_or_default()),
            ("restaurant", self.restaurant.clone().unwrap_or_default()),
            ("status", self.status.clone().unwrap_or_default()),
        ]
    }
}

/// Signed-in admin console.
pub struct Console {
    client: DiningClient,
    config: AdminConfig,
    log: Arc<NotificationLog>,
}

impl Console {
    /// Console backed by the session file named in `config`.
    pub fn new(config: AdminConfig) -> Result<Self> {
        let store = Arc::new(FileSessionStore::new(config.session.path.clone()));
        let client = DiningClient::new(config.gateway_config(), store, Arc::new(LogRedirect))?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: DiningClient, config: AdminConfig) -> Self {
        Self {
            client,
            config,
            log: Arc::new(NotificationLog::new()),
        }
    }

    pub fn client(&self) -> &DiningClient {
        &self.client
    }

    // =========================================================================
    // Session
    // =========================================================================

    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let session = self.client.login(email, password).await?;
        if !session.user.is_admin() {
            warn!(role = %session.user.role, "Signed in without the admin role");
        }
        Ok(format!(
            "Signed in as {} <{}>",
            session.user.display_name(),
            session.user.email
        ))
    }

    pub fn logout(&self) -> Result<String> {
        self.client.logout()?;
        Ok("Signed out".to_string())
    }

    pub fn whoami(&self) -> Result<String> {
        let session = self
            .client
            .auth()
            .current_session()
            .ok_or(CliError::NotSignedIn)?;
        let user = &session.user;
        Ok(format!(
            "{} <{}>\nRole: {}\nId: {}",
            user.display_name(),
            user.email,
            user.role,
            user.id.as_deref().unwrap_or("unknown")
        ))
    }

    // =========================================================================
    // Lists
    // =========================================================================

    pub async fn list_users(&self, request: &ListRequest) -> Result<String> {
        let controller = self.controller(self.client.users(), self.config.users_list());
        let snapshot = self.load(&controller, request).await?;
        Ok(view::render_text_table(&snapshot))
    }

    pub async fn list_restaurants(&self, request: &ListRequest) -> Result<String> {
        let controller =
            self.controller(self.client.restaurants(), self.config.restaurants_list());
        let snapshot = self.load(&controller, request).await?;
        Ok(view::render_text_table(&snapshot))
    }

    pub async fn list_meals(&self, request: &ListRequest) -> Result<String> {
        let controller = self.controller(self.client.meals(), self.config.meals_list());
        let snapshot = self.load(&controller, request).await?;
        Ok(view::render_text_table(&snapshot))
    }

    /// Active restaurant-role accounts, for picking a listing's owner.
    pub async fn restaurant_owners(&self) -> Result<String> {
        let owners = self
            .client
            .users()
            .restaurant_owners()
            .await
            .map_err(client_error)?;
        Ok(view::render_text_table(&loaded_snapshot(owners)))
    }

    fn controller<E, S>(&self, source: S, config: dining_admin::ListConfig) -> ListController<E, S>
    where
        E: Entity,
        S: ListSource<E>,
    {
        ListController::new(source, config, self.log.clone())
    }

    async fn load<E, S>(
        &self,
        controller: &ListController<E, S>,
        request: &ListRequest,
    ) -> Result<ListSnapshot<E>>
    where
        E: Entity,
        S: ListSource<E>,
    {
        controller.set_filters(request.filters()).await;
        if request.page > 1 {
            controller.set_page(request.page).await;
        }

        let snapshot = controller.snapshot();
        debug!(kind = %E::KIND, phase = ?snapshot.phase, "List command finished");
        match snapshot.phase {
            ListPhase::Loaded => {
                self.log.drain();
                Ok(snapshot)
            }
            ListPhase::Errored => Err(self.failure().unwrap_or_else(|| {
                CliError::Failed(snapshot.last_error.unwrap_or_default())
            })),
            ListPhase::Idle | ListPhase::Loading => Err(CliError::NotSignedIn),
        }
    }

    // =========================================================================
    // Records
    // =========================================================================

    pub async fn show_restaurant(&self, id: &str, html: bool) -> Result<String> {
        let restaurant = self
            .client
            .restaurants()
            .get(id)
            .await
            .map_err(client_error)?;
        if html {
            Ok(view::render_restaurant_details(&restaurant))
        } else {
            Ok(serde_json::to_string_pretty(&restaurant)?)
        }
    }

    pub async fn show_meal(&self, id: &str, html: bool) -> Result<String> {
        let meal = self.client.meals().get(id).await.map_err(client_error)?;
        if html {
            Ok(view::render_meal_details(&meal))
        } else {
            Ok(serde_json::to_string_pretty(&meal)?)
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub async fn approve_restaurant(&self, id: &str) -> Result<String> {
        let controller =
            self.controller(self.client.restaurants(), self.config.restaurants_list());
        let ok = controller.approve(id).await;
        self.outcome(ok)
    }

    pub async fn reject_restaurant(&self, id: &str, reason: &str) -> Result<String> {
        let controller =
            self.controller(self.client.restaurants(), self.config.restaurants_list());
        let ok = controller.reject(id, reason).await;
        self.outcome(ok)
    }

    pub async fn delete_restaurant(&self, id: &str) -> Result<String> {
        let controller =
            self.controller(self.client.restaurants(), self.config.restaurants_list());
        let ok = controller.delete_restaurant(id).await;
        self.outcome(ok)
    }

    pub async fn create_restaurant(&self, restaurant: &NewRestaurant) -> Result<String> {
        let controller =
            self.controller(self.client.restaurants(), self.config.restaurants_list());
        let ok = controller.create_restaurant(restaurant).await;
        self.outcome(ok)
    }

    pub async fn delete_user(&self, id: &str) -> Result<String> {
        let controller = self.controller(self.client.users(), self.config.users_list());
        let ok = controller.delete_user(id).await;
        self.outcome(ok)
    }

    pub async fn create_meal(&self, draft: &MealDraft) -> Result<String> {
        let controller = self.controller(self.client.meals(), self.config.meals_list());
        let ok = controller.create_meal(draft).await;
        self.outcome(ok)
    }

    pub async fn update_meal(&self, id: &str, draft: &MealDraft) -> Result<String> {
        let controller = self.controller(self.client.meals(), self.config.meals_list());
        let ok = controller.update_meal(id, draft).await;
        self.outcome(ok)
    }

    /// Turn a mutation result and its notifications into command output.
    fn outcome(&self, ok: bool) -> Result<String> {
        if ok {
            let messages: Vec<String> = self
                .log
                .drain()
                .into_iter()
                .filter(|n| n.level != Level::Error)
                .map(|n| n.message)
                .collect();
            return Ok(messages.join("\n"));
        }
        Err(self.failure().unwrap_or(CliError::NotSignedIn))
    }

    /// Last error notification, if one was raised.
    fn failure(&self) -> Option<CliError> {
        self.log
            .drain()
            .into_iter()
            .rev()
            .find(|n| n.level == Level::Error)
            .map(|n| CliError::Failed(n.message))
    }

    // =========================================================================
    // Dashboard
    // =========================================================================

    pub async fn dashboard(&self, limit: usize) -> Result<String> {
        let (stats, activity) = self
            .client
            .dashboard()
            .overview(limit)
            .await
            .map_err(client_error)?;
        Ok(dashboard_text(&stats, &activity))
    }

    /// Standalone HTML page with the stat cards and recent activity.
    pub async fn dashboard_html(&self, limit: usize) -> Result<String> {
        let (stats, activity) = self
            .client
            .dashboard()
            .overview(limit)
            .await
            .map_err(client_error)?;
        let body = format!(
            "<section class=\"stats\">\n{}</section>\n<section class=\"recent-activity\">\n{}</section>\n",
            view::render_stat_cards(&stats),
            view::render_recent_activity(&activity)
        );
        Ok(self.document("Dashboard", &body))
    }

    // =========================================================================
    // HTML export
    // =========================================================================

    /// Load one page of a list and wrap it in a standalone HTML document.
    pub async fn render(&self, kind: ListKind, request: &ListRequest) -> Result<String> {
        let (title, table) = match kind {
            ListKind::Users => {
                let c = self.controller(self.client.users(), self.config.users_list());
                ("Users", self.render_table(&c, request).await?)
            }
            ListKind::Restaurants => {
                let c = self.controller(self.client.restaurants(), self.config.restaurants_list());
                ("Restaurants", self.render_table(&c, request).await?)
            }
            ListKind::Meals => {
                let c = self.controller(self.client.meals(), self.config.meals_list());
                ("Meals", self.render_table(&c, request).await?)
            }
        };
        info!(list = title, "Rendered list");
        Ok(self.document(title, &table))
    }

    async fn render_table<E, S>(
        &self,
        controller: &ListController<E, S>,
        request: &ListRequest,
    ) -> Result<String>
    where
        E: TableRow,
        S: ListSource<E>,
    {
        let snapshot = self.load(controller, request).await?;
        Ok(view::render_table(&snapshot))
    }

    fn document(&self, title: &str, body: &str) -> String {
        let menu = self
            .client
            .auth()
            .current_session()
            .map(|s| view::render_user_menu(&s.user))
            .unwrap_or_default();
        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>Custom Dining Admin - {}</title>\n</head>\n<body>\n<header>\n{}</header>\n<main>\n<h2>{}</h2>\n{}</main>\n</body>\n</html>\n",
            escape_html(title),
            menu,
            escape_html(title),
            body
        )
    }
}

/// Auth failures mean the user has to sign in again.
fn client_error(err: ClientError) -> CliError {
    if err.is_auth() {
        CliError::NotSignedIn
    } else {
        CliError::Client(err)
    }
}

/// Snapshot of a fully loaded, single-page list.
fn loaded_snapshot<E: Clone>(items: Vec<E>) -> ListSnapshot<E> {
    let mut state = ListState::new(items.len().max(1) as u32);
    state.total_count = items.len() as u64;
    state.items = items;
    state.phase = ListPhase::Loaded;
    ListSnapshot::from(&state)
}

fn count(value: Option<u64>) -> String {
    value.map_or_else(|| "Error".to_string(), format_number)
}

fn dashboard_text(stats: &DashboardStats, activity: &RecentActivity) -> String {
    let mut out = format!(
        "Total users:        {}\nTotal restaurants:  {}\nTotal meals:        {}\n\nRecent activity\n",
        count(stats.users),
        count(stats.restaurants),
        count(stats.meals)
    );
    if activity.is_empty() {
        out.push_str("  No recent activity found\n");
        return out;
    }
    for user in &activity.users {
        out.push_str(&format!(
            "  New user registered: {} ({}) {}\n",
            user.email.as_deref().unwrap_or("Unknown"),
            user.role(),
            format_datetime(user.created_at.as_deref(), "Just now")
        ));
    }
    for restaurant in &activity.restaurants {
        out.push_str(&format!(
            "  New restaurant: {} [{}] {}\n",
            restaurant.display_name(),
            restaurant.status.label(),
            format_datetime(restaurant.created_at.as_deref(), "Recently")
        ));
    }
    out
}
