//! Dashboard overview: headline counts and recent activity.

use crate::envelope::normalize_list;
use crate::error::{ClientError, Result};
use crate::gateway::ApiGateway;
use crate::types::{DashboardStats, RecentActivity};
use dining_core::{parse_timestamp, Entity, Meal, Restaurant, User};
use serde_json::Value;
use tracing::{debug, warn};

const USERS_SAMPLE: &str = "/api/admin/users";
const RESTAURANTS_SAMPLE: &str = "/api/restaurants/";
const MEALS_SAMPLE: &str = "/api/meals/";

/// Raw payloads of the three dashboard requests.
struct Samples {
    users: Result<Value>,
    restaurants: Result<Value>,
    meals: Result<Value>,
}

/// Client for the dashboard overview.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    gateway: ApiGateway,
}

impl DashboardClient {
    /// Create a dashboard client
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    /// Headline counts.
    ///
    /// Each count is loaded independently; a count that fails is `None`.
    /// Only an authentication failure fails the whole call.
    pub async fn stats(&self) -> Result<DashboardStats> {
        let samples = self.fetch_samples().await;
        samples.check_auth()?;
        Ok(samples.stats())
    }

    /// The `limit` newest users and restaurants by creation time.
    pub async fn recent_activity(&self, limit: usize) -> Result<RecentActivity> {
        let samples = self.fetch_samples().await;
        samples.check_auth()?;
        Ok(samples.recent(limit))
    }

    /// Counts and recent activity from a single fan-out.
    pub async fn overview(&self, limit: usize) -> Result<(DashboardStats, RecentActivity)> {
        let samples = self.fetch_samples().await;
        samples.check_auth()?;
        Ok((samples.stats(), samples.recent(limit)))
    }

    async fn fetch_samples(&self) -> Samples {
        let user_query = [
            ("page".to_string(), "1".to_string()),
            ("limit".to_string(), "100".to_string()),
        ];
        let (users, restaurants, meals) = tokio::join!(
            self.gateway.get(USERS_SAMPLE, &user_query),
            self.gateway.get(RESTAURANTS_SAMPLE, &[]),
            self.gateway.get(MEALS_SAMPLE, &[]),
        );
        Samples {
            users,
            restaurants,
            meals,
        }
    }
}

impl Samples {
    fn check_auth(&self) -> Result<()> {
        for sample in [&self.users, &self.restaurants, &self.meals] {
            if let Err(e) = sample {
                if e.is_auth() {
                    return Err(match e {
                        ClientError::AuthRequired => ClientError::AuthRequired,
                        _ => ClientError::SessionExpired,
                    });
                }
            }
        }
        Ok(())
    }

    fn stats(&self) -> DashboardStats {
        DashboardStats {
            users: count_or_log("users", &self.users, count_users),
            restaurants: count_or_log("restaurants", &self.restaurants, count_restaurants),
            meals: count_or_log("meals", &self.meals, count_meals),
        }
    }

    fn recent(&self, limit: usize) -> RecentActivity {
        let users = self
            .users
            .as_ref()
            .map(|p| newest(normalize_list::<User>(p).items, limit))
            .unwrap_or_default();
        let restaurants = self
            .restaurants
            .as_ref()
            .map(|p| newest(normalize_list::<Restaurant>(p).items, limit))
            .unwrap_or_default();
        RecentActivity { users, restaurants }
    }
}

fn count_or_log(label: &str, sample: &Result<Value>, count: fn(&Value) -> u64) -> Option<u64> {
    match sample {
        Ok(payload) => {
            let n = count(payload);
            debug!(entity = label, count = n, "Dashboard count");
            Some(n)
        }
        Err(e) => {
            warn!(entity = label, error = %e, "Failed to load dashboard count");
            None
        }
    }
}

fn array_len(value: Option<&Value>) -> Option<u64> {
    value.and_then(Value::as_array).map(|a| a.len() as u64)
}

fn number(value: Option<&Value>) -> Option<u64> {
    value.and_then(Value::as_u64)
}

/// `count`, else `data.users.length`, else the normalized item count.
pub fn count_users(payload: &Value) -> u64 {
    number(payload.get("count"))
        .or_else(|| array_len(payload.get("data").and_then(|d| d.get("users"))))
        .unwrap_or_else(|| normalize_list::<User>(payload).items.len() as u64)
}

/// `results`, else `data.restaurants.length`, else the normalized item count.
pub fn count_restaurants(payload: &Value) -> u64 {
    number(payload.get("results"))
        .or_else(|| array_len(payload.get("data").and_then(|d| d.get("restaurants"))))
        .unwrap_or_else(|| normalize_list::<Restaurant>(payload).items.len() as u64)
}

/// `data.length`, else the normalized item count.
pub fn count_meals(payload: &Value) -> u64 {
    array_len(payload.get("data"))
        .unwrap_or_else(|| normalize_list::<Meal>(payload).items.len() as u64)
}

/// Newest first by `createdAt`; records without a parseable timestamp sort last.
fn newest<E: Entity>(mut items: Vec<E>, limit: usize) -> Vec<E> {
    items.sort_by_key(|item| {
        std::cmp::Reverse(item.created_at().and_then(parse_timestamp))
    });
    items.truncate(limit);
    items
}
