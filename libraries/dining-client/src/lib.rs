//! Custom Dining Client
//!
//! HTTP client library for the Custom Dining admin API.
//!
//! # Features
//!
//! - **Gateway**: bearer authentication, `401` handling, error normalization
//! - **Session**: persistent token and profile storage
//! - **Envelopes**: one normalizer for every list response shape the API emits
//! - **Endpoints**: users, restaurants (with moderation), meals, dashboard
//!
//! # Example
//!
//! ```ignore
//! use dining_client::{DiningClient, FileSessionStore, GatewayConfig, ListQuery, LogRedirect};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DiningClient::new(
//!         GatewayConfig::default(),
//!         Arc::new(FileSessionStore::new("session.json")),
//!         Arc::new(LogRedirect),
//!     )?;
//!
//!     let session = client.login("admin@customdining.ng", "secret").await?;
//!     println!("Signed in as {}", session.user.display_name());
//!
//!     let page = client.meals().list(&ListQuery::new(1, 9)).await?;
//!     println!("Found {} meals", page.items.len());
//!
//!     Ok(())
//! }
//! ```

mod auth;
mod client;
mod dashboard;
mod envelope;
mod error;
mod gateway;
mod meals;
mod redirect;
mod restaurants;
mod session;
mod source;
mod types;
mod users;

// Re-export main types
pub use client::DiningClient;
pub use envelope::{normalize_list, normalize_record, read_total, ListEnvelope};
pub use error::{ClientError, Result, SessionError};
pub use gateway::ApiGateway;
pub use redirect::{LogRedirect, LoginRedirect};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};
pub use source::{ListSource, MealEditing, RestaurantModeration, UserAdministration};
pub use types::{
    DashboardStats, EnvelopeShape, FetchedPage, GatewayConfig, ListQuery, LoginRequest,
    RecentActivity, StatusUpdateRequest, DEFAULT_BASE_URL,
};

// Re-export endpoint clients for direct use
pub use auth::{profile_from_token, AuthClient};
pub use dashboard::{count_meals, count_restaurants, count_users, DashboardClient};
pub use meals::MealsClient;
pub use restaurants::RestaurantsClient;
pub use users::{UsersClient, OWNER_LOOKUP_LIMIT};
