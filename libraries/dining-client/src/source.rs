//! Seams between the list engine and the endpoint clients.
//!
//! The list controller is generic over these traits so it can be driven by
//! the HTTP clients in production and by in-memory fakes in tests.

use crate::error::Result;
use crate::types::{FetchedPage, ListQuery};
use async_trait::async_trait;
use dining_core::{Entity, Meal, MealDraft, NewRestaurant, Restaurant, RestaurantStatus};

/// Anything that can serve one page of a collection.
#[async_trait]
pub trait ListSource<E: Entity>: Send + Sync + 'static {
    /// Fetch the records matching `query`.
    async fn fetch(&self, query: &ListQuery) -> Result<FetchedPage<E>>;
}

/// Moderation actions on restaurant listings.
#[async_trait]
pub trait RestaurantModeration: ListSource<Restaurant> {
    /// Record an approval or rejection decision
    async fn set_status(
        &self,
        id: &str,
        status: RestaurantStatus,
        reason: Option<&str>,
    ) -> Result<()>;

    /// Create a listing on behalf of an owner account
    async fn create_restaurant(&self, restaurant: &NewRestaurant) -> Result<Option<Restaurant>>;

    /// Remove a listing
    async fn delete_restaurant(&self, id: &str) -> Result<()>;
}

/// Create and edit menu items.
#[async_trait]
pub trait MealEditing: ListSource<Meal> {
    /// Create a meal; returns the stored record when the server echoes it
    async fn create_meal(&self, draft: &MealDraft) -> Result<Option<Meal>>;

    /// Replace a meal's editable fields
    async fn update_meal(&self, id: &str, draft: &MealDraft) -> Result<Option<Meal>>;
}

/// Account administration.
#[async_trait]
pub trait UserAdministration: ListSource<dining_core::User> {
    /// Remove an account
    async fn delete_user(&self, id: &str) -> Result<()>;
}
