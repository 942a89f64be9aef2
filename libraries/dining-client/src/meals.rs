//! Meal catalogue endpoints.

use crate::envelope::{normalize_list, normalize_record};
use crate::error::{ClientError, Result};
use crate::gateway::{record_path, ApiGateway};
use crate::source::{ListSource, MealEditing};
use crate::types::{FetchedPage, ListQuery};
use async_trait::async_trait;
use dining_core::{Entity, Meal, MealDraft};
use serde_json::Value;
use tracing::{debug, info};

const MEALS_PATH: &str = "/api/meals";

/// Client for `/api/meals`.
#[derive(Debug, Clone)]
pub struct MealsClient {
    gateway: ApiGateway,
}

impl MealsClient {
    /// Create a meals client
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    /// One page of meals.
    ///
    /// Sends `page`, `limit`, `search`, `restaurant`, and `status`; the
    /// server is not trusted to honor all of them.
    pub async fn list(&self, query: &ListQuery) -> Result<FetchedPage<Meal>> {
        debug!(page = query.page, limit = query.limit, filters = ?query.filters, "Listing meals");
        let payload = self.gateway.get(MEALS_PATH, &query.to_pairs()).await?;
        Ok(normalize_list(&payload))
    }

    /// One meal by id.
    pub async fn get(&self, id: &str) -> Result<Meal> {
        let path = record_path(MEALS_PATH, id)?;
        let payload = self.gateway.get(&path, &[]).await?;
        normalize_record(&payload)
    }

    /// Create a meal.
    pub async fn create(&self, draft: &MealDraft) -> Result<Option<Meal>> {
        draft.validate()?;
        let body = draft_body(draft)?;
        let payload = self.gateway.post(MEALS_PATH, &body).await?;
        info!(name = %draft.name, restaurant = %draft.restaurant, "Meal created");
        Ok(echoed_meal(&payload))
    }

    /// Replace a meal's editable fields.
    pub async fn update(&self, id: &str, draft: &MealDraft) -> Result<Option<Meal>> {
        draft.validate()?;
        let path = record_path(MEALS_PATH, id)?;
        let body = draft_body(draft)?;
        let payload = self.gateway.put(&path, &body).await?;
        info!(meal_id = %id, "Meal updated");
        Ok(echoed_meal(&payload))
    }
}

fn draft_body(draft: &MealDraft) -> Result<Value> {
    serde_json::to_value(draft).map_err(|e| ClientError::InvalidInput(e.to_string()))
}

fn echoed_meal(payload: &Value) -> Option<Meal> {
    normalize_record::<Meal>(payload)
        .ok()
        .filter(|meal| meal.id().is_some())
}

#[async_trait]
impl ListSource<Meal> for MealsClient {
    async fn fetch(&self, query: &ListQuery) -> Result<FetchedPage<Meal>> {
        self.list(query).await
    }
}

#[async_trait]
impl MealEditing for MealsClient {
    async fn create_meal(&self, draft: &MealDraft) -> Result<Option<Meal>> {
        self.create(draft).await
    }

    async fn update_meal(&self, id: &str, draft: &MealDraft) -> Result<Option<Meal>> {
        self.update(id, draft).await
    }
}
