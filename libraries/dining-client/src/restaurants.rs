//! Restaurant listing and moderation endpoints.

use crate::envelope::{normalize_list, normalize_record};
use crate::error::{ClientError, Result};
use crate::gateway::{record_path, ApiGateway};
use crate::source::{ListSource, RestaurantModeration};
use crate::types::{FetchedPage, ListQuery, StatusUpdateRequest};
use async_trait::async_trait;
use dining_core::{Entity, NewRestaurant, Restaurant, RestaurantStatus};
use tracing::{debug, info, warn};

const RESTAURANTS_PATH: &str = "/api/restaurants";
const MODERATION_PATH: &str = "/api/admin/restaurants";

/// Client for `/api/restaurants` and the admin moderation endpoint.
#[derive(Debug, Clone)]
pub struct RestaurantsClient {
    gateway: ApiGateway,
}

impl RestaurantsClient {
    /// Create a restaurants client
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    /// Restaurant listings.
    ///
    /// The endpoint may ignore `page` and `limit` and return every listing;
    /// the list controller slices such responses locally.
    pub async fn list(&self, query: &ListQuery) -> Result<FetchedPage<Restaurant>> {
        debug!(page = query.page, limit = query.limit, "Listing restaurants");
        let payload = self.gateway.get(RESTAURANTS_PATH, &query.to_pairs()).await?;
        Ok(normalize_list(&payload))
    }

    /// One listing by id.
    pub async fn get(&self, id: &str) -> Result<Restaurant> {
        let path = record_path(RESTAURANTS_PATH, id)?;
        let payload = self.gateway.get(&path, &[]).await?;
        normalize_record(&payload)
    }

    /// Approve or reject a listing.
    ///
    /// A rejection needs a non-empty reason; the reason is only sent with
    /// rejections.
    pub async fn update_status(
        &self,
        id: &str,
        status: RestaurantStatus,
        reason: Option<&str>,
    ) -> Result<()> {
        let request = status_request(status, reason)?;
        let path = format!("{}/status", record_path(MODERATION_PATH, id)?);
        let body = serde_json::to_value(&request)
            .map_err(|e| ClientError::InvalidInput(e.to_string()))?;

        self.gateway.patch(&path, &body).await?;
        info!(restaurant_id = %id, status = %status, "Restaurant status updated");
        Ok(())
    }

    /// Create a listing. Returns the stored record when the server echoes it.
    pub async fn create(&self, restaurant: &NewRestaurant) -> Result<Option<Restaurant>> {
        restaurant.validate()?;
        let body = serde_json::to_value(restaurant)
            .map_err(|e| ClientError::InvalidInput(e.to_string()))?;

        let payload = self.gateway.post(RESTAURANTS_PATH, &body).await?;
        info!(name = %restaurant.name, owner = %restaurant.user_id, "Restaurant created");

        match normalize_record::<Restaurant>(&payload) {
            Ok(created) if created.id().is_some() => Ok(Some(created)),
            Ok(_) => Ok(None),
            Err(e) => {
                debug!(error = %e, "Create response did not echo the restaurant");
                Ok(None)
            }
        }
    }

    /// Remove a listing.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let path = record_path(RESTAURANTS_PATH, id)?;
        self.gateway.delete(&path).await?;
        info!(restaurant_id = %id, "Restaurant deleted");
        Ok(())
    }
}

fn status_request(status: RestaurantStatus, reason: Option<&str>) -> Result<StatusUpdateRequest> {
    let rejection_reason = match status {
        RestaurantStatus::Rejected => {
            let reason = reason.map(str::trim).filter(|r| !r.is_empty());
            match reason {
                Some(r) => Some(r.to_string()),
                None => {
                    warn!("Rejection without a reason refused");
                    return Err(ClientError::InvalidInput(
                        "A rejection reason is required".to_string(),
                    ));
                }
            }
        }
        RestaurantStatus::Approved => None,
        RestaurantStatus::Pending => {
            return Err(ClientError::InvalidInput(
                "A listing can only be approved or rejected".to_string(),
            ));
        }
    };

    Ok(StatusUpdateRequest {
        status: status.as_str().to_string(),
        rejection_reason,
    })
}

#[async_trait]
impl ListSource<Restaurant> for RestaurantsClient {
    async fn fetch(&self, query: &ListQuery) -> Result<FetchedPage<Restaurant>> {
        self.list(query).await
    }
}

#[async_trait]
impl RestaurantModeration for RestaurantsClient {
    async fn set_status(
        &self,
        id: &str,
        status: RestaurantStatus,
        reason: Option<&str>,
    ) -> Result<()> {
        self.update_status(id, status, reason).await
    }

    async fn create_restaurant(&self, restaurant: &NewRestaurant) -> Result<Option<Restaurant>> {
        self.create(restaurant).await
    }

    async fn delete_restaurant(&self, id: &str) -> Result<()> {
        self.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_requires_reason() {
        assert!(status_request(RestaurantStatus::Rejected, None).is_err());
        assert!(status_request(RestaurantStatus::Rejected, Some("   ")).is_err());

        let req = status_request(RestaurantStatus::Rejected, Some(" Incomplete menu ")).unwrap();
        assert_eq!(req.status, "rejected");
        assert_eq!(req.rejection_reason.as_deref(), Some("Incomplete menu"));
    }

    #[test]
    fn test_approve_drops_reason() {
        let req = status_request(RestaurantStatus::Approved, Some("looks good")).unwrap();
        assert_eq!(req.status, "approved");
        assert!(req.rejection_reason.is_none());
    }

    #[test]
    fn test_pending_is_not_a_decision() {
        assert!(status_request(RestaurantStatus::Pending, None).is_err());
    }
}
