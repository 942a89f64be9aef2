//! User administration endpoints.

use crate::envelope::normalize_list;
use crate::error::Result;
use crate::gateway::{record_path, ApiGateway};
use crate::source::{ListSource, UserAdministration};
use crate::types::{FetchedPage, ListQuery};
use async_trait::async_trait;
use dining_core::User;
use tracing::{debug, info};

const USERS_PATH: &str = "/api/admin/users";

/// Page size used when loading every owner account for the owner picker.
pub const OWNER_LOOKUP_LIMIT: u32 = 100;

/// Client for `/api/admin/users`.
#[derive(Debug, Clone)]
pub struct UsersClient {
    gateway: ApiGateway,
}

impl UsersClient {
    /// Create a users client
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    /// One page of accounts; the server paginates and applies `search`.
    pub async fn list(&self, query: &ListQuery) -> Result<FetchedPage<User>> {
        debug!(page = query.page, limit = query.limit, "Listing users");
        let payload = self.gateway.get(USERS_PATH, &query.to_pairs()).await?;
        Ok(normalize_list(&payload))
    }

    /// Delete an account.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let path = record_path(USERS_PATH, id)?;
        self.gateway.delete(&path).await?;
        info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Active accounts with the `restaurant` role, for assigning listings.
    pub async fn restaurant_owners(&self) -> Result<Vec<User>> {
        let page = self.list(&ListQuery::new(1, OWNER_LOOKUP_LIMIT)).await?;
        let owners: Vec<User> = page
            .items
            .into_iter()
            .filter(User::is_restaurant_owner)
            .collect();
        debug!(count = owners.len(), "Loaded restaurant owners");
        Ok(owners)
    }
}

#[async_trait]
impl ListSource<User> for UsersClient {
    async fn fetch(&self, query: &ListQuery) -> Result<FetchedPage<User>> {
        self.list(query).await
    }
}

#[async_trait]
impl UserAdministration for UsersClient {
    async fn delete_user(&self, id: &str) -> Result<()> {
        self.delete(id).await
    }
}
