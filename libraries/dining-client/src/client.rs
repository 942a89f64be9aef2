//! Main client for the Custom Dining admin API.

use crate::auth::AuthClient;
use crate::dashboard::DashboardClient;
use crate::error::Result;
use crate::gateway::ApiGateway;
use crate::meals::MealsClient;
use crate::redirect::LoginRedirect;
use crate::restaurants::RestaurantsClient;
use crate::session::SessionStore;
use crate::types::GatewayConfig;
use crate::users::UsersClient;
use dining_core::Session;
use std::sync::Arc;

/// Entry point bundling one gateway with every endpoint client.
///
/// All sub-clients share the gateway, so they see the same session and
/// the same login redirect.
#[derive(Debug, Clone)]
pub struct DiningClient {
    gateway: ApiGateway,
}

impl DiningClient {
    /// Create a client with the given configuration.
    pub fn new(
        config: GatewayConfig,
        session: Arc<dyn SessionStore>,
        redirect: Arc<dyn LoginRedirect>,
    ) -> Result<Self> {
        Ok(Self {
            gateway: ApiGateway::new(config, session, redirect)?,
        })
    }

    /// Wrap an existing gateway
    pub fn from_gateway(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    /// The underlying gateway
    pub fn gateway(&self) -> &ApiGateway {
        &self.gateway
    }

    /// Whether a session is stored
    pub fn is_authenticated(&self) -> bool {
        self.gateway.session().get().is_some()
    }

    /// Sign in and store the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        self.auth().login(email, password).await
    }

    /// Forget the stored session.
    pub fn logout(&self) -> Result<()> {
        self.auth().logout()
    }

    /// Authentication operations
    pub fn auth(&self) -> AuthClient {
        AuthClient::new(self.gateway.clone())
    }

    /// `/api/admin/users`
    pub fn users(&self) -> UsersClient {
        UsersClient::new(self.gateway.clone())
    }

    /// `/api/restaurants`
    pub fn restaurants(&self) -> RestaurantsClient {
        RestaurantsClient::new(self.gateway.clone())
    }

    /// `/api/meals`
    pub fn meals(&self) -> MealsClient {
        MealsClient::new(self.gateway.clone())
    }

    /// Dashboard overview
    pub fn dashboard(&self) -> DashboardClient {
        DashboardClient::new(self.gateway.clone())
    }
}
