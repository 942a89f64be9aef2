//! Login, logout, and the page guard.

use crate::error::{ClientError, Result};
use crate::gateway::{message_field, ApiGateway};
use crate::types::LoginRequest;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use dining_core::lenient::id_from_value;
use dining_core::{Session, SessionUser};
use serde_json::Value;
use tracing::{debug, info, warn};

const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";
const NO_TOKEN: &str = "No authentication token received";
const BAD_TOKEN: &str = "Failed to process authentication";

/// Authentication client for the Custom Dining API.
#[derive(Debug, Clone)]
pub struct AuthClient {
    gateway: ApiGateway,
}

impl AuthClient {
    /// Create an auth client sharing the gateway's session store.
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    /// Sign in with email and password.
    ///
    /// On success the token and the profile decoded from it are stored as
    /// the current session.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ClientError::InvalidInput(
                "Email and password are required".to_string(),
            ));
        }

        debug!(email = %email, "Attempting login");
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let body = serde_json::to_value(&request)
            .map_err(|e| ClientError::InvalidInput(e.to_string()))?;

        let (status, payload) = self.gateway.post_public("/api/auth/login", &body).await?;

        if !status.is_success() {
            let message = message_field(&payload).unwrap_or_else(|| LOGIN_FAILED.to_string());
            warn!(status = status.as_u16(), error = %message, "Login failed");
            return Err(ClientError::AuthFailed(message));
        }

        let token = extract_token(&payload)
            .ok_or_else(|| ClientError::AuthFailed(NO_TOKEN.to_string()))?;
        let user = profile_from_token(&token, email)?;

        let session = Session::new(token, user);
        self.gateway.session().set(session.clone())?;

        info!(email = %session.user.email, role = %session.user.role, "Login successful");
        Ok(session)
    }

    /// Forget the stored session.
    pub fn logout(&self) -> Result<()> {
        self.gateway.session().clear()?;
        info!("Logged out");
        Ok(())
    }

    /// The stored session, if any
    pub fn current_session(&self) -> Option<Session> {
        self.gateway.session().get()
    }

    /// Guard for pages that need a signed-in administrator.
    ///
    /// Returns the session, or triggers the login redirect and fails with
    /// [`ClientError::AuthRequired`].
    pub fn require_session(&self) -> Result<Session> {
        match self.current_session() {
            Some(session) => Ok(session),
            None => {
                self.gateway.redirect_to_login();
                Err(ClientError::AuthRequired)
            }
        }
    }
}

fn extract_token(payload: &Value) -> Option<String> {
    payload
        .get("token")
        .or_else(|| payload.get("data").and_then(|d| d.get("token")))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Build the session profile from a JWT's payload segment.
///
/// Field fallbacks: `id | userId | sub`, `email | login_email`,
/// `role | "admin"`, `name | email local part | "Admin"`.
pub fn profile_from_token(token: &str, login_email: &str) -> Result<SessionUser> {
    let claims = decode_claims(token).ok_or_else(|| {
        warn!("Login token is not a decodable JWT");
        ClientError::AuthFailed(BAD_TOKEN.to_string())
    })?;

    let text = |key: &str| {
        claims
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let id = ["id", "userId", "sub"]
        .iter()
        .find_map(|key| claims.get(*key).and_then(id_from_value));
    let email = text("email").unwrap_or_else(|| login_email.to_string());
    let role = text("role").unwrap_or_else(|| "admin".to_string());

    let mut user = SessionUser {
        id,
        email,
        role,
        name: text("name").unwrap_or_default(),
    };
    if user.name.is_empty() {
        user.name = user.display_name().to_string();
    }
    Ok(user)
}

fn decode_claims(token: &str) -> Option<Value> {
    let segment = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(segment.trim_end_matches('=')).ok()?;
    let claims: Value = serde_json::from_slice(&bytes).ok()?;
    claims.is_object().then_some(claims)
}
