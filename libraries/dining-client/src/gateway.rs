//! Authenticated access to the Custom Dining API.

use crate::error::{ClientError, Result};
use crate::redirect::LoginRedirect;
use crate::session::SessionStore;
use crate::types::GatewayConfig;
use reqwest::header::{HeaderMap, ACCEPT};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Gateway for every authenticated API call.
///
/// The gateway owns the HTTP client, reads the bearer token from the
/// session store on each request, and turns HTTP outcomes into
/// [`ClientError`]s. A `401` clears the session and triggers the login
/// redirect before returning [`ClientError::SessionExpired`]; concurrent
/// rejections of the same token redirect only once.
///
/// Cloning is cheap; clones share the HTTP connection pool, the session
/// store, and the redirect.
///
/// # Example
///
/// ```ignore
/// use dining_client::{ApiGateway, FileSessionStore, GatewayConfig, LogRedirect};
/// use std::sync::Arc;
///
/// let gateway = ApiGateway::new(
///     GatewayConfig::new("https://custom-dining.onrender.com"),
///     Arc::new(FileSessionStore::new("session.json")),
///     Arc::new(LogRedirect),
/// )?;
///
/// let users = gateway.get("/api/admin/users", &[]).await?;
/// ```
#[derive(Clone)]
pub struct ApiGateway {
    http: Client,
    base_url: Arc<str>,
    session: Arc<dyn SessionStore>,
    redirect: Arc<dyn LoginRedirect>,
}

impl std::fmt::Debug for ApiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiGateway")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiGateway {
    /// Create a gateway with the given configuration.
    pub fn new(
        config: GatewayConfig,
        session: Arc<dyn SessionStore>,
        redirect: Arc<dyn LoginRedirect>,
    ) -> Result<Self> {
        // Validate URL
        if config.url.trim().is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        // Parse and normalize URL
        let url = config.url.trim().trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        url::Url::parse(&url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(format!("DiningAdmin/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self {
            http,
            base_url: url.into(),
            session,
            redirect,
        })
    }

    /// Normalized base URL (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The session store this gateway reads tokens from.
    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    /// Join `path` onto the base URL, dropping leading slashes so the
    /// result never contains `//` at the seam.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Issue an authenticated request and return the JSON body.
    ///
    /// - No stored token: triggers the login redirect, returns `AuthRequired`.
    /// - `401`: clears the session, triggers the login redirect, returns
    ///   `SessionExpired`.
    /// - Other non-2xx: `Api { status, message }` with the body's `message`
    ///   field, or the raw body text.
    /// - 2xx: the parsed body (`Null` when empty), unvalidated.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<Value> {
        self.send(method, path, &[], body, extra_headers).await
    }

    /// `GET` with query parameters.
    pub async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        self.send(Method::GET, path, query, None, None).await
    }

    /// `POST` a JSON body.
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        self.send(Method::POST, path, &[], Some(body), None).await
    }

    /// `PUT` a JSON body.
    pub async fn put(&self, path: &str, body: &Value) -> Result<Value> {
        self.send(Method::PUT, path, &[], Some(body), None).await
    }

    /// `PATCH` a JSON body.
    pub async fn patch(&self, path: &str, body: &Value) -> Result<Value> {
        self.send(Method::PATCH, path, &[], Some(body), None).await
    }

    /// `DELETE` a resource.
    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.send(Method::DELETE, path, &[], None, None).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<Value> {
        let Some(token) = self.session.token() else {
            warn!(path = %path, "No session token, redirecting to login");
            self.redirect.redirect_to_login();
            return Err(ClientError::AuthRequired);
        };

        let url = self.endpoint_url(path);
        debug!(method = %method, url = %url, "API request");

        let mut request = self
            .http
            .request(method.clone(), &url)
            .bearer_auth(&token)
            .header(ACCEPT, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(headers) = extra_headers {
            request = request.headers(headers);
        }

        let response = Self::dispatch(request).await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!(method = %method, url = %url, "Token rejected, clearing session");
            self.expire_session(&token);
            return Err(ClientError::SessionExpired);
        }

        if !status.is_success() {
            let err = Self::error_from_response(response).await;
            warn!(method = %method, url = %url, status = status.as_u16(), error = %err, "API error");
            return Err(err);
        }

        Self::parse_body(response).await
    }

    /// `POST` without a bearer token (login). Non-2xx statuses are returned
    /// to the caller instead of being interpreted, since a `401` here means
    /// bad credentials rather than an expired session.
    pub(crate) async fn post_public(&self, path: &str, body: &Value) -> Result<(StatusCode, Value)> {
        let url = self.endpoint_url(path);
        debug!(url = %url, "Public API request");

        let request = self
            .http
            .post(&url)
            .header(ACCEPT, "application/json")
            .json(body);
        let response = Self::dispatch(request).await?;
        let status = response.status();
        let text = response.text().await?;

        let value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };
        Ok((status, value))
    }

    pub(crate) fn redirect_to_login(&self) {
        self.redirect.redirect_to_login();
    }

    /// Clear the rejected session and redirect, once per token. Requests
    /// that raced the first rejection find the token already gone.
    fn expire_session(&self, token: &str) {
        match self.session.clear_if(token) {
            Ok(true) => self.redirect.redirect_to_login(),
            Ok(false) => debug!("Session already cleared by another request"),
            Err(e) => {
                error!(error = %e, "Failed to clear session after 401");
                self.redirect.redirect_to_login();
            }
        }
    }

    async fn dispatch(request: RequestBuilder) -> Result<Response> {
        request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                ClientError::ServerUnreachable(e.to_string())
            } else {
                ClientError::Request(e)
            }
        })
    }

    async fn parse_body(response: Response) -> Result<Value> {
        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(error = %e, "Response body is not valid JSON");
            ClientError::MalformedResponse(format!("Failed to parse response: {}", e))
        })
    }

    async fn error_from_response(response: Response) -> ClientError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let message = error_message(&text).unwrap_or_else(|| {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            } else {
                trimmed.to_string()
            }
        });

        ClientError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

/// Path of one record in a collection, e.g. `/api/meals/m1`.
pub(crate) fn record_path(collection: &str, id: &str) -> Result<String> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ClientError::InvalidInput("Record id is required".into()));
    }
    if id.contains(['/', '?', '#']) || id.contains(char::is_whitespace) {
        return Err(ClientError::InvalidInput(format!("Invalid record id: {}", id)));
    }
    Ok(format!("{}/{}", collection.trim_end_matches('/'), id))
}

/// Pull a human-readable message out of an error body: the `message`
/// field, else the `error` field, when the body is a JSON object.
pub(crate) fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    message_field(&value)
}

pub(crate) fn message_field(value: &Value) -> Option<String> {
    ["message", "error"].iter().find_map(|key| {
        value
            .get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}
