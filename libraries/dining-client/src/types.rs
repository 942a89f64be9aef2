//! Types for Custom Dining API requests and responses.

use dining_core::{Restaurant, User};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Default API origin.
pub const DEFAULT_BASE_URL: &str = "https://custom-dining.onrender.com";

/// Configuration for connecting to the Custom Dining API.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the API (e.g., "https://custom-dining.onrender.com")
    pub url: String,
    /// Whole-request timeout
    pub timeout: Duration,
    /// TCP connect timeout
    pub connect_timeout: Duration,
}

impl GatewayConfig {
    /// Create a config for the given origin with default timeouts.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Override the request and connect timeouts.
    pub fn with_timeouts(mut self, timeout: Duration, connect_timeout: Duration) -> Self {
        self.timeout = timeout;
        self.connect_timeout = connect_timeout;
        self
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

// =============================================================================
// List Types
// =============================================================================

/// Query for one page of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-based page number
    pub page: u32,
    /// Page size (`limit` on the wire)
    pub limit: u32,
    /// Additional filters, sent verbatim as query parameters
    pub filters: BTreeMap<String, String>,
}

impl ListQuery {
    /// First page with the given size and no filters.
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit,
            filters: BTreeMap::new(),
        }
    }

    /// Add a filter; empty values are ignored.
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.trim().is_empty() {
            self.filters.insert(key.into(), value);
        }
        self
    }

    /// Query-string pairs: `page`, `limit`, then every non-empty filter.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        pairs.extend(
            self.filters
                .iter()
                .filter(|(_, v)| !v.trim().is_empty())
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        pairs
    }
}

/// Shape a list payload arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeShape {
    /// `{ data: { <collection>: [...] } }`
    Nested,
    /// `{ data: [...] }`
    Flat,
    /// `{ data: { ...one record... } }`
    Single,
    /// `[...]`
    Bare,
    /// Anything else
    Unrecognized,
}

/// One normalized list response.
#[derive(Debug, Clone)]
pub struct FetchedPage<E> {
    /// Records that decoded cleanly
    pub items: Vec<E>,
    /// Total reported by the server, if any
    pub server_total: Option<u64>,
    /// Shape the payload arrived in
    pub shape: EnvelopeShape,
    /// Records dropped because they failed to decode
    pub skipped: usize,
}

impl<E> FetchedPage<E> {
    /// A page with no records
    pub fn empty(shape: EnvelopeShape) -> Self {
        Self {
            items: Vec::new(),
            server_total: None,
            shape,
            skipped: 0,
        }
    }
}

// =============================================================================
// Authentication Types
// =============================================================================

/// Request body for the login endpoint.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for a moderation decision.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

// =============================================================================
// Dashboard Types
// =============================================================================

/// Headline counts for the dashboard; `None` when that count could not be loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub users: Option<u64>,
    pub restaurants: Option<u64>,
    pub meals: Option<u64>,
}

/// Newest sign-ups and listings.
#[derive(Debug, Clone, Default)]
pub struct RecentActivity {
    pub users: Vec<User>,
    pub restaurants: Vec<Restaurant>,
}

impl RecentActivity {
    /// No activity to show
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.restaurants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs_skip_empty_filters() {
        let mut query = ListQuery::new(2, 9).with_filter("search", "pizza");
        query.filters.insert("status".into(), "  ".into());
        let pairs = query.to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("page".to_string(), "2".to_string()),
                ("limit".to_string(), "9".to_string()),
                ("search".to_string(), "pizza".to_string()),
            ]
        );
    }

    #[test]
    fn test_page_floor() {
        assert_eq!(ListQuery::new(0, 10).page, 1);
    }

    #[test]
    fn test_status_body_omits_reason() {
        let body = serde_json::to_value(StatusUpdateRequest {
            status: "approved".into(),
            rejection_reason: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "status": "approved" }));
    }
}
