/// Authenticated session types
use serde::{Deserialize, Serialize};

/// Profile of the signed-in administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Account id (from the token payload)
    #[serde(default, alias = "_id")]
    pub id: Option<String>,

    /// Email address
    #[serde(default)]
    pub email: String,

    /// Account role
    #[serde(default = "default_role")]
    pub role: String,

    /// Display name as stored at login
    #[serde(default)]
    pub name: String,
}

fn default_role() -> String {
    "admin".to_string()
}

impl SessionUser {
    /// Name shown in the user menu: `name`, else the email's local part,
    /// else `Admin`.
    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        if !name.is_empty() {
            return name;
        }
        self.email
            .split('@')
            .next()
            .map(str::trim)
            .filter(|local| !local.is_empty())
            .unwrap_or("Admin")
    }

    /// Up to two uppercase initials of the display name ("Ada Obi" -> "AO").
    pub fn initials(&self) -> String {
        let initials: String = self
            .display_name()
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect();
        if initials.is_empty() {
            "A".to_string()
        } else {
            initials
        }
    }

    /// Whether the profile carries the admin role
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Bearer token plus the profile it was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer token
    pub token: String,

    /// Signed-in profile
    pub user: SessionUser,
}

impl Session {
    /// Create a session
    pub fn new(token: impl Into<String>, user: SessionUser) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }
}
