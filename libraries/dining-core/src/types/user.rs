/// User domain type
use crate::entity::{Entity, EntityKind};
use crate::lenient;
use serde::{Deserialize, Serialize};

/// Platform account as returned by `/api/admin/users`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub id: Option<String>,

    /// Login handle
    pub username: Option<String>,

    /// Full name
    pub name: Option<String>,

    /// Email address
    pub email: Option<String>,

    /// `admin`, `restaurant` or `user`
    pub role: Option<String>,

    /// Whether the account is enabled (absent means active)
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub is_active: Option<bool>,

    /// Whether the email address has been confirmed
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub is_email_verified: Option<bool>,

    /// Account creation timestamp (ISO string)
    pub created_at: Option<String>,
}

impl User {
    /// Role with the `user` default applied
    pub fn role(&self) -> &str {
        self.role.as_deref().filter(|r| !r.is_empty()).unwrap_or("user")
    }

    /// Accounts are active unless the server says otherwise
    pub fn is_active(&self) -> bool {
        self.is_active != Some(false)
    }

    /// Whether the account has confirmed its email address
    pub fn is_verified(&self) -> bool {
        self.is_email_verified == Some(true)
    }

    /// Active accounts with the `restaurant` role can own restaurants
    pub fn is_restaurant_owner(&self) -> bool {
        self.role() == "restaurant" && self.is_active == Some(true)
    }
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.name.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("Unnamed User")
    }

    fn search_fields(&self) -> Vec<&str> {
        [&self.username, &self.name, &self.email]
            .into_iter()
            .filter_map(|f| f.as_deref())
            .collect()
    }

    fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }
}
