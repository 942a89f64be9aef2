/// Entity contract shared by every remote record the admin client lists.
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three collections the dashboard administers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Platform accounts
    User,
    /// Restaurant listings
    Restaurant,
    /// Menu items
    Meal,
}

impl EntityKind {
    /// Key under which list payloads nest this collection (`data.users`).
    pub fn collection_key(self) -> &'static str {
        match self {
            EntityKind::User => "users",
            EntityKind::Restaurant => "restaurants",
            EntityKind::Meal => "meals",
        }
    }

    /// Key under which single-record payloads nest one record (`data.restaurant`).
    pub fn singular_key(self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Restaurant => "restaurant",
            EntityKind::Meal => "meal",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular_key())
    }
}

/// A remote record identified by a stable id.
///
/// Every field of an entity is optional on the wire; implementations apply
/// their own defaults when asked for display values.
pub trait Entity: Clone + fmt::Debug + Send + Sync + DeserializeOwned + 'static {
    /// Which collection this entity belongs to
    const KIND: EntityKind;

    /// Stable identifier, if the server sent one
    fn id(&self) -> Option<&str>;

    /// Display name with the entity's default applied
    fn display_name(&self) -> &str;

    /// Text fields matched by client-side search
    fn search_fields(&self) -> Vec<&str>;

    /// Owning restaurant, for entities that belong to one
    fn restaurant_id(&self) -> Option<&str> {
        None
    }

    /// Raw creation timestamp
    fn created_at(&self) -> Option<&str> {
        None
    }

    /// Case-insensitive substring match over [`Entity::search_fields`].
    ///
    /// An empty needle matches everything.
    fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Parse the timestamp formats the API emits (RFC 3339, naive datetime,
/// bare date).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_collection_keys() {
        assert_eq!(EntityKind::User.collection_key(), "users");
        assert_eq!(EntityKind::Restaurant.singular_key(), "restaurant");
        assert_eq!(EntityKind::Meal.to_string(), "meal");
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let rfc = parse_timestamp("2024-03-05T10:00:00.000Z").unwrap();
        assert_eq!((rfc.year(), rfc.month(), rfc.day()), (2024, 3, 5));

        assert!(parse_timestamp("2024-03-05 10:00:00").is_some());
        assert!(parse_timestamp("2024-03-05").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
