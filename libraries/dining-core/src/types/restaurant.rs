/// Restaurant domain types
use crate::entity::{Entity, EntityKind};
use crate::error::{CoreError, Result};
use crate::lenient;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Moderation status of a restaurant listing.
///
/// Missing or unknown statuses decode as `Pending`, matching how the
/// dashboard has always treated them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RestaurantStatus {
    /// Awaiting an admin decision
    #[default]
    Pending,
    /// Visible on the platform
    Approved,
    /// Declined by an admin
    Rejected,
}

impl RestaurantStatus {
    /// Wire representation
    pub fn as_str(self) -> &'static str {
        match self {
            RestaurantStatus::Pending => "pending",
            RestaurantStatus::Approved => "approved",
            RestaurantStatus::Rejected => "rejected",
        }
    }

    /// Capitalized label for badges
    pub fn label(self) -> &'static str {
        match self {
            RestaurantStatus::Pending => "Pending",
            RestaurantStatus::Approved => "Approved",
            RestaurantStatus::Rejected => "Rejected",
        }
    }

    /// Parse a wire value; anything unrecognized is `Pending`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "approved" => RestaurantStatus::Approved,
            "rejected" | "declined" => RestaurantStatus::Rejected,
            _ => RestaurantStatus::Pending,
        }
    }
}

impl fmt::Display for RestaurantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RestaurantStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RestaurantStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match raw {
            Some(serde_json::Value::String(s)) => RestaurantStatus::parse(&s),
            _ => RestaurantStatus::Pending,
        })
    }
}

/// Reference to an account embedded in a restaurant record (owner, approver).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRef {
    /// Account id
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub id: Option<String>,
    /// Login handle
    pub username: Option<String>,
    /// Email address
    pub email: Option<String>,
}

/// Restaurant listing as returned by `/api/restaurants`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    /// Generic record id
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub id: Option<String>,

    /// Restaurant-specific id; preferred over `id` when present
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub restaurant_id: Option<String>,

    /// Listing name
    pub restaurant_name: Option<String>,

    /// Alternate name field some endpoints use
    pub name: Option<String>,

    /// Free-form address
    pub location: Option<String>,

    /// Cuisine description
    pub cuisine_type: Option<String>,

    /// Public contact address
    pub contact_email: Option<String>,

    /// Public phone number
    pub contact_number: Option<String>,

    /// Listing description
    pub description: Option<String>,

    /// Owning account
    pub owner: Option<PersonRef>,

    /// Admin who approved the listing
    pub approved_by_admin: Option<PersonRef>,

    /// Moderation status
    #[serde(default)]
    pub status: RestaurantStatus,

    /// Reason given when the listing was rejected
    pub rejection_reason: Option<String>,

    /// Creation timestamp (ISO string)
    pub created_at: Option<String>,
}

impl Restaurant {
    /// Owner contact with the `No owner` default applied
    pub fn owner_email(&self) -> &str {
        self.owner
            .as_ref()
            .and_then(|o| o.email.as_deref())
            .filter(|e| !e.is_empty())
            .unwrap_or("No owner")
    }
}

impl Entity for Restaurant {
    const KIND: EntityKind = EntityKind::Restaurant;

    fn id(&self) -> Option<&str> {
        self.restaurant_id.as_deref().or(self.id.as_deref())
    }

    fn display_name(&self) -> &str {
        self.restaurant_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.name.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("Unnamed Restaurant")
    }

    fn search_fields(&self) -> Vec<&str> {
        [
            &self.restaurant_name,
            &self.name,
            &self.description,
            &self.location,
            &self.cuisine_type,
        ]
        .into_iter()
        .filter_map(|f| f.as_deref())
        .collect()
    }

    fn restaurant_id(&self) -> Option<&str> {
        Entity::id(self)
    }

    fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }
}

/// Body for `POST /api/restaurants`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRestaurant {
    /// Listing name
    pub name: String,
    /// Free-form address
    pub location: String,
    /// Public contact address
    pub contact_email: String,
    /// Public phone number
    pub contact_number: Option<String>,
    /// Website URL
    pub website: Option<String>,
    /// Listing description
    pub description: Option<String>,
    /// Opening hours text
    pub opening_hours: Option<String>,
    /// Cuisine description
    pub cuisine_type: Option<String>,
    /// Seating capacity
    pub capacity: u32,
    /// Outdoor seating available
    pub has_outdoor_seating: bool,
    /// Parking available
    pub has_parking: bool,
    /// Vegan friendly
    pub is_vegan_friendly: bool,
    /// Vegetarian friendly
    pub is_vegetarian_friendly: bool,
    /// Gluten-free friendly
    pub is_gluten_free_friendly: bool,
    /// Halal kitchen
    pub is_halal: bool,
    /// Owning account id
    pub user_id: String,
}

impl NewRestaurant {
    /// Check the fields the API requires before sending anything.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::invalid_input("Restaurant name is required"));
        }
        if self.location.trim().is_empty() {
            return Err(CoreError::invalid_input("Location is required"));
        }
        if !self.contact_email.contains('@') {
            return Err(CoreError::invalid_input("A valid contact email is required"));
        }
        if self.user_id.trim().is_empty() {
            return Err(CoreError::invalid_input("An owner account must be selected"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_decoding() {
        let r: Restaurant = serde_json::from_value(json!({ "status": "approved" })).unwrap();
        assert_eq!(r.status, RestaurantStatus::Approved);

        let r: Restaurant = serde_json::from_value(json!({ "status": "archived" })).unwrap();
        assert_eq!(r.status, RestaurantStatus::Pending);

        let r: Restaurant = serde_json::from_value(json!({ "status": null })).unwrap();
        assert_eq!(r.status, RestaurantStatus::Pending);

        let r: Restaurant = serde_json::from_value(json!({})).unwrap();
        assert_eq!(r.status, RestaurantStatus::Pending);
    }

    #[test]
    fn test_restaurant_id_preferred() {
        let r: Restaurant = serde_json::from_value(json!({
            "id": "generic",
            "restaurantId": "r-1",
            "restaurantName": "Mama Put"
        }))
        .unwrap();
        assert_eq!(Entity::id(&r), Some("r-1"));
        assert_eq!(r.display_name(), "Mama Put");
        assert_eq!(r.owner_email(), "No owner");
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let v = serde_json::to_value(RestaurantStatus::Rejected).unwrap();
        assert_eq!(v, json!("rejected"));
    }

    #[test]
    fn test_new_restaurant_validation() {
        let mut draft = NewRestaurant {
            name: "Bukka Hut".into(),
            location: "Lekki".into(),
            contact_email: "hello@bukka.ng".into(),
            user_id: "owner-1".into(),
            ..Default::default()
        };
        assert!(draft.validate().is_ok());

        draft.contact_email = "nope".into();
        assert!(draft.validate().is_err());

        let body = serde_json::to_value(&draft).unwrap();
        assert!(body.get("contactEmail").is_some());
        assert!(body.get("isGlutenFreeFriendly").is_some());
    }
}
