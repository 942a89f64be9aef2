/// Meal domain types
use crate::entity::{Entity, EntityKind};
use crate::error::{CoreError, Result};
use crate::lenient;
use serde::{Deserialize, Deserializer, Serialize};

/// Restaurant reference embedded in a meal.
///
/// The API sends either a populated object or a bare id string.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantRef {
    /// Restaurant id
    pub id: Option<String>,
    /// Restaurant name
    pub name: Option<String>,
}

impl<'de> Deserialize<'de> for RestaurantRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(match &raw {
            serde_json::Value::Object(map) => RestaurantRef {
                id: ["id", "restaurantId"]
                    .iter()
                    .find_map(|k| map.get(*k).and_then(lenient::id_from_value)),
                name: ["name", "restaurantName"].iter().find_map(|k| {
                    map.get(*k)
                        .and_then(|v| v.as_str())
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                }),
            },
            other => RestaurantRef {
                id: lenient::id_from_value(other),
                name: None,
            },
        })
    }
}

/// Nutrition facts attached to a meal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionalInfo {
    /// Energy in kcal
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub calories: Option<f64>,
    /// Protein in grams
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub protein: Option<f64>,
    /// Carbohydrates in grams
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub carbs: Option<f64>,
    /// Fat in grams
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub fat: Option<f64>,
}

/// Menu item as returned by `/api/meals`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    /// Unique meal identifier
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub id: Option<String>,

    /// Meal name
    pub name: Option<String>,

    /// Meal description
    pub description: Option<String>,

    /// Price in Naira
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub price: Option<f64>,

    /// Menu category
    pub category: Option<String>,

    /// Whether the meal can currently be ordered
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub is_available: Option<bool>,

    /// Photo URL
    pub image_url: Option<String>,

    /// Owning restaurant (object or id)
    #[serde(default)]
    pub restaurant: Option<RestaurantRef>,

    /// Owning restaurant id, when sent flat
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub restaurant_id: Option<String>,

    /// Dietary labels (vegan, halal, ...)
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub dietary_tags: Vec<String>,

    /// Declared allergens
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub allergens: Vec<String>,

    /// Nutrition facts
    pub nutritional_info: Option<NutritionalInfo>,

    /// Creation timestamp (ISO string)
    pub created_at: Option<String>,

    /// Last update timestamp (ISO string)
    pub updated_at: Option<String>,
}

impl Meal {
    /// Name of the owning restaurant, if populated
    pub fn restaurant_name(&self) -> Option<&str> {
        self.restaurant.as_ref().and_then(|r| r.name.as_deref())
    }

    /// Apply an accepted edit locally.
    pub fn apply_draft(&mut self, draft: &MealDraft) {
        self.name = Some(draft.name.clone());
        self.description = draft.description.clone();
        self.price = Some(draft.price);
        self.category = draft.category.clone();
        self.is_available = Some(draft.is_available);
        if let Some(url) = &draft.image_url {
            self.image_url = Some(url.clone());
        }
        if self.restaurant_id() != Some(draft.restaurant.as_str()) {
            self.restaurant = Some(RestaurantRef {
                id: Some(draft.restaurant.clone()),
                name: None,
            });
            self.restaurant_id = Some(draft.restaurant.clone());
        }
    }
}

impl Entity for Meal {
    const KIND: EntityKind = EntityKind::Meal;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or("Unnamed Meal")
    }

    fn search_fields(&self) -> Vec<&str> {
        [self.name.as_deref(), self.description.as_deref(), self.restaurant_name()]
            .into_iter()
            .flatten()
            .collect()
    }

    fn restaurant_id(&self) -> Option<&str> {
        self.restaurant_id
            .as_deref()
            .or_else(|| self.restaurant.as_ref().and_then(|r| r.id.as_deref()))
    }

    fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }
}

/// Body for `POST /api/meals` and `PUT /api/meals/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealDraft {
    /// Meal name
    pub name: String,
    /// Meal description
    pub description: Option<String>,
    /// Price in Naira
    pub price: f64,
    /// Menu category
    pub category: Option<String>,
    /// Whether the meal can be ordered
    pub is_available: bool,
    /// Owning restaurant id
    pub restaurant: String,
    /// Photo URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl MealDraft {
    /// Check the fields the API requires before sending anything.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::invalid_input("Meal name is required"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(CoreError::invalid_input("Price must be a non-negative number"));
        }
        if self.restaurant.trim().is_empty() {
            return Err(CoreError::invalid_input("A restaurant must be selected"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_restaurant_as_object_or_id() {
        let nested: Meal = serde_json::from_value(json!({
            "restaurant": { "id": "r1", "name": "Chicken Republic" }
        }))
        .unwrap();
        assert_eq!(nested.restaurant_id(), Some("r1"));
        assert_eq!(nested.restaurant_name(), Some("Chicken Republic"));

        let flat: Meal = serde_json::from_value(json!({ "restaurant": "r2" })).unwrap();
        assert_eq!(flat.restaurant_id(), Some("r2"));
        assert_eq!(flat.restaurant_name(), None);

        let explicit: Meal =
            serde_json::from_value(json!({ "restaurantId": "r3", "restaurant": "r9" })).unwrap();
        assert_eq!(explicit.restaurant_id(), Some("r3"));
    }

    #[test]
    fn test_search_covers_restaurant_name() {
        let meal: Meal = serde_json::from_value(json!({
            "name": "Jollof Rice",
            "restaurant": { "name": "Pizza Palace" }
        }))
        .unwrap();
        assert!(meal.matches_search("PIZZA"));
        assert!(meal.matches_search("jollof"));
        assert!(!meal.matches_search("suya"));
        assert!(meal.matches_search("  "));
    }

    #[test]
    fn test_apply_draft() {
        let mut meal = Meal {
            id: Some("m1".into()),
            name: Some("Old".into()),
            restaurant_id: Some("r1".into()),
            ..Default::default()
        };
        let draft = MealDraft {
            name: "New".into(),
            price: 1500.0,
            is_available: true,
            restaurant: "r2".into(),
            ..Default::default()
        };
        meal.apply_draft(&draft);
        assert_eq!(meal.display_name(), "New");
        assert_eq!(meal.price, Some(1500.0));
        assert_eq!(meal.restaurant_id(), Some("r2"));
    }

    #[test]
    fn test_draft_validation() {
        let draft = MealDraft {
            name: "Suya".into(),
            price: -1.0,
            restaurant: "r1".into(),
            ..Default::default()
        };
        assert!(draft.validate().is_err());
    }
}
