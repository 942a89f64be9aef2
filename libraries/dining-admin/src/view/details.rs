//! Detail panels for a single meal or restaurant.

use super::format::{escape_html, format_datetime, format_price};
use super::rows::status_badge_style;
use dining_core::{Entity, Meal, PersonRef, Restaurant};

fn detail_row(label: &str, value: &str) -> String {
    format!(
        "<dt class=\"col-sm-4\">{}</dt><dd class=\"col-sm-8\">{}</dd>\n",
        label,
        escape_html(value)
    )
}

fn tag_list(tags: &[String], class: &str, none: &str) -> String {
    if tags.is_empty() {
        return format!(r#"<span class="text-muted">{}</span>"#, none);
    }
    tags.iter()
        .map(|t| format!(r#"<span class="badge {} me-1">{}</span>"#, class, escape_html(t)))
        .collect()
}

fn nutrition_value(value: Option<f64>, unit: &str) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{}{}", v, unit))
}

/// Full meal panel: description, price, nutrition, dietary tags,
/// allergens, and timestamps.
pub fn render_meal_details(meal: &Meal) -> String {
    let mut html = format!(
        "<div class=\"meal-details\" data-id=\"{}\">\n<h4>{}</h4>\n<p>{}</p>\n<dl class=\"row\">\n",
        escape_html(meal.id().unwrap_or_default()),
        escape_html(meal.display_name()),
        escape_html(meal.description.as_deref().unwrap_or("No description"))
    );

    html.push_str(&detail_row("Restaurant", meal.restaurant_name().unwrap_or("N/A")));
    html.push_str(&detail_row(
        "Category",
        meal.category.as_deref().unwrap_or("Uncategorized"),
    ));
    html.push_str(&detail_row("Price", &format_price(meal.price)));
    html.push_str(&detail_row(
        "Availability",
        if meal.is_available == Some(true) { "Available" } else { "Unavailable" },
    ));

    let nutrition = meal.nutritional_info.clone().unwrap_or_default();
    html.push_str(&detail_row("Calories", &nutrition_value(nutrition.calories, " kcal")));
    html.push_str(&detail_row("Protein", &nutrition_value(nutrition.protein, "g")));
    html.push_str(&detail_row("Carbs", &nutrition_value(nutrition.carbs, "g")));
    html.push_str(&detail_row("Fat", &nutrition_value(nutrition.fat, "g")));

    html.push_str(&detail_row("Created", &format_datetime(meal.created_at.as_deref(), "N/A")));
    html.push_str(&detail_row("Updated", &format_datetime(meal.updated_at.as_deref(), "N/A")));
    html.push_str("</dl>\n");

    html.push_str(&format!(
        "<div class=\"dietary-tags\"><h6>Dietary</h6>{}</div>\n",
        tag_list(&meal.dietary_tags, "bg-success", "None listed")
    ));
    html.push_str(&format!(
        "<div class=\"allergens\"><h6>Allergens</h6>{}</div>\n",
        tag_list(&meal.allergens, "bg-danger", "None listed")
    ));
    html.push_str("</div>\n");
    html
}

fn person(person: Option<&PersonRef>, fallback: &str) -> String {
    person
        .and_then(|p| {
            p.username
                .as_deref()
                .or(p.email.as_deref())
                .filter(|s| !s.is_empty())
        })
        .unwrap_or(fallback)
        .to_string()
}

/// Full restaurant panel: cuisine, location, contact, owner, and the
/// approving admin.
pub fn render_restaurant_details(restaurant: &Restaurant) -> String {
    let (badge_class, badge_icon) = status_badge_style(restaurant.status);
    let mut html = format!(
        "<div class=\"restaurant-details\" data-id=\"{}\">\n<h4>{} <span class=\"badge rounded-pill {}\"><i class=\"fas {} me-1\"></i>{}</span></h4>\n<p>{}</p>\n<dl class=\"row\">\n",
        escape_html(restaurant.id().unwrap_or_default()),
        escape_html(restaurant.display_name()),
        badge_class,
        badge_icon,
        restaurant.status.label(),
        escape_html(restaurant.description.as_deref().unwrap_or("No description"))
    );

    html.push_str(&detail_row(
        "Cuisine",
        restaurant.cuisine_type.as_deref().unwrap_or("Various Cuisines"),
    ));
    html.push_str(&detail_row(
        "Location",
        restaurant.location.as_deref().unwrap_or("Location not specified"),
    ));
    html.push_str(&detail_row(
        "Email",
        restaurant.contact_email.as_deref().unwrap_or("No email"),
    ));
    html.push_str(&detail_row(
        "Phone",
        restaurant.contact_number.as_deref().unwrap_or("N/A"),
    ));
    html.push_str(&detail_row("Owner", &person(restaurant.owner.as_ref(), "No owner")));
    html.push_str(&detail_row(
        "Approved by",
        &person(restaurant.approved_by_admin.as_ref(), "N/A"),
    ));
    if let Some(reason) = restaurant.rejection_reason.as_deref() {
        html.push_str(&detail_row("Rejection reason", reason));
    }
    html.push_str(&detail_row(
        "Created",
        &format_datetime(restaurant.created_at.as_deref(), "N/A"),
    ));
    html.push_str("</dl>\n</div>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use dining_core::{NutritionalInfo, RestaurantStatus};

    #[test]
    fn test_meal_details() {
        let meal = Meal {
            id: Some("m1".into()),
            name: Some("Egusi".into()),
            price: Some(3500.0),
            dietary_tags: vec!["gluten-free".into()],
            allergens: vec![],
            nutritional_info: Some(NutritionalInfo {
                calories: Some(450.0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let html = render_meal_details(&meal);
        assert!(html.contains("₦3,500.00"));
        assert!(html.contains("450 kcal"));
        assert!(html.contains("gluten-free"));
        assert!(html.contains("None listed"));
    }

    #[test]
    fn test_restaurant_details() {
        let restaurant = Restaurant {
            restaurant_id: Some("r1".into()),
            restaurant_name: Some("Mama Put".into()),
            owner: Some(PersonRef {
                username: Some("chidi".into()),
                ..Default::default()
            }),
            approved_by_admin: Some(PersonRef {
                email: Some("ada@customdining.ng".into()),
                ..Default::default()
            }),
            status: RestaurantStatus::Approved,
            ..Default::default()
        };
        let html = render_restaurant_details(&restaurant);
        assert!(html.contains("Mama Put"));
        assert!(html.contains("chidi"));
        assert!(html.contains("ada@customdining.ng"));
        assert!(html.contains("Various Cuisines"));
        assert!(!html.contains("Rejection reason"));
    }
}
