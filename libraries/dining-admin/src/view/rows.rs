//! Table rows for each entity.

use super::format::{capitalize, escape_html, excerpt, format_date, format_price};
use dining_core::{Entity, Meal, Restaurant, RestaurantStatus, User};

/// Shown when a meal has no photo.
const PLACEHOLDER_IMAGE: &str = "data:image/svg+xml;charset=UTF-8,%3Csvg%20width%3D%2280%22%20height%3D%2260%22%20xmlns%3D%22http%3A%2F%2Fwww.w3.org%2F2000%2Fsvg%22%3E%3Crect%20width%3D%2280%22%20height%3D%2260%22%20fill%3D%22%23f0f0f0%22%2F%3E%3Ctext%20x%3D%2240%22%20y%3D%2230%22%20font-size%3D%2210%22%20text-anchor%3D%22middle%22%20fill%3D%22%23999%22%3ENo%20Image%3C%2Ftext%3E%3C%2Fsvg%3E";

/// How an entity appears in a list table and in the plain-text listing.
pub trait TableRow: Entity {
    /// Number of table columns
    const COLUMNS: usize;

    /// Heading and hint shown when the list is empty
    fn empty_message() -> (&'static str, &'static str);

    /// One `<tr>` element
    fn render_row(&self) -> String;

    /// Column headings for the plain-text listing
    fn text_headers() -> &'static [&'static str];

    /// Cells for the plain-text listing, in `text_headers` order
    fn text_cells(&self) -> Vec<String>;
}

/// Only web and inline image URLs may reach an `<img src>`.
fn is_image_source(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    ["http://", "https://", "data:image/"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
}

fn role_badge_class(role: &str) -> &'static str {
    match role {
        "admin" => "bg-danger",
        "restaurant" => "bg-info",
        _ => "bg-success",
    }
}

/// `(class, icon)` for a restaurant status badge.
pub(crate) fn status_badge_style(status: RestaurantStatus) -> (&'static str, &'static str) {
    match status {
        RestaurantStatus::Approved => ("bg-success", "fa-check-circle"),
        RestaurantStatus::Rejected => ("bg-danger", "fa-times-circle"),
        RestaurantStatus::Pending => ("bg-warning text-dark", "fa-clock"),
    }
}

fn mailto(address: &str) -> String {
    let address = escape_html(address);
    format!(r#"<a href="mailto:{0}" class="text-decoration-none">{0}</a>"#, address)
}

impl TableRow for User {
    const COLUMNS: usize = 5;

    fn empty_message() -> (&'static str, &'static str) {
        ("No users found", "Try adjusting your search or add a new user")
    }

    fn render_row(&self) -> String {
        let name = self.display_name();
        let initial: String = name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default();
        let role = self.role();
        let email = self
            .email
            .as_deref()
            .filter(|e| !e.is_empty())
            .map_or_else(|| "N/A".to_string(), mailto);
        let (verified_class, verified_icon, verified_label) = if self.is_verified() {
            ("bg-success", "fa-check-circle", "Active")
        } else {
            ("bg-warning", "fa-envelope", "Pending Email")
        };

        format!(
            r#"<tr data-id="{id}">
  <td class="align-middle"><div class="d-flex align-items-center"><div class="avatar-circle me-3">{initial}</div><div><div class="fw-semibold">{name}</div><small class="text-muted">{role}</small></div></div></td>
  <td class="align-middle">{email}</td>
  <td class="align-middle"><span class="badge {role_class}">{role_label}</span></td>
  <td class="align-middle text-center"><span class="badge {verified_class}"><i class="fas {verified_icon} me-1"></i>{verified_label}</span></td>
  <td class="align-middle text-center"><small class="text-muted">{created}</small></td>
</tr>
"#,
            id = escape_html(self.id().unwrap_or_default()),
            initial = escape_html(&initial),
            name = escape_html(name),
            role = escape_html(role),
            email = email,
            role_class = role_badge_class(role),
            role_label = escape_html(&capitalize(role)),
            verified_class = verified_class,
            verified_icon = verified_icon,
            verified_label = verified_label,
            created = format_date(self.created_at.as_deref(), "N/A"),
        )
    }

    fn text_headers() -> &'static [&'static str] {
        &["ID", "NAME", "EMAIL", "ROLE", "VERIFIED", "CREATED"]
    }

    fn text_cells(&self) -> Vec<String> {
        vec![
            self.id().unwrap_or("-").to_string(),
            self.display_name().to_string(),
            self.email.clone().unwrap_or_else(|| "N/A".to_string()),
            self.role().to_string(),
            if self.is_verified() { "yes" } else { "no" }.to_string(),
            format_date(self.created_at.as_deref(), "N/A"),
        ]
    }
}

fn restaurant_actions(status: RestaurantStatus, id: &str) -> String {
    match status {
        RestaurantStatus::Pending => format!(
            r#"<div class="btn-group btn-group-sm" role="group"><button type="button" class="btn btn-success" data-action="approve" data-restaurant-id="{0}" title="Approve"><i class="fas fa-check"></i> Approve</button><button type="button" class="btn btn-danger" data-action="reject" data-restaurant-id="{0}" title="Decline"><i class="fas fa-times"></i> Reject</button></div>"#,
            id
        ),
        RestaurantStatus::Approved => format!(
            r#"<button type="button" class="btn btn-primary btn-sm" data-action="view" data-restaurant-id="{}" title="View"><i class="fas fa-eye me-1"></i> View</button>"#,
            id
        ),
        RestaurantStatus::Rejected => r#"<button type="button" class="btn btn-secondary btn-sm" disabled title="Viewing not available for rejected restaurants"><i class="fas fa-eye-slash me-1"></i> View Unavailable</button>"#.to_string(),
    }
}

impl TableRow for Restaurant {
    const COLUMNS: usize = 7;

    fn empty_message() -> (&'static str, &'static str) {
        ("No restaurants found", "Add a new restaurant to get started")
    }

    fn render_row(&self) -> String {
        let id = escape_html(self.id().unwrap_or_default());
        let owner = self.owner_email();
        let owner_cell = if owner.contains('@') {
            mailto(owner)
        } else {
            format!(r#"<span class="text-muted">{}</span>"#, escape_html(owner))
        };
        let (badge_class, badge_icon) = status_badge_style(self.status);

        format!(
            r#"<tr class="align-middle" data-id="{id}">
  <td><div class="d-flex align-items-center"><div class="me-2"><i class="fas fa-utensils text-primary"></i></div><div class="fw-semibold">{name}</div></div></td>
  <td><i class="fas fa-map-marker-alt text-muted me-2"></i><span>{location}</span></td>
  <td>{cuisine}</td>
  <td>{contact}</td>
  <td>{owner}</td>
  <td class="text-center"><span class="badge rounded-pill {badge_class}"><i class="fas {badge_icon} me-1"></i>{status}</span></td>
  <td class="text-center">{actions}</td>
</tr>
"#,
            name = escape_html(self.display_name()),
            location = escape_html(self.location.as_deref().unwrap_or("Location not specified")),
            cuisine = escape_html(self.cuisine_type.as_deref().unwrap_or("Various Cuisines")),
            contact = self
                .contact_email
                .as_deref()
                .filter(|e| !e.is_empty())
                .map_or_else(|| "No email".to_string(), mailto),
            owner = owner_cell,
            status = self.status.label(),
            actions = restaurant_actions(self.status, &id),
            id = id,
            badge_class = badge_class,
            badge_icon = badge_icon,
        )
    }

    fn text_headers() -> &'static [&'static str] {
        &["ID", "NAME", "LOCATION", "CUISINE", "OWNER", "STATUS"]
    }

    fn text_cells(&self) -> Vec<String> {
        vec![
            self.id().unwrap_or("-").to_string(),
            self.display_name().to_string(),
            self.location.clone().unwrap_or_else(|| "-".to_string()),
            self.cuisine_type.clone().unwrap_or_else(|| "-".to_string()),
            self.owner_email().to_string(),
            self.status.label().to_string(),
        ]
    }
}

impl TableRow for Meal {
    const COLUMNS: usize = 7;

    fn empty_message() -> (&'static str, &'static str) {
        ("No meals found.", "Try adjusting your filters.")
    }

    fn render_row(&self) -> String {
        let id = escape_html(self.id().unwrap_or_default());
        let image = self
            .image_url
            .as_deref()
            .map(str::trim)
            .filter(|u| is_image_source(u))
            .map_or_else(|| PLACEHOLDER_IMAGE.to_string(), escape_html);
        let (available_class, available_label) = if self.is_available == Some(true) {
            ("bg-success", "Active")
        } else {
            ("bg-secondary", "Inactive")
        };

        format!(
            r#"<tr data-id="{id}">
  <td><img src="{image}" class="img-thumbnail" alt="{name}" style="width: 80px; height: 60px; object-fit: cover;"></td>
  <td><div class="fw-bold">{name}</div><div class="small text-muted">{excerpt}</div></td>
  <td>{restaurant}</td>
  <td>{category}</td>
  <td>{price}</td>
  <td class="text-center"><span class="badge {available_class}">{available_label}</span></td>
  <td class="text-center"><button class="btn btn-sm btn-outline-primary me-1" title="View" data-action="view" data-meal-id="{id}"><i class="fas fa-eye"></i></button><button class="btn btn-sm btn-outline-secondary" title="Edit" data-action="edit" data-meal-id="{id}"><i class="fas fa-edit"></i></button></td>
</tr>
"#,
            image = image,
            name = escape_html(self.display_name()),
            excerpt = escape_html(&excerpt(self.description.as_deref(), 50)),
            restaurant = escape_html(self.restaurant_name().unwrap_or("N/A")),
            category = escape_html(self.category.as_deref().unwrap_or("Uncategorized")),
            price = format_price(self.price),
            id = id,
            available_class = available_class,
            available_label = available_label,
        )
    }

    fn text_headers() -> &'static [&'static str] {
        &["ID", "NAME", "RESTAURANT", "CATEGORY", "PRICE", "STATUS"]
    }

    fn text_cells(&self) -> Vec<String> {
        vec![
            self.id().unwrap_or("-").to_string(),
            self.display_name().to_string(),
            self.restaurant_name().unwrap_or("N/A").to_string(),
            self.category.clone().unwrap_or_else(|| "Uncategorized".to_string()),
            format_price(self.price),
            if self.is_available == Some(true) { "Active" } else { "Inactive" }.to_string(),
        ]
    }
}
