//! Dashboard widgets: stat cards, recent activity, user menu, toasts.

use super::format::{escape_html, format_datetime, format_number};
use crate::notify::{Notification, DISMISS_AFTER};
use dining_client::{DashboardStats, RecentActivity};
use dining_core::{Entity, RestaurantStatus, SessionUser};

fn stat_value(count: Option<u64>) -> String {
    count.map_or_else(|| "Error".to_string(), format_number)
}

/// Total users, restaurants, and meals cards. A count that failed to load
/// reads `Error`.
pub fn render_stat_cards(stats: &DashboardStats) -> String {
    [
        ("total-users", "Total Users", "fa-users", stats.users),
        ("total-restaurants", "Total Restaurants", "fa-utensils", stats.restaurants),
        ("total-meals", "Total Meals", "fa-hamburger", stats.meals),
    ]
    .iter()
    .map(|(id, label, icon, count)| {
        format!(
            r#"<div class="stat-card"><div class="stat-icon"><i class="fas {}"></i></div><div class="stat-details"><h3 id="{}">{}</h3><p>{}</p></div></div>
"#,
            icon,
            id,
            stat_value(*count),
            label
        )
    })
    .collect()
}

/// Newest sign-ups followed by newest listings, or an empty-state panel.
pub fn render_recent_activity(activity: &RecentActivity) -> String {
    if activity.is_empty() {
        return r#"<div class="text-center py-4"><i class="fas fa-inbox fa-2x text-muted mb-2"></i><p class="text-muted mb-0">No recent activity found</p></div>
"#
        .to_string();
    }

    let mut html = String::new();
    for user in &activity.users {
        let role = user.role();
        let badge = match role {
            "admin" => "danger",
            "restaurant" => "info",
            _ => "success",
        };
        html.push_str(&format!(
            r#"<div class="activity-item"><div class="activity-icon"><i class="fas fa-user-plus"></i></div><div class="activity-details"><p>New user registered: {}</p><span class="activity-time">{}</span><div class="badge bg-{} mt-1">{}</div></div></div>
"#,
            escape_html(user.email.as_deref().unwrap_or("Unknown")),
            format_datetime(user.created_at.as_deref(), "Just now"),
            badge,
            escape_html(role)
        ));
    }

    for restaurant in &activity.restaurants {
        let badge = if restaurant.status == RestaurantStatus::Approved {
            "success"
        } else {
            "warning"
        };
        html.push_str(&format!(
            r#"<div class="activity-item"><div class="activity-icon"><i class="fas fa-utensils"></i></div><div class="activity-details"><p>New restaurant: <strong>{}</strong></p><div class="d-flex align-items-center gap-2"><span class="badge bg-{}">{}</span><small class="text-muted">{}</small></div><span class="activity-time">{}</span></div></div>
"#,
            escape_html(restaurant.display_name()),
            badge,
            restaurant.status.as_str(),
            escape_html(restaurant.location.as_deref().unwrap_or("No location")),
            format_datetime(restaurant.created_at.as_deref(), "Recently")
        ));
    }
    html
}

/// Signed-in user's avatar initials and display name.
pub fn render_user_menu(user: &SessionUser) -> String {
    format!(
        r#"<div class="user-menu"><div class="avatar-circle">{}</div><span class="user-name">{}</span><button type="button" class="btn btn-link" data-action="logout">Logout</button></div>
"#,
        escape_html(&user.initials()),
        escape_html(user.display_name())
    )
}

/// Dismissible alert for a notification.
pub fn render_toast(notification: &Notification) -> String {
    format!(
        r#"<div class="alert alert-{} alert-dismissible fade show" role="alert" data-dismiss-after="{}">{}<button type="button" class="btn-close" data-bs-dismiss="alert" aria-label="Close"></button></div>
"#,
        notification.level.css_class(),
        DISMISS_AFTER.as_millis(),
        escape_html(&notification.message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use dining_core::{Restaurant, User};

    #[test]
    fn test_stat_cards() {
        let html = render_stat_cards(&DashboardStats {
            users: Some(1250),
            restaurants: None,
            meals: Some(0),
        });
        assert!(html.contains(r#"<h3 id="total-users">1,250</h3>"#));
        assert!(html.contains(r#"<h3 id="total-restaurants">Error</h3>"#));
        assert!(html.contains(r#"<h3 id="total-meals">0</h3>"#));
    }

    #[test]
    fn test_empty_activity() {
        let html = render_recent_activity(&RecentActivity::default());
        assert!(html.contains("No recent activity found"));
    }

    #[test]
    fn test_activity_items() {
        let activity = RecentActivity {
            users: vec![User {
                email: Some("new@customdining.ng".into()),
                role: Some("restaurant".into()),
                ..Default::default()
            }],
            restaurants: vec![Restaurant {
                restaurant_name: Some("Bukka Hut".into()),
                status: RestaurantStatus::Approved,
                ..Default::default()
            }],
        };
        let html = render_recent_activity(&activity);
        assert!(html.contains("New user registered: new@customdining.ng"));
        assert!(html.contains("bg-info"));
        assert!(html.contains("Just now"));
        assert!(html.contains("<strong>Bukka Hut</strong>"));
        assert!(html.contains("No location"));
    }

    #[test]
    fn test_user_menu() {
        let user = SessionUser {
            id: None,
            email: "ada.obi@customdining.ng".into(),
            role: "admin".into(),
            name: "Ada Obi".into(),
        };
        let html = render_user_menu(&user);
        assert!(html.contains(r#"<div class="avatar-circle">AO</div>"#));
        assert!(html.contains("Ada Obi"));
    }

    #[test]
    fn test_toast_escapes() {
        let html = render_toast(&Notification::error("<img src=x>"));
        assert!(html.contains("alert-danger"));
        assert!(html.contains("&lt;img src=x&gt;"));
        assert!(html.contains(r#"data-dismiss-after="5000""#));
    }
}
