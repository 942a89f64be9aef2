//! List bodies and pagination controls.

use super::format::{escape_html, format_number};
use super::rows::TableRow;
use crate::state::{ListPhase, ListSnapshot};

/// Table body for a list snapshot, followed by its pagination controls.
///
/// Loading shows a spinner row, an error shows a retry panel, and an
/// empty list shows the entity's empty-state message.
pub fn render_list<E: TableRow>(snapshot: &ListSnapshot<E>) -> String {
    format!("{}{}", render_body(snapshot), render_pagination(snapshot))
}

/// Standalone table with a header row, followed by the pagination controls.
pub fn render_table<E: TableRow>(snapshot: &ListSnapshot<E>) -> String {
    let headers: String = E::text_headers()
        .iter()
        .map(|h| format!("<th>{}</th>", escape_html(h)))
        .collect();
    format!(
        "<table class=\"table table-hover align-middle\">\n<thead><tr>{}</tr></thead>\n{}</table>\n{}",
        headers,
        render_body(snapshot),
        render_pagination(snapshot)
    )
}

fn render_body<E: TableRow>(snapshot: &ListSnapshot<E>) -> String {
    let body: String = match snapshot.phase {
        ListPhase::Idle => String::new(),
        ListPhase::Loading => render_loading::<E>(),
        ListPhase::Errored => render_error::<E>(snapshot.last_error.as_deref()),
        _ if snapshot.items.is_empty() => render_empty::<E>(),
        _ => snapshot.items.iter().map(TableRow::render_row).collect(),
    };
    format!("<tbody>\n{}</tbody>\n", body)
}

fn render_loading<E: TableRow>() -> String {
    format!(
        r#"<tr><td colspan="{}" class="text-center py-5"><div class="spinner-border text-primary" role="status"><span class="visually-hidden">Loading...</span></div><p class="mt-2 mb-0">Loading {}...</p></td></tr>
"#,
        E::COLUMNS,
        E::KIND.collection_key()
    )
}

fn render_error<E: TableRow>(message: Option<&str>) -> String {
    format!(
        r#"<tr><td colspan="{}" class="text-center py-5"><div class="alert alert-danger mb-3"><i class="fas fa-exclamation-triangle me-2"></i>{}</div><button type="button" class="btn btn-outline-primary" data-action="retry"><i class="fas fa-redo me-1"></i> Retry</button></td></tr>
"#,
        E::COLUMNS,
        escape_html(message.unwrap_or("Something went wrong. Please try again."))
    )
}

fn render_empty<E: TableRow>() -> String {
    let (heading, hint) = E::empty_message();
    format!(
        r#"<tr><td colspan="{}" class="text-center py-5"><p class="h5 text-muted">{}</p><p class="text-muted">{}</p></td></tr>
"#,
        E::COLUMNS,
        heading,
        hint
    )
}

fn nav_button(action: &str, label: &str, icon: &str, enabled: bool) -> String {
    let disabled = if enabled { "" } else { " disabled" };
    format!(
        r#"<li class="page-item{0}"><button type="button" class="page-link" data-action="{1}" aria-label="{2}" aria-disabled="{3}"{0}><i class="fas {4}"></i></button></li>"#,
        disabled, action, label, !enabled, icon
    )
}

/// First/previous/next/last buttons with the page and entry counters.
///
/// First and previous are disabled on page 1; next and last are disabled
/// on the last page and when there are no pages.
pub fn render_pagination<E>(snapshot: &ListSnapshot<E>) -> String {
    let (start, end) = snapshot.showing;
    let back = snapshot.has_previous();
    let forward = snapshot.has_next();

    format!(
        r#"<nav class="pagination-controls" aria-label="Pagination">
  <span class="page-info">{page_info}</span>
  <span class="showing-info">{showing_info}</span>
  <ul class="pagination mb-0">{first}{prev}{next}{last}</ul>
</nav>
"#,
        page_info = page_info(snapshot),
        showing_info = format!(
            "Showing {} to {} of {} entries",
            format_number(start),
            format_number(end),
            format_number(snapshot.total_count)
        ),
        first = nav_button("first-page", "First", "fa-angle-double-left", back),
        prev = nav_button("prev-page", "Previous", "fa-angle-left", back),
        next = nav_button("next-page", "Next", "fa-angle-right", forward),
        last = nav_button("last-page", "Last", "fa-angle-double-right", forward),
    )
}

/// `Page X of Y`, with `Y` at least 1.
pub fn page_info<E>(snapshot: &ListSnapshot<E>) -> String {
    format!("Page {} of {}", snapshot.page, snapshot.display_pages())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ListState;
    use dining_core::{Meal, User};

    fn snapshot(phase: ListPhase, items: usize, total: u64, page: u32) -> ListSnapshot<Meal> {
        let mut state: ListState<Meal> = ListState::new(9);
        state.phase = phase;
        state.total_count = total;
        state.page = page;
        state.items = (0..items)
            .map(|i| Meal {
                id: Some(format!("m{}", i)),
                name: Some(format!("Meal {}", i)),
                ..Default::default()
            })
            .collect();
        ListSnapshot::from(&state)
    }

    #[test]
    fn test_loading_placeholder() {
        let html = render_list(&snapshot(ListPhase::Loading, 0, 0, 1));
        assert!(html.contains("spinner-border"));
        assert!(html.contains("Loading meals..."));
    }

    #[test]
    fn test_error_panel_with_retry() {
        let mut snap = snapshot(ListPhase::Errored, 0, 0, 1);
        snap.last_error = Some("Database <down>".into());
        let html = render_list(&snap);
        assert!(html.contains(r#"data-action="retry""#));
        assert!(html.contains("Database &lt;down&gt;"));
    }

    #[test]
    fn test_empty_state() {
        let html = render_list(&snapshot(ListPhase::Loaded, 0, 0, 1));
        assert!(html.contains("No meals found."));
        assert!(html.contains("Page 1 of 1"));
        assert!(html.contains("Showing 0 to 0 of 0 entries"));

        let mut users: ListState<User> = ListState::new(100);
        users.phase = ListPhase::Loaded;
        assert!(render_list(&ListSnapshot::from(&users)).contains("No users found"));
    }

    #[test]
    fn test_idle_renders_no_rows() {
        let html = render_list(&snapshot(ListPhase::Idle, 0, 0, 1));
        assert!(html.starts_with("<tbody>\n</tbody>"));
        assert!(!html.contains("No meals found."));
        assert!(!html.contains("spinner-border"));
    }

    #[test]
    fn test_rows_and_counters() {
        let html = render_list(&snapshot(ListPhase::Loaded, 3, 12, 2));
        assert_eq!(html.matches("<tr data-id=").count(), 3);
        assert!(html.contains("Page 2 of 2"));
        assert!(html.contains("Showing 10 to 12 of 12 entries"));
    }

    #[test]
    fn test_first_page_disables_back_buttons() {
        let html = render_pagination(&snapshot(ListPhase::Loaded, 9, 12, 1));
        assert!(html.contains(r#"<li class="page-item disabled"><button type="button" class="page-link" data-action="first-page""#));
        assert!(html.contains(r#"<li class="page-item disabled"><button type="button" class="page-link" data-action="prev-page""#));
        assert!(html.contains(r#"<li class="page-item"><button type="button" class="page-link" data-action="next-page""#));
        assert!(html.contains(r#"<li class="page-item"><button type="button" class="page-link" data-action="last-page""#));
    }

    #[test]
    fn test_last_page_disables_forward_buttons() {
        let html = render_pagination(&snapshot(ListPhase::Loaded, 3, 12, 2));
        assert!(html.contains(r#"<li class="page-item"><button type="button" class="page-link" data-action="prev-page""#));
        assert!(html.contains(r#"<li class="page-item disabled"><button type="button" class="page-link" data-action="next-page""#));
        assert!(html.contains(r#"<li class="page-item disabled"><button type="button" class="page-link" data-action="last-page""#));
    }

    #[test]
    fn test_no_pages_disables_everything() {
        let html = render_pagination(&snapshot(ListPhase::Loaded, 0, 0, 1));
        assert_eq!(html.matches("page-item disabled").count(), 4);
    }

    #[test]
    fn test_table_has_header_row() {
        let html = render_table(&snapshot(ListPhase::Loaded, 2, 2, 1));
        assert!(html.starts_with("<table"));
        assert!(html.contains("<thead><tr><th>"));
        assert_eq!(html.matches("<tr data-id=").count(), 2);
        assert!(html.find("</table>").unwrap() < html.find("<nav").unwrap());
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let snap = snapshot(ListPhase::Loaded, 5, 5, 1);
        assert_eq!(render_list(&snap), render_list(&snap));
    }
}
