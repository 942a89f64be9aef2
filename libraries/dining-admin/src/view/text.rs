//! Plain-text rendering for terminals.

use super::format::format_number;
use super::list::page_info;
use super::rows::TableRow;
use crate::state::{ListPhase, ListSnapshot};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

/// Bordered table followed by the page counters.
pub fn render_text_table<E: TableRow>(snapshot: &ListSnapshot<E>) -> String {
    match snapshot.phase {
        ListPhase::Idle => return String::new(),
        ListPhase::Loading => return format!("Loading {}...\n", E::KIND.collection_key()),
        ListPhase::Errored => {
            return format!(
                "Error: {}\n",
                snapshot.last_error.as_deref().unwrap_or("request failed")
            )
        }
        ListPhase::Loaded => {}
    }

    if snapshot.items.is_empty() {
        return format!("{}\n", E::empty_message().0);
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(E::text_headers().iter().map(|h| Cell::new(*h)));

    for item in &snapshot.items {
        table.add_row(item.text_cells().into_iter().map(Cell::new));
    }

    let (start, end) = snapshot.showing;
    format!(
        "{table}\n{}  |  Showing {} to {} of {} entries\n",
        page_info(snapshot),
        format_number(start),
        format_number(end),
        format_number(snapshot.total_count)
    )
}
