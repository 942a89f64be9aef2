//! HTML and text renderers.
//!
//! Every renderer is a pure function of its input: rendering the same
//! snapshot twice yields the same markup. All interpolated text is escaped.

mod dashboard;
mod details;
mod format;
mod list;
mod rows;
mod text;

pub use dashboard::{render_recent_activity, render_stat_cards, render_toast, render_user_menu};
pub use details::{render_meal_details, render_restaurant_details};
pub use format::{capitalize, escape_html, excerpt, format_date, format_datetime, format_number, format_price};
pub use list::{page_info, render_list, render_pagination, render_table};
pub use rows::TableRow;
pub use text::render_text_table;
