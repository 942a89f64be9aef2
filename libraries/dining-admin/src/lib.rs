//! Custom Dining Admin
//!
//! The list engine and presentation layer of the admin dashboard.
//!
//! # Architecture
//!
//! - **Controller**: [`ListController`] owns one list's state, talks to a
//!   [`dining_client::ListSource`], and patches rows after mutations
//! - **State**: [`ListState`] and the pure windowing function that fits a
//!   response into a page
//! - **Notifications**: the [`Notifier`] seam for success and error toasts
//! - **View**: pure renderers from snapshots to HTML or plain text
//!
//! # Example
//!
//! ```ignore
//! use dining_admin::{view, ListConfig, ListController, TracingNotifier};
//! use std::sync::Arc;
//!
//! let meals = ListController::new(client.meals(), ListConfig::meals(), Arc::new(TracingNotifier));
//! meals.set_filter("search", "pizza").await;
//! println!("{}", view::render_text_table(&meals.snapshot()));
//! ```

#![forbid(unsafe_code)]

pub mod controller;
pub mod debounce;
pub mod notify;
pub mod state;
pub mod view;

pub use controller::{ListConfig, ListController, RenderSink, SEARCH_KEY};
pub use debounce::Debouncer;
pub use notify::{Level, Notification, NotificationLog, Notifier, TracingNotifier};
pub use state::{
    showing_range, total_pages, window, ListPhase, ListSnapshot, ListState, ResidualFilter,
    Windowed,
};
