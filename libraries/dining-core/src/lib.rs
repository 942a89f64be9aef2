//! Custom Dining Core
//!
//! Platform-agnostic domain types, traits, and error handling for the
//! Custom Dining admin client.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `Restaurant`, `Meal`, `Session`
//! - **Core Traits**: `Entity`, the per-record contract the list engine is generic over
//! - **Lenient decoding**: the remote API is loose about field types, so the
//!   decoders in [`lenient`] accept the variants it is known to send
//! - **Error Handling**: `CoreError` and `Result`
//!
//! # Example
//!
//! ```rust
//! use dining_core::{Entity, Meal};
//!
//! let meal: Meal = serde_json::from_value(serde_json::json!({
//!     "id": "m1",
//!     "name": "Pepperoni Pizza",
//!     "price": "₦4,500.00",
//!     "isAvailable": 1
//! })).unwrap();
//!
//! assert_eq!(meal.id(), Some("m1"));
//! assert_eq!(meal.price, Some(4500.0));
//! assert_eq!(meal.is_available, Some(true));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod entity;
pub mod error;
pub mod lenient;
pub mod types;

pub use entity::{parse_timestamp, Entity, EntityKind};
pub use error::{CoreError, Result};
pub use types::{
    Meal, MealDraft, NutritionalInfo, NewRestaurant, PersonRef, Restaurant, RestaurantRef,
    RestaurantStatus, Session, SessionUser, User,
};
