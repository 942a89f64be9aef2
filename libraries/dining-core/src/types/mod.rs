mod meal;
mod restaurant;
mod session;
mod user;

pub use meal::{Meal, MealDraft, NutritionalInfo, RestaurantRef};
pub use restaurant::{NewRestaurant, PersonRef, Restaurant, RestaurantStatus};
pub use session::{Session, SessionUser};
pub use user::User;
