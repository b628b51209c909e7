//! Data models
//!
//! Rust structs representing database entities.

mod body_profile;
mod favorite_meal;
mod logged_entry;
mod nutrition;

pub use body_profile::ProfileSnapshot;
pub use favorite_meal::{FavoriteMeal, FavoriteMealCreate};
pub use logged_entry::{LoggedEntry, LoggedEntryCreate};
pub use nutrition::Macros;
