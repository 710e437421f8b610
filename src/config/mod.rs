//! Configuration module.
//!
//! Environment-driven application settings and the JSON restaurant
//! registry file.

mod restaurants;
mod settings;

pub use restaurants::{RestaurantConfig, RestaurantEntry, ValidationError};
pub use settings::{BotSettings, ConfigError};
