//! Restaurant registry configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during restaurant configuration handling.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("No restaurants configured")]
    NoRestaurants,

    #[error("Restaurant at index {index} has an empty name")]
    EmptyName { index: usize },

    #[error("Restaurant '{name}' has an empty URL")]
    EmptyUrl { name: String },

    #[error("Duplicate restaurant name: {name}")]
    DuplicateName { name: String },

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// One restaurant: a lookup name and the page its menu lives on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RestaurantEntry {
    /// Name users pass to `/dailymenu`; lookup is case-sensitive.
    pub name: String,

    /// Page to fetch the menu from.
    pub url: String,
}

/// Configuration containing all restaurants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantConfig {
    pub restaurants: Vec<RestaurantEntry>,
}

impl RestaurantConfig {
    /// Loads configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Saves configuration to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ValidationError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validates all entries.
    ///
    /// # Errors
    ///
    /// Returns the first validation error encountered.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.restaurants.is_empty() {
            return Err(ValidationError::NoRestaurants);
        }

        let mut seen_names = std::collections::HashSet::new();

        for (index, entry) in self.restaurants.iter().enumerate() {
            if entry.name.trim().is_empty() {
                return Err(ValidationError::EmptyName { index });
            }

            if !seen_names.insert(&entry.name) {
                return Err(ValidationError::DuplicateName {
                    name: entry.name.clone(),
                });
            }

            if entry.url.trim().is_empty() {
                return Err(ValidationError::EmptyUrl {
                    name: entry.name.clone(),
                });
            }
        }

        Ok(())
    }

    /// Returns the number of restaurants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.restaurants.len()
    }

    /// Checks if there are no restaurants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.restaurants.is_empty()
    }

    /// Creates an example configuration.
    #[must_use]
    pub fn example() -> Self {
        Self {
            restaurants: vec![RestaurantEntry {
                name: "kanas".to_owned(),
                url: "https://example.com/kanas/daily-menu".to_owned(),
            }],
        }
    }
}
