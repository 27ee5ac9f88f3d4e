//! Session start-up configuration.
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CONTRACT_POOL_SIZE, FUEL_PRICE_FLOOR, SAVE_SLOT_MAX, SAVE_SLOT_MIN,
};
use crate::error::ConfigError;
use crate::state::Locale;

/// Knobs a host may set when opening a session. Balance constants are not
/// configurable; see [`crate::constants`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub starting_credits: i64,
    pub starting_fuel_price: i64,
    pub starting_reputation: u32,
    pub starting_capacity: u32,
    pub starting_skin: String,
    pub contract_pool_size: usize,
    pub hardcore: bool,
    pub auto_save: bool,
    pub save_slot: u8,
    pub locale: Locale,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_credits: 5_000,
            starting_fuel_price: 4,
            starting_reputation: 0,
            starting_capacity: 30,
            starting_skin: "falcon".to_string(),
            contract_pool_size: DEFAULT_CONTRACT_POOL_SIZE,
            hardcore: false,
            auto_save: true,
            save_slot: SAVE_SLOT_MIN,
            locale: Locale::Fr,
        }
    }
}

impl SessionConfig {
    /// Parse a JSON document; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reject values the simulation cannot start from.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_fuel_price < FUEL_PRICE_FLOOR {
            return Err(ConfigError::MinViolation {
                field: "starting_fuel_price",
                min: FUEL_PRICE_FLOOR,
                value: self.starting_fuel_price,
            });
        }
        if self.contract_pool_size == 0 {
            return Err(ConfigError::MinViolation {
                field: "contract_pool_size",
                min: 1,
                value: 0,
            });
        }
        if self.starting_capacity == 0 {
            return Err(ConfigError::MinViolation {
                field: "starting_capacity",
                min: 1,
                value: 0,
            });
        }
        if !(SAVE_SLOT_MIN..=SAVE_SLOT_MAX).contains(&self.save_slot) {
            return Err(ConfigError::RangeViolation {
                field: "save_slot",
                min: i64::from(SAVE_SLOT_MIN),
                max: i64::from(SAVE_SLOT_MAX),
                value: i64::from(self.save_slot),
            });
        }
        Ok(())
    }
}
