//! Error taxonomy for the simulation core.
//!
//! Nothing here is fatal: validation failures leave state untouched and
//! transport failures are logged by the engine wrapper.
use thiserror::Error;

use crate::contracts::ContractId;
use crate::fleet::VehicleId;

/// A player action was rejected before any state changed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationFailure {
    #[error("no idle vehicle can carry {weight}t")]
    NoEligibleVehicle { weight: u32 },
    #[error("{vehicle} lacks fuel ({needed} required, {available} on board)")]
    InsufficientFuel {
        vehicle: String,
        needed: u32,
        available: u32,
    },
    #[error("insufficient credits ({credits} available, {price} required)")]
    InsufficientFunds { price: i64, credits: i64 },
    #[error("the fleet must keep at least one vehicle")]
    MinimumFleetSize,
    #[error("contract {0} is not in the open pool")]
    UnknownContract(ContractId),
    #[error("vehicle #{0} is not in the fleet")]
    UnknownVehicle(VehicleId),
}

/// Persistence or leaderboard transport failed.
#[derive(Debug, Error)]
pub enum TransportFailure {
    #[error("storage I/O failed: {0}")]
    Io(String),
    #[error("snapshot (de)serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("request rejected: {0}")]
    Rejected(String),
}

impl From<std::io::Error> for TransportFailure {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Session configuration values outside their accepted ranges.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be at least {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: i64,
        value: i64,
    },
    #[error("{field} must be between {min} and {max} (got {value})")]
    RangeViolation {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let err = ValidationFailure::InsufficientFuel {
            vehicle: "ST-101".to_string(),
            needed: 40,
            available: 12,
        };
        assert_eq!(
            err.to_string(),
            "ST-101 lacks fuel (40 required, 12 on board)"
        );
        assert_eq!(
            ValidationFailure::NoEligibleVehicle { weight: 45 }.to_string(),
            "no idle vehicle can carry 45t"
        );
    }

    #[test]
    fn io_errors_convert_to_transport_failures() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let failure = TransportFailure::from(io);
        assert!(matches!(failure, TransportFailure::Io(ref msg) if msg.contains("gone")));
    }
}
