//! Session state: the single object every engine function mutates.
//!
//! The whole struct is serialized wholesale for save slots, including the
//! transient daily counters, so a restored session resolves its quests
//! exactly as the saved one would have.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::SessionConfig;
use crate::contracts::{Contract, ContractId};
use crate::fleet::{Skin, Vehicle, VehicleId};
use crate::quests::Quest;

/// Display language for quest text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Fr,
    En,
}

impl Locale {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fr => "fr",
            Self::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fr" => Ok(Self::Fr),
            "en" => Ok(Self::En),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// One-based day counter.
    pub day: u32,
    /// May go negative through late penalties; never clamped.
    pub credits: i64,
    pub reputation: u32,
    /// Credits per fuel unit, never below 2.
    pub fuel_price: i64,
    #[serde(default)]
    pub hardcore: bool,
    #[serde(default = "GameState::default_auto_save")]
    pub auto_save: bool,
    #[serde(default = "GameState::default_save_slot")]
    pub save_slot: u8,
    #[serde(default)]
    pub locale: Locale,
    pub fleet: Vec<Vehicle>,
    /// Open contract pool; disjoint from contracts bound to vehicles.
    #[serde(default)]
    pub contracts: Vec<Contract>,
    #[serde(default)]
    pub quests: Vec<Quest>,
    /// Credits earned from on-time deliveries since the last day advance.
    #[serde(default)]
    pub earned_today: i64,
    /// Breakdowns rolled since the last day advance.
    #[serde(default)]
    pub breakdowns_today: u32,
    pub next_vehicle_id: u32,
    #[serde(default)]
    pub next_contract_seq: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default())
    }
}

impl GameState {
    const fn default_auto_save() -> bool {
        true
    }

    const fn default_save_slot() -> u8 {
        crate::constants::SAVE_SLOT_MIN
    }

    /// Day-one state with the starter vehicle and empty pools.
    #[must_use]
    pub fn from_config(cfg: &SessionConfig) -> Self {
        let starter = Vehicle::new(
            VehicleId(1),
            cfg.starting_capacity,
            Skin(cfg.starting_skin.clone()),
        );
        Self {
            day: 1,
            credits: cfg.starting_credits,
            reputation: cfg.starting_reputation,
            fuel_price: cfg.starting_fuel_price,
            hardcore: cfg.hardcore,
            auto_save: cfg.auto_save,
            save_slot: cfg.save_slot,
            locale: cfg.locale,
            fleet: vec![starter],
            contracts: Vec::new(),
            quests: Vec::new(),
            earned_today: 0,
            breakdowns_today: 0,
            next_vehicle_id: 2,
            next_contract_seq: 1,
        }
    }

    #[must_use]
    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.fleet.iter().find(|vehicle| vehicle.id == id)
    }

    pub fn vehicle_mut(&mut self, id: VehicleId) -> Option<&mut Vehicle> {
        self.fleet.iter_mut().find(|vehicle| vehicle.id == id)
    }

    #[must_use]
    pub fn contract(&self, id: &ContractId) -> Option<&Contract> {
        self.contracts.iter().find(|contract| &contract.id == id)
    }

    /// Hand out the next vehicle id.
    pub const fn issue_vehicle_id(&mut self) -> VehicleId {
        let id = VehicleId(self.next_vehicle_id);
        self.next_vehicle_id = self.next_vehicle_id.saturating_add(1);
        id
    }

    /// Hand out the next contract token.
    pub fn issue_contract_id(&mut self) -> ContractId {
        let id = ContractId::from_sequence(self.next_contract_seq);
        self.next_contract_seq = self.next_contract_seq.saturating_add(1);
        id
    }

    #[must_use]
    pub fn busy_count(&self) -> usize {
        self.fleet.iter().filter(|vehicle| vehicle.is_busy()).count()
    }

    /// Every contract currently bound to a vehicle.
    pub fn contracts_in_flight(&self) -> impl Iterator<Item = &Contract> {
        self.fleet
            .iter()
            .filter_map(|vehicle| vehicle.active_contract.as_ref())
    }

    /// Check the structural invariants: bounded fuel and hull, a non-empty
    /// fleet, a fuel price at or above its floor, and an open pool disjoint
    /// from in-flight contracts. Returns a description of each violation.
    #[must_use]
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        if self.day == 0 {
            violations.push("day counter dropped below 1".to_string());
        }
        if self.fuel_price < crate::constants::FUEL_PRICE_FLOOR {
            violations.push(format!("fuel price {} below floor", self.fuel_price));
        }
        if self.fleet.is_empty() {
            violations.push("fleet is empty".to_string());
        }
        for vehicle in &self.fleet {
            if !vehicle.within_bounds() {
                violations.push(format!(
                    "{} out of bounds (fuel {}/{}, hp {}/{})",
                    vehicle.name, vehicle.fuel, vehicle.fuel_max, vehicle.hp, vehicle.hp_max
                ));
            }
            if vehicle.is_busy() != vehicle.active_contract.is_some() {
                violations.push(format!(
                    "{} busy={} but contract bound={}",
                    vehicle.name,
                    vehicle.busy_days,
                    vehicle.active_contract.is_some()
                ));
            }
        }
        for in_flight in self.contracts_in_flight() {
            if self.contract(&in_flight.id).is_some() {
                violations.push(format!("{} is both open and in flight", in_flight.id));
            }
        }
        violations
    }
}
