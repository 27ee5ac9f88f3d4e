//! Delivery contract generation and the open-contract pool.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    CONTRACT_DEADLINE_MAX_DAYS, CONTRACT_DEADLINE_MIN_DAYS, CONTRACT_DISTANCE_MAX,
    CONTRACT_DISTANCE_MIN, CONTRACT_PAYOUT_PER_DISTANCE, CONTRACT_PAYOUT_PER_WEIGHT,
    CONTRACT_PENALTY_RATIO, CONTRACT_WEIGHT_MAX, CONTRACT_WEIGHT_MIN,
};
use crate::map::{Route, random_route};
use crate::numbers::{clamp_i64_to_u32, round_f64_to_i64};
use crate::rng::UniformSource;
use crate::state::GameState;

/// Unique token identifying a contract for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractId(pub String);

impl ContractId {
    #[must_use]
    pub fn from_sequence(seq: u64) -> Self {
        Self(format!("CT-{seq:06}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A time-boxed delivery offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    #[serde(flatten)]
    pub route: Route,
    /// Abstract distance; drives fuel use and transit time.
    pub distance: u32,
    /// Cargo tonnage; must fit the carrying vehicle's capacity.
    pub weight: u32,
    /// Last day on which arrival still counts as on time.
    pub deadline_day: u32,
    pub payout: i64,
    pub penalty: i64,
}

impl Contract {
    /// Base value before the random premium is applied.
    #[must_use]
    pub fn base_value(distance: u32, weight: u32) -> f64 {
        f64::from(distance) * CONTRACT_PAYOUT_PER_DISTANCE
            + f64::from(weight) * CONTRACT_PAYOUT_PER_WEIGHT
    }

    /// Whether arrival on `day` settles as a success.
    #[must_use]
    pub const fn is_on_time(&self, day: u32) -> bool {
        day <= self.deadline_day
    }
}

/// Draw a fresh contract issued on `current_day`.
pub fn generate_contract<R: UniformSource + ?Sized>(
    rng: &mut R,
    current_day: u32,
    id: ContractId,
) -> Contract {
    let route = random_route(rng);
    let distance = clamp_i64_to_u32(rng.roll_range(CONTRACT_DISTANCE_MIN, CONTRACT_DISTANCE_MAX));
    let weight = clamp_i64_to_u32(rng.roll_range(CONTRACT_WEIGHT_MIN, CONTRACT_WEIGHT_MAX));
    let deadline_offset = clamp_i64_to_u32(
        rng.roll_range(CONTRACT_DEADLINE_MIN_DAYS, CONTRACT_DEADLINE_MAX_DAYS),
    );
    let premium = 1.0 + rng.next_uniform();
    let payout = round_f64_to_i64(Contract::base_value(distance, weight) * premium);
    let penalty = round_f64_to_i64(crate::numbers::i64_to_f64(payout) * CONTRACT_PENALTY_RATIO);
    Contract {
        id,
        route,
        distance,
        weight,
        deadline_day: current_day.saturating_add(deadline_offset),
        payout,
        penalty,
    }
}

/// Replace the whole open pool with `count` new contracts. Unassigned offers
/// are discarded; contracts already bound to vehicles are unaffected.
pub fn refresh_pool<R: UniformSource + ?Sized>(state: &mut GameState, rng: &mut R, count: usize) {
    let mut pool = Vec::with_capacity(count);
    for _ in 0..count {
        let id = state.issue_contract_id();
        pool.push(generate_contract(rng, state.day, id));
    }
    state.contracts = pool;
}
