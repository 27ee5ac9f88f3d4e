//! Day advance: quest resolution, market drift, transit and settlement.
use serde::Serialize;

use crate::constants::{
    BREAKDOWN_CHANCE, BREAKDOWN_CHANCE_HARDCORE, BREAKDOWN_DAMAGE_MAX,
    BREAKDOWN_DAMAGE_MAX_HARDCORE, BREAKDOWN_DAMAGE_MIN, FUEL_PRICE_DRIFT_CHANCE,
    FUEL_PRICE_DRIFT_MAX, FUEL_PRICE_DRIFT_MIN, FUEL_PRICE_FLOOR, HARDCORE_PAYOUT_BONUS,
    HARDCORE_PENALTY_MULTIPLIER,
};
use crate::contracts::{Contract, ContractId};
use crate::fleet::VehicleId;
use crate::journal::{LogEvent, LogSink};
use crate::numbers::{clamp_i64_to_u32, i64_to_f64, round_f64_to_i64};
use crate::quests::{DayTelemetry, FulfilledQuests, resolve_quests};
use crate::rng::UniformSource;
use crate::state::GameState;

/// How a finished delivery was settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Settlement {
    OnTime {
        vehicle: VehicleId,
        contract: ContractId,
        gain: i64,
    },
    Late {
        vehicle: VehicleId,
        contract: ContractId,
        penalty: i64,
    },
}

impl Settlement {
    #[must_use]
    pub const fn is_on_time(&self) -> bool {
        matches!(self, Self::OnTime { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BreakdownReport {
    pub vehicle: VehicleId,
    pub damage: u32,
}

/// Everything that happened during one advance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DayOutcome {
    /// The day the session is now on.
    pub day: u32,
    pub fuel_price_delta: Option<i64>,
    pub completed_quests: FulfilledQuests,
    pub breakdowns: Vec<BreakdownReport>,
    pub settlements: Vec<Settlement>,
    /// Slot to persist to when auto-save is on. Saving is left to the host.
    pub autosave_slot: Option<u8>,
}

/// Amount credited for an on-time delivery.
#[must_use]
pub fn on_time_gain(contract: &Contract, hardcore: bool) -> i64 {
    let bonus = if hardcore {
        round_f64_to_i64(i64_to_f64(contract.payout) * HARDCORE_PAYOUT_BONUS)
    } else {
        0
    };
    contract.payout + bonus
}

/// Amount deducted for a late delivery.
#[must_use]
pub fn late_penalty(contract: &Contract, hardcore: bool) -> i64 {
    if hardcore {
        round_f64_to_i64(i64_to_f64(contract.penalty) * HARDCORE_PENALTY_MULTIPLIER)
    } else {
        contract.penalty
    }
}

/// Move the session forward by one day.
///
/// Quests are resolved against the counters of the day that is ending before
/// the counters reset and the day increments.
pub fn advance_day<R: UniformSource + ?Sized>(
    state: &mut GameState,
    rng: &mut R,
    log: &mut dyn LogSink,
) -> DayOutcome {
    let telemetry = DayTelemetry::from_state(state);
    let completed_quests = resolve_quests(state, &telemetry, log);

    state.day = state.day.saturating_add(1);
    state.earned_today = 0;
    state.breakdowns_today = 0;

    let fuel_price_delta = drift_fuel_price(state, rng);

    let mut outcome = DayOutcome {
        day: state.day,
        fuel_price_delta,
        completed_quests,
        ..DayOutcome::default()
    };
    for idx in 0..state.fleet.len() {
        if !state.fleet[idx].is_busy() {
            continue;
        }
        state.fleet[idx].busy_days -= 1;
        if let Some(report) = roll_breakdown(state, idx, rng, log) {
            outcome.breakdowns.push(report);
        }
        if state.fleet[idx].busy_days == 0
            && let Some(settlement) = settle(state, idx, log)
        {
            outcome.settlements.push(settlement);
        }
    }

    if state.auto_save {
        outcome.autosave_slot = Some(state.save_slot);
    }
    log::debug!(
        "advanced to day {}: {} settlements, {} breakdowns",
        outcome.day,
        outcome.settlements.len(),
        outcome.breakdowns.len()
    );
    outcome
}

fn drift_fuel_price<R: UniformSource + ?Sized>(state: &mut GameState, rng: &mut R) -> Option<i64> {
    if !rng.chance(FUEL_PRICE_DRIFT_CHANCE) {
        return None;
    }
    let delta = rng.roll_range(FUEL_PRICE_DRIFT_MIN, FUEL_PRICE_DRIFT_MAX);
    state.fuel_price = (state.fuel_price + delta).max(FUEL_PRICE_FLOOR);
    Some(delta)
}

fn roll_breakdown<R: UniformSource + ?Sized>(
    state: &mut GameState,
    idx: usize,
    rng: &mut R,
    log: &mut dyn LogSink,
) -> Option<BreakdownReport> {
    let (chance, damage_max) = if state.hardcore {
        (BREAKDOWN_CHANCE_HARDCORE, BREAKDOWN_DAMAGE_MAX_HARDCORE)
    } else {
        (BREAKDOWN_CHANCE, BREAKDOWN_DAMAGE_MAX)
    };
    if !rng.chance(chance) {
        return None;
    }
    let damage = clamp_i64_to_u32(rng.roll_range(BREAKDOWN_DAMAGE_MIN, damage_max));
    let vehicle = &mut state.fleet[idx];
    vehicle.apply_damage(damage);
    let report = BreakdownReport {
        vehicle: vehicle.id,
        damage,
    };
    let event = LogEvent::Breakdown {
        vehicle: vehicle.name.clone(),
        damage,
    };
    state.breakdowns_today = state.breakdowns_today.saturating_add(1);
    log.record(state.day, event);
    Some(report)
}

fn settle(state: &mut GameState, idx: usize, log: &mut dyn LogSink) -> Option<Settlement> {
    let vehicle = &mut state.fleet[idx];
    let contract = vehicle.active_contract.take()?;
    let vehicle_id = vehicle.id;
    let name = vehicle.name.clone();
    if contract.is_on_time(state.day) {
        let gain = on_time_gain(&contract, state.hardcore);
        state.credits += gain;
        state.earned_today += gain;
        state.reputation = state.reputation.saturating_add(1);
        log.record(
            state.day,
            LogEvent::DeliveredOnTime {
                vehicle: name,
                gain,
            },
        );
        Some(Settlement::OnTime {
            vehicle: vehicle_id,
            contract: contract.id,
            gain,
        })
    } else {
        let penalty = late_penalty(&contract, state.hardcore);
        state.credits -= penalty;
        state.reputation = state.reputation.saturating_sub(1);
        log.record(
            state.day,
            LogEvent::DeliveredLate {
                vehicle: name,
                penalty,
            },
        );
        Some(Settlement::Late {
            vehicle: vehicle_id,
            contract: contract.id,
            penalty,
        })
    }
}
