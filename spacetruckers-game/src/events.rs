//! Random market events: one scalar draw picks a band, then the band's
//! magnitudes are drawn and applied immediately.
use serde::Serialize;

use crate::constants::{
    EVENT_CUSTOMS_BAND, EVENT_CUSTOMS_MAX, EVENT_CUSTOMS_MAX_HARDCORE, EVENT_CUSTOMS_MIN,
    EVENT_FUEL_SPIKE_BAND, EVENT_FUEL_SPIKE_MAX, EVENT_FUEL_SPIKE_MAX_HARDCORE,
    EVENT_FUEL_SPIKE_MIN, EVENT_PIRACY_BAND, EVENT_PIRACY_DAMAGE_MAX,
    EVENT_PIRACY_DAMAGE_MAX_HARDCORE, EVENT_PIRACY_DAMAGE_MIN, EVENT_PIRACY_LOSS_MAX,
    EVENT_PIRACY_LOSS_MAX_HARDCORE, EVENT_PIRACY_LOSS_MIN, EVENT_SUBSIDY_BAND, EVENT_SUBSIDY_MAX,
    EVENT_SUBSIDY_MAX_HARDCORE, EVENT_SUBSIDY_MIN,
};
use crate::fleet::VehicleId;
use crate::journal::{LogEvent, LogSink};
use crate::numbers::clamp_i64_to_u32;
use crate::rng::UniformSource;
use crate::state::GameState;

/// The event that fired, with the magnitudes actually applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarketEvent {
    FuelSpike {
        delta: i64,
    },
    CustomsFine {
        fine: i64,
    },
    Subsidy {
        bonus: i64,
    },
    Piracy {
        loss: i64,
        vehicle: Option<VehicleId>,
        damage: u32,
    },
    SolarStorm {
        delayed: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    FuelSpike,
    CustomsFine,
    Subsidy,
    Piracy,
    SolarStorm,
}

impl EventKind {
    /// Map a uniform roll onto its cumulative probability band.
    #[must_use]
    pub fn from_roll(roll: f64) -> Self {
        if roll < EVENT_FUEL_SPIKE_BAND {
            Self::FuelSpike
        } else if roll < EVENT_CUSTOMS_BAND {
            Self::CustomsFine
        } else if roll < EVENT_SUBSIDY_BAND {
            Self::Subsidy
        } else if roll < EVENT_PIRACY_BAND {
            Self::Piracy
        } else {
            Self::SolarStorm
        }
    }
}

impl MarketEvent {
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::FuelSpike { .. } => EventKind::FuelSpike,
            Self::CustomsFine { .. } => EventKind::CustomsFine,
            Self::Subsidy { .. } => EventKind::Subsidy,
            Self::Piracy { .. } => EventKind::Piracy,
            Self::SolarStorm { .. } => EventKind::SolarStorm,
        }
    }
}

const fn ceiling(hardcore: bool, normal: i64, hard: i64) -> i64 {
    if hardcore { hard } else { normal }
}

/// Fire exactly one random event against the session and report it.
pub fn trigger_random_event<R: UniformSource + ?Sized>(
    state: &mut GameState,
    rng: &mut R,
    log: &mut dyn LogSink,
) -> MarketEvent {
    let hardcore = state.hardcore;
    let event = match EventKind::from_roll(rng.next_uniform()) {
        EventKind::FuelSpike => {
            let delta = rng.roll_range(
                EVENT_FUEL_SPIKE_MIN,
                ceiling(hardcore, EVENT_FUEL_SPIKE_MAX, EVENT_FUEL_SPIKE_MAX_HARDCORE),
            );
            state.fuel_price += delta;
            log.record(state.day, LogEvent::FuelSpike { delta });
            MarketEvent::FuelSpike { delta }
        }
        EventKind::CustomsFine => {
            let fine = rng.roll_range(
                EVENT_CUSTOMS_MIN,
                ceiling(hardcore, EVENT_CUSTOMS_MAX, EVENT_CUSTOMS_MAX_HARDCORE),
            );
            state.credits = (state.credits - fine).max(0);
            log.record(state.day, LogEvent::CustomsFine { fine });
            MarketEvent::CustomsFine { fine }
        }
        EventKind::Subsidy => {
            let bonus = rng.roll_range(
                EVENT_SUBSIDY_MIN,
                ceiling(hardcore, EVENT_SUBSIDY_MAX, EVENT_SUBSIDY_MAX_HARDCORE),
            );
            state.credits += bonus;
            log.record(state.day, LogEvent::Subsidy { bonus });
            MarketEvent::Subsidy { bonus }
        }
        EventKind::Piracy => piracy(state, rng, log),
        EventKind::SolarStorm => {
            let mut delayed = 0;
            for vehicle in state.fleet.iter_mut().filter(|vehicle| vehicle.is_busy()) {
                vehicle.busy_days = vehicle.busy_days.saturating_add(1);
                delayed += 1;
            }
            log.record(state.day, LogEvent::SolarStorm { delayed });
            MarketEvent::SolarStorm { delayed }
        }
    };
    log::debug!("day {} market event {:?}", state.day, event.kind());
    event
}

fn piracy<R: UniformSource + ?Sized>(
    state: &mut GameState,
    rng: &mut R,
    log: &mut dyn LogSink,
) -> MarketEvent {
    let hardcore = state.hardcore;
    let target = rng.pick_index(state.fleet.len());
    let loss = rng.roll_range(
        EVENT_PIRACY_LOSS_MIN,
        ceiling(hardcore, EVENT_PIRACY_LOSS_MAX, EVENT_PIRACY_LOSS_MAX_HARDCORE),
    );
    let rolled = clamp_i64_to_u32(rng.roll_range(
        EVENT_PIRACY_DAMAGE_MIN,
        ceiling(hardcore, EVENT_PIRACY_DAMAGE_MAX, EVENT_PIRACY_DAMAGE_MAX_HARDCORE),
    ));
    state.credits = (state.credits - loss).max(0);
    let hit = target.and_then(|idx| state.fleet.get_mut(idx)).map(|vehicle| {
        vehicle.apply_damage(rolled);
        (vehicle.id, vehicle.name.clone())
    });
    let damage = if hit.is_some() { rolled } else { 0 };
    log.record(
        state.day,
        LogEvent::Piracy {
            loss,
            vehicle: hit.as_ref().map(|(_, name)| name.clone()),
            damage,
        },
    );
    MarketEvent::Piracy {
        loss,
        vehicle: hit.map(|(id, _)| id),
        damage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::{ContractId, generate_contract};
    use crate::journal::Journal;
    use crate::rng::{ScriptedUniform, SimRng};

    fn run(state: &mut GameState, script: Vec<f64>) -> (MarketEvent, Journal) {
        let mut rng = ScriptedUniform::new(script);
        let mut journal = Journal::new();
        let event = trigger_random_event(state, &mut rng, &mut journal);
        (event, journal)
    }

    #[test]
    fn bands_partition_unit_interval() {
        assert_eq!(EventKind::from_roll(0.0), EventKind::FuelSpike);
        assert_eq!(EventKind::from_roll(0.199), EventKind::FuelSpike);
        assert_eq!(EventKind::from_roll(0.20), EventKind::CustomsFine);
        assert_eq!(EventKind::from_roll(0.40), EventKind::Subsidy);
        assert_eq!(EventKind::from_roll(0.55), EventKind::Piracy);
        assert_eq!(EventKind::from_roll(0.75), EventKind::SolarStorm);
        assert_eq!(EventKind::from_roll(0.999), EventKind::SolarStorm);
    }

    #[test]
    fn fuel_spike_raises_price() {
        let mut state = GameState::default();
        let (event, journal) = run(&mut state, vec![0.1, 0.0]);
        assert_eq!(event, MarketEvent::FuelSpike { delta: 2 });
        assert_eq!(state.fuel_price, 6);
        assert_eq!(journal.len(), 1);
    }

    #[test]
    fn customs_fine_floors_credits_at_zero() {
        let mut state = GameState::default();
        state.credits = 100;
        let (event, _) = run(&mut state, vec![0.3, 0.999]);
        assert_eq!(event, MarketEvent::CustomsFine { fine: 360 });
        assert_eq!(state.credits, 0);
    }

    #[test]
    fn hardcore_subsidy_ceiling_is_lower() {
        let mut state = GameState::default();
        state.hardcore = true;
        let (event, _) = run(&mut state, vec![0.5, 0.999]);
        assert_eq!(event, MarketEvent::Subsidy { bonus: 420 });
        assert_eq!(state.credits, 5_420);

        let mut state = GameState::default();
        let (event, _) = run(&mut state, vec![0.5, 0.999]);
        assert_eq!(event, MarketEvent::Subsidy { bonus: 520 });
    }

    #[test]
    fn piracy_damages_one_vehicle_and_floors_credits() {
        let mut state = GameState::default();
        state.credits = 50;
        state.fleet[0].hp = 10;
        let (event, journal) = run(&mut state, vec![0.6, 0.0, 0.0, 0.999]);
        assert_eq!(
            event,
            MarketEvent::Piracy {
                loss: 100,
                vehicle: Some(state.fleet[0].id),
                damage: 18,
            }
        );
        assert_eq!(state.credits, 0);
        assert_eq!(state.fleet[0].hp, 0);
        assert!(journal.entries()[0].to_string().contains("ST-101"));
    }

    #[test]
    fn solar_storm_delays_only_busy_vehicles() {
        let mut state = GameState::default();
        let (event, journal) = run(&mut state, vec![0.9]);
        assert_eq!(event, MarketEvent::SolarStorm { delayed: 0 });
        assert_eq!(
            journal.entries()[0].to_string(),
            "D1: Solar storm with no impact."
        );

        let mut rng = ScriptedUniform::constant(0.0);
        let contract = generate_contract(&mut rng, 1, ContractId::from_sequence(1));
        state.fleet[0].busy_days = 2;
        state.fleet[0].active_contract = Some(contract);
        let (event, _) = run(&mut state, vec![0.9]);
        assert_eq!(event, MarketEvent::SolarStorm { delayed: 1 });
        assert_eq!(state.fleet[0].busy_days, 3);
    }

    #[test]
    fn repeated_events_keep_invariants() {
        let mut state = GameState::default();
        state.hardcore = true;
        let mut rng = SimRng::from_user_seed(99);
        let mut journal = Journal::new();
        for _ in 0..500 {
            trigger_random_event(&mut state, &mut rng, &mut journal);
            assert!(state.credits >= 0);
            assert!(state.invariant_violations().is_empty());
        }
        assert_eq!(journal.len(), 500);
    }
}
