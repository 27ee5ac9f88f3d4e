use anyhow::{Context, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;

use spacetruckers_game::{GameEngine, GameStorage, Leaderboard, Session, SessionConfig, Skin};

use super::policy::Strategy;

/// Parameters for one autopilot run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub seed: u64,
    pub days: u32,
    pub strategy: Strategy,
    /// Per-day probability of firing a random market event.
    pub event_chance: f64,
    pub session: SessionConfig,
}

/// What one run produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub strategy: String,
    pub final_day: u32,
    pub credits: i64,
    pub reputation: u32,
    pub fleet_size: usize,
    pub on_time: u32,
    pub late: u32,
    pub breakdowns: u32,
    pub quests_completed: u32,
    pub market_events: u32,
    pub rejected_assignments: u32,
    pub ships_bought: u32,
    pub violations: Vec<String>,
}

impl RunSummary {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

fn check_invariants(session: &Session, stage: &str, summary: &mut RunSummary) {
    let day = session.state().day;
    for violation in session.state().invariant_violations() {
        log::warn!("seed {} day {day} after {stage}: {violation}", summary.seed);
        summary
            .violations
            .push(format!("day {day} after {stage}: {violation}"));
    }
}

/// Drive a fresh session for `cfg.days` days.
///
/// Every day: refresh an empty pool, refuel, repair, maybe buy a ship,
/// dispatch per strategy, maybe fire a market event, then advance.
///
/// # Errors
///
/// Returns an error if the session configuration is invalid.
pub fn run_autopilot<S, B>(engine: &GameEngine<S, B>, cfg: &RunConfig) -> Result<(RunSummary, Session)>
where
    S: GameStorage,
    B: Leaderboard,
{
    let mut session = Session::seeded(&cfg.session, cfg.seed)
        .with_context(|| format!("invalid session config for seed {}", cfg.seed))?;
    let mut policy = cfg.strategy.create_policy(cfg.seed);
    let mut event_rng = ChaCha20Rng::seed_from_u64(cfg.seed.rotate_left(17));
    let event_chance = cfg.event_chance.clamp(0.0, 1.0);
    let mut summary = RunSummary {
        seed: cfg.seed,
        strategy: cfg.strategy.label().to_string(),
        ..RunSummary::default()
    };
    log::info!(
        "seed {} running {} for {} days",
        cfg.seed,
        policy.name(),
        cfg.days
    );

    for _ in 0..cfg.days {
        if session.state().contracts.is_empty() {
            session.refresh_contracts();
        }
        session.refuel_all();
        session.repair_all();
        if policy.wants_ship(session.state()) && session.buy_ship(Skin::default()).is_ok() {
            summary.ships_bought += 1;
            session.refuel_all();
        }

        for contract in policy.pick_contracts(session.state()) {
            if session.assign(&contract).is_err() {
                summary.rejected_assignments += 1;
            }
        }
        check_invariants(&session, "dispatch", &mut summary);

        if event_rng.gen_bool(event_chance) {
            session.trigger_random_event();
            summary.market_events += 1;
            check_invariants(&session, "market event", &mut summary);
        }

        let day_before = session.state().day;
        let outcome = engine.advance_day(&mut session);
        if outcome.day != day_before + 1 {
            summary
                .violations
                .push(format!("day advanced from {day_before} to {}", outcome.day));
        }
        for settlement in &outcome.settlements {
            if settlement.is_on_time() {
                summary.on_time += 1;
            } else {
                summary.late += 1;
            }
        }
        summary.breakdowns += u32::try_from(outcome.breakdowns.len()).unwrap_or(u32::MAX);
        summary.quests_completed +=
            u32::try_from(outcome.completed_quests.len()).unwrap_or(u32::MAX);
        check_invariants(&session, "advance", &mut summary);
    }

    let state = session.state();
    summary.final_day = state.day;
    summary.credits = state.credits;
    summary.reputation = state.reputation;
    summary.fleet_size = state.fleet.len();
    Ok((summary, session))
}
