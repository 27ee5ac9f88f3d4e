//! Space Truckers Game Engine
//!
//! Platform-agnostic core of the Space Truckers freight economy: contracts,
//! quests, fleet management, the day cycle, and random market events.
//! Persistence and the leaderboard are reached through traits so hosts can
//! plug in their own transport.

pub mod config;
pub mod constants;
pub mod contracts;
pub mod day_cycle;
pub mod error;
pub mod events;
pub mod fleet;
pub mod journal;
pub mod map;
pub mod numbers;
pub mod persistence;
pub mod quests;
pub mod rng;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use config::SessionConfig;
pub use contracts::{Contract, ContractId, generate_contract, refresh_pool};
pub use day_cycle::{BreakdownReport, DayOutcome, Settlement, advance_day};
pub use error::{ConfigError, TransportFailure, ValidationFailure};
pub use events::{EventKind, MarketEvent, trigger_random_event};
pub use fleet::{
    Departure, Skin, Vehicle, VehicleId, assign_contract, purchase_vehicle, refuel_all,
    repair_all, sell_vehicle, set_skin,
};
pub use journal::{Journal, LogEntry, LogEvent, LogSink, NullSink, Severity};
pub use map::{LOCATIONS, Location, Route, RouteLine, active_routes, location};
pub use persistence::{
    GameStorage, Leaderboard, MemoryLeaderboard, MemoryStorage, SavedGame, ScoreEntry,
    SlotSummary, clamp_slot, sanitize_name, top_for_display,
};
pub use quests::{
    DayTelemetry, Quest, QuestTemplate, QuestText, generate_quests, reroll_quests, resolve_quests,
};
pub use rng::{RandSource, ScriptedUniform, SimRng, UniformSource};
pub use session::Session;
pub use state::{GameState, Locale};

/// Result of a load request. Failures are already logged when this returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { slot: u8 },
    EmptySlot { slot: u8 },
    Failed { slot: u8 },
}

/// Binds a session to its save store and leaderboard.
///
/// Transport errors never escape: they are written to the session journal
/// and the in-memory state is left as it was.
pub struct GameEngine<S, B>
where
    S: GameStorage,
    B: Leaderboard,
{
    storage: S,
    leaderboard: B,
}

impl<S, B> GameEngine<S, B>
where
    S: GameStorage,
    B: Leaderboard,
{
    /// Create a new game engine with the provided storage and leaderboard
    pub const fn new(storage: S, leaderboard: B) -> Self {
        Self {
            storage,
            leaderboard,
        }
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    pub const fn leaderboard_store(&self) -> &B {
        &self.leaderboard
    }

    /// Advance one day, then auto-save without notification if enabled.
    pub fn advance_day(&self, session: &mut Session) -> DayOutcome {
        let outcome = session.advance_day();
        if let Some(slot) = outcome.autosave_slot {
            self.save_to_slot(session, slot, false);
        } else {
            log::trace!("auto-save disabled on day {}", outcome.day);
        }
        outcome
    }

    /// Persist the session to its current save slot. A successful save is
    /// journaled only when `notify` is set; failures always are.
    pub fn save_game(&self, session: &mut Session, notify: bool) -> bool {
        let slot = session.state().save_slot;
        self.save_to_slot(session, slot, notify)
    }

    fn save_to_slot(&self, session: &mut Session, slot: u8, notify: bool) -> bool {
        let slot = clamp_slot(i64::from(slot));
        match self.storage.save(slot, session.state()) {
            Ok(()) => {
                if notify {
                    session.log(LogEvent::Saved { slot });
                } else {
                    log::debug!("auto-saved slot {slot}");
                }
                true
            }
            Err(err) => {
                session.log(LogEvent::SaveFailed {
                    slot,
                    reason: err.to_string(),
                });
                false
            }
        }
    }

    /// Replace the session state with the snapshot in its current save slot.
    pub fn load_game(&self, session: &mut Session) -> LoadOutcome {
        let slot = clamp_slot(i64::from(session.state().save_slot));
        match self.storage.load(slot) {
            Ok(Some(saved)) => {
                session.replace_state(saved.state);
                session.log(LogEvent::Loaded { slot });
                LoadOutcome::Loaded { slot }
            }
            Ok(None) => {
                session.log(LogEvent::EmptySlot { slot });
                LoadOutcome::EmptySlot { slot }
            }
            Err(err) => {
                session.log(LogEvent::LoadFailed {
                    slot,
                    reason: err.to_string(),
                });
                LoadOutcome::Failed { slot }
            }
        }
    }

    /// Submit the session's current credits as its profit. Returns the
    /// updated display list, or `None` if the leaderboard was unreachable.
    pub fn submit_score(&self, session: &mut Session, name: &str) -> Option<Vec<ScoreEntry>> {
        let profit = session.state().credits;
        match self.leaderboard.submit_score(name, profit) {
            Ok(entries) => {
                session.log(LogEvent::ScoreSubmitted {
                    name: sanitize_name(name),
                    profit,
                });
                Some(top_for_display(&entries).to_vec())
            }
            Err(err) => {
                session.log(LogEvent::LeaderboardFailed {
                    reason: err.to_string(),
                });
                None
            }
        }
    }

    /// Current top entries for display; empty if the table is unreachable.
    pub fn leaderboard(&self, session: &mut Session) -> Vec<ScoreEntry> {
        match self.leaderboard.fetch() {
            Ok(entries) => top_for_display(&entries).to_vec(),
            Err(err) => {
                session.log(LogEvent::LeaderboardFailed {
                    reason: err.to_string(),
                });
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> GameEngine<MemoryStorage, MemoryLeaderboard> {
        GameEngine::new(MemoryStorage::new(), MemoryLeaderboard::new())
    }

    fn session() -> Session {
        Session::seeded(&SessionConfig::default(), 0xABCD).unwrap()
    }

    #[test]
    fn engine_roundtrips_state_through_slot() {
        let engine = engine();
        let mut session = session();
        session.with_state_mut(|state| {
            state.credits = 250;
            state.day = 3;
        });
        assert!(engine.save_game(&mut session, true));
        let snapshot = session.state().clone();

        session.with_state_mut(|state| state.credits = 9_999);
        assert_eq!(engine.load_game(&mut session), LoadOutcome::Loaded { slot: 1 });
        assert_eq!(session.state(), &snapshot);
    }

    #[test]
    fn empty_slot_is_not_an_error() {
        let engine = engine();
        let mut session = session();
        session.set_save_slot(2);
        let before = session.state().clone();
        assert_eq!(engine.load_game(&mut session), LoadOutcome::EmptySlot { slot: 2 });
        assert_eq!(session.state(), &before);
        assert_eq!(
            session.journal().last().map(|entry| &entry.event),
            Some(&LogEvent::EmptySlot { slot: 2 })
        );
    }

    #[test]
    fn auto_save_is_silent_and_failures_do_not_abort() {
        let engine = engine();
        let mut session = session();
        let outcome = engine.advance_day(&mut session);
        assert_eq!(outcome.day, 2);
        let saved = engine.storage().load(1).unwrap().expect("auto-saved");
        assert_eq!(saved.state.day, 2);
        assert!(
            !session
                .journal()
                .entries()
                .iter()
                .any(|entry| matches!(entry.event, LogEvent::Saved { .. }))
        );

        engine.storage().set_offline(true);
        let outcome = engine.advance_day(&mut session);
        assert_eq!(outcome.day, 3);
        assert_eq!(session.state().day, 3);
        assert!(matches!(
            session.journal().last().map(|entry| &entry.event),
            Some(LogEvent::SaveFailed { slot: 1, .. })
        ));
    }

    #[test]
    fn failed_load_leaves_state_untouched() {
        let engine = engine();
        let mut session = session();
        engine.storage().set_offline(true);
        let before = session.state().clone();
        assert_eq!(engine.load_game(&mut session), LoadOutcome::Failed { slot: 1 });
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn score_submission_uses_credits() {
        let engine = engine();
        let mut session = session();
        session.with_state_mut(|state| state.credits = 7_300);
        let board = engine.submit_score(&mut session, "  ").expect("online");
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].name, "Anonymous");
        assert_eq!(board[0].profit, 7_300);
        assert_eq!(engine.leaderboard(&mut session), board);

        engine.leaderboard_store().set_offline(true);
        assert!(engine.submit_score(&mut session, "Ripley").is_none());
        assert!(engine.leaderboard(&mut session).is_empty());
    }
}
