//! A single company's running game.
//!
//! [`Session`] owns the state snapshot, the random source every draw goes
//! through, and the journal that collects log events. Player actions are thin
//! wrappers over the engine functions; persistence lives in
//! [`GameEngine`](crate::GameEngine).
use std::fmt;

use crate::config::SessionConfig;
use crate::contracts::{ContractId, refresh_pool};
use crate::day_cycle::{DayOutcome, advance_day};
use crate::error::{ConfigError, ValidationFailure};
use crate::events::{MarketEvent, trigger_random_event};
use crate::fleet::{
    Departure, Skin, VehicleId, assign_contract, purchase_vehicle, refuel_all, repair_all,
    sell_vehicle, set_skin,
};
use crate::journal::{Journal, LogEvent, LogSink};
use crate::map::{RouteLine, active_routes};
use crate::persistence::clamp_slot;
use crate::quests::{generate_quests, reroll_quests};
use crate::rng::{SimRng, UniformSource};
use crate::state::{GameState, Locale};

/// One company's game: the state, its random source, and its journal.
pub struct Session {
    state: GameState,
    rng: Box<dyn UniformSource>,
    journal: Journal,
    pool_size: usize,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("journal", &self.journal.len())
            .field("pool_size", &self.pool_size)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Open a fresh session: starter vehicle, a full contract pool, three
    /// quests, and a welcome line.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration fails validation.
    pub fn new(config: &SessionConfig, rng: Box<dyn UniformSource>) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut session = Self {
            state: GameState::from_config(config),
            rng,
            journal: Journal::new(),
            pool_size: config.contract_pool_size,
        };
        refresh_pool(&mut session.state, &mut session.rng, session.pool_size);
        generate_quests(&mut session.state, &mut session.rng);
        session.journal.record(session.state.day, LogEvent::Welcome);
        Ok(session)
    }

    /// Fresh session driven by a replayable seed.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration fails validation.
    pub fn seeded(config: &SessionConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::new(config, Box::new(SimRng::from_user_seed(seed)))
    }

    /// Resume from a snapshot without touching its pools.
    #[must_use]
    pub fn from_state(state: GameState, rng: Box<dyn UniformSource>, pool_size: usize) -> Self {
        Self {
            state,
            rng,
            journal: Journal::new(),
            pool_size: pool_size.max(1),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutate the state directly; intended for hosts and tests.
    pub fn with_state_mut<F>(&mut self, f: F)
    where
        F: FnOnce(&mut GameState),
    {
        f(&mut self.state);
    }

    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    /// Swap in a loaded snapshot wholesale.
    pub fn replace_state(&mut self, state: GameState) {
        self.state = state;
    }

    #[must_use]
    pub const fn journal(&self) -> &Journal {
        &self.journal
    }

    pub const fn journal_mut(&mut self) -> &mut Journal {
        &mut self.journal
    }

    /// Record an event stamped with the current day.
    pub fn log(&mut self, event: LogEvent) {
        self.journal.record(self.state.day, event);
    }

    #[must_use]
    pub const fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Assign an open contract to the first eligible idle vehicle.
    ///
    /// # Errors
    ///
    /// See [`assign_contract`].
    pub fn assign(&mut self, contract_id: &ContractId) -> Result<Departure, ValidationFailure> {
        assign_contract(&mut self.state, contract_id, &mut self.journal)
    }

    /// # Errors
    ///
    /// See [`purchase_vehicle`].
    pub fn buy_ship(&mut self, skin: Skin) -> Result<VehicleId, ValidationFailure> {
        purchase_vehicle(&mut self.state, &mut self.rng, skin, &mut self.journal)
    }

    /// # Errors
    ///
    /// See [`sell_vehicle`].
    pub fn sell_ship(&mut self) -> Result<i64, ValidationFailure> {
        sell_vehicle(&mut self.state, &mut self.journal)
    }

    pub fn refuel_all(&mut self) -> i64 {
        refuel_all(&mut self.state, &mut self.journal)
    }

    pub fn repair_all(&mut self) -> i64 {
        repair_all(&mut self.state, &mut self.journal)
    }

    /// # Errors
    ///
    /// See [`set_skin`].
    pub fn set_skin(&mut self, vehicle: VehicleId, skin: Skin) -> Result<(), ValidationFailure> {
        set_skin(&mut self.state, vehicle, skin, &mut self.journal)
    }

    /// Replace the open pool with a fresh batch of the configured size.
    pub fn refresh_contracts(&mut self) {
        refresh_pool(&mut self.state, &mut self.rng, self.pool_size);
        let count = self.state.contracts.len();
        self.log(LogEvent::ContractsRefreshed { count });
    }

    pub fn reroll_quests(&mut self) {
        reroll_quests(&mut self.state, &mut self.rng, &mut self.journal);
    }

    /// Run the day cycle. Persisting the auto-save is the caller's job; see
    /// [`crate::GameEngine::advance_day`].
    pub fn advance_day(&mut self) -> DayOutcome {
        advance_day(&mut self.state, &mut self.rng, &mut self.journal)
    }

    pub fn trigger_random_event(&mut self) -> MarketEvent {
        trigger_random_event(&mut self.state, &mut self.rng, &mut self.journal)
    }

    pub fn set_hardcore(&mut self, enabled: bool) {
        self.state.hardcore = enabled;
        self.log(LogEvent::HardcoreToggled { enabled });
    }

    /// Flip auto-save and return the new setting.
    pub fn toggle_auto_save(&mut self) -> bool {
        self.state.auto_save = !self.state.auto_save;
        let enabled = self.state.auto_save;
        self.log(LogEvent::AutoSaveToggled { enabled });
        enabled
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.state.locale = locale;
        self.log(LogEvent::LocaleChanged {
            locale: locale.to_string(),
        });
    }

    /// Select the save slot, clamped into range. Returns the slot in effect.
    pub fn set_save_slot(&mut self, slot: i64) -> u8 {
        let slot = clamp_slot(slot);
        self.state.save_slot = slot;
        self.log(LogEvent::SaveSlotSelected { slot });
        slot
    }

    /// Active quests rendered in the session's locale.
    #[must_use]
    pub fn quest_lines(&self) -> Vec<String> {
        self.state
            .quests
            .iter()
            .map(|quest| quest.text().render(self.state.locale))
            .collect()
    }

    #[must_use]
    pub fn active_routes(&self) -> Vec<RouteLine> {
        active_routes(&self.state.fleet)
    }
}
