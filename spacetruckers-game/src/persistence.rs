//! Save-slot and leaderboard boundaries plus in-memory implementations.
//!
//! Transports live with the host. The core only needs to hand over a full
//! [`GameState`] snapshot and get one back, and to submit a name/profit pair.
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::constants::{
    ANONYMOUS_PLAYER, LEADERBOARD_DISPLAY_ENTRIES, LEADERBOARD_NAME_MAX_CHARS,
    LEADERBOARD_STORED_ENTRIES, SAVE_SLOT_MAX, SAVE_SLOT_MIN,
};
use crate::error::TransportFailure;
use crate::state::GameState;

/// Clamp any requested slot into the valid `1..=3` range.
#[must_use]
pub fn clamp_slot(slot: i64) -> u8 {
    let clamped = slot.clamp(i64::from(SAVE_SLOT_MIN), i64::from(SAVE_SLOT_MAX));
    u8::try_from(clamped).unwrap_or(SAVE_SLOT_MIN)
}

/// Trimmed, non-empty, at most 24 characters.
#[must_use]
pub fn sanitize_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let name = if trimmed.is_empty() {
        ANONYMOUS_PLAYER
    } else {
        trimmed
    };
    name.chars().take(LEADERBOARD_NAME_MAX_CHARS).collect()
}

/// A stored snapshot with the store's timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGame {
    pub slot: u8,
    /// Seconds since the Unix epoch, or a store-defined tick.
    pub saved_at: i64,
    pub state: GameState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSummary {
    pub slot: u8,
    pub saved_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub profit: i64,
    pub submitted_at: i64,
}

/// Order by profit descending, earliest submission first on ties, and keep
/// the stored maximum.
pub fn rank_scores(entries: &mut Vec<ScoreEntry>) {
    entries.sort_by(|a, b| {
        b.profit
            .cmp(&a.profit)
            .then_with(|| a.submitted_at.cmp(&b.submitted_at))
    });
    entries.truncate(LEADERBOARD_STORED_ENTRIES);
}

/// The display cut of a ranked list.
#[must_use]
pub fn top_for_display(entries: &[ScoreEntry]) -> &[ScoreEntry] {
    &entries[..entries.len().min(LEADERBOARD_DISPLAY_ENTRIES)]
}

/// Save-slot persistence.
pub trait GameStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Overwrite `slot` with a full snapshot. Out-of-range slots are clamped.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be stored.
    fn save(&self, slot: u8, state: &GameState) -> Result<(), Self::Error>;

    /// Read back `slot`; `Ok(None)` means the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the snapshot is corrupt.
    fn load(&self, slot: u8) -> Result<Option<SavedGame>, Self::Error>;

    /// Occupied slots in ascending order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be listed.
    fn slots(&self) -> Result<Vec<SlotSummary>, Self::Error>;
}

/// Shared high-score table.
pub trait Leaderboard {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Record a score and return the updated ranked list.
    ///
    /// # Errors
    ///
    /// Returns an error if the score cannot be recorded.
    fn submit_score(&self, name: &str, profit: i64) -> Result<Vec<ScoreEntry>, Self::Error>;

    /// Ranked list, best first.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be read.
    fn fetch(&self) -> Result<Vec<ScoreEntry>, Self::Error>;
}

/// Process-local slot store. Clones share the same slots. Timestamps are a
/// monotonic tick rather than wall-clock time.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    saves: Rc<RefCell<BTreeMap<u8, SavedGame>>>,
    tick: Rc<Cell<i64>>,
    offline: Rc<Cell<bool>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail until switched back, to exercise error paths.
    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    fn check_online(&self) -> Result<(), TransportFailure> {
        if self.offline.get() {
            Err(TransportFailure::Io("storage offline".to_string()))
        } else {
            Ok(())
        }
    }
}

impl GameStorage for MemoryStorage {
    type Error = TransportFailure;

    fn save(&self, slot: u8, state: &GameState) -> Result<(), Self::Error> {
        self.check_online()?;
        let slot = clamp_slot(i64::from(slot));
        let saved_at = self.tick.get() + 1;
        self.tick.set(saved_at);
        self.saves.borrow_mut().insert(
            slot,
            SavedGame {
                slot,
                saved_at,
                state: state.clone(),
            },
        );
        Ok(())
    }

    fn load(&self, slot: u8) -> Result<Option<SavedGame>, Self::Error> {
        self.check_online()?;
        let slot = clamp_slot(i64::from(slot));
        Ok(self.saves.borrow().get(&slot).cloned())
    }

    fn slots(&self) -> Result<Vec<SlotSummary>, Self::Error> {
        self.check_online()?;
        Ok(self
            .saves
            .borrow()
            .values()
            .map(|saved| SlotSummary {
                slot: saved.slot,
                saved_at: saved.saved_at,
            })
            .collect())
    }
}

/// Process-local leaderboard keeping the stored maximum of entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryLeaderboard {
    entries: Rc<RefCell<Vec<ScoreEntry>>>,
    tick: Rc<Cell<i64>>,
    offline: Rc<Cell<bool>>,
}

impl MemoryLeaderboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }
}

impl Leaderboard for MemoryLeaderboard {
    type Error = TransportFailure;

    fn submit_score(&self, name: &str, profit: i64) -> Result<Vec<ScoreEntry>, Self::Error> {
        if self.offline.get() {
            return Err(TransportFailure::Rejected("leaderboard offline".to_string()));
        }
        let submitted_at = self.tick.get() + 1;
        self.tick.set(submitted_at);
        let mut entries = self.entries.borrow_mut();
        entries.push(ScoreEntry {
            name: sanitize_name(name),
            profit,
            submitted_at,
        });
        rank_scores(&mut entries);
        Ok(entries.clone())
    }

    fn fetch(&self) -> Result<Vec<ScoreEntry>, Self::Error> {
        if self.offline.get() {
            return Err(TransportFailure::Rejected("leaderboard offline".to_string()));
        }
        Ok(self.entries.borrow().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_clamp_into_range() {
        assert_eq!(clamp_slot(0), 1);
        assert_eq!(clamp_slot(-4), 1);
        assert_eq!(clamp_slot(2), 2);
        assert_eq!(clamp_slot(9), 3);
    }

    #[test]
    fn names_are_trimmed_defaulted_and_truncated() {
        assert_eq!(sanitize_name("  Ripley  "), "Ripley");
        assert_eq!(sanitize_name("   "), "Anonymous");
        let long = "Ä".repeat(30);
        assert_eq!(sanitize_name(&long).chars().count(), 24);
    }

    #[test]
    fn memory_storage_overwrites_slot() {
        let storage = MemoryStorage::new();
        let mut state = GameState::default();
        storage.save(1, &state).unwrap();
        state.day = 9;
        storage.save(1, &state).unwrap();
        storage.save(7, &state).unwrap();

        let saved = storage.load(1).unwrap().expect("slot 1");
        assert_eq!(saved.state.day, 9);
        assert_eq!(saved.saved_at, 2);
        assert!(storage.load(2).unwrap().is_none());
        let slots: Vec<u8> = storage.slots().unwrap().iter().map(|s| s.slot).collect();
        assert_eq!(slots, vec![1, 3]);
    }

    #[test]
    fn offline_storage_reports_transport_failure() {
        let storage = MemoryStorage::new();
        storage.set_offline(true);
        assert!(matches!(
            storage.save(1, &GameState::default()),
            Err(TransportFailure::Io(_))
        ));
    }

    #[test]
    fn leaderboard_orders_by_profit_then_age() {
        let board = MemoryLeaderboard::new();
        board.submit_score("first", 900).unwrap();
        board.submit_score("second", 1_500).unwrap();
        let ranked = board.submit_score("third", 900).unwrap();
        let names: Vec<&str> = ranked.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["second", "first", "third"]);
    }

    #[test]
    fn leaderboard_keeps_twenty_and_displays_ten() {
        let board = MemoryLeaderboard::new();
        for profit in 0..25 {
            board.submit_score("pilot", profit).unwrap();
        }
        let stored = board.fetch().unwrap();
        assert_eq!(stored.len(), 20);
        assert_eq!(stored[0].profit, 24);
        assert_eq!(stored[19].profit, 5);
        assert_eq!(top_for_display(&stored).len(), 10);
    }
}
