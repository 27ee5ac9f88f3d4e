//! JSON-file save slots and leaderboard, plus switchable wrappers so a run
//! can fall back to memory when no save directory is given.
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

use spacetruckers_game::constants::{SAVE_SLOT_MAX, SAVE_SLOT_MIN};
use spacetruckers_game::persistence::rank_scores;
use spacetruckers_game::{
    GameState, GameStorage, Leaderboard, MemoryLeaderboard, MemoryStorage, SavedGame, ScoreEntry,
    SlotSummary, TransportFailure, clamp_slot, sanitize_name,
};

/// One `slot-N.json` file per save slot under `dir`.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn slot_path(&self, slot: u8) -> PathBuf {
        self.dir.join(format!("slot-{slot}.json"))
    }
}

impl GameStorage for JsonFileStorage {
    type Error = TransportFailure;

    fn save(&self, slot: u8, state: &GameState) -> Result<(), Self::Error> {
        let slot = clamp_slot(i64::from(slot));
        fs::create_dir_all(&self.dir)?;
        let saved = SavedGame {
            slot,
            saved_at: Utc::now().timestamp(),
            state: state.clone(),
        };
        fs::write(self.slot_path(slot), serde_json::to_vec(&saved)?)?;
        log::debug!("wrote {}", self.slot_path(slot).display());
        Ok(())
    }

    fn load(&self, slot: u8) -> Result<Option<SavedGame>, Self::Error> {
        let path = self.slot_path(clamp_slot(i64::from(slot)));
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path)?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn slots(&self) -> Result<Vec<SlotSummary>, Self::Error> {
        let mut slots = Vec::new();
        for slot in SAVE_SLOT_MIN..=SAVE_SLOT_MAX {
            if let Some(saved) = self.load(slot)? {
                slots.push(SlotSummary {
                    slot,
                    saved_at: saved.saved_at,
                });
            }
        }
        Ok(slots)
    }
}

/// Ranked score list kept in a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileLeaderboard {
    path: PathBuf,
}

impl JsonFileLeaderboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_entries(&self) -> Result<Vec<ScoreEntry>, TransportFailure> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let bytes = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl Leaderboard for JsonFileLeaderboard {
    type Error = TransportFailure;

    fn submit_score(&self, name: &str, profit: i64) -> Result<Vec<ScoreEntry>, Self::Error> {
        let mut entries = self.read_entries()?;
        entries.push(ScoreEntry {
            name: sanitize_name(name),
            profit,
            submitted_at: Utc::now().timestamp_millis(),
        });
        rank_scores(&mut entries);
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(&entries)?)?;
        Ok(entries)
    }

    fn fetch(&self) -> Result<Vec<ScoreEntry>, Self::Error> {
        self.read_entries()
    }
}

/// Save slots on disk when a directory is configured, otherwise in memory.
#[derive(Debug, Clone)]
pub enum SlotStore {
    Memory(MemoryStorage),
    File(JsonFileStorage),
}

impl SlotStore {
    pub fn for_run(save_dir: Option<&Path>, run_label: &str) -> Self {
        save_dir.map_or_else(
            || Self::Memory(MemoryStorage::new()),
            |dir| Self::File(JsonFileStorage::new(dir.join(run_label))),
        )
    }
}

impl GameStorage for SlotStore {
    type Error = TransportFailure;

    fn save(&self, slot: u8, state: &GameState) -> Result<(), Self::Error> {
        match self {
            Self::Memory(store) => store.save(slot, state),
            Self::File(store) => store.save(slot, state),
        }
    }

    fn load(&self, slot: u8) -> Result<Option<SavedGame>, Self::Error> {
        match self {
            Self::Memory(store) => store.load(slot),
            Self::File(store) => store.load(slot),
        }
    }

    fn slots(&self) -> Result<Vec<SlotSummary>, Self::Error> {
        match self {
            Self::Memory(store) => store.slots(),
            Self::File(store) => store.slots(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ScoreStore {
    Memory(MemoryLeaderboard),
    File(JsonFileLeaderboard),
}

impl ScoreStore {
    pub fn new(save_dir: Option<&Path>) -> Self {
        save_dir.map_or_else(
            || Self::Memory(MemoryLeaderboard::new()),
            |dir| Self::File(JsonFileLeaderboard::new(dir.join("leaderboard.json"))),
        )
    }
}

impl Leaderboard for ScoreStore {
    type Error = TransportFailure;

    fn submit_score(&self, name: &str, profit: i64) -> Result<Vec<ScoreEntry>, Self::Error> {
        match self {
            Self::Memory(board) => board.submit_score(name, profit),
            Self::File(board) => board.submit_score(name, profit),
        }
    }

    fn fetch(&self) -> Result<Vec<ScoreEntry>, Self::Error> {
        match self {
            Self::Memory(board) => board.fetch(),
            Self::File(board) => board.fetch(),
        }
    }
}
