//! Centralized balance and tuning constants for the Space Truckers economy.
//!
//! These values define the math of the core simulation. Keeping them
//! together means balance can only be adjusted via reviewed code changes,
//! never through session configuration files.

// Contracts ----------------------------------------------------------------
pub(crate) const CONTRACT_DISTANCE_MIN: i64 = 20;
pub(crate) const CONTRACT_DISTANCE_MAX: i64 = 220;
pub(crate) const CONTRACT_WEIGHT_MIN: i64 = 5;
pub(crate) const CONTRACT_WEIGHT_MAX: i64 = 45;
pub(crate) const CONTRACT_DEADLINE_MIN_DAYS: i64 = 2;
pub(crate) const CONTRACT_DEADLINE_MAX_DAYS: i64 = 8;
pub(crate) const CONTRACT_PAYOUT_PER_DISTANCE: f64 = 8.0;
pub(crate) const CONTRACT_PAYOUT_PER_WEIGHT: f64 = 15.0;
pub(crate) const CONTRACT_PENALTY_RATIO: f64 = 0.5;
pub const DEFAULT_CONTRACT_POOL_SIZE: usize = 5;

// Quests -------------------------------------------------------------------
pub const QUEST_BATCH_SIZE: usize = 3;
pub(crate) const QUEST_DELIVER_DEADLINE_MIN_DAYS: i64 = 2;
pub(crate) const QUEST_DELIVER_DEADLINE_MAX_DAYS: i64 = 5;
pub(crate) const QUEST_DELIVER_BONUS_MIN: i64 = 150;
pub(crate) const QUEST_DELIVER_BONUS_MAX: i64 = 400;
pub(crate) const QUEST_EARN_TARGET_MIN: i64 = 200;
pub(crate) const QUEST_EARN_TARGET_MAX: i64 = 800;
pub(crate) const QUEST_EARN_BONUS_MIN: i64 = 120;
pub(crate) const QUEST_EARN_BONUS_MAX: i64 = 300;
pub(crate) const QUEST_NO_BREAKDOWN_BONUS_MIN: i64 = 120;
pub(crate) const QUEST_NO_BREAKDOWN_BONUS_MAX: i64 = 250;

// Fleet --------------------------------------------------------------------
pub const SHIP_PRICE: i64 = 2_000;
pub const SHIP_RESALE_PRICE: i64 = 1_200;
pub const MIN_FLEET_SIZE: usize = 1;
pub(crate) const SHIP_FUEL_MAX: u32 = 100;
pub(crate) const SHIP_HP_MAX: u32 = 100;
pub(crate) const SHIP_CAPACITY_MIN: i64 = 25;
pub(crate) const SHIP_CAPACITY_MAX: i64 = 45;
pub(crate) const SHIP_NAME_BASE: u32 = 100;
pub(crate) const FUEL_PER_DISTANCE: f64 = 0.4;
pub(crate) const FUEL_PER_WEIGHT: f64 = 0.2;
pub(crate) const TRAVEL_DISTANCE_PER_DAY: f64 = 30.0;
pub(crate) const REPUTATION_FAST_TRACK_THRESHOLD: u32 = 5;
pub(crate) const REPAIR_COST_PER_HP: i64 = 5;

// Day cycle ----------------------------------------------------------------
pub(crate) const FUEL_PRICE_FLOOR: i64 = 2;
pub(crate) const FUEL_PRICE_DRIFT_CHANCE: f64 = 0.5;
pub(crate) const FUEL_PRICE_DRIFT_MIN: i64 = -1;
pub(crate) const FUEL_PRICE_DRIFT_MAX: i64 = 2;
pub(crate) const BREAKDOWN_CHANCE: f64 = 0.15;
pub(crate) const BREAKDOWN_CHANCE_HARDCORE: f64 = 0.22;
pub(crate) const BREAKDOWN_DAMAGE_MIN: i64 = 5;
pub(crate) const BREAKDOWN_DAMAGE_MAX: i64 = 18;
pub(crate) const BREAKDOWN_DAMAGE_MAX_HARDCORE: i64 = 28;
pub(crate) const HARDCORE_PAYOUT_BONUS: f64 = 0.15;
pub(crate) const HARDCORE_PENALTY_MULTIPLIER: f64 = 1.25;

// Random events ------------------------------------------------------------
pub(crate) const EVENT_FUEL_SPIKE_BAND: f64 = 0.20;
pub(crate) const EVENT_CUSTOMS_BAND: f64 = 0.40;
pub(crate) const EVENT_SUBSIDY_BAND: f64 = 0.55;
pub(crate) const EVENT_PIRACY_BAND: f64 = 0.75;
pub(crate) const EVENT_FUEL_SPIKE_MIN: i64 = 2;
pub(crate) const EVENT_FUEL_SPIKE_MAX: i64 = 4;
pub(crate) const EVENT_FUEL_SPIKE_MAX_HARDCORE: i64 = 6;
pub(crate) const EVENT_CUSTOMS_MIN: i64 = 120;
pub(crate) const EVENT_CUSTOMS_MAX: i64 = 360;
pub(crate) const EVENT_CUSTOMS_MAX_HARDCORE: i64 = 600;
pub(crate) const EVENT_SUBSIDY_MIN: i64 = 160;
pub(crate) const EVENT_SUBSIDY_MAX: i64 = 520;
// Lower than the normal ceiling; kept as shipped.
pub(crate) const EVENT_SUBSIDY_MAX_HARDCORE: i64 = 420;
pub(crate) const EVENT_PIRACY_LOSS_MIN: i64 = 100;
pub(crate) const EVENT_PIRACY_LOSS_MAX: i64 = 350;
pub(crate) const EVENT_PIRACY_LOSS_MAX_HARDCORE: i64 = 600;
pub(crate) const EVENT_PIRACY_DAMAGE_MIN: i64 = 8;
pub(crate) const EVENT_PIRACY_DAMAGE_MAX: i64 = 18;
pub(crate) const EVENT_PIRACY_DAMAGE_MAX_HARDCORE: i64 = 30;

// Journal ------------------------------------------------------------------
/// Entries the in-memory journal keeps before evicting the oldest.
pub const JOURNAL_WINDOW: usize = 500;

// Persistence --------------------------------------------------------------
pub const SAVE_SLOT_MIN: u8 = 1;
pub const SAVE_SLOT_MAX: u8 = 3;
pub const LEADERBOARD_NAME_MAX_CHARS: usize = 24;
pub const LEADERBOARD_STORED_ENTRIES: usize = 20;
pub const LEADERBOARD_DISPLAY_ENTRIES: usize = 10;
pub const ANONYMOUS_PLAYER: &str = "Anonymous";
