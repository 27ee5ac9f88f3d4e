//! Operations journal: structured events emitted by the simulation core.
//!
//! Every notable action produces a [`LogEvent`]. Sinks receive them as
//! [`LogEntry`] values stamped with the current day; the default sink keeps
//! the most recent [`JOURNAL_WINDOW`] of them in memory for the view layer.
//! Each entry is mirrored to the `log` facade so hosts can route it wherever
//! they like.
use std::collections::VecDeque;
use std::fmt;

use crate::constants::JOURNAL_WINDOW;
use crate::error::ValidationFailure;

/// Severity tier for a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Warning,
}

/// Something notable happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    Welcome,
    Departure {
        vehicle: String,
        origin: String,
        destination: String,
        eta_days: u32,
    },
    Breakdown {
        vehicle: String,
        damage: u32,
    },
    DeliveredOnTime {
        vehicle: String,
        gain: i64,
    },
    DeliveredLate {
        vehicle: String,
        penalty: i64,
    },
    ShipPurchased {
        vehicle: String,
        capacity: u32,
    },
    ShipSold {
        vehicle: String,
        price: i64,
    },
    SkinChanged {
        vehicle: String,
        skin: String,
    },
    Refueled {
        spent: i64,
    },
    Repaired {
        spent: i64,
    },
    ContractsRefreshed {
        count: usize,
    },
    QuestCompleted {
        bonus: i64,
    },
    QuestsRerolled,
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
        vehicle: Option<String>,
        damage: u32,
    },
    SolarStorm {
        delayed: usize,
    },
    Saved {
        slot: u8,
    },
    SaveFailed {
        slot: u8,
        reason: String,
    },
    Loaded {
        slot: u8,
    },
    EmptySlot {
        slot: u8,
    },
    LoadFailed {
        slot: u8,
        reason: String,
    },
    ScoreSubmitted {
        name: String,
        profit: i64,
    },
    LeaderboardFailed {
        reason: String,
    },
    AutoSaveToggled {
        enabled: bool,
    },
    HardcoreToggled {
        enabled: bool,
    },
    LocaleChanged {
        locale: String,
    },
    SaveSlotSelected {
        slot: u8,
    },
    Rejected(ValidationFailure),
}

impl LogEvent {
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::SaveFailed { .. }
            | Self::LoadFailed { .. }
            | Self::LeaderboardFailed { .. }
            | Self::Rejected(_) => Severity::Warning,
            _ => Severity::Info,
        }
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Welcome => f.write_str("Welcome aboard, interstellar operations chief!"),
            Self::Departure {
                vehicle,
                origin,
                destination,
                eta_days,
            } => write!(
                f,
                "{vehicle} departs {origin} for {destination} (ETA {eta_days}d)."
            ),
            Self::Breakdown { vehicle, damage } => {
                write!(f, "{vehicle} broke down (-{damage} HP).")
            }
            Self::DeliveredOnTime { vehicle, gain } => {
                write!(f, "{vehicle} delivered on time. +{gain} cr, +1 rep.")
            }
            Self::DeliveredLate { vehicle, penalty } => {
                write!(f, "{vehicle} delivered late. -{penalty} cr, -1 rep.")
            }
            Self::ShipPurchased { vehicle, capacity } => {
                write!(f, "New ship purchased: {vehicle} (cap {capacity}t).")
            }
            Self::ShipSold { vehicle, price } => write!(f, "Sold {vehicle} for {price} cr."),
            Self::SkinChanged { vehicle, skin } => write!(f, "{vehicle} repainted as {skin}."),
            Self::Refueled { spent } => write!(f, "Refuel: {spent} cr."),
            Self::Repaired { spent } => write!(f, "Repairs: {spent} cr."),
            Self::ContractsRefreshed { count } => write!(f, "{count} new contracts posted."),
            Self::QuestCompleted { bonus } => write!(f, "Quest complete: +{bonus} cr."),
            Self::QuestsRerolled => f.write_str("New quests available."),
            Self::FuelSpike { delta } => write!(f, "Fuel price spike +{delta}."),
            Self::CustomsFine { fine } => write!(f, "Customs inspection -{fine} cr."),
            Self::Subsidy { bonus } => write!(f, "Government subsidy +{bonus} cr."),
            Self::Piracy {
                loss,
                vehicle: Some(vehicle),
                damage,
            } => write!(f, "Pirates! Lost {loss} cr, {vehicle} -{damage} HP."),
            Self::Piracy { loss, .. } => write!(f, "Pirates! Lost {loss} cr."),
            Self::SolarStorm { delayed: 0 } => f.write_str("Solar storm with no impact."),
            Self::SolarStorm { delayed } => {
                write!(f, "Solar storm! {delayed} ship(s) delayed.")
            }
            Self::Saved { slot } => write!(f, "Game saved (slot {slot})."),
            Self::SaveFailed { slot, reason } => write!(f, "Save error (slot {slot}): {reason}"),
            Self::Loaded { slot } => write!(f, "Game loaded (slot {slot})."),
            Self::EmptySlot { slot } => write!(f, "Slot {slot} is empty."),
            Self::LoadFailed { slot, reason } => write!(f, "Load error (slot {slot}): {reason}"),
            Self::ScoreSubmitted { name, profit } => {
                write!(f, "Score submitted for {name}: {profit} cr.")
            }
            Self::LeaderboardFailed { reason } => write!(f, "Leaderboard error: {reason}"),
            Self::AutoSaveToggled { enabled } => write!(f, "Auto-save {}.", on_off(*enabled)),
            Self::HardcoreToggled { enabled } => {
                write!(f, "Hardcore mode {}.", on_off(*enabled).to_uppercase())
            }
            Self::LocaleChanged { locale } => write!(f, "Language set to {locale}."),
            Self::SaveSlotSelected { slot } => write!(f, "Save slot {slot} selected."),
            Self::Rejected(failure) => write!(f, "Rejected: {failure}."),
        }
    }
}

/// A journal line: the day it happened plus the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub day: u32,
    pub event: LogEvent,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}: {}", self.day, self.event)
    }
}

/// Destination for journal entries.
pub trait LogSink {
    fn emit(&mut self, entry: LogEntry);

    /// Stamp `event` with `day`, mirror it to the `log` facade, and emit it.
    fn record(&mut self, day: u32, event: LogEvent) {
        let entry = LogEntry { day, event };
        match entry.event.severity() {
            Severity::Info => log::info!("{entry}"),
            Severity::Warning => log::warn!("{entry}"),
        }
        self.emit(entry);
    }
}

impl<T: LogSink + ?Sized> LogSink for &mut T {
    fn emit(&mut self, entry: LogEntry) {
        (**self).emit(entry);
    }
}

/// In-memory journal, oldest entry first, bounded to the last
/// [`JOURNAL_WINDOW`] entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Journal {
    entries: VecDeque<LogEntry>,
}

impl Journal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn entries(&self) -> &VecDeque<LogEntry> {
        &self.entries
    }

    #[must_use]
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }

    /// Rendered lines, newest first, the order the operations log shows them.
    #[must_use]
    pub fn lines_newest_first(&self) -> Vec<String> {
        self.entries.iter().rev().map(ToString::to_string).collect()
    }

    /// Remove and return every entry recorded so far.
    pub fn drain(&mut self) -> Vec<LogEntry> {
        self.entries.drain(..).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl LogSink for Journal {
    fn emit(&mut self, entry: LogEntry) {
        if self.entries.len() >= JOURNAL_WINDOW {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }
}

/// Sink that drops everything except the `log` mirror.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn emit(&mut self, _entry: LogEntry) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_are_prefixed_with_day() {
        let mut journal = Journal::new();
        journal.record(
            3,
            LogEvent::Departure {
                vehicle: "ST-101".into(),
                origin: "Terra".into(),
                destination: "Mars".into(),
                eta_days: 2,
            },
        );
        journal.record(4, LogEvent::SolarStorm { delayed: 0 });
        assert_eq!(journal.len(), 2);
        assert_eq!(
            journal.lines_newest_first(),
            vec![
                "D4: Solar storm with no impact.".to_string(),
                "D3: ST-101 departs Terra for Mars (ETA 2d).".to_string(),
            ]
        );
    }

    #[test]
    fn failures_are_warnings() {
        let rejected = LogEvent::Rejected(ValidationFailure::MinimumFleetSize);
        assert_eq!(rejected.severity(), Severity::Warning);
        assert_eq!(
            rejected.to_string(),
            "Rejected: the fleet must keep at least one vehicle."
        );
        assert_eq!(LogEvent::QuestsRerolled.severity(), Severity::Info);
    }

    #[test]
    fn drain_empties_the_journal() {
        let mut journal = Journal::new();
        journal.record(1, LogEvent::Welcome);
        let drained = journal.drain();
        assert_eq!(drained.len(), 1);
        assert!(journal.is_empty());
    }

    #[test]
    fn journal_keeps_only_the_latest_window() {
        let mut journal = Journal::new();
        for day in 1..=u32::try_from(JOURNAL_WINDOW + 25).unwrap() {
            journal.record(day, LogEvent::QuestsRerolled);
        }
        assert_eq!(journal.len(), JOURNAL_WINDOW);
        assert_eq!(journal.entries()[0].day, 26);
        assert_eq!(
            journal.last().map(|entry| entry.day),
            Some(u32::try_from(JOURNAL_WINDOW + 25).unwrap())
        );
    }
}
