//! Side quests: generation from three templates and end-of-day resolution.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constants::{
    QUEST_BATCH_SIZE, QUEST_DELIVER_BONUS_MAX, QUEST_DELIVER_BONUS_MIN,
    QUEST_DELIVER_DEADLINE_MAX_DAYS, QUEST_DELIVER_DEADLINE_MIN_DAYS, QUEST_EARN_BONUS_MAX,
    QUEST_EARN_BONUS_MIN, QUEST_EARN_TARGET_MAX, QUEST_EARN_TARGET_MIN,
    QUEST_NO_BREAKDOWN_BONUS_MAX, QUEST_NO_BREAKDOWN_BONUS_MIN,
};
use crate::journal::{LogEvent, LogSink};
use crate::map::{Route, random_route};
use crate::numbers::clamp_i64_to_u32;
use crate::rng::UniformSource;
use crate::state::{GameState, Locale};

/// Inline storage for a resolution pass; a batch never exceeds three quests.
pub type FulfilledQuests = SmallVec<[Quest; QUEST_BATCH_SIZE]>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Quest {
    /// Never evaluated: it stays in the active set until the next reroll.
    DeliverBetween {
        route: Route,
        deadline_day: u32,
        bonus: i64,
    },
    EarnToday {
        target: i64,
        bonus: i64,
        issued_day: u32,
    },
    NoBreakdowns {
        bonus: i64,
        issued_day: u32,
    },
}

impl Quest {
    #[must_use]
    pub const fn bonus(&self) -> i64 {
        match self {
            Self::DeliverBetween { bonus, .. }
            | Self::EarnToday { bonus, .. }
            | Self::NoBreakdowns { bonus, .. } => *bonus,
        }
    }

    #[must_use]
    pub const fn template(&self) -> QuestTemplate {
        match self {
            Self::DeliverBetween { .. } => QuestTemplate::DeliverBetween,
            Self::EarnToday { .. } => QuestTemplate::EarnToday,
            Self::NoBreakdowns { .. } => QuestTemplate::NoBreakdowns,
        }
    }

    /// Whether the daily telemetry satisfies this quest. Only quests issued
    /// on the day being resolved are eligible.
    #[must_use]
    pub fn is_fulfilled_by(&self, telemetry: &DayTelemetry) -> bool {
        match self {
            Self::EarnToday {
                target, issued_day, ..
            } => *issued_day == telemetry.day && telemetry.earned >= *target,
            Self::NoBreakdowns { issued_day, .. } => {
                *issued_day == telemetry.day && telemetry.breakdowns == 0
            }
            Self::DeliverBetween { .. } => false,
        }
    }

    /// Template identifier plus interpolation fields for the view layer.
    #[must_use]
    pub fn text(&self) -> QuestText {
        let fields = match self {
            Self::DeliverBetween {
                route,
                deadline_day,
                bonus,
            } => vec![
                ("from", route.origin.clone()),
                ("to", route.destination.clone()),
                ("deadline", deadline_day.to_string()),
                ("bonus", bonus.to_string()),
            ],
            Self::EarnToday { target, bonus, .. } => {
                vec![("target", target.to_string()), ("bonus", bonus.to_string())]
            }
            Self::NoBreakdowns { bonus, .. } => vec![("bonus", bonus.to_string())],
        };
        QuestText {
            template: self.template(),
            fields,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestTemplate {
    DeliverBetween,
    EarnToday,
    NoBreakdowns,
}

impl QuestTemplate {
    const ALL: [Self; 3] = [Self::DeliverBetween, Self::EarnToday, Self::NoBreakdowns];

    /// Stable key for external localization catalogs.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::DeliverBetween => "quest.deliver_between",
            Self::EarnToday => "quest.earn_today",
            Self::NoBreakdowns => "quest.no_breakdowns",
        }
    }

    #[must_use]
    pub const fn pattern(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::DeliverBetween, Locale::Fr) => {
                "Livrer de {from} vers {to} avant J{deadline} (+{bonus} cr)"
            }
            (Self::DeliverBetween, Locale::En) => {
                "Deliver from {from} to {to} before D{deadline} (+{bonus} cr)"
            }
            (Self::EarnToday, Locale::Fr) => {
                "Gagner au moins {target} crédits aujourd'hui (+{bonus} cr)"
            }
            (Self::EarnToday, Locale::En) => "Earn at least {target} credits today (+{bonus} cr)",
            (Self::NoBreakdowns, Locale::Fr) => "Aucune panne aujourd'hui (+{bonus} cr)",
            (Self::NoBreakdowns, Locale::En) => "No breakdowns today (+{bonus} cr)",
        }
    }
}

/// Localizable quest description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestText {
    pub template: QuestTemplate,
    pub fields: Vec<(&'static str, String)>,
}

impl QuestText {
    /// Interpolate the built-in pattern for `locale`.
    #[must_use]
    pub fn render(&self, locale: Locale) -> String {
        self.fields.iter().fold(
            self.template.pattern(locale).to_string(),
            |text, (name, value)| text.replace(&format!("{{{name}}}"), value),
        )
    }
}

/// Aggregates collected over one day, consumed by quest resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DayTelemetry {
    /// The day being closed out.
    pub day: u32,
    pub earned: i64,
    pub breakdowns: u32,
}

impl DayTelemetry {
    #[must_use]
    pub const fn from_state(state: &GameState) -> Self {
        Self {
            day: state.day,
            earned: state.earned_today,
            breakdowns: state.breakdowns_today,
        }
    }
}

/// Draw one quest issued on `current_day`.
pub fn generate_quest<R: UniformSource + ?Sized>(rng: &mut R, current_day: u32) -> Quest {
    let template = rng
        .pick_index(QuestTemplate::ALL.len())
        .map_or(QuestTemplate::DeliverBetween, |idx| QuestTemplate::ALL[idx]);
    match template {
        QuestTemplate::DeliverBetween => {
            let route = random_route(rng);
            let offset = clamp_i64_to_u32(rng.roll_range(
                QUEST_DELIVER_DEADLINE_MIN_DAYS,
                QUEST_DELIVER_DEADLINE_MAX_DAYS,
            ));
            let bonus = rng.roll_range(QUEST_DELIVER_BONUS_MIN, QUEST_DELIVER_BONUS_MAX);
            Quest::DeliverBetween {
                route,
                deadline_day: current_day.saturating_add(offset),
                bonus,
            }
        }
        QuestTemplate::EarnToday => {
            let target = rng.roll_range(QUEST_EARN_TARGET_MIN, QUEST_EARN_TARGET_MAX);
            let bonus = rng.roll_range(QUEST_EARN_BONUS_MIN, QUEST_EARN_BONUS_MAX);
            Quest::EarnToday {
                target,
                bonus,
                issued_day: current_day,
            }
        }
        QuestTemplate::NoBreakdowns => Quest::NoBreakdowns {
            bonus: rng.roll_range(QUEST_NO_BREAKDOWN_BONUS_MIN, QUEST_NO_BREAKDOWN_BONUS_MAX),
            issued_day: current_day,
        },
    }
}

/// Replace the active quest set with a fresh batch of three.
pub fn generate_quests<R: UniformSource + ?Sized>(state: &mut GameState, rng: &mut R) {
    state.quests = (0..QUEST_BATCH_SIZE)
        .map(|_| generate_quest(rng, state.day))
        .collect();
}

/// Reroll the active quests and note it in the journal.
pub fn reroll_quests<R: UniformSource + ?Sized>(
    state: &mut GameState,
    rng: &mut R,
    log: &mut dyn LogSink,
) {
    generate_quests(state, rng);
    log.record(state.day, LogEvent::QuestsRerolled);
}

/// Pay out and remove every quest the telemetry fulfils. Unfulfilled quests
/// stay in place unchanged.
pub fn resolve_quests(
    state: &mut GameState,
    telemetry: &DayTelemetry,
    log: &mut dyn LogSink,
) -> FulfilledQuests {
    let (fulfilled, remaining): (Vec<Quest>, Vec<Quest>) = std::mem::take(&mut state.quests)
        .into_iter()
        .partition(|quest| quest.is_fulfilled_by(telemetry));
    state.quests = remaining;
    for quest in &fulfilled {
        state.credits += quest.bonus();
        log.record(
            state.day,
            LogEvent::QuestCompleted {
                bonus: quest.bonus(),
            },
        );
    }
    fulfilled.into_iter().collect()
}
