//! Daily weight challenge
//!
//! Each day the player gets a mystery object and tries to match its weight
//! by curling: `reps × weight per rep` should land as close as possible to
//! the object's weight before the round timer runs out. Hints unlock as the
//! rep count grows.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::BeamConfig;
use crate::error::{Error, Result};

use super::beam::{BeamState, WeightPerRep};

/// Round length once the first rep lands
pub const ROUND_SECS: u32 = 120;

/// Broad family of a daily object, used for the first hint
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Animal,
    Person,
    Thing,
}

/// One entry of the daily catalogue
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DailyObject {
    pub id: &'static str,
    pub name: &'static str,
    /// Pounds
    pub weight: u32,
    pub emoji: &'static str,
    pub description: &'static str,
    pub kind: ObjectKind,
    /// Second hint; falls back to the description when absent
    pub subcategory: Option<&'static str>,
}

pub const DAILY_OBJECTS: [DailyObject; 6] = [
    // Easy objects (10-30 lbs)
    DailyObject {
        id: "cat",
        name: "House Cat",
        weight: 12,
        emoji: "🐱",
        description: "A small domestic feline",
        kind: ObjectKind::Animal,
        subcategory: Some("It's a small domestic pet"),
    },
    DailyObject {
        id: "toddler",
        name: "Toddler",
        weight: 25,
        emoji: "👶",
        description: "A young child learning to walk",
        kind: ObjectKind::Person,
        subcategory: Some("It's a young child"),
    },
    // Medium objects (30-70 lbs)
    DailyObject {
        id: "labrador",
        name: "Labrador Retriever",
        weight: 65,
        emoji: "🐕",
        description: "A friendly, medium-sized dog breed",
        kind: ObjectKind::Animal,
        subcategory: Some("It's a medium-sized dog breed"),
    },
    DailyObject {
        id: "suitcase",
        name: "Large Suitcase",
        weight: 45,
        emoji: "🧳",
        description: "A packed travel suitcase",
        kind: ObjectKind::Thing,
        subcategory: None,
    },
    // Hard objects (70-150 lbs)
    DailyObject {
        id: "german_shepherd",
        name: "German Shepherd",
        weight: 85,
        emoji: "🐕‍🦺",
        description: "A large working dog breed",
        kind: ObjectKind::Animal,
        subcategory: Some("It's a large working dog"),
    },
    DailyObject {
        id: "washing_machine",
        name: "Washing Machine",
        weight: 120,
        emoji: "🧺",
        description: "A household laundry appliance",
        kind: ObjectKind::Thing,
        subcategory: None,
    },
];

// ============================================================================
// DAILY PICK
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    fn admits(&self, weight: u32) -> bool {
        match self {
            SkillLevel::Beginner => weight <= 30,
            SkillLevel::Intermediate => weight > 30 && weight <= 70,
            SkillLevel::Advanced => weight > 70,
        }
    }
}

impl FromStr for SkillLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "beginner" => Ok(SkillLevel::Beginner),
            "intermediate" => Ok(SkillLevel::Intermediate),
            "advanced" => Ok(SkillLevel::Advanced),
            _ => Err(Error::UnknownName {
                kind: "skill level",
                value: s.to_string(),
            }),
        }
    }
}

/// Object of the day for a skill level.
///
/// `date_key` is any stable per-day string (the front-end passes
/// `Date.toDateString()`); the pick is the sum of its character codes modulo
/// the pool size.
pub fn todays_object(level: SkillLevel, date_key: &str) -> &'static DailyObject {
    let pool: Vec<&'static DailyObject> =
        DAILY_OBJECTS.iter().filter(|o| level.admits(o.weight)).collect();
    let seed: u64 = date_key.chars().map(|c| c as u64).sum();
    pool[(seed % pool.len() as u64) as usize]
}

// ============================================================================
// SCORING
// ============================================================================

/// 0-100 closeness of the lifted total to the target, 1 decimal
pub fn lift_accuracy(target: f32, lifted: f32) -> f32 {
    let denominator = if target == 0.0 { 1.0 } else { target };
    let accuracy = (100.0 - (target - lifted).abs() / denominator * 100.0).max(0.0);
    (accuracy * 10.0).round() / 10.0
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccuracyGrade {
    Perfect,
    Excellent,
    Great,
    Good,
    TryAgain,
}

impl AccuracyGrade {
    pub fn from_accuracy(accuracy: f32) -> Self {
        if accuracy >= 95.0 {
            AccuracyGrade::Perfect
        } else if accuracy >= 85.0 {
            AccuracyGrade::Excellent
        } else if accuracy >= 75.0 {
            AccuracyGrade::Great
        } else if accuracy >= 60.0 {
            AccuracyGrade::Good
        } else {
            AccuracyGrade::TryAgain
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AccuracyGrade::Perfect => "PERFECT!",
            AccuracyGrade::Excellent => "EXCELLENT",
            AccuracyGrade::Great => "GREAT",
            AccuracyGrade::Good => "GOOD",
            AccuracyGrade::TryAgain => "TRY AGAIN",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            AccuracyGrade::Perfect => "Incredible precision!",
            AccuracyGrade::Excellent => "Outstanding balance!",
            AccuracyGrade::Great => "Well done!",
            AccuracyGrade::Good => "Keep practicing!",
            AccuracyGrade::TryAgain => "Better luck next time!",
        }
    }
}

/// End-of-round score breakdown
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub accuracy_score: u32,
    /// Up to 20 for finishing early
    pub time_bonus: u32,
    /// Up to 15 for needing fewer reps
    pub rep_efficiency: u32,
    /// 2 per hint used
    pub hint_penalty: u32,
    pub final_score: u32,
}

pub fn final_score(
    accuracy: f32,
    time_used: f32,
    total_time: f32,
    reps: u32,
    hints_used: u32,
) -> ScoreBreakdown {
    let accuracy_score = accuracy.max(0.0).round() as u32;
    let time_bonus = if total_time > 0.0 {
        ((total_time - time_used) / total_time * 20.0).max(0.0).round() as u32
    } else {
        0
    };
    let rep_efficiency = ((50.0 - reps as f32) / 50.0 * 15.0).max(0.0).round() as u32;
    let hint_penalty = hints_used * 2;
    let final_score = (accuracy_score + time_bonus + rep_efficiency).saturating_sub(hint_penalty);

    ScoreBreakdown {
        accuracy_score,
        time_bonus,
        rep_efficiency,
        hint_penalty,
        final_score,
    }
}

/// Why a finished round does not count
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRejection {
    #[error("Minimum 5 reps required")]
    TooFewReps,

    #[error("Session too short")]
    TooShort,
}

pub fn validate_session(reps: u32, time_used: f32) -> std::result::Result<(), SessionRejection> {
    if reps < 5 {
        return Err(SessionRejection::TooFewReps);
    }
    if time_used < 10.0 {
        return Err(SessionRejection::TooShort);
    }
    Ok(())
}

// ============================================================================
// HINTS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HintKind {
    Category,
    Subcategory,
    Range,
    Precise,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Hint {
    pub kind: HintKind,
    pub message: String,
    pub unlock_at_reps: u32,
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// The four hints for an object, in unlock order (10, 20, 30, 40 reps)
pub fn generate_hints(object: &DailyObject) -> Vec<Hint> {
    let category = match object.kind {
        ObjectKind::Animal => "It's an animal",
        ObjectKind::Person => "It's a person",
        ObjectKind::Thing => "It's an object",
    };
    let subcategory = match object.subcategory {
        Some(text) => text.to_string(),
        None => format!("It's {}", object.description.to_lowercase()),
    };

    let weight = object.weight;
    let range = (weight * 3 / 10).max(10);
    let precise = (weight / 10).max(2);

    vec![
        Hint {
            kind: HintKind::Category,
            message: category.to_string(),
            unlock_at_reps: 10,
        },
        Hint {
            kind: HintKind::Subcategory,
            message: subcategory,
            unlock_at_reps: 20,
        },
        Hint {
            kind: HintKind::Range,
            message: format!(
                "Weight is between {}-{} lbs",
                weight.saturating_sub(range).max(1),
                weight + range
            ),
            unlock_at_reps: 30,
        },
        Hint {
            kind: HintKind::Precise,
            message: format!(
                "Weight is {}-{} lbs",
                weight.saturating_sub(precise).max(1),
                weight + precise
            ),
            unlock_at_reps: 40,
        },
    ]
}

pub fn unlocked_hints(hints: &[Hint], reps: u32) -> Vec<&Hint> {
    hints.iter().filter(|h| reps >= h.unlock_at_reps).collect()
}

/// First hint crossed between `previous_reps` and `current_reps`
pub fn latest_hint(hints: &[Hint], current_reps: u32, previous_reps: u32) -> Option<&Hint> {
    hints
        .iter()
        .find(|h| current_reps >= h.unlock_at_reps && previous_reps < h.unlock_at_reps)
}

// ============================================================================
// ROUND STATE MACHINE
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RoundPhase {
    /// Object shown to the player
    #[default]
    Reveal,
    /// Player picks weight per rep
    SetWeight,
    Curl,
    Result,
}

/// One play-through of the daily challenge
#[derive(Clone, Debug)]
pub struct ChallengeRound {
    object: &'static DailyObject,
    weight_per_rep: WeightPerRep,
    phase: RoundPhase,
    /// Session rep total when curling began
    baseline_reps: u32,
    round_reps: u32,
    time_left: u32,
    timer_started: bool,
    hints: Vec<Hint>,
}

impl ChallengeRound {
    pub fn new(object: &'static DailyObject, weight_per_rep: WeightPerRep) -> Self {
        Self {
            object,
            weight_per_rep,
            phase: RoundPhase::Reveal,
            baseline_reps: 0,
            round_reps: 0,
            time_left: ROUND_SECS,
            timer_started: false,
            hints: generate_hints(object),
        }
    }

    pub fn reveal_done(&mut self) {
        if self.phase == RoundPhase::Reveal {
            self.phase = RoundPhase::SetWeight;
        }
    }

    pub fn set_weight_per_rep(&mut self, weight: f32) {
        if matches!(self.phase, RoundPhase::Reveal | RoundPhase::SetWeight) {
            self.weight_per_rep = WeightPerRep::new(weight);
        }
    }

    /// Enter the curl phase; reps are counted from `session_reps` on
    pub fn start_curling(&mut self, session_reps: u32) {
        if self.phase != RoundPhase::SetWeight {
            return;
        }
        self.baseline_reps = session_reps;
        self.round_reps = 0;
        self.time_left = ROUND_SECS;
        self.timer_started = false;
        self.phase = RoundPhase::Curl;
    }

    /// Feed the session rep total; returns a hint unlocked by this update
    pub fn on_reps(&mut self, session_reps: u32) -> Option<&Hint> {
        if self.phase != RoundPhase::Curl {
            return None;
        }
        let previous = self.round_reps;
        self.round_reps = session_reps.saturating_sub(self.baseline_reps);
        if self.round_reps > 0 {
            self.timer_started = true;
        }
        latest_hint(&self.hints, self.round_reps, previous)
    }

    /// Advance the countdown by whole seconds; the round ends at zero
    pub fn tick(&mut self, seconds: u32) {
        if self.phase != RoundPhase::Curl || !self.timer_started {
            return;
        }
        self.time_left = self.time_left.saturating_sub(seconds);
        if self.time_left == 0 {
            self.finish();
        }
    }

    pub fn finish(&mut self) {
        if self.phase == RoundPhase::Curl {
            tracing::info!(
                object = self.object.id,
                reps = self.round_reps,
                accuracy = self.accuracy(),
                "challenge round finished"
            );
            self.phase = RoundPhase::Result;
        }
    }

    pub fn restart(&mut self) {
        *self = Self::new(self.object, self.weight_per_rep);
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn object(&self) -> &'static DailyObject {
        self.object
    }

    pub fn round_reps(&self) -> u32 {
        self.round_reps
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn time_used(&self) -> u32 {
        ROUND_SECS - self.time_left
    }

    pub fn lifted_weight(&self) -> f32 {
        self.weight_per_rep.lifted_weight(self.round_reps)
    }

    pub fn accuracy(&self) -> f32 {
        lift_accuracy(self.object.weight as f32, self.lifted_weight())
    }

    pub fn grade(&self) -> AccuracyGrade {
        AccuracyGrade::from_accuracy(self.accuracy())
    }

    pub fn unlocked_hints(&self) -> Vec<&Hint> {
        unlocked_hints(&self.hints, self.round_reps)
    }

    /// Mystery object on the left pan, lifted total on the right
    pub fn beam(&self, config: &BeamConfig) -> BeamState {
        BeamState::compute(self.object.weight as f32, self.lifted_weight(), config)
    }

    pub fn score(&self) -> ScoreBreakdown {
        final_score(
            self.accuracy(),
            self.time_used() as f32,
            ROUND_SECS as f32,
            self.round_reps,
            self.unlocked_hints().len() as u32,
        )
    }
}
