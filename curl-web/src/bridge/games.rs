//! Mini-game helpers exposed to JavaScript
//!
//! Beam physics uses the `beam` section of the active session config.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::BeamConfig;
use crate::error::Result;
use crate::games::{self, generate_hints, todays_object, BeamState, DailyObject, Hint, SkillLevel};

use super::landmarks::with_state;

fn beam_config() -> BeamConfig {
    with_state(|state| state.session.config().beam.clone()).unwrap_or_default()
}

/// Beam values for one pair of pan loads
#[wasm_bindgen]
#[derive(Clone, Copy, Debug)]
pub struct BeamReading {
    /// Radians, positive when the right pan is heavier
    pub rotation: f32,
    pub is_balanced: bool,
    /// Percent, 1 decimal
    pub accuracy: f32,
}

impl From<BeamState> for BeamReading {
    fn from(state: BeamState) -> Self {
        Self {
            rotation: state.rotation,
            is_balanced: state.is_balanced,
            accuracy: state.accuracy,
        }
    }
}

#[wasm_bindgen]
pub fn compute_beam(left_weight: f32, right_weight: f32) -> BeamReading {
    BeamState::compute(left_weight, right_weight, &beam_config()).into()
}

/// Animate the displayed beam tilt toward `target` over `dt` seconds
#[wasm_bindgen]
pub fn smooth_beam_rotation(current: f32, target: f32, dt: f32) -> f32 {
    games::smooth_rotation(current, target, dt, beam_config().rotation_speed)
}

/// Lift accuracy of the daily challenge, 1 decimal
#[wasm_bindgen]
pub fn challenge_accuracy(target_weight: f32, lifted_weight: f32) -> f32 {
    games::lift_accuracy(target_weight, lifted_weight)
}

#[derive(Serialize)]
struct ChallengeCard<'a> {
    object: &'a DailyObject,
    hints: Vec<Hint>,
}

fn challenge_card_json(level: &str, date_key: &str) -> Result<String> {
    let level: SkillLevel = level.parse()?;
    let object = todays_object(level, date_key);
    let card = ChallengeCard {
        object,
        hints: generate_hints(object),
    };
    Ok(serde_json::to_string(&card)?)
}

/// Today's mystery object and its hint ladder as JSON
#[wasm_bindgen]
pub fn todays_challenge(level: &str, date_key: &str) -> std::result::Result<String, JsValue> {
    Ok(challenge_card_json(level, date_key)?)
}
