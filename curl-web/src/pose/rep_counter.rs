//! Hysteresis rep counter
//!
//! A rep is one full extension followed by one full flexion. The arm must be
//! seen extended (above the upper threshold) before a flexion below the lower
//! threshold counts, so flicker around either threshold never double counts.
//! Frames with poor landmark confidence are ignored outright.

use crate::config::{RepConfig, TrackingConfig};

/// Curl phase of one arm
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FlexionPhase {
    /// Nothing seen yet
    #[default]
    None,
    /// Arm straight, ready to count
    Extended,
    /// Rep counted, waiting for the next extension
    Flexed,
}

/// Rep state machine for a single arm
#[derive(Clone, Debug)]
pub struct RepCounter {
    phase: FlexionPhase,
    count: u32,
    extended_above: f32,
    flexed_below: f32,
    quality_gate: f32,
}

impl RepCounter {
    pub fn new(reps: &RepConfig, tracking: &TrackingConfig) -> Self {
        Self {
            phase: FlexionPhase::None,
            count: 0,
            extended_above: reps.extended_above,
            flexed_below: reps.flexed_below,
            quality_gate: tracking.rep_quality_gate,
        }
    }

    /// Evaluate one frame. Returns `true` when this frame completed a rep.
    ///
    /// `quality` is the mean confidence of the arm's three landmarks; frames
    /// at or below the gate leave the counter untouched.
    pub fn update(&mut self, angle: f32, quality: f32) -> bool {
        if quality.is_nan() || quality <= self.quality_gate {
            return false;
        }

        let angle = angle.clamp(0.0, 180.0);

        if angle > self.extended_above {
            self.phase = FlexionPhase::Extended;
            return false;
        }

        if angle < self.flexed_below && self.phase == FlexionPhase::Extended {
            self.phase = FlexionPhase::Flexed;
            self.count += 1;
            return true;
        }

        false
    }

    pub fn phase(&self) -> FlexionPhase {
        self.phase
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn reset(&mut self) {
        self.phase = FlexionPhase::None;
        self.count = 0;
    }
}

impl Default for RepCounter {
    fn default() -> Self {
        Self::new(&RepConfig::default(), &TrackingConfig::default())
    }
}
