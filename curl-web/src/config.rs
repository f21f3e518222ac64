//! Tunable thresholds for the pose pipeline and the beam game.
//!
//! Every section deserializes with defaults, so the front-end can send a
//! partial JSON document and override only what it needs.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Largest smoothing window or form history accepted by `validate`
pub const MAX_WINDOW: usize = 1024;

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Landmark confidence gates
    pub tracking: TrackingConfig,

    /// Angle smoothing window
    pub smoothing: SmoothingConfig,

    /// Rep counter hysteresis
    pub reps: RepConfig,

    /// Form score deltas
    pub form: FormConfig,

    /// Coaching message policy
    pub feedback: FeedbackConfig,

    /// Balance beam physics
    pub beam: BeamConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Every point of an arm must be seen above this to track the arm at all
    pub min_point_visibility: f32,

    /// Mean arm confidence must exceed this for the rep counter to run
    pub rep_quality_gate: f32,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            min_point_visibility: 0.5,
            rep_quality_gate: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Number of raw samples averaged into the smoothed angle
    pub window: usize,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self { window: 5 }
    }
}

/// Which angle drives the rep state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleSignal {
    Raw,
    Smoothed,
}

/// How reps from the two arms combine into the session total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BilateralPolicy {
    /// Every arm rep counts and is dispatched
    Each,
    /// A rep close in time to a counted rep of the other arm is folded into it
    Collapse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepConfig {
    /// Degrees above which the arm is considered extended
    pub extended_above: f32,

    /// Degrees below which an extended arm completes a rep
    pub flexed_below: f32,

    pub signal: AngleSignal,

    pub bilateral: BilateralPolicy,

    /// Seconds within which opposite-arm reps collapse into one
    pub bilateral_window_secs: f64,
}

impl Default for RepConfig {
    fn default() -> Self {
        Self {
            extended_above: 160.0,
            flexed_below: 50.0,
            signal: AngleSignal::Raw,
            bilateral: BilateralPolicy::Each,
            bilateral_window_secs: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Number of past scores used for the consistency adjustment
    pub history: usize,

    pub quality_target: f32,
    pub quality_penalty_scale: f32,

    pub rom_outer_low: f32,
    pub rom_outer_high: f32,
    pub rom_outer_penalty: f32,
    pub rom_inner_low: f32,
    pub rom_inner_high: f32,
    pub rom_inner_penalty: f32,

    /// Degrees per second
    pub too_fast: f32,
    pub too_fast_penalty: f32,
    pub too_slow: f32,
    pub too_slow_penalty: f32,
    pub tempo_low: f32,
    pub tempo_high: f32,
    pub tempo_bonus: f32,

    pub inconsistent_deviation: f32,
    pub inconsistent_penalty: f32,
    pub consistent_deviation: f32,
    pub consistent_bonus: f32,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            history: 10,
            quality_target: 0.8,
            quality_penalty_scale: 50.0,
            rom_outer_low: 40.0,
            rom_outer_high: 170.0,
            rom_outer_penalty: 15.0,
            rom_inner_low: 50.0,
            rom_inner_high: 160.0,
            rom_inner_penalty: 8.0,
            too_fast: 200.0,
            too_fast_penalty: 20.0,
            too_slow: 10.0,
            too_slow_penalty: 10.0,
            tempo_low: 50.0,
            tempo_high: 150.0,
            tempo_bonus: 5.0,
            inconsistent_deviation: 25.0,
            inconsistent_penalty: 10.0,
            consistent_deviation: 10.0,
            consistent_bonus: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Minimum seconds between two messages
    pub interval_secs: f64,

    pub low_quality: f32,
    pub correction_below: u8,
    pub encouragement_below: u8,
    pub praise_from: u8,

    pub peak_curl_below: f32,
    pub extension_above: f32,
    pub too_fast: f32,
    pub too_slow: f32,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            interval_secs: 2.5,
            low_quality: 0.6,
            correction_below: 60,
            encouragement_below: 80,
            praise_from: 90,
            peak_curl_below: 40.0,
            extension_above: 170.0,
            too_fast: 200.0,
            too_slow: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamConfig {
    /// Relative weight difference still counted as balanced
    pub tolerance: f32,

    /// Radians of tilt at a fully one-sided load
    pub max_rotation: f32,

    /// Radians per second for animated tilt
    pub rotation_speed: f32,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.1,
            max_rotation: PI / 6.0,
            rotation_speed: 5.0,
        }
    }
}

impl PipelineConfig {
    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reject threshold combinations the components cannot work with
    pub fn validate(&self) -> Result<()> {
        let unit = 0.0..=1.0;
        if !unit.contains(&self.tracking.min_point_visibility)
            || !unit.contains(&self.tracking.rep_quality_gate)
        {
            return Err(Error::Config(
                "tracking confidences must lie in [0, 1]".to_string(),
            ));
        }
        if !(1..=MAX_WINDOW).contains(&self.smoothing.window) {
            return Err(Error::Config(format!(
                "smoothing window must hold 1 to {MAX_WINDOW} samples"
            )));
        }
        if !(1..=MAX_WINDOW).contains(&self.form.history) {
            return Err(Error::Config(format!(
                "form history must hold 1 to {MAX_WINDOW} scores"
            )));
        }
        if self.reps.flexed_below >= self.reps.extended_above {
            return Err(Error::Config(format!(
                "flexed threshold {} must be below extended threshold {}",
                self.reps.flexed_below, self.reps.extended_above
            )));
        }
        if self.reps.bilateral_window_secs < 0.0 {
            return Err(Error::Config("bilateral window cannot be negative".to_string()));
        }
        if self.feedback.interval_secs < 0.0 {
            return Err(Error::Config("feedback interval cannot be negative".to_string()));
        }
        if !(0.0..=1.0).contains(&self.beam.tolerance) {
            return Err(Error::Config("beam tolerance must lie in [0, 1]".to_string()));
        }
        Ok(())
    }
}
