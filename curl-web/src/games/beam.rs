//! Balance beam physics
//!
//! Left pan holds the mystery object, right pan holds what the player has
//! curled (reps × weight per rep). All ratios fall back to a denominator of 1
//! when both pans are empty.

use std::f32::consts::PI;

use crate::config::BeamConfig;

/// Tilt at a fully one-sided load (30°)
pub const MAX_ROTATION: f32 = PI / 6.0;

/// Default balance tolerance as a fraction of the total load
pub const DEFAULT_TOLERANCE: f32 = 0.1;

fn or_one(denominator: f32) -> f32 {
    if denominator == 0.0 {
        1.0
    } else {
        denominator
    }
}

/// Signed beam tilt in radians, positive when the right pan is heavier
pub fn rotation(left: f32, right: f32) -> f32 {
    scaled_rotation(left, right, MAX_ROTATION)
}

fn scaled_rotation(left: f32, right: f32, max_rotation: f32) -> f32 {
    (right - left) / or_one(left + right) * max_rotation
}

/// Relative difference within `tolerance` of the total load
pub fn is_balanced(left: f32, right: f32, tolerance: f32) -> bool {
    (left - right).abs() / or_one(left + right) <= tolerance
}

/// 0-100 match percentage against the average load, 1 decimal
pub fn accuracy(left: f32, right: f32) -> f32 {
    let average = or_one((left + right) / 2.0);
    let accuracy = (100.0 - (left - right).abs() / average * 100.0).max(0.0);
    (accuracy * 10.0).round() / 10.0
}

/// Step `current` toward `target` by at most `speed * dt`
pub fn smooth_rotation(current: f32, target: f32, dt: f32, speed: f32) -> f32 {
    let difference = target - current;
    let max_change = speed * dt;

    if difference.abs() <= max_change {
        return target;
    }

    current + difference.signum() * max_change
}

/// Everything the beam renderer needs for one pair of loads
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeamState {
    pub left_weight: f32,
    pub right_weight: f32,
    /// Radians
    pub rotation: f32,
    pub is_balanced: bool,
    /// Percent, 1 decimal
    pub accuracy: f32,
}

impl BeamState {
    pub fn compute(left_weight: f32, right_weight: f32, config: &BeamConfig) -> Self {
        Self {
            left_weight,
            right_weight,
            rotation: scaled_rotation(left_weight, right_weight, config.max_rotation),
            is_balanced: is_balanced(left_weight, right_weight, config.tolerance),
            accuracy: accuracy(left_weight, right_weight),
        }
    }
}

/// Weight the player credits to each rep, never below 1
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightPerRep(f32);

impl WeightPerRep {
    pub const MIN: f32 = 1.0;

    pub fn new(weight: f32) -> Self {
        if weight.is_nan() {
            return Self(Self::MIN);
        }
        Self(weight.max(Self::MIN))
    }

    pub fn get(&self) -> f32 {
        self.0
    }

    pub fn lifted_weight(&self, reps: u32) -> f32 {
        reps as f32 * self.0
    }
}

impl Default for WeightPerRep {
    fn default() -> Self {
        Self::new(10.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_accuracy() {
        assert_eq!(accuracy(100.0, 100.0), 100.0);
        assert_eq!(accuracy(100.0, 0.0), 0.0);
        assert_eq!(accuracy(0.0, 0.0), 100.0);
        assert_eq!(accuracy(65.0, 60.0), 92.0);
    }

    #[test]
    fn test_is_balanced() {
        assert!(is_balanced(100.0, 95.0, 0.1));
        assert!(!is_balanced(100.0, 80.0, 0.1));
        assert!(is_balanced(0.0, 0.0, 0.1));
        assert!(is_balanced(65.0, 60.0, DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_rotation() {
        assert_eq!(rotation(0.0, 0.0), 0.0);
        assert_approx_eq!(rotation(0.0, 50.0), MAX_ROTATION);
        assert_approx_eq!(rotation(50.0, 0.0), -MAX_ROTATION);
        assert_approx_eq!(rotation(30.0, 10.0), -MAX_ROTATION / 2.0);
        for (l, r) in [(1.0, 1000.0), (1000.0, 1.0), (3.0, 7.0)] {
            assert!(rotation(l, r).abs() <= MAX_ROTATION + 1e-6);
        }
    }

    #[test]
    fn test_smooth_rotation() {
        assert_eq!(smooth_rotation(0.0, 0.1, 0.1, 5.0), 0.1);
        assert_approx_eq!(smooth_rotation(0.0, 1.0, 0.1, 5.0), 0.5);
        assert_approx_eq!(smooth_rotation(0.0, -1.0, 0.1, 5.0), -0.5);
    }

    #[test]
    fn test_beam_state_bundle() {
        let state = BeamState::compute(65.0, 60.0, &BeamConfig::default());
        assert_eq!(state.left_weight, 65.0);
        assert!(state.is_balanced);
        assert_eq!(state.accuracy, 92.0);
        assert!(state.rotation < 0.0);
    }

    #[test]
    fn test_weight_per_rep_floor() {
        assert_eq!(WeightPerRep::new(0.2).get(), 1.0);
        assert_eq!(WeightPerRep::new(f32::NAN).get(), 1.0);
        assert_eq!(WeightPerRep::new(10.0).lifted_weight(6), 60.0);
    }
}
