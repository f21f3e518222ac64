//! Landmark snapshot types
//!
//! One snapshot holds every pose point seen at a single capture instant.
//! Indices follow the MediaPipe Pose layout (33 points) so the JS side can
//! hand over its result array without remapping.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

// ============================================================================
// LANDMARK INDICES (MediaPipe Pose - 33 total)
// ============================================================================

pub const POSE_LANDMARK_COUNT: usize = 33;

/// Values per point in a flat buffer: x, y, visibility
pub const VALUES_PER_POINT: usize = 3;

pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// A single 2D landmark in normalized image coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LandmarkPoint {
    pub x: f32,          // 0-1 normalized
    pub y: f32,          // 0-1 normalized
    pub confidence: f32, // 0-1
}

impl LandmarkPoint {
    pub fn new(x: f32, y: f32, confidence: f32) -> Self {
        Self { x, y, confidence }
    }
}

/// Which arm a measurement belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArmSide {
    Left,
    Right,
}

impl ArmSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArmSide::Left => "left",
            ArmSide::Right => "right",
        }
    }

    /// (shoulder, elbow, wrist) landmark indices
    pub fn joints(&self) -> (usize, usize, usize) {
        match self {
            ArmSide::Left => (LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST),
            ArmSide::Right => (RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST),
        }
    }
}

impl fmt::Display for ArmSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArmSide {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(ArmSide::Left),
            "right" => Ok(ArmSide::Right),
            _ => Err(Error::UnknownName {
                kind: "arm",
                value: s.to_string(),
            }),
        }
    }
}

/// The three points that define one elbow angle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArmLandmarks {
    pub shoulder: LandmarkPoint,
    pub elbow: LandmarkPoint,
    pub wrist: LandmarkPoint,
}

impl ArmLandmarks {
    /// Mean confidence of the three points
    pub fn quality(&self) -> f32 {
        (self.shoulder.confidence + self.elbow.confidence + self.wrist.confidence) / 3.0
    }

    /// All three points individually clear the visibility floor
    pub fn is_visible(&self, min_point_visibility: f32) -> bool {
        self.shoulder.confidence > min_point_visibility
            && self.elbow.confidence > min_point_visibility
            && self.wrist.confidence > min_point_visibility
    }
}

/// All landmarks of one frame. Missing points read as confidence 0.
#[derive(Clone, Debug)]
pub struct LandmarkSnapshot {
    points: [Option<LandmarkPoint>; POSE_LANDMARK_COUNT],
}

impl Default for LandmarkSnapshot {
    fn default() -> Self {
        Self {
            points: [None; POSE_LANDMARK_COUNT],
        }
    }
}

impl LandmarkSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, ignores out-of-range indices
    pub fn with(mut self, index: usize, point: LandmarkPoint) -> Self {
        self.set(index, point);
        self
    }

    pub fn set(&mut self, index: usize, point: LandmarkPoint) {
        if let Some(slot) = self.points.get_mut(index) {
            *slot = Some(point);
        }
    }

    pub fn get(&self, index: usize) -> Option<LandmarkPoint> {
        self.points.get(index).copied().flatten()
    }

    pub fn confidence(&self, index: usize) -> f32 {
        self.get(index).map_or(0.0, |p| p.confidence)
    }

    /// Shoulder, elbow and wrist of one arm, if all three are present
    pub fn arm(&self, side: ArmSide) -> Option<ArmLandmarks> {
        let (shoulder, elbow, wrist) = side.joints();
        Some(ArmLandmarks {
            shoulder: self.get(shoulder)?,
            elbow: self.get(elbow)?,
            wrist: self.get(wrist)?,
        })
    }

    /// Decode a flat `[x, y, visibility] * 33` buffer from JavaScript.
    ///
    /// Points with any non-finite value are treated as missing.
    pub fn from_flat(data: &[f32]) -> Result<Self> {
        let expected = POSE_LANDMARK_COUNT * VALUES_PER_POINT;
        if data.len() != expected {
            return Err(Error::LandmarkBuffer {
                expected,
                actual: data.len(),
            });
        }

        let mut snapshot = Self::new();
        for (i, chunk) in data.chunks_exact(VALUES_PER_POINT).enumerate() {
            if chunk.iter().all(|v| v.is_finite()) {
                let confidence = chunk[2].clamp(0.0, 1.0);
                snapshot.set(i, LandmarkPoint::new(chunk[0], chunk[1], confidence));
            }
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_points_read_as_zero_confidence() {
        let snapshot = LandmarkSnapshot::new().with(LEFT_ELBOW, LandmarkPoint::new(0.5, 0.5, 0.9));
        assert_eq!(snapshot.confidence(LEFT_ELBOW), 0.9);
        assert_eq!(snapshot.confidence(LEFT_WRIST), 0.0);
        assert!(snapshot.arm(ArmSide::Left).is_none());
    }

    #[test]
    fn test_arm_quality_and_visibility() {
        let snapshot = LandmarkSnapshot::new()
            .with(RIGHT_SHOULDER, LandmarkPoint::new(0.5, 0.3, 0.9))
            .with(RIGHT_ELBOW, LandmarkPoint::new(0.5, 0.5, 0.6))
            .with(RIGHT_WRIST, LandmarkPoint::new(0.5, 0.7, 0.45));
        let arm = snapshot.arm(ArmSide::Right).unwrap();
        assert!((arm.quality() - 0.65).abs() < 1e-6);
        assert!(!arm.is_visible(0.5));
        assert!(arm.is_visible(0.4));
    }

    #[test]
    fn test_from_flat_rejects_wrong_length() {
        let result = LandmarkSnapshot::from_flat(&[0.0; 98]);
        assert!(matches!(
            result,
            Err(Error::LandmarkBuffer { expected: 99, actual: 98 })
        ));
    }

    #[test]
    fn test_from_flat_drops_non_finite_points() {
        let mut data = vec![0.5_f32; 99];
        data[LEFT_WRIST * 3] = f32::NAN;
        let snapshot = LandmarkSnapshot::from_flat(&data).unwrap();
        assert!(snapshot.get(LEFT_WRIST).is_none());
        assert_eq!(snapshot.get(LEFT_ELBOW), Some(LandmarkPoint::new(0.5, 0.5, 0.5)));
    }

    #[test]
    fn test_arm_side_parsing() {
        assert_eq!("LEFT".parse::<ArmSide>().unwrap(), ArmSide::Left);
        assert!("middle".parse::<ArmSide>().is_err());
    }
}
