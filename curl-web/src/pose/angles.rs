//! Elbow angle calculation using dot product
//!
//! Works on the shoulder→elbow and elbow→wrist segments: `ab = A − B` and
//! `bc = B − C`. The angle between those two vectors is 0 for a straight
//! arm, so the joint angle reported is its supplement.

use nalgebra::Vector2;

use super::landmarks::LandmarkPoint;

/// Calculate elbow angle in degrees
///
/// Returns angle in degrees, rounded to 2 decimals:
/// - 180° = fully straight (arm extended)
/// - 0° = fully folded (wrist back on the shoulder)
///
/// A zero-length segment yields exactly 0.
pub fn calculate_elbow_angle(
    shoulder: &LandmarkPoint,
    elbow: &LandmarkPoint,
    wrist: &LandmarkPoint,
) -> f32 {
    let a = Vector2::new(shoulder.x, shoulder.y);
    let b = Vector2::new(elbow.x, elbow.y);
    let c = Vector2::new(wrist.x, wrist.y);

    let ab = a - b;
    let bc = b - c;

    let mag_ab = ab.norm();
    let mag_bc = bc.norm();

    // Degenerate or non-finite geometry
    if !(mag_ab > 0.0 && mag_bc > 0.0 && mag_ab.is_finite() && mag_bc.is_finite()) {
        return 0.0;
    }

    let cos_theta = (ab.dot(&bc) / (mag_ab * mag_bc)).clamp(-1.0, 1.0);
    let angle = 180.0 - cos_theta.acos().to_degrees();

    (angle * 100.0).round() / 100.0
}
