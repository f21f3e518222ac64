//! Games module - mini-game state driven by the pose session
//!
//! Re-exports only. All logic in submodules.

mod beam;
mod challenge;
mod launcher;

pub use beam::{
    accuracy, is_balanced, rotation, smooth_rotation, BeamState, WeightPerRep,
    DEFAULT_TOLERANCE, MAX_ROTATION,
};
pub use challenge::{
    final_score, generate_hints, latest_hint, lift_accuracy, todays_object, unlocked_hints,
    validate_session, AccuracyGrade, ChallengeRound, DailyObject, Hint, HintKind, ObjectKind,
    RoundPhase, ScoreBreakdown, SessionRejection, SkillLevel, DAILY_OBJECTS, ROUND_SECS,
};
pub use launcher::{CurlPhase, Hit, LauncherGame, Projectile, Target, TargetKind};
