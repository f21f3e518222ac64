//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod games;
mod landmarks;

pub use landmarks::{
    cleanup_session,
    configure_session,
    get_arm_reps,
    get_rep_counts,
    set_pose_callbacks,
    start_session,
    stop_session,
    update_landmarks,
};

pub use games::{
    challenge_accuracy,
    compute_beam,
    smooth_beam_rotation,
    todays_challenge,
    BeamReading,
};
