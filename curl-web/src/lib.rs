//! Curl Web - bicep curl tracking for fitness mini-games
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen entry points that delegate to submodules

mod bridge;
pub mod config;
pub mod error;
pub mod games;
pub mod pose;

use wasm_bindgen::prelude::*;

// Re-export wasm_bindgen functions for JS access
pub use bridge::{
    challenge_accuracy, cleanup_session, compute_beam, configure_session, get_arm_reps,
    get_rep_counts, set_pose_callbacks, smooth_beam_rotation, start_session, stop_session,
    todays_challenge, update_landmarks, BeamReading,
};
pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use pose::{FrameOutput, PoseEvents, PoseSession};

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    tracing::info!("✅ Curl tracker initialized");
}
