//! Landmark intake and session control for JavaScript
//!
//! Receives MediaPipe landmarks from JavaScript, runs them through the pose
//! session and reports results back through registered JS callbacks.
//! Callbacks run after the session borrow is released, so they may call back
//! into any bridge function.

use std::cell::{Cell, RefCell};

use js_sys::Function;
use wasm_bindgen::prelude::*;

use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::pose::{ArmSide, LandmarkSnapshot, PoseEvents, PoseSession};

// ============================================================================
// JS CALLBACKS
// ============================================================================

/// Callback functions registered by the front-end; unset ones are skipped
#[derive(Clone, Default)]
struct JsCallbacks {
    on_rep_detected: Option<Function>,
    on_angle_update: Option<Function>,
    on_form_score_update: Option<Function>,
    on_feedback_update: Option<Function>,
    on_game_action: Option<Function>,
}

fn report(result: std::result::Result<JsValue, JsValue>) {
    if let Err(err) = result {
        tracing::warn!(?err, "pose callback threw");
    }
}

fn invoke0(callback: &Option<Function>) {
    if let Some(function) = callback {
        report(function.call0(&JsValue::NULL));
    }
}

/// The argument is only built when a callback is registered
fn invoke1(callback: &Option<Function>, arg: impl FnOnce() -> JsValue) {
    if let Some(function) = callback {
        report(function.call1(&JsValue::NULL, &arg()));
    }
}

impl PoseEvents for JsCallbacks {
    fn on_rep_detected(&mut self) {
        invoke0(&self.on_rep_detected);
    }

    fn on_angle_update(&mut self, angle: f32) {
        invoke1(&self.on_angle_update, || JsValue::from_f64(angle as f64));
    }

    fn on_form_score_update(&mut self, score: u8) {
        invoke1(&self.on_form_score_update, || JsValue::from_f64(score as f64));
    }

    fn on_feedback_update(&mut self, message: &str) {
        invoke1(&self.on_feedback_update, || JsValue::from_str(message));
    }

    fn on_game_action(&mut self) {
        invoke0(&self.on_game_action);
    }
}

// ============================================================================
// SESSION STORAGE
// ============================================================================

#[derive(Default)]
pub(super) struct BridgeState {
    pub(super) session: PoseSession,
    callbacks: JsCallbacks,
}

// Thread-local storage (WASM is single-threaded)
thread_local! {
    static POSE: RefCell<BridgeState> = RefCell::new(BridgeState::default());
    static FRAME_IN_FLIGHT: Cell<bool> = const { Cell::new(false) };
}

/// Run `f` on the bridge state.
///
/// The borrow never spans a JS call, so `None` only comes back if `f`
/// itself re-enters the bridge.
pub(super) fn with_state<R>(f: impl FnOnce(&mut BridgeState) -> R) -> Option<R> {
    POSE.with(|cell| match cell.try_borrow_mut() {
        Ok(mut state) => Some(f(&mut state)),
        Err(_) => {
            tracing::warn!("pose bridge state already borrowed");
            None
        }
    })
}

/// Marks a frame as being processed until dropped
struct FrameInFlight;

impl FrameInFlight {
    /// `None` when another frame is still being processed
    fn enter() -> Option<Self> {
        let busy = FRAME_IN_FLIGHT.with(|flag| flag.replace(true));
        if busy {
            None
        } else {
            Some(FrameInFlight)
        }
    }
}

impl Drop for FrameInFlight {
    fn drop(&mut self) {
        FRAME_IN_FLIGHT.with(|flag| flag.set(false));
    }
}

/// Decode a flat landmark buffer and a millisecond timestamp
fn decode_frame(data: &[f32], timestamp_ms: f64) -> Result<(LandmarkSnapshot, f64)> {
    if !timestamp_ms.is_finite() {
        return Err(Error::Timestamp(timestamp_ms));
    }
    let snapshot = LandmarkSnapshot::from_flat(data)?;
    Ok((snapshot, timestamp_ms / 1000.0))
}

/// Process one frame and dispatch its output to the listener picked by
/// `listener`.
///
/// A frame arriving while another one is still dispatching is dropped.
/// Returns whether the frame was processed.
fn process_frame<E: PoseEvents>(
    snapshot: &LandmarkSnapshot,
    timestamp: f64,
    listener: impl FnOnce(&JsCallbacks) -> E,
) -> bool {
    let Some(_flight) = FrameInFlight::enter() else {
        tracing::warn!("frame arrived while another is in flight, dropping it");
        return false;
    };

    let frame = with_state(|state| {
        let output = state.session.on_frame(snapshot, timestamp)?;
        Some((output, listener(&state.callbacks)))
    })
    .flatten();

    match frame {
        Some((output, mut events)) => {
            output.dispatch(&mut events);
            true
        }
        None => false,
    }
}

// ============================================================================
// WASM-BINDGEN ENTRY POINTS
// ============================================================================

/// Replace the session with a fresh one using a (partial) JSON config
#[wasm_bindgen]
pub fn configure_session(config_json: &str) -> std::result::Result<(), JsValue> {
    let config = PipelineConfig::from_json(config_json)?;
    with_state(|state| state.session = PoseSession::new(config))
        .ok_or_else(|| JsValue::from_str("pose bridge busy"))
}

/// Register the five output callbacks; pass `undefined` to skip one
#[wasm_bindgen]
pub fn set_pose_callbacks(
    on_rep_detected: Option<Function>,
    on_angle_update: Option<Function>,
    on_form_score_update: Option<Function>,
    on_feedback_update: Option<Function>,
    on_game_action: Option<Function>,
) {
    with_state(|state| {
        state.callbacks = JsCallbacks {
            on_rep_detected,
            on_angle_update,
            on_form_score_update,
            on_feedback_update,
            on_game_action,
        };
    });
}

#[wasm_bindgen]
pub fn start_session() {
    with_state(|state| state.session.start());
}

#[wasm_bindgen]
pub fn stop_session() {
    with_state(|state| state.session.stop());
}

#[wasm_bindgen]
pub fn cleanup_session() {
    with_state(|state| state.session.cleanup());
}

/// Called from JavaScript with flat Float32Array of 99 values
/// (33 landmarks × 3 values: x, y, visibility) and `performance.now()`.
///
/// Returns whether the frame was processed.
#[wasm_bindgen]
pub fn update_landmarks(data: &[f32], timestamp_ms: f64) -> std::result::Result<bool, JsValue> {
    let (snapshot, timestamp) = match decode_frame(data, timestamp_ms) {
        Ok(frame) => frame,
        Err(err) => {
            web_sys::console::warn_1(&format!("Invalid landmark frame: {}", err).into());
            return Err(err.into());
        }
    };

    Ok(process_frame(&snapshot, timestamp, JsCallbacks::clone))
}

/// `[left, right, total]` rep counts
#[wasm_bindgen]
pub fn get_rep_counts() -> Vec<u32> {
    with_state(|state| {
        vec![
            state.session.arm_reps(ArmSide::Left),
            state.session.arm_reps(ArmSide::Right),
            state.session.total_reps(),
        ]
    })
    .unwrap_or_default()
}

/// Reps of one arm, named `"left"` or `"right"`
#[wasm_bindgen]
pub fn get_arm_reps(arm: &str) -> std::result::Result<u32, JsValue> {
    let side = arm_side(arm)?;
    Ok(with_state(|state| state.session.arm_reps(side)).unwrap_or(0))
}

fn arm_side(name: &str) -> Result<ArmSide> {
    name.parse()
}
