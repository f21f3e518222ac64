//! Pose module - landmark frames to reps, form score and coaching
//!
//! Re-exports only. All logic in submodules.

mod angles;
mod events;
mod feedback;
mod form;
mod landmarks;
mod rep_counter;
mod session;
mod smoother;
mod window;

pub use angles::calculate_elbow_angle;
pub use events::{EventLog, PoseEvents};
pub use feedback::{Feedback, FeedbackAdvisor, FeedbackInput, FeedbackKind};
pub use form::FormScorer;
pub use landmarks::{
    ArmLandmarks, ArmSide, LandmarkPoint, LandmarkSnapshot,
    // Constants
    LEFT_ELBOW, LEFT_SHOULDER, LEFT_WRIST, POSE_LANDMARK_COUNT, RIGHT_ELBOW, RIGHT_SHOULDER,
    RIGHT_WRIST, VALUES_PER_POINT,
};
pub use rep_counter::{FlexionPhase, RepCounter};
pub use session::{ArmTrackState, FrameOutput, PoseSession, SessionState};
pub use smoother::{SignalSmoother, SmoothedSample};
pub use window::SlidingWindow;
