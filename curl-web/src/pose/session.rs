//! Pose session - turns landmark frames into reps, scores and coaching
//!
//! Per frame and per tracked arm: elbow angle → smoother → rep counter.
//! The arm with the better landmark confidence is "active" and drives the
//! form score, the coaching message and the reported angle.
//!
//! Frames are processed strictly one at a time: `on_frame` takes `&mut self`
//! and commits every mutation before returning.

use crate::config::{AngleSignal, BilateralPolicy, PipelineConfig};

use super::angles::calculate_elbow_angle;
use super::events::PoseEvents;
use super::feedback::{Feedback, FeedbackAdvisor, FeedbackInput};
use super::form::FormScorer;
use super::landmarks::{ArmSide, LandmarkSnapshot};
use super::rep_counter::{FlexionPhase, RepCounter};
use super::smoother::{SignalSmoother, SmoothedSample};

/// Lifecycle of a session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Fresh, never started (or cleaned up)
    #[default]
    Idle,
    Running,
    /// Paused, counts preserved
    Stopped,
}

/// Everything tracked for one arm
#[derive(Clone, Debug)]
pub struct ArmTrackState {
    pub smoother: SignalSmoother,
    pub counter: RepCounter,
}

impl ArmTrackState {
    fn new(config: &PipelineConfig) -> Self {
        Self {
            smoother: SignalSmoother::new(config.smoothing.window),
            counter: RepCounter::new(&config.reps, &config.tracking),
        }
    }

    fn reset(&mut self) {
        self.smoother.reset();
        self.counter.reset();
    }
}

/// One arm's measurement in the current frame
#[derive(Clone, Copy, Debug)]
struct ArmReading {
    quality: f32,
    sample: SmoothedSample,
}

/// Result of processing one frame.
///
/// A frame with no tracked arm has no angle and no score, so dispatching it
/// fires neither `on_angle_update` nor `on_form_score_update`; only the
/// "move closer" feedback can come out of it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameOutput {
    /// Arm that drove score and feedback; `None` when no arm was tracked
    pub active_arm: Option<ArmSide>,
    pub raw_angle: Option<f32>,
    pub smoothed_angle: Option<f32>,
    pub velocity: Option<f32>,
    pub form_score: Option<u8>,
    /// Arms whose rep counter completed a rep this frame
    pub rep_events: Vec<ArmSide>,
    /// Subset of `rep_events` counted toward the session total
    pub counted_reps: Vec<ArmSide>,
    pub feedback: Option<Feedback>,
}

impl FrameOutput {
    /// Fire the frame's events in order: reps, angle, score, feedback.
    /// Absent values fire nothing.
    pub fn dispatch(&self, events: &mut dyn PoseEvents) {
        for _ in &self.counted_reps {
            events.on_rep_detected();
            events.on_game_action();
        }
        if let Some(angle) = self.smoothed_angle {
            events.on_angle_update(angle);
        }
        if let Some(score) = self.form_score {
            events.on_form_score_update(score);
        }
        if let Some(feedback) = &self.feedback {
            events.on_feedback_update(&feedback.to_string());
        }
    }
}

/// Owns all per-session tracking state
pub struct PoseSession {
    config: PipelineConfig,
    state: SessionState,
    left: ArmTrackState,
    right: ArmTrackState,
    form: FormScorer,
    advisor: FeedbackAdvisor,
    total_reps: u32,
    /// Last rep counted toward the total, for bilateral collapsing
    last_counted: Option<(ArmSide, f64)>,
    last_output: Option<FrameOutput>,
}

impl PoseSession {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            left: ArmTrackState::new(&config),
            right: ArmTrackState::new(&config),
            form: FormScorer::new(config.form.clone()),
            advisor: FeedbackAdvisor::new(config.feedback.clone()),
            config,
            state: SessionState::Idle,
            total_reps: 0,
            last_counted: None,
            last_output: None,
        }
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Begin (or resume) accepting frames
    pub fn start(&mut self) {
        if self.state == SessionState::Running {
            return;
        }
        tracing::info!(total_reps = self.total_reps, "pose session started");
        self.state = SessionState::Running;
    }

    /// Stop accepting frames, keep counts
    pub fn stop(&mut self) {
        if self.state != SessionState::Running {
            return;
        }
        tracing::info!(total_reps = self.total_reps, "pose session stopped");
        self.state = SessionState::Stopped;
    }

    /// Stop and forget everything; the next `start` is a fresh session
    pub fn cleanup(&mut self) {
        self.stop();
        self.left.reset();
        self.right.reset();
        self.form.reset();
        self.advisor.reset();
        self.total_reps = 0;
        self.last_counted = None;
        self.last_output = None;
        self.state = SessionState::Idle;
        tracing::info!("pose session cleaned up");
    }

    // ========================================================================
    // FRAME PROCESSING
    // ========================================================================

    /// Process one snapshot taken at `timestamp` seconds.
    ///
    /// Returns `None` when the session is not running.
    pub fn on_frame(&mut self, snapshot: &LandmarkSnapshot, timestamp: f64) -> Option<FrameOutput> {
        if self.state != SessionState::Running {
            return None;
        }

        let mut output = FrameOutput::default();
        let left = self.track_arm(ArmSide::Left, snapshot, timestamp, &mut output);
        let right = self.track_arm(ArmSide::Right, snapshot, timestamp, &mut output);

        for side in output.rep_events.clone() {
            if self.counts_toward_total(side, timestamp) {
                self.total_reps += 1;
                output.counted_reps.push(side);
            }
        }

        // Ties go to the right arm
        let left_quality = left.map_or(0.0, |r| r.quality);
        let right_quality = right.map_or(0.0, |r| r.quality);
        let (active_arm, active) = if left_quality > right_quality {
            (ArmSide::Left, left)
        } else {
            (ArmSide::Right, right)
        };

        let feedback_input = match active {
            Some(reading) => {
                let sample = reading.sample;
                let score = self.form.score(sample.raw, sample.velocity, reading.quality);

                output.active_arm = Some(active_arm);
                output.raw_angle = Some(sample.raw);
                output.smoothed_angle = Some(sample.smoothed);
                output.velocity = Some(sample.velocity);
                output.form_score = Some(score);

                FeedbackInput {
                    angle: sample.raw,
                    form_score: score,
                    velocity: sample.velocity,
                    quality: reading.quality,
                    arm: active_arm,
                }
            }
            // Nobody in view: only the "move closer" prompt can fire
            None => FeedbackInput {
                angle: 0.0,
                form_score: 0,
                velocity: 0.0,
                quality: 0.0,
                arm: active_arm,
            },
        };
        output.feedback = self.advisor.advise(&feedback_input, timestamp);

        self.last_output = Some(output.clone());
        Some(output)
    }

    /// `on_frame` followed by dispatching the output to `events`
    pub fn on_frame_with(
        &mut self,
        snapshot: &LandmarkSnapshot,
        timestamp: f64,
        events: &mut dyn PoseEvents,
    ) -> Option<FrameOutput> {
        let output = self.on_frame(snapshot, timestamp)?;
        output.dispatch(events);
        Some(output)
    }

    fn track_arm(
        &mut self,
        side: ArmSide,
        snapshot: &LandmarkSnapshot,
        timestamp: f64,
        output: &mut FrameOutput,
    ) -> Option<ArmReading> {
        let min_visibility = self.config.tracking.min_point_visibility;
        let arm = snapshot
            .arm(side)
            .filter(|arm| arm.is_visible(min_visibility))?;

        let quality = arm.quality();
        let raw = calculate_elbow_angle(&arm.shoulder, &arm.elbow, &arm.wrist).clamp(0.0, 180.0);

        let signal = self.config.reps.signal;
        let track = self.arm_mut(side);
        let sample = track.smoother.update(raw, timestamp);
        let rep_angle = match signal {
            AngleSignal::Raw => sample.raw,
            AngleSignal::Smoothed => sample.smoothed,
        };

        if track.counter.update(rep_angle, quality) {
            tracing::debug!(
                arm = %side,
                count = track.counter.count(),
                quality,
                "rep completed"
            );
            output.rep_events.push(side);
        }

        Some(ArmReading { quality, sample })
    }

    fn counts_toward_total(&mut self, side: ArmSide, timestamp: f64) -> bool {
        if self.config.reps.bilateral == BilateralPolicy::Collapse {
            if let Some((last_side, last_time)) = self.last_counted {
                if last_side != side
                    && timestamp - last_time <= self.config.reps.bilateral_window_secs
                {
                    // Partner arm of a bilateral curl; the next rep counts again
                    self.last_counted = None;
                    return false;
                }
            }
        }
        self.last_counted = Some((side, timestamp));
        true
    }

    fn arm_mut(&mut self, side: ArmSide) -> &mut ArmTrackState {
        match side {
            ArmSide::Left => &mut self.left,
            ArmSide::Right => &mut self.right,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn arm(&self, side: ArmSide) -> &ArmTrackState {
        match side {
            ArmSide::Left => &self.left,
            ArmSide::Right => &self.right,
        }
    }

    pub fn arm_reps(&self, side: ArmSide) -> u32 {
        self.arm(side).counter.count()
    }

    pub fn arm_phase(&self, side: ArmSide) -> FlexionPhase {
        self.arm(side).counter.phase()
    }

    /// Reps counted toward the session, per the bilateral policy
    pub fn total_reps(&self) -> u32 {
        self.total_reps
    }

    pub fn last_output(&self) -> Option<&FrameOutput> {
        self.last_output.as_ref()
    }
}

impl Default for PoseSession {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::events::EventLog;
    use crate::pose::feedback::FeedbackKind;
    use crate::pose::landmarks::{LandmarkPoint, LEFT_ELBOW, LEFT_SHOULDER, LEFT_WRIST};
    use assert_approx_eq::assert_approx_eq;

    /// Arm posed at `angle` degrees, upper arm pointing straight up
    fn pose_arm(snapshot: LandmarkSnapshot, side: ArmSide, angle: f32, confidence: f32) -> LandmarkSnapshot {
        let (shoulder, elbow, wrist) = side.joints();
        let x = match side {
            ArmSide::Left => 0.7,
            ArmSide::Right => 0.3,
        };
        let theta = angle.to_radians();
        snapshot
            .with(shoulder, LandmarkPoint::new(x, 0.3, confidence))
            .with(elbow, LandmarkPoint::new(x, 0.5, confidence))
            .with(
                wrist,
                LandmarkPoint::new(x + 0.2 * theta.sin(), 0.5 - 0.2 * theta.cos(), confidence),
            )
    }

    fn left(angle: f32, confidence: f32) -> LandmarkSnapshot {
        pose_arm(LandmarkSnapshot::new(), ArmSide::Left, angle, confidence)
    }

    fn both(left_angle: f32, right_angle: f32, confidence: f32) -> LandmarkSnapshot {
        let snapshot = pose_arm(LandmarkSnapshot::new(), ArmSide::Left, left_angle, confidence);
        pose_arm(snapshot, ArmSide::Right, right_angle, confidence)
    }

    fn running(config: PipelineConfig) -> PoseSession {
        let mut session = PoseSession::new(config);
        session.start();
        session
    }

    #[test]
    fn test_ignores_frames_until_started() {
        let mut session = PoseSession::default();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.on_frame(&left(170.0, 0.9), 0.0).is_none());
        assert!(session.arm(ArmSide::Left).smoother.smoothed().is_none());
    }

    #[test]
    fn test_single_curl_scenario() {
        let mut session = running(PipelineConfig::default());
        let mut log = EventLog::default();

        for (i, angle) in [170.0, 45.0, 170.0].iter().enumerate() {
            session.on_frame_with(&left(*angle, 0.9), i as f64 * 0.1, &mut log);
        }

        assert_eq!(log.reps, 1);
        assert_eq!(log.game_actions, 1);
        assert_eq!(log.angles.len(), 3);
        assert_approx_eq!(log.angles[0], 170.0, 0.02);
        assert_approx_eq!(log.angles[1], 107.5, 0.02);
        assert_approx_eq!(log.angles[2], 128.33, 0.02);
        assert_eq!(log.scores, vec![82, 72, 77]);
        assert_eq!(
            log.feedback,
            vec!["Great left arm control! Keep that smooth motion.".to_string()]
        );
        assert_eq!(session.arm_reps(ArmSide::Left), 1);
        assert_eq!(session.arm_reps(ArmSide::Right), 0);
        assert_eq!(session.total_reps(), 1);
    }

    #[test]
    fn test_smoothed_signal_needs_sustained_flexion() {
        let mut config = PipelineConfig::default();
        config.reps.signal = AngleSignal::Smoothed;
        let mut session = running(config);

        for (i, angle) in [170.0, 45.0, 170.0].iter().enumerate() {
            session.on_frame(&left(*angle, 0.9), i as f64 * 0.1);
        }
        assert_eq!(session.total_reps(), 0);

        // Hold the curl until the window mean drops below the threshold
        let mut t = 0.3;
        for _ in 0..5 {
            session.on_frame(&left(20.0, 0.9), t);
            t += 0.1;
        }
        assert_eq!(session.total_reps(), 1);
    }

    #[test]
    fn test_low_confidence_arm_tracked_but_not_counted() {
        let mut session = running(PipelineConfig::default());
        for (i, angle) in [170.0, 30.0, 170.0, 30.0].iter().enumerate() {
            let output = session.on_frame(&left(*angle, 0.65), i as f64 * 0.1).unwrap();
            assert!(output.smoothed_angle.is_some());
            assert!(output.rep_events.is_empty());
        }
        assert_eq!(session.total_reps(), 0);
        assert_eq!(session.arm_phase(ArmSide::Left), FlexionPhase::None);
    }

    #[test]
    fn test_invisible_arm_is_not_tracked() {
        let mut session = running(PipelineConfig::default());
        let output = session.on_frame(&left(170.0, 0.4), 0.0).unwrap();
        assert_eq!(output.active_arm, None);
        assert_eq!(output.smoothed_angle, None);
        assert_eq!(output.form_score, None);
        assert_eq!(
            output.feedback.map(|f| f.kind),
            Some(FeedbackKind::MoveCloser)
        );
    }

    #[test]
    fn test_untracked_frame_dispatches_feedback_only() {
        let mut session = running(PipelineConfig::default());
        let mut log = EventLog::default();
        let output = session.on_frame_with(&left(170.0, 0.4), 0.0, &mut log);

        assert!(output.is_some());
        assert!(log.angles.is_empty());
        assert!(log.scores.is_empty());
        assert_eq!(log.reps, 0);
        assert_eq!(
            log.feedback,
            vec!["Move closer to camera for better right arm tracking.".to_string()]
        );
    }

    #[test]
    fn test_active_arm_is_higher_confidence() {
        let mut session = running(PipelineConfig::default());
        let snapshot = pose_arm(left(90.0, 0.75), ArmSide::Right, 120.0, 0.95);
        let output = session.on_frame(&snapshot, 0.0).unwrap();
        assert_eq!(output.active_arm, Some(ArmSide::Right));
        assert_approx_eq!(output.raw_angle.unwrap(), 120.0, 0.02);
    }

    #[test]
    fn test_bilateral_reps_count_each_arm_by_default() {
        let mut session = running(PipelineConfig::default());
        let mut log = EventLog::default();
        session.on_frame_with(&both(170.0, 170.0, 0.9), 0.0, &mut log);
        let output = session
            .on_frame_with(&both(40.0, 40.0, 0.9), 0.5, &mut log)
            .unwrap();
        assert_eq!(output.rep_events, vec![ArmSide::Left, ArmSide::Right]);
        assert_eq!(log.reps, 2);
        assert_eq!(session.total_reps(), 2);
    }

    #[test]
    fn test_bilateral_reps_collapse_when_configured() {
        let mut config = PipelineConfig::default();
        config.reps.bilateral = BilateralPolicy::Collapse;
        let mut session = running(config);
        let mut log = EventLog::default();

        session.on_frame_with(&both(170.0, 170.0, 0.9), 0.0, &mut log);
        let output = session
            .on_frame_with(&both(40.0, 40.0, 0.9), 0.5, &mut log)
            .unwrap();
        assert_eq!(output.rep_events.len(), 2);
        assert_eq!(output.counted_reps, vec![ArmSide::Left]);
        assert_eq!(log.reps, 1);
        assert_eq!(session.arm_reps(ArmSide::Right), 1);
        assert_eq!(session.total_reps(), 1);

        // Alternating curls far apart still count separately
        session.on_frame(&both(170.0, 170.0, 0.9), 1.0);
        session.on_frame(&both(40.0, 170.0, 0.9), 1.5);
        session.on_frame(&both(170.0, 40.0, 0.9), 2.5);
        assert_eq!(session.total_reps(), 3);
    }

    #[test]
    fn test_stop_preserves_and_cleanup_resets() {
        let mut session = running(PipelineConfig::default());
        session.on_frame(&left(170.0, 0.9), 0.0);
        session.on_frame(&left(40.0, 0.9), 0.5);
        assert_eq!(session.total_reps(), 1);

        session.stop();
        assert_eq!(session.state(), SessionState::Stopped);
        assert!(session.on_frame(&left(170.0, 0.9), 1.0).is_none());
        assert_eq!(session.arm_phase(ArmSide::Left), FlexionPhase::Flexed);

        session.start();
        session.on_frame(&left(170.0, 0.9), 1.5);
        session.on_frame(&left(40.0, 0.9), 2.0);
        assert_eq!(session.total_reps(), 2);

        session.cleanup();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.total_reps(), 0);
        assert_eq!(session.arm_reps(ArmSide::Left), 0);
        assert_eq!(session.arm_phase(ArmSide::Left), FlexionPhase::None);
        assert!(session.last_output().is_none());

        session.start();
        let output = session.on_frame(&left(170.0, 0.9), 3.0).unwrap();
        assert_eq!(output.form_score, Some(82));
        assert!(output.feedback.is_some());
    }

    #[test]
    fn test_degenerate_frame_cannot_fire_phantom_rep() {
        let mut session = running(PipelineConfig::default());
        let collapsed = LandmarkSnapshot::new()
            .with(LEFT_SHOULDER, LandmarkPoint::new(0.5, 0.5, 0.9))
            .with(LEFT_ELBOW, LandmarkPoint::new(0.5, 0.5, 0.9))
            .with(LEFT_WRIST, LandmarkPoint::new(0.5, 0.7, 0.9));
        let output = session.on_frame(&collapsed, 0.0).unwrap();
        assert_eq!(output.raw_angle, Some(0.0));
        assert!(output.rep_events.is_empty());
    }
}
