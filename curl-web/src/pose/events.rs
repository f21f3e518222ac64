//! Output port of a pose session
//!
//! Collaborators implement only the callbacks they care about.

/// Named output channels fired after each processed frame
pub trait PoseEvents {
    /// Once per counted rep, no payload
    fn on_rep_detected(&mut self) {}

    /// Smoothed elbow angle of the active arm, every processed frame
    fn on_angle_update(&mut self, _angle: f32) {}

    /// Form score 0-100, every processed frame
    fn on_form_score_update(&mut self, _score: u8) {}

    /// Coaching message, at most once per feedback interval
    fn on_feedback_update(&mut self, _message: &str) {}

    /// Fired next to `on_rep_detected` for game scoring
    fn on_game_action(&mut self) {}
}

/// Records every event, handy for tests and replays
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventLog {
    pub reps: u32,
    pub game_actions: u32,
    pub angles: Vec<f32>,
    pub scores: Vec<u8>,
    pub feedback: Vec<String>,
}

impl PoseEvents for EventLog {
    fn on_rep_detected(&mut self) {
        self.reps += 1;
    }

    fn on_angle_update(&mut self, angle: f32) {
        self.angles.push(angle);
    }

    fn on_form_score_update(&mut self, score: u8) {
        self.scores.push(score);
    }

    fn on_feedback_update(&mut self, message: &str) {
        self.feedback.push(message.to_string());
    }

    fn on_game_action(&mut self) {
        self.game_actions += 1;
    }
}
