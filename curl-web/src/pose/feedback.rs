//! Rate-limited coaching messages

use std::fmt;

use crate::config::FeedbackConfig;

use super::landmarks::ArmSide;

/// What the coach wants to say
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackKind {
    MoveCloser,
    ControlDescent,
    ExtendFully,
    SlowDown,
    KeepMoving,
    Encouragement,
    Praise,
    Reinforcement,
}

/// One coaching message about one arm
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub arm: ArmSide,
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arm = self.arm;
        match self.kind {
            FeedbackKind::MoveCloser => {
                write!(f, "Move closer to camera for better {arm} arm tracking.")
            }
            FeedbackKind::ControlDescent => write!(
                f,
                "Perfect peak curl with {arm} arm! Control the descent for better form."
            ),
            FeedbackKind::ExtendFully => {
                write!(f, "Extend your {arm} arm more at the bottom for full range.")
            }
            FeedbackKind::SlowDown => {
                write!(f, "Slow down your {arm} arm - smooth and controlled wins!")
            }
            FeedbackKind::KeepMoving => {
                write!(f, "Keep your {arm} arm moving! Don't pause during curls.")
            }
            FeedbackKind::Encouragement => {
                write!(f, "Good {arm} arm form! Focus on consistent tempo and range.")
            }
            FeedbackKind::Praise => write!(f, "Excellent {arm} arm technique! Perfect form! 🔥"),
            FeedbackKind::Reinforcement => {
                write!(f, "Great {arm} arm control! Keep that smooth motion.")
            }
        }
    }
}

/// Frame measurements the advisor looks at
#[derive(Clone, Copy, Debug)]
pub struct FeedbackInput {
    pub angle: f32,
    pub form_score: u8,
    pub velocity: f32,
    pub quality: f32,
    pub arm: ArmSide,
}

/// Picks at most one message per interval
#[derive(Clone, Debug)]
pub struct FeedbackAdvisor {
    config: FeedbackConfig,
    /// Timestamp (seconds) of the last emitted message
    last_emitted: Option<f64>,
}

impl FeedbackAdvisor {
    pub fn new(config: FeedbackConfig) -> Self {
        Self {
            config,
            last_emitted: None,
        }
    }

    /// Returns a message, or `None` while rate limited or when nothing applies
    pub fn advise(&mut self, input: &FeedbackInput, timestamp: f64) -> Option<Feedback> {
        if let Some(last) = self.last_emitted {
            if timestamp - last < self.config.interval_secs {
                return None;
            }
        }

        let kind = self.select(input)?;
        self.last_emitted = Some(timestamp);
        tracing::debug!(arm = %input.arm, ?kind, "feedback");
        Some(Feedback {
            kind,
            arm: input.arm,
        })
    }

    fn select(&self, input: &FeedbackInput) -> Option<FeedbackKind> {
        let c = &self.config;

        if input.quality < c.low_quality {
            return Some(FeedbackKind::MoveCloser);
        }

        if input.form_score < c.correction_below {
            // Worst factor first; a low score with none of these stays silent
            return if input.angle < c.peak_curl_below {
                Some(FeedbackKind::ControlDescent)
            } else if input.angle > c.extension_above {
                Some(FeedbackKind::ExtendFully)
            } else if input.velocity > c.too_fast {
                Some(FeedbackKind::SlowDown)
            } else if input.velocity < c.too_slow {
                Some(FeedbackKind::KeepMoving)
            } else {
                None
            };
        }

        if input.form_score < c.encouragement_below {
            Some(FeedbackKind::Encouragement)
        } else if input.form_score >= c.praise_from {
            Some(FeedbackKind::Praise)
        } else {
            Some(FeedbackKind::Reinforcement)
        }
    }

    pub fn reset(&mut self) {
        self.last_emitted = None;
    }
}

impl Default for FeedbackAdvisor {
    fn default() -> Self {
        Self::new(FeedbackConfig::default())
    }
}
