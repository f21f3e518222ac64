//! Form quality scoring
//!
//! Starts every frame at 100 and applies deltas for tracking quality, range
//! of motion, tempo and consistency with recent frames.

use crate::config::FormConfig;

use super::window::SlidingWindow;

/// Per-frame 0-100 form score with a short memory of past scores
#[derive(Clone, Debug)]
pub struct FormScorer {
    config: FormConfig,
    history: SlidingWindow<f32>,
}

impl FormScorer {
    pub fn new(config: FormConfig) -> Self {
        let history = SlidingWindow::new(config.history);
        Self { config, history }
    }

    /// Score one frame and remember the result
    ///
    /// - `angle`: elbow angle in degrees
    /// - `velocity`: degrees per second
    /// - `quality`: mean landmark confidence of the scored arm
    pub fn score(&mut self, angle: f32, velocity: f32, quality: f32) -> u8 {
        let c = &self.config;
        let mut score = 100.0_f32;

        // Tracking quality
        if quality < c.quality_target {
            score -= (c.quality_target - quality) * c.quality_penalty_scale;
        }

        // Range of motion
        if angle < c.rom_outer_low || angle > c.rom_outer_high {
            score -= c.rom_outer_penalty;
        } else if angle < c.rom_inner_low || angle > c.rom_inner_high {
            score -= c.rom_inner_penalty;
        }

        // Tempo
        if velocity > c.too_fast {
            score -= c.too_fast_penalty;
        } else if velocity < c.too_slow {
            score -= c.too_slow_penalty;
        } else if velocity > c.tempo_low && velocity < c.tempo_high {
            score += c.tempo_bonus;
        }

        // Consistency with recent frames
        if let Some(average) = self.history.mean() {
            let deviation = (score - average).abs();
            if deviation > c.inconsistent_deviation {
                score -= c.inconsistent_penalty;
            } else if deviation < c.consistent_deviation {
                score += c.consistent_bonus;
            }
        }

        // NaN inputs fall through to 0
        let final_score = if score.is_nan() { 0.0 } else { score.clamp(0.0, 100.0).round() };
        self.history.push(final_score);
        final_score as u8
    }

    pub fn recent_scores(&self) -> impl Iterator<Item = &f32> {
        self.history.iter()
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }
}

impl Default for FormScorer {
    fn default() -> Self {
        Self::new(FormConfig::default())
    }
}
