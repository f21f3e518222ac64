//! Angle smoothing and angular velocity
//!
//! Averages the last few raw angles to take the jitter out of the tracked
//! signal. Velocity is measured between consecutive raw samples, not on the
//! smoothed curve, so fast reps are not hidden by the averaging lag.

use super::window::SlidingWindow;

/// Output of one smoother update
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothedSample {
    /// Raw angle as measured this frame (degrees)
    pub raw: f32,
    /// Mean of the window, clamped to [0, 180]
    pub smoothed: f32,
    /// Degrees per second, 0 on the first sample
    pub velocity: f32,
}

/// Sliding-window smoother for one arm
#[derive(Clone, Debug)]
pub struct SignalSmoother {
    history: SlidingWindow<f32>,
    /// Last raw angle and its timestamp (seconds)
    last_sample: Option<(f32, f64)>,
    velocity: f32,
}

impl SignalSmoother {
    pub fn new(window: usize) -> Self {
        Self {
            history: SlidingWindow::new(window),
            last_sample: None,
            velocity: 0.0,
        }
    }

    /// Feed one raw angle taken at `timestamp` seconds
    pub fn update(&mut self, angle: f32, timestamp: f64) -> SmoothedSample {
        if let Some((last_angle, last_time)) = self.last_sample {
            let dt = timestamp - last_time;
            // Same or out-of-order timestamp: keep the previous estimate
            if dt > 0.0 {
                self.velocity = ((angle - last_angle).abs() as f64 / dt) as f32;
            }
        }
        self.last_sample = Some((angle, timestamp));

        self.history.push(angle);
        let smoothed = self.history.mean().unwrap_or(angle).clamp(0.0, 180.0);

        SmoothedSample {
            raw: angle,
            smoothed,
            velocity: self.velocity,
        }
    }

    pub fn smoothed(&self) -> Option<f32> {
        self.history.mean().map(|m| m.clamp(0.0, 180.0))
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn last_angle(&self) -> Option<f32> {
        self.last_sample.map(|(angle, _)| angle)
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.last_sample = None;
        self.velocity = 0.0;
    }
}

impl Default for SignalSmoother {
    fn default() -> Self {
        Self::new(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_first_sample_has_no_velocity() {
        let mut smoother = SignalSmoother::default();
        let sample = smoother.update(170.0, 0.0);
        assert_eq!(sample.smoothed, 170.0);
        assert_eq!(sample.velocity, 0.0);
    }

    #[test]
    fn test_window_mean_and_raw_velocity() {
        let mut smoother = SignalSmoother::default();
        smoother.update(170.0, 0.0);
        let second = smoother.update(45.0, 0.1);
        assert_approx_eq!(second.smoothed, 107.5, 1e-3);
        assert_approx_eq!(second.velocity, 1250.0, 0.5);

        let third = smoother.update(170.0, 0.2);
        assert_approx_eq!(third.smoothed, 128.333, 1e-2);
        assert_approx_eq!(third.velocity, 1250.0, 0.5);
    }

    #[test]
    fn test_window_evicts_after_five() {
        let mut smoother = SignalSmoother::default();
        for (i, angle) in [10.0, 20.0, 30.0, 40.0, 50.0, 60.0].iter().enumerate() {
            smoother.update(*angle, i as f64 * 0.1);
        }
        assert_approx_eq!(smoother.smoothed().unwrap(), 40.0, 1e-4);
    }

    #[test]
    fn test_non_increasing_timestamp_keeps_velocity() {
        let mut smoother = SignalSmoother::default();
        smoother.update(100.0, 1.0);
        smoother.update(110.0, 1.5);
        let sample = smoother.update(150.0, 1.5);
        assert_approx_eq!(sample.velocity, 20.0, 1e-3);
    }

    #[test]
    fn test_reset() {
        let mut smoother = SignalSmoother::default();
        smoother.update(100.0, 0.0);
        smoother.update(50.0, 0.5);
        smoother.reset();
        assert_eq!(smoother.smoothed(), None);
        assert_eq!(smoother.velocity(), 0.0);
        assert_eq!(smoother.last_angle(), None);
    }
}
