//! Precision and sensitivity of a step response.
//!
//! With `O_1` the output at the end of phase 1, `O_peak` the largest deviation
//! from `O_1` over phase 2, `O_post` the distance from `O_1` to the lowest of
//! the last `tail_points` samples, and `dI` the relative input step:
//!
//! ```text
//! precision   = ((O_post / O_1) / dI)^-1
//! sensitivity =  (O_peak / O_1) / dI
//! ```
//!
//! A perfect adapter returns exactly to `O_1`, which gives infinite precision.

use crate::config::{RewardMode, ScoringConfig};
use circuit_dynamics::Trajectory;
use thiserror::Error;

/// A response that cannot be scored.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScoreError {
    #[error("output baseline {0} is not a positive finite level")]
    Baseline(f64),

    #[error("phase 2 trace is empty")]
    EmptyTrace,

    #[error("input step {0:?} does not change the input")]
    NoInputChange((f64, f64)),

    #[error("metrics are not finite (precision {precision}, sensitivity {sensitivity})")]
    NonFinite { precision: f64, sensitivity: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub precision: f64,
    pub sensitivity: f64,
}

impl Score {
    /// Score the output species of a two-phase run.
    pub fn measure(
        stabilize: &Trajectory,
        eval: &Trajectory,
        output: usize,
        inputs: (f64, f64),
        tail_points: usize,
    ) -> Result<Self, ScoreError> {
        let baseline = stabilize
            .series(output)
            .last()
            .copied()
            .unwrap_or(f64::NAN);
        if !(baseline.is_finite() && baseline > 0.0) {
            return Err(ScoreError::Baseline(baseline));
        }

        let response = eval.series(output);
        if response.is_empty() {
            return Err(ScoreError::EmptyTrace);
        }
        let (i1, i2) = inputs;
        let delta = (i2 - i1).abs() / i1;
        if !(delta.is_finite() && delta > 0.0) {
            return Err(ScoreError::NoInputChange(inputs));
        }

        let deviation = |x: &f64| (x - baseline).abs();
        let peak = response.iter().map(deviation).fold(0.0, f64::max);
        let tail = &response[response.len().saturating_sub(tail_points.max(1))..];
        let post = deviation(&tail.iter().copied().fold(f64::INFINITY, f64::min));

        let precision = ((post / baseline) / delta).recip();
        let sensitivity = (peak / baseline) / delta;
        if precision.is_nan() || !sensitivity.is_finite() {
            return Err(ScoreError::NonFinite {
                precision,
                sensitivity,
            });
        }
        Ok(Self {
            precision,
            sensitivity,
        })
    }

    pub fn log_precision(&self) -> f64 {
        self.precision.log10()
    }

    pub fn log_sensitivity(&self) -> f64 {
        self.sensitivity.log10()
    }

    /// Both log metrics reach their floors.
    pub fn is_success(&self, config: &ScoringConfig) -> bool {
        self.log_precision() >= config.precision_floor
            && self.log_sensitivity() >= config.sensitivity_floor
    }

    /// Reward in `[0, 1]`; exactly 1 whenever [`Score::is_success`] holds.
    pub fn reward(&self, config: &ScoringConfig) -> f64 {
        match config.reward_mode {
            RewardMode::Binary => {
                if self.is_success(config) {
                    1.0
                } else {
                    0.0
                }
            }
            RewardMode::Continuous => {
                let p = (self.log_precision() / config.precision_floor).clamp(0.0, 1.0);
                let s = (1.0 + self.log_sensitivity() - config.sensitivity_floor).clamp(0.0, 1.0);
                p * s
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUTS: (f64, f64) = (0.5, 0.6);

    fn phase1() -> Trajectory {
        Trajectory::from_rows(vec![0.0, 1.0, 2.0], 1, &[0.05, 0.4, 0.5])
    }

    /// Output rises to `peak` and relaxes to `tail` over the final samples.
    fn phase2(peak: f64, tail: f64) -> Trajectory {
        let mut levels = vec![0.5, peak, (peak + tail) / 2.0];
        levels.extend(std::iter::repeat(tail).take(20));
        let times = (0..levels.len()).map(|t| t as f64).collect();
        Trajectory::from_rows(times, 1, &levels)
    }

    #[test]
    fn test_adapting_response() {
        let score = Score::measure(&phase1(), &phase2(0.6, 0.5005), 0, INPUTS, 20).unwrap();
        assert!((score.precision - 200.0).abs() < 1e-6, "{score:?}");
        assert!((score.sensitivity - 1.0).abs() < 1e-9);

        let config = ScoringConfig::default();
        assert!(score.is_success(&config));
        assert_eq!(score.reward(&config), 1.0);
        let binary = config.with_reward_mode(RewardMode::Binary);
        assert_eq!(score.reward(&binary), 1.0);
    }

    #[test]
    fn test_partial_adaptation() {
        // Relaxes only back to 0.52: precision 5.
        let score = Score::measure(&phase1(), &phase2(0.6, 0.52), 0, INPUTS, 20).unwrap();
        assert!((score.precision - 5.0).abs() < 1e-9);

        let config = ScoringConfig::default();
        assert!(!score.is_success(&config));
        assert!((score.reward(&config) - 5f64.log10()).abs() < 1e-9);
        let binary = config.with_reward_mode(RewardMode::Binary);
        assert_eq!(score.reward(&binary), 0.0);
    }

    #[test]
    fn test_tail_crossing_baseline_uses_lowest_sample() {
        // The tail straddles O_1; the lowest sample sets the post-step level
        // even though another sample sits exactly on the baseline.
        let mut levels = vec![0.5, 0.6, 0.55];
        levels.extend([0.501, 0.5, 0.499].iter().cycle().take(21));
        let times = (0..levels.len()).map(|t| t as f64).collect();
        let eval = Trajectory::from_rows(times, 1, &levels);

        let score = Score::measure(&phase1(), &eval, 0, INPUTS, 20).unwrap();
        assert!((score.precision - 100.0).abs() < 1e-6, "{score:?}");
        assert!(score.precision.is_finite());
    }

    #[test]
    fn test_no_adaptation() {
        let score = Score::measure(&phase1(), &phase2(0.6, 0.6), 0, INPUTS, 20).unwrap();
        assert!((score.log_precision()).abs() < 1e-9);
        assert_eq!(score.reward(&ScoringConfig::default()), 0.0);
    }

    #[test]
    fn test_perfect_adapter() {
        let score = Score::measure(&phase1(), &phase2(0.6, 0.5), 0, INPUTS, 20).unwrap();
        assert_eq!(score.precision, f64::INFINITY);
        assert_eq!(score.reward(&ScoringConfig::default()), 1.0);
    }

    #[test]
    fn test_flat_response_scores_zero() {
        let score = Score::measure(&phase1(), &phase2(0.5, 0.5), 0, INPUTS, 20).unwrap();
        assert_eq!(score.sensitivity, 0.0);
        assert_eq!(score.reward(&ScoringConfig::default()), 0.0);
        assert!(!score.is_success(&ScoringConfig::default()));
    }

    #[test]
    fn test_degenerate_inputs() {
        let dead = Trajectory::from_rows(vec![0.0, 1.0], 1, &[0.05, 0.0]);
        assert_eq!(
            Score::measure(&dead, &phase2(0.6, 0.5), 0, INPUTS, 20),
            Err(ScoreError::Baseline(0.0))
        );
        assert_eq!(
            Score::measure(&phase1(), &phase2(0.6, 0.5), 0, (0.5, 0.5), 20),
            Err(ScoreError::NoInputChange((0.5, 0.5)))
        );
        let empty = Trajectory::from_rows(Vec::new(), 1, &[]);
        assert_eq!(
            Score::measure(&phase1(), &empty, 0, INPUTS, 20),
            Err(ScoreError::EmptyTrace)
        );
    }
}
