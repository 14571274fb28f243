//! Oscillation and scoring settings.

use std::fmt;
use std::str::FromStr;

/// Steady state the damped gate measures overshoot against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DampedReference {
    /// Final output level of phase 1.
    #[default]
    PreStep,
    /// Final output level of phase 2.
    PostStep,
}

impl FromStr for DampedReference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post_step" => Ok(Self::PostStep),
            "pre_step" => Ok(Self::PreStep),
            other => Err(format!("unknown damped reference '{other}'")),
        }
    }
}

/// How a scored response becomes a reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RewardMode {
    /// 1 on success, 0 otherwise.
    Binary,
    /// Product of the two floor-normalised log metrics, each clamped to `[0, 1]`.
    #[default]
    Continuous,
}

impl FromStr for RewardMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "binary" => Ok(Self::Binary),
            "continuous" => Ok(Self::Continuous),
            other => Err(format!("unknown reward mode '{other}'")),
        }
    }
}

impl fmt::Display for RewardMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Binary => "binary",
            Self::Continuous => "continuous",
        })
    }
}

/// Thresholds of the sustained and damped oscillation gates.
#[derive(Debug, Clone, PartialEq)]
pub struct OscillationConfig {
    /// Phase 1 is flagged when any normalised autocorrelation drops below this.
    pub autocorrelation_cutoff: f64,

    /// Phase 2 fails when the first trough sits further below the reference
    /// than this fraction of the first overshoot.
    pub damped_trough_ratio: f64,

    /// Phase 2 also fails when overshoot and trough gap are this close.
    pub damped_tolerance: f64,

    pub damped_reference: DampedReference,

    /// Peaks less prominent than this fraction of the reference level are
    /// integrator ripple and ignored by the damped gate.
    pub min_prominence_rel: f64,

    /// Absolute prominence floor, for reference levels near zero.
    pub min_prominence_abs: f64,
}

impl Default for OscillationConfig {
    fn default() -> Self {
        Self {
            autocorrelation_cutoff: -0.4,
            damped_trough_ratio: 0.5,
            damped_tolerance: 0.001,
            damped_reference: DampedReference::PreStep,
            min_prominence_rel: 1e-4,
            min_prominence_abs: 1e-9,
        }
    }
}

impl OscillationConfig {
    /// Builder pattern: set the sustained-gate cutoff.
    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.autocorrelation_cutoff = cutoff;
        self
    }

    /// Builder pattern: set the damped-gate reference level.
    pub fn with_reference(mut self, reference: DampedReference) -> Self {
        self.damped_reference = reference;
        self
    }

    /// Builder pattern: set the peak prominence floors.
    pub fn with_prominence(mut self, rel: f64, abs: f64) -> Self {
        self.min_prominence_rel = rel;
        self.min_prominence_abs = abs;
        self
    }

    /// Smallest prominence a peak needs around `reference`.
    pub fn prominence_floor(&self, reference: f64) -> f64 {
        (self.min_prominence_rel * reference.abs()).max(self.min_prominence_abs)
    }
}

/// Success floors and reward shaping.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    /// Minimum `log10(precision)`.
    pub precision_floor: f64,

    /// Minimum `log10(sensitivity)`.
    pub sensitivity_floor: f64,

    /// Samples at the end of phase 2 used for the post-step level.
    pub tail_points: usize,

    pub reward_mode: RewardMode,

    /// Minimum mean reward for `judge` to call a topology successful.
    pub success_threshold: f64,

    /// Whether `judge` also requires the terminal marker.
    pub require_terminal: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            precision_floor: 1.0,
            sensitivity_floor: 0.0,
            tail_points: 20,
            reward_mode: RewardMode::Continuous,
            success_threshold: 0.01,
            require_terminal: false,
        }
    }
}

impl ScoringConfig {
    /// Builder pattern: set reward mode.
    pub fn with_reward_mode(mut self, mode: RewardMode) -> Self {
        self.reward_mode = mode;
        self
    }

    /// Builder pattern: set both success floors.
    pub fn with_floors(mut self, precision: f64, sensitivity: f64) -> Self {
        self.precision_floor = precision;
        self.sensitivity_floor = sensitivity;
        self
    }

    /// Builder pattern: set the judge threshold and terminal requirement.
    pub fn with_judge(mut self, threshold: f64, require_terminal: bool) -> Self {
        self.success_threshold = threshold;
        self.require_terminal = require_terminal;
        self
    }
}
