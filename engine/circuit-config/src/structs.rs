//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_seed() -> u64 {
    defaults::seed()
}
fn d_components() -> Vec<String> {
    defaults::components().to_vec()
}
fn d_interactions() -> Vec<String> {
    defaults::interactions().to_vec()
}
fn d_pool_size() -> usize {
    defaults::pool_size()
}
fn d_rate_range() -> [f64; 2] {
    defaults::rate_log_range()
}
fn d_threshold_range() -> [f64; 2] {
    defaults::threshold_log_range()
}
fn d_initial_level() -> f64 {
    defaults::initial_level()
}
fn d_basal_activation() -> f64 {
    defaults::basal_activation()
}
fn d_basal_inhibition() -> f64 {
    defaults::basal_inhibition()
}
fn d_input_level() -> f64 {
    defaults::input_level()
}
fn d_input_increase() -> f64 {
    defaults::input_increase()
}
fn d_stabilize_horizon() -> f64 {
    defaults::stabilize_horizon()
}
fn d_stabilize_points() -> usize {
    defaults::stabilize_points()
}
fn d_eval_horizon() -> f64 {
    defaults::eval_horizon()
}
fn d_eval_points() -> usize {
    defaults::eval_points()
}
fn d_rtol() -> f64 {
    defaults::rtol()
}
fn d_atol() -> f64 {
    defaults::atol()
}
fn d_max_steps() -> usize {
    defaults::max_steps()
}
fn d_max_solve_secs() -> f64 {
    defaults::max_solve_secs()
}
fn d_acorr_cutoff() -> f64 {
    defaults::autocorrelation_cutoff()
}
fn d_trough_ratio() -> f64 {
    defaults::damped_trough_ratio()
}
fn d_damped_tolerance() -> f64 {
    defaults::damped_tolerance()
}
fn d_damped_reference() -> String {
    defaults::damped_reference().into()
}
fn d_min_prominence_rel() -> f64 {
    defaults::min_prominence_rel()
}
fn d_min_prominence_abs() -> f64 {
    defaults::min_prominence_abs()
}
fn d_precision_floor() -> f64 {
    defaults::precision_floor()
}
fn d_sensitivity_floor() -> f64 {
    defaults::sensitivity_floor()
}
fn d_tail_points() -> usize {
    defaults::tail_points()
}
fn d_reward_mode() -> String {
    defaults::reward_mode().into()
}
fn d_success_threshold() -> f64 {
    defaults::success_threshold()
}
fn d_require_terminal() -> bool {
    defaults::require_terminal()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub grammar: GrammarConfig,
    #[serde(default)]
    pub sampling: SamplingSection,
    #[serde(default)]
    pub dynamics: DynamicsSection,
    #[serde(default)]
    pub oscillation: OscillationSection,
    #[serde(default)]
    pub scoring: ScoringSection,
}

/// Settings shared by every stage of the pipeline
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    /// Master seed for the parameter pools and the index table.
    #[serde(default = "d_seed")]
    pub seed: u64,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            seed: defaults::seed(),
        }
    }
}

/// Component names and the interaction alphabet.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GrammarConfig {
    /// Single-letter component names; the first is the input species and
    /// the last is the output species.
    #[serde(default = "d_components")]
    pub components: Vec<String>,
    /// Subset of `activates` / `inhibits`.
    #[serde(default = "d_interactions")]
    pub interactions: Vec<String>,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            components: defaults::components().to_vec(),
            interactions: defaults::interactions().to_vec(),
        }
    }
}

/// Parameter pool settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SamplingSection {
    #[serde(default = "d_pool_size")]
    pub pool_size: usize,
    /// log10 bounds of `k_cat`
    #[serde(default = "d_rate_range")]
    pub rate_log_range: [f64; 2],
    /// log10 bounds of `K_threshold`
    #[serde(default = "d_threshold_range")]
    pub threshold_log_range: [f64; 2],
}

impl Default for SamplingSection {
    fn default() -> Self {
        Self {
            pool_size: defaults::pool_size(),
            rate_log_range: defaults::rate_log_range(),
            threshold_log_range: defaults::threshold_log_range(),
        }
    }
}

/// Kinetics, horizons and integrator guards
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DynamicsSection {
    #[serde(default = "d_initial_level")]
    pub initial_level: f64,
    #[serde(default = "d_basal_activation")]
    pub basal_activation: f64,
    #[serde(default = "d_basal_inhibition")]
    pub basal_inhibition: f64,
    #[serde(default = "d_input_level")]
    pub input_level: f64,
    /// Fractional step applied to the input in phase 2.
    #[serde(default = "d_input_increase")]
    pub input_increase: f64,
    #[serde(default = "d_stabilize_horizon")]
    pub stabilize_horizon: f64,
    #[serde(default = "d_stabilize_points")]
    pub stabilize_points: usize,
    #[serde(default = "d_eval_horizon")]
    pub eval_horizon: f64,
    #[serde(default = "d_eval_points")]
    pub eval_points: usize,
    #[serde(default = "d_rtol")]
    pub rtol: f64,
    #[serde(default = "d_atol")]
    pub atol: f64,
    #[serde(default = "d_max_steps")]
    pub max_steps: usize,
    /// Wall-clock budget per solve; `0` disables the check.
    #[serde(default = "d_max_solve_secs")]
    pub max_solve_secs: f64,
}

impl Default for DynamicsSection {
    fn default() -> Self {
        Self {
            initial_level: defaults::initial_level(),
            basal_activation: defaults::basal_activation(),
            basal_inhibition: defaults::basal_inhibition(),
            input_level: defaults::input_level(),
            input_increase: defaults::input_increase(),
            stabilize_horizon: defaults::stabilize_horizon(),
            stabilize_points: defaults::stabilize_points(),
            eval_horizon: defaults::eval_horizon(),
            eval_points: defaults::eval_points(),
            rtol: defaults::rtol(),
            atol: defaults::atol(),
            max_steps: defaults::max_steps(),
            max_solve_secs: defaults::max_solve_secs(),
        }
    }
}

/// Thresholds of the sustained and damped oscillation gates
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OscillationSection {
    #[serde(default = "d_acorr_cutoff")]
    pub autocorrelation_cutoff: f64,
    #[serde(default = "d_trough_ratio")]
    pub damped_trough_ratio: f64,
    #[serde(default = "d_damped_tolerance")]
    pub damped_tolerance: f64,
    /// `pre_step` or `post_step`
    #[serde(default = "d_damped_reference")]
    pub damped_reference: String,
    /// Damped-gate peaks need `max(rel * |reference|, abs)` prominence
    #[serde(default = "d_min_prominence_rel")]
    pub min_prominence_rel: f64,
    #[serde(default = "d_min_prominence_abs")]
    pub min_prominence_abs: f64,
}

impl Default for OscillationSection {
    fn default() -> Self {
        Self {
            autocorrelation_cutoff: defaults::autocorrelation_cutoff(),
            damped_trough_ratio: defaults::damped_trough_ratio(),
            damped_tolerance: defaults::damped_tolerance(),
            damped_reference: defaults::damped_reference().into(),
            min_prominence_rel: defaults::min_prominence_rel(),
            min_prominence_abs: defaults::min_prominence_abs(),
        }
    }
}

/// Precision/sensitivity floors and reward shaping
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScoringSection {
    /// Minimum log10(precision)
    #[serde(default = "d_precision_floor")]
    pub precision_floor: f64,
    /// Minimum log10(sensitivity)
    #[serde(default = "d_sensitivity_floor")]
    pub sensitivity_floor: f64,
    #[serde(default = "d_tail_points")]
    pub tail_points: usize,
    /// `binary` or `continuous`
    #[serde(default = "d_reward_mode")]
    pub reward_mode: String,
    /// Mean reward a node needs before it is judged successful.
    #[serde(default = "d_success_threshold")]
    pub success_threshold: f64,
    #[serde(default = "d_require_terminal")]
    pub require_terminal: bool,
}

impl Default for ScoringSection {
    fn default() -> Self {
        Self {
            precision_floor: defaults::precision_floor(),
            sensitivity_floor: defaults::sensitivity_floor(),
            tail_points: defaults::tail_points(),
            reward_mode: defaults::reward_mode().into(),
            success_threshold: defaults::success_threshold(),
            require_terminal: defaults::require_terminal(),
        }
    }
}

// ============================================================================
// Validation
// ============================================================================

/// A configuration value outside its usable domain.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

impl CentralConfig {
    /// Check every section for values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.grammar;
        if g.components.is_empty() {
            return Err(invalid("grammar.components", "at least one component"));
        }
        if g.interactions.is_empty() {
            return Err(invalid("grammar.interactions", "at least one interaction"));
        }

        let s = &self.sampling;
        if s.pool_size == 0 || s.pool_size > u32::MAX as usize {
            return Err(invalid("sampling.pool_size", "must be in 1..=u32::MAX"));
        }
        for (field, [lo, hi]) in [
            ("sampling.rate_log_range", s.rate_log_range),
            ("sampling.threshold_log_range", s.threshold_log_range),
        ] {
            if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
                return Err(invalid(field, format!("[{lo}, {hi}] is not a range")));
            }
        }

        let d = &self.dynamics;
        if !(0.0..=1.0).contains(&d.initial_level) {
            return Err(invalid("dynamics.initial_level", "must lie in [0, 1]"));
        }
        if d.input_level <= 0.0 {
            return Err(invalid("dynamics.input_level", "must be positive"));
        }
        if d.input_increase == 0.0 {
            return Err(invalid("dynamics.input_increase", "must be non-zero"));
        }
        if d.stabilize_horizon <= 0.0 || d.eval_horizon <= 0.0 {
            return Err(invalid("dynamics", "horizons must be positive"));
        }
        if d.stabilize_points < 2 || d.eval_points < 2 {
            return Err(invalid("dynamics", "grids need at least two points"));
        }
        if d.rtol <= 0.0 || d.atol <= 0.0 {
            return Err(invalid("dynamics", "tolerances must be positive"));
        }
        if d.max_steps == 0 {
            return Err(invalid("dynamics.max_steps", "must be positive"));
        }

        let o = &self.oscillation;
        if o.damped_trough_ratio < 0.0 || o.damped_tolerance < 0.0 {
            return Err(invalid("oscillation", "damped thresholds must be >= 0"));
        }
        if !(o.min_prominence_rel >= 0.0 && o.min_prominence_abs >= 0.0) {
            return Err(invalid("oscillation", "prominence floors must be >= 0"));
        }
        if !matches!(o.damped_reference.as_str(), "post_step" | "pre_step") {
            return Err(invalid(
                "oscillation.damped_reference",
                format!("unknown reference {:?}", o.damped_reference),
            ));
        }

        let sc = &self.scoring;
        if sc.precision_floor <= 0.0 {
            return Err(invalid("scoring.precision_floor", "must be positive"));
        }
        if sc.tail_points == 0 || sc.tail_points > d.eval_points {
            return Err(invalid(
                "scoring.tail_points",
                "must be in 1..=dynamics.eval_points",
            ));
        }
        if !matches!(sc.reward_mode.as_str(), "binary" | "continuous") {
            return Err(invalid(
                "scoring.reward_mode",
                format!("unknown mode {:?}", sc.reward_mode),
            ));
        }
        Ok(())
    }
}
