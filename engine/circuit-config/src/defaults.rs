//! Default configuration values loaded from config.defaults.toml.
//!
//! This module loads defaults from the shared TOML file at compile time,
//! so the serde defaults and `Default` impls agree on every value.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    grammar: GrammarDefaults,
    sampling: SamplingDefaults,
    dynamics: DynamicsDefaults,
    oscillation: OscillationDefaults,
    scoring: ScoringDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    seed: u64,
}

#[derive(Debug, Deserialize)]
struct GrammarDefaults {
    components: Vec<String>,
    interactions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SamplingDefaults {
    pool_size: usize,
    rate_log_range: [f64; 2],
    threshold_log_range: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct DynamicsDefaults {
    initial_level: f64,
    basal_activation: f64,
    basal_inhibition: f64,
    input_level: f64,
    input_increase: f64,
    stabilize_horizon: f64,
    stabilize_points: usize,
    eval_horizon: f64,
    eval_points: usize,
    rtol: f64,
    atol: f64,
    max_steps: usize,
    max_solve_secs: f64,
}

#[derive(Debug, Deserialize)]
struct OscillationDefaults {
    autocorrelation_cutoff: f64,
    damped_trough_ratio: f64,
    damped_tolerance: f64,
    damped_reference: String,
    min_prominence_rel: f64,
    min_prominence_abs: f64,
}

#[derive(Debug, Deserialize)]
struct ScoringDefaults {
    precision_floor: f64,
    sensitivity_floor: f64,
    tail_points: usize,
    reward_mode: String,
    success_threshold: f64,
    require_terminal: bool,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn seed() -> u64 {
    DEFAULTS.common.seed
}

// Grammar
pub fn components() -> &'static [String] {
    &DEFAULTS.grammar.components
}
pub fn interactions() -> &'static [String] {
    &DEFAULTS.grammar.interactions
}

// Sampling
pub fn pool_size() -> usize {
    DEFAULTS.sampling.pool_size
}
pub fn rate_log_range() -> [f64; 2] {
    DEFAULTS.sampling.rate_log_range
}
pub fn threshold_log_range() -> [f64; 2] {
    DEFAULTS.sampling.threshold_log_range
}

// Dynamics
pub fn initial_level() -> f64 {
    DEFAULTS.dynamics.initial_level
}
pub fn basal_activation() -> f64 {
    DEFAULTS.dynamics.basal_activation
}
pub fn basal_inhibition() -> f64 {
    DEFAULTS.dynamics.basal_inhibition
}
pub fn input_level() -> f64 {
    DEFAULTS.dynamics.input_level
}
pub fn input_increase() -> f64 {
    DEFAULTS.dynamics.input_increase
}
pub fn stabilize_horizon() -> f64 {
    DEFAULTS.dynamics.stabilize_horizon
}
pub fn stabilize_points() -> usize {
    DEFAULTS.dynamics.stabilize_points
}
pub fn eval_horizon() -> f64 {
    DEFAULTS.dynamics.eval_horizon
}
pub fn eval_points() -> usize {
    DEFAULTS.dynamics.eval_points
}
pub fn rtol() -> f64 {
    DEFAULTS.dynamics.rtol
}
pub fn atol() -> f64 {
    DEFAULTS.dynamics.atol
}
pub fn max_steps() -> usize {
    DEFAULTS.dynamics.max_steps
}
pub fn max_solve_secs() -> f64 {
    DEFAULTS.dynamics.max_solve_secs
}

// Oscillation
pub fn autocorrelation_cutoff() -> f64 {
    DEFAULTS.oscillation.autocorrelation_cutoff
}
pub fn damped_trough_ratio() -> f64 {
    DEFAULTS.oscillation.damped_trough_ratio
}
pub fn damped_tolerance() -> f64 {
    DEFAULTS.oscillation.damped_tolerance
}
pub fn damped_reference() -> &'static str {
    &DEFAULTS.oscillation.damped_reference
}
pub fn min_prominence_rel() -> f64 {
    DEFAULTS.oscillation.min_prominence_rel
}
pub fn min_prominence_abs() -> f64 {
    DEFAULTS.oscillation.min_prominence_abs
}

// Scoring
pub fn precision_floor() -> f64 {
    DEFAULTS.scoring.precision_floor
}
pub fn sensitivity_floor() -> f64 {
    DEFAULTS.scoring.sensitivity_floor
}
pub fn tail_points() -> usize {
    DEFAULTS.scoring.tail_points
}
pub fn reward_mode() -> &'static str {
    &DEFAULTS.scoring.reward_mode
}
pub fn success_threshold() -> f64 {
    DEFAULTS.scoring.success_threshold
}
pub fn require_terminal() -> bool {
    DEFAULTS.scoring.require_terminal
}
