//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::Path;
use tracing::{debug, info, warn};

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",    // Current directory
    "../config.toml", // Parent directory (when running from subdirectory)
];

/// Load the central configuration from config.toml.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by ADAPT_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> CentralConfig {
    if let Ok(path) = std::env::var("ADAPT_CONFIG") {
        let path = Path::new(&path);
        if path.exists() {
            info!("Loading config from ADAPT_CONFIG: {}", path.display());
            return load_from_path(path);
        }
        warn!("ADAPT_CONFIG={} not found, searching defaults", path.display());
    }

    for path_str in CONFIG_SEARCH_PATHS {
        let path = Path::new(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(path);
        }
    }

    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load configuration from a specific path.
pub fn load_from_path(path: &Path) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u64, f64, bool, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = v;
        }
    };
    // Comma-separated list of strings
    ($config:expr, $section:ident . $field:ident, $key:expr, list) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
    };
    // Two comma-separated floats, "lo,hi"
    ($config:expr, $section:ident . $field:ident, $key:expr, range) => {
        if let Some(v) = std::env::var($key).ok().and_then(|s| parse_range(&s)) {
            $config.$section.$field = v;
        }
    };
}

fn parse_range(s: &str) -> Option<[f64; 2]> {
    let (lo, hi) = s.split_once(',')?;
    Some([lo.trim().parse().ok()?, hi.trim().parse().ok()?])
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: ADAPT_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.seed, "ADAPT_COMMON_SEED", parse);

    // Grammar
    env_override!(config, grammar.components, "ADAPT_GRAMMAR_COMPONENTS", list);
    env_override!(
        config,
        grammar.interactions,
        "ADAPT_GRAMMAR_INTERACTIONS",
        list
    );

    // Sampling
    env_override!(
        config,
        sampling.pool_size,
        "ADAPT_SAMPLING_POOL_SIZE",
        parse
    );
    env_override!(
        config,
        sampling.rate_log_range,
        "ADAPT_SAMPLING_RATE_LOG_RANGE",
        range
    );
    env_override!(
        config,
        sampling.threshold_log_range,
        "ADAPT_SAMPLING_THRESHOLD_LOG_RANGE",
        range
    );

    // Dynamics
    env_override!(
        config,
        dynamics.initial_level,
        "ADAPT_DYNAMICS_INITIAL_LEVEL",
        parse
    );
    env_override!(
        config,
        dynamics.basal_activation,
        "ADAPT_DYNAMICS_BASAL_ACTIVATION",
        parse
    );
    env_override!(
        config,
        dynamics.basal_inhibition,
        "ADAPT_DYNAMICS_BASAL_INHIBITION",
        parse
    );
    env_override!(
        config,
        dynamics.input_level,
        "ADAPT_DYNAMICS_INPUT_LEVEL",
        parse
    );
    env_override!(
        config,
        dynamics.input_increase,
        "ADAPT_DYNAMICS_INPUT_INCREASE",
        parse
    );
    env_override!(
        config,
        dynamics.stabilize_horizon,
        "ADAPT_DYNAMICS_STABILIZE_HORIZON",
        parse
    );
    env_override!(
        config,
        dynamics.stabilize_points,
        "ADAPT_DYNAMICS_STABILIZE_POINTS",
        parse
    );
    env_override!(
        config,
        dynamics.eval_horizon,
        "ADAPT_DYNAMICS_EVAL_HORIZON",
        parse
    );
    env_override!(
        config,
        dynamics.eval_points,
        "ADAPT_DYNAMICS_EVAL_POINTS",
        parse
    );
    env_override!(config, dynamics.rtol, "ADAPT_DYNAMICS_RTOL", parse);
    env_override!(config, dynamics.atol, "ADAPT_DYNAMICS_ATOL", parse);
    env_override!(
        config,
        dynamics.max_steps,
        "ADAPT_DYNAMICS_MAX_STEPS",
        parse
    );
    env_override!(
        config,
        dynamics.max_solve_secs,
        "ADAPT_DYNAMICS_MAX_SOLVE_SECS",
        parse
    );

    // Oscillation
    env_override!(
        config,
        oscillation.autocorrelation_cutoff,
        "ADAPT_OSCILLATION_AUTOCORRELATION_CUTOFF",
        parse
    );
    env_override!(
        config,
        oscillation.damped_trough_ratio,
        "ADAPT_OSCILLATION_DAMPED_TROUGH_RATIO",
        parse
    );
    env_override!(
        config,
        oscillation.damped_tolerance,
        "ADAPT_OSCILLATION_DAMPED_TOLERANCE",
        parse
    );
    env_override!(
        config,
        oscillation.damped_reference,
        "ADAPT_OSCILLATION_DAMPED_REFERENCE"
    );
    env_override!(
        config,
        oscillation.min_prominence_rel,
        "ADAPT_OSCILLATION_MIN_PROMINENCE_REL",
        parse
    );
    env_override!(
        config,
        oscillation.min_prominence_abs,
        "ADAPT_OSCILLATION_MIN_PROMINENCE_ABS",
        parse
    );

    // Scoring
    env_override!(
        config,
        scoring.precision_floor,
        "ADAPT_SCORING_PRECISION_FLOOR",
        parse
    );
    env_override!(
        config,
        scoring.sensitivity_floor,
        "ADAPT_SCORING_SENSITIVITY_FLOOR",
        parse
    );
    env_override!(
        config,
        scoring.tail_points,
        "ADAPT_SCORING_TAIL_POINTS",
        parse
    );
    env_override!(config, scoring.reward_mode, "ADAPT_SCORING_REWARD_MODE");
    env_override!(
        config,
        scoring.success_threshold,
        "ADAPT_SCORING_SUCCESS_THRESHOLD",
        parse
    );
    env_override!(
        config,
        scoring.require_terminal,
        "ADAPT_SCORING_REQUIRE_TERMINAL",
        parse
    );

    config
}
