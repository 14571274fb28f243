//! Shared, read-mostly state of one search run.

use crate::config::{DampedReference, OscillationConfig, RewardMode, ScoringConfig};
use circuit_config::{CentralConfig, ConfigError};
use circuit_core::{Grammar, TopologyError, TopologySet};
use circuit_dynamics::{DynamicsConfig, SolverConfig, TimeGrid};
use circuit_params::{IndexTable, ParameterPools, ParamsError, SamplingConfig, VisitCounter};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Errors raised while building an [`EvaluationContext`].
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid grammar: {0}")]
    Topology(#[from] TopologyError),

    #[error("parameter sampling failed: {0}")]
    Params(#[from] ParamsError),

    #[error("{field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Everything an evaluation reads: the topology set, parameter pools, index
/// table and run settings. Only the visit counters change after construction.
#[derive(Debug)]
pub struct EvaluationContext {
    seed: u64,
    topologies: TopologySet,
    pools: ParameterPools,
    table: IndexTable,
    visits: VisitCounter,
    dynamics: DynamicsConfig,
    oscillation: OscillationConfig,
    scoring: ScoringConfig,
}

impl EvaluationContext {
    /// Enumerate the grammar and draw every pool up front.
    ///
    /// Pools are drawn for every network size up to the number of
    /// components, since a topology may use any subset of them.
    pub fn new(
        grammar: Grammar,
        sampling: &SamplingConfig,
        dynamics: DynamicsConfig,
        oscillation: OscillationConfig,
        scoring: ScoringConfig,
        seed: u64,
    ) -> Result<Self, ContextError> {
        let max_species = grammar.len();
        let topologies = TopologySet::enumerate(grammar)?;
        let pools = ParameterPools::generate(max_species, sampling, seed)?;
        let table = IndexTable::new(topologies.len(), sampling.pool_size, seed)?;
        let visits = VisitCounter::new(topologies.len());

        info!(
            topologies = topologies.len(),
            max_species,
            pool_size = sampling.pool_size,
            seed,
            "Evaluation context ready"
        );
        Ok(Self {
            seed,
            topologies,
            pools,
            table,
            visits,
            dynamics,
            oscillation,
            scoring,
        })
    }

    /// Validate a loaded configuration and build the context from it.
    pub fn from_config(config: &CentralConfig) -> Result<Self, ContextError> {
        config.validate()?;

        let grammar = Grammar::from_names(&config.grammar.components, &config.grammar.interactions)?;

        let s = &config.sampling;
        let sampling = SamplingConfig::default()
            .with_pool_size(s.pool_size)
            .with_ranges(s.rate_log_range, s.threshold_log_range);

        let d = &config.dynamics;
        let max_wall = if d.max_solve_secs > 0.0 {
            Duration::try_from_secs_f64(d.max_solve_secs).ok()
        } else {
            None
        };
        let dynamics = DynamicsConfig {
            initial_level: d.initial_level,
            basal_activation: d.basal_activation,
            basal_inhibition: d.basal_inhibition,
            input_level: d.input_level,
            input_increase: d.input_increase,
            stabilize: TimeGrid::new(d.stabilize_horizon, d.stabilize_points),
            eval: TimeGrid::new(d.eval_horizon, d.eval_points),
            solver: SolverConfig {
                rtol: d.rtol,
                atol: d.atol,
                max_steps: d.max_steps,
                max_wall,
            },
        };

        let o = &config.oscillation;
        let oscillation = OscillationConfig {
            autocorrelation_cutoff: o.autocorrelation_cutoff,
            damped_trough_ratio: o.damped_trough_ratio,
            damped_tolerance: o.damped_tolerance,
            damped_reference: o
                .damped_reference
                .parse::<DampedReference>()
                .map_err(|reason| ContextError::Invalid {
                    field: "oscillation.damped_reference",
                    reason,
                })?,
            min_prominence_rel: o.min_prominence_rel,
            min_prominence_abs: o.min_prominence_abs,
        };

        let sc = &config.scoring;
        let scoring = ScoringConfig {
            precision_floor: sc.precision_floor,
            sensitivity_floor: sc.sensitivity_floor,
            tail_points: sc.tail_points,
            reward_mode: sc
                .reward_mode
                .parse::<RewardMode>()
                .map_err(|reason| ContextError::Invalid {
                    field: "scoring.reward_mode",
                    reason,
                })?,
            success_threshold: sc.success_threshold,
            require_terminal: sc.require_terminal,
        };

        Self::new(
            grammar,
            &sampling,
            dynamics,
            oscillation,
            scoring,
            config.common.seed,
        )
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn topologies(&self) -> &TopologySet {
        &self.topologies
    }

    pub fn pools(&self) -> &ParameterPools {
        &self.pools
    }

    pub fn table(&self) -> &IndexTable {
        &self.table
    }

    pub fn visits(&self) -> &VisitCounter {
        &self.visits
    }

    pub fn dynamics(&self) -> &DynamicsConfig {
        &self.dynamics
    }

    pub fn oscillation(&self) -> &OscillationConfig {
        &self.oscillation
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let mut config = CentralConfig::default();
        config.grammar.components = vec!["A".into(), "O".into()];
        config.sampling.pool_size = 16;
        config.scoring.reward_mode = "binary".into();
        config.oscillation.damped_reference = "post_step".into();
        config.oscillation.min_prominence_rel = 1e-3;
        config.dynamics.max_solve_secs = 0.0;

        let ctx = EvaluationContext::from_config(&config).unwrap();
        // 76 connected topologies plus the empty one.
        assert_eq!(ctx.topologies().len(), 77);
        assert_eq!(ctx.pools().max_species(), 2);
        assert_eq!(ctx.table().len(), 77);
        assert_eq!(ctx.table().pool_size(), 16);
        assert_eq!(ctx.scoring().reward_mode, RewardMode::Binary);
        assert_eq!(
            ctx.oscillation().damped_reference,
            DampedReference::PostStep
        );
        assert_eq!(ctx.oscillation().min_prominence_rel, 1e-3);
        assert_eq!(ctx.oscillation().min_prominence_abs, 1e-9);
        assert_eq!(ctx.dynamics().solver.max_wall, None);
        assert_eq!(ctx.dynamics().eval.points, 10_000);
        assert_eq!(ctx.seed(), config.common.seed);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = CentralConfig::default();
        config.sampling.pool_size = 0;
        assert!(matches!(
            EvaluationContext::from_config(&config),
            Err(ContextError::Config(_))
        ));

        let mut config = CentralConfig::default();
        config.grammar.components = vec!["A".into(), "AB".into()];
        config.sampling.pool_size = 4;
        assert!(matches!(
            EvaluationContext::from_config(&config),
            Err(ContextError::Topology(_))
        ));
    }
}
