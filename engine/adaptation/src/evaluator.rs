//! Reward interface for the search engine.
//!
//! The engine hands over topology states and visit numbers and gets back a
//! reward. It keeps its own per-state statistics and asks `judge` whether a
//! state has proven itself.

use crate::context::{ContextError, EvaluationContext};
use crate::pipeline::{AdaptationPipeline, Outcome, ScreenError, ScreenSummary};
use crate::stats::{EvaluationStats, SuccessLog};
use circuit_config::CentralConfig;
use circuit_core::{TopologyError, TopologyId};
use circuit_dynamics::DynamicsError;
use circuit_params::ParamsError;
use std::ops::Range;
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

/// Errors that prevent a reward from being computed at all.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RewardError {
    #[error("Invalid state: {0}")]
    Topology(#[from] TopologyError),

    #[error("Parameter lookup failed: {0}")]
    Params(#[from] ParamsError),

    #[error("Simulation setup failed: {0}")]
    Dynamics(#[from] DynamicsError),
}

impl From<ScreenError> for RewardError {
    fn from(e: ScreenError) -> Self {
        match e {
            ScreenError::Params(e) => e.into(),
            ScreenError::Dynamics(e) => e.into(),
        }
    }
}

/// Result of evaluating one state.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub topology: TopologyId,
    /// Canonical string of the evaluated topology.
    pub canonical: String,
    pub visit: u64,
    /// Pool slot used; `None` when nothing was simulated.
    pub slot: Option<usize>,
    pub outcome: Outcome,
    /// Reward for the engine, in `[0, 1]`.
    pub reward: f64,
}

/// Engine-owned running totals for one state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AggregatedStats {
    /// Sum of rewards received.
    pub reward: f64,
    pub visits: u64,
}

/// Trait for reward sources.
pub trait RewardEvaluator: Send + Sync {
    /// Reward for the `visit`-th evaluation of `state`.
    ///
    /// A pure function of state, visit, seed and configuration.
    fn evaluate(&self, state: &str, visit: u64) -> Result<Evaluation, RewardError>;

    /// Whether the engine's statistics for `state` count as a success.
    fn judge(&self, state: &str, stats: AggregatedStats) -> bool;

    /// Evaluate several requests.
    /// Default implementation calls evaluate() in a loop.
    fn evaluate_batch(&self, requests: &[(&str, u64)]) -> Result<Vec<Evaluation>, RewardError> {
        requests
            .iter()
            .map(|&(state, visit)| self.evaluate(state, visit))
            .collect()
    }
}

/// Rewards from simulating adaptation circuits.
#[derive(Debug)]
pub struct AdaptationEvaluator {
    context: EvaluationContext,
    pipeline: AdaptationPipeline,
    stats: EvaluationStats,
    successes: SuccessLog,
}

impl AdaptationEvaluator {
    pub fn new(context: EvaluationContext) -> Self {
        let pipeline = AdaptationPipeline::from_context(&context);
        Self {
            context,
            pipeline,
            stats: EvaluationStats::new(),
            successes: SuccessLog::new(),
        }
    }

    pub fn from_config(config: &CentralConfig) -> Result<Self, ContextError> {
        Ok(Self::new(EvaluationContext::from_config(config)?))
    }

    pub fn context(&self) -> &EvaluationContext {
        &self.context
    }

    pub fn pipeline(&self) -> &AdaptationPipeline {
        &self.pipeline
    }

    pub fn stats(&self) -> &EvaluationStats {
        &self.stats
    }

    pub fn successes(&self) -> &SuccessLog {
        &self.successes
    }

    /// Evaluate `state` at its next visit number.
    pub fn evaluate_next(&self, state: &str) -> Result<Evaluation, RewardError> {
        let canonical = self.context.topologies().canonicalize(state)?;
        let visit = self.context.visits().next(canonical.id)?;
        self.evaluate_id(canonical.id, visit)
    }

    /// Run `state` against a range of pool slots, bypassing the index table.
    pub fn screen(&self, state: &str, slots: Range<usize>) -> Result<ScreenSummary, RewardError> {
        let id = self.context.topologies().canonicalize(state)?.id;
        let topology = self.member(id)?;
        let species = AdaptationPipeline::species_for(topology).max(1);
        let pool = self.context.pools().pool(species)?;
        let summary = self.pipeline.screen(topology, pool, slots)?;
        for &slot in &summary.successful_slots {
            self.successes.record(id, slot);
        }
        Ok(summary)
    }

    fn member(&self, id: TopologyId) -> Result<&circuit_core::Topology, RewardError> {
        let topologies = self.context.topologies();
        topologies.get(id).ok_or_else(|| {
            TopologyError::CanonicalizationMiss(format!("#{}", id.0)).into()
        })
    }

    fn evaluate_id(&self, id: TopologyId, visit: u64) -> Result<Evaluation, RewardError> {
        let topology = self.member(id)?;
        let start = Instant::now();

        let (slot, outcome, reward) = if topology.has_signal_path() {
            let slot = self.context.table().slot(id, visit)?;
            let species = AdaptationPipeline::species_for(topology);
            let params = self.context.pools().get(species, slot)?;
            let run = self.pipeline.run(topology, params)?;
            (Some(slot), run.outcome, run.reward)
        } else {
            (None, Outcome::NoSignalPath, 0.0)
        };

        self.stats.record(&outcome, start.elapsed());
        if let (true, Some(slot)) = (outcome.is_adapted(), slot) {
            self.successes.record(id, slot);
        }

        let canonical = topology.to_string();
        debug!(
            state = %canonical,
            visit,
            slot,
            outcome = outcome.label(),
            reward,
            "Evaluated topology"
        );
        Ok(Evaluation {
            topology: id,
            canonical,
            visit,
            slot,
            outcome,
            reward,
        })
    }
}

impl RewardEvaluator for AdaptationEvaluator {
    fn evaluate(&self, state: &str, visit: u64) -> Result<Evaluation, RewardError> {
        let canonical = self.context.topologies().canonicalize(state)?;
        self.evaluate_id(canonical.id, visit)
    }

    fn judge(&self, state: &str, stats: AggregatedStats) -> bool {
        if stats.visits == 0 {
            return false;
        }
        let scoring = self.context.scoring();
        let mean = stats.reward / stats.visits as f64;
        if !(mean >= scoring.success_threshold) {
            return false;
        }
        if scoring.require_terminal {
            return self
                .context
                .topologies()
                .canonicalize(state)
                .map(|c| c.terminal)
                .unwrap_or(false);
        }
        true
    }
}
