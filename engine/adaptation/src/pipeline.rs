//! From topology and parameter set to a classified step response.
//!
//! A run compiles the topology, relaxes it at the baseline input, applies
//! the sustained gate, steps the input, applies the damped gate and scores
//! the output. Topologies without a directed input-to-output path are never
//! integrated.

use crate::config::{DampedReference, OscillationConfig, ScoringConfig};
use crate::context::EvaluationContext;
use crate::oscillation::{self, DampedVerdict};
use crate::scoring::{Score, ScoreError};
use circuit_core::Topology;
use circuit_dynamics::{
    DynamicsConfig, DynamicsError, RegulatoryNetwork, SolveError, Simulator, Trajectory,
};
use circuit_params::{ParameterPool, ParameterSet, ParamsError};
use std::ops::Range;
use thiserror::Error;
use tracing::{debug, warn};

/// Why a run produced no usable score.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NumericalFailure {
    #[error("integration failed: {0}")]
    Solve(#[from] SolveError),

    #[error("scoring failed: {0}")]
    Score(#[from] ScoreError),
}

/// Classification of one run.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Both floors reached.
    Adapted(Score),
    /// Scored, but below at least one floor.
    NotAdapted(Score),
    /// Phase 1 oscillates; phase 2 was not run.
    SustainedOscillation { min_autocorrelation: f64 },
    /// Phase 2 rings around its steady state.
    DampedOscillation { overshoot: f64, trough_gap: f64 },
    /// No directed path from input to output.
    NoSignalPath,
    NumericalFailure(NumericalFailure),
}

impl Outcome {
    /// Reward of this outcome; only scored outcomes can be non-zero.
    pub fn reward(&self, scoring: &ScoringConfig) -> f64 {
        match self {
            Outcome::Adapted(score) | Outcome::NotAdapted(score) => score.reward(scoring),
            _ => 0.0,
        }
    }

    pub fn is_adapted(&self) -> bool {
        matches!(self, Outcome::Adapted(_))
    }

    pub fn score(&self) -> Option<&Score> {
        match self {
            Outcome::Adapted(score) | Outcome::NotAdapted(score) => Some(score),
            _ => None,
        }
    }

    /// Short name for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Adapted(_) => "adapted",
            Outcome::NotAdapted(_) => "not_adapted",
            Outcome::SustainedOscillation { .. } => "sustained_oscillation",
            Outcome::DampedOscillation { .. } => "damped_oscillation",
            Outcome::NoSignalPath => "no_signal_path",
            Outcome::NumericalFailure(_) => "numerical_failure",
        }
    }
}

/// Outcome of one run together with the trajectories it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub outcome: Outcome,
    pub reward: f64,
    /// Phase 1, if it was integrated successfully.
    pub stabilize: Option<Trajectory>,
    /// Phase 2, if it was integrated successfully.
    pub eval: Option<Trajectory>,
}

/// Aggregate of [`AdaptationPipeline::screen`] over a range of pool slots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenSummary {
    pub evaluated: usize,
    pub adapted: usize,
    pub not_adapted: usize,
    pub sustained: usize,
    pub damped: usize,
    pub no_signal_path: usize,
    pub numerical_failures: usize,
    /// Largest `log10(precision)` among scored slots.
    pub best_log_precision: Option<f64>,
    /// Largest `log10(sensitivity)` among scored slots.
    pub best_log_sensitivity: Option<f64>,
    /// Slots that adapted, ascending.
    pub successful_slots: Vec<usize>,
}

impl ScreenSummary {
    fn add(&mut self, slot: usize, outcome: &Outcome) {
        self.evaluated += 1;
        match outcome {
            Outcome::Adapted(_) => {
                self.adapted += 1;
                self.successful_slots.push(slot);
            }
            Outcome::NotAdapted(_) => self.not_adapted += 1,
            Outcome::SustainedOscillation { .. } => self.sustained += 1,
            Outcome::DampedOscillation { .. } => self.damped += 1,
            Outcome::NoSignalPath => self.no_signal_path += 1,
            Outcome::NumericalFailure(_) => self.numerical_failures += 1,
        }
        if let Some(score) = outcome.score() {
            let best = |current: Option<f64>, v: f64| Some(current.map_or(v, |c| c.max(v)));
            self.best_log_precision = best(self.best_log_precision, score.log_precision());
            self.best_log_sensitivity = best(self.best_log_sensitivity, score.log_sensitivity());
        }
    }
}

/// Errors that abort a screen.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScreenError {
    #[error(transparent)]
    Params(#[from] ParamsError),

    #[error(transparent)]
    Dynamics(#[from] DynamicsError),
}

/// Simulation plus both gates plus scoring, for fixed settings.
#[derive(Debug, Clone)]
pub struct AdaptationPipeline {
    simulator: Simulator,
    oscillation: OscillationConfig,
    scoring: ScoringConfig,
}

impl AdaptationPipeline {
    pub fn new(
        dynamics: DynamicsConfig,
        oscillation: OscillationConfig,
        scoring: ScoringConfig,
    ) -> Self {
        Self {
            simulator: Simulator::new(dynamics),
            oscillation,
            scoring,
        }
    }

    /// Pipeline with the settings of `context`.
    pub fn from_context(context: &EvaluationContext) -> Self {
        Self::new(
            context.dynamics().clone(),
            context.oscillation().clone(),
            context.scoring().clone(),
        )
    }

    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    /// Number of species a topology is simulated with, which selects its pool.
    pub fn species_for(topology: &Topology) -> usize {
        circuit_core::SpeciesMap::active(topology).len()
    }

    /// Run one parameter set.
    ///
    /// Integrator and scoring failures become [`Outcome::NumericalFailure`];
    /// a parameter set of the wrong size is an error.
    pub fn run(&self, topology: &Topology, params: &ParameterSet) -> Result<Run, DynamicsError> {
        let finish = |outcome: Outcome, stabilize: Option<Trajectory>, eval: Option<Trajectory>| {
            let reward = outcome.reward(&self.scoring);
            Run {
                outcome,
                reward,
                stabilize,
                eval,
            }
        };

        if !topology.has_signal_path() {
            return Ok(finish(Outcome::NoSignalPath, None, None));
        }
        let network = RegulatoryNetwork::growing(topology)?;
        let Some(output) = network.output() else {
            return Ok(finish(Outcome::NoSignalPath, None, None));
        };

        let stabilize = match self.simulator.stabilize(&network, params) {
            Ok(traj) => traj,
            Err(DynamicsError::Solve(e)) => {
                warn!(topology = %topology, phase = "stabilize", error = %e, "Solve failed");
                return Ok(finish(Outcome::NumericalFailure(e.into()), None, None));
            }
            Err(e) => return Err(e),
        };

        let sustained = oscillation::sustained(&stabilize, &self.oscillation);
        if sustained.oscillating {
            let outcome = Outcome::SustainedOscillation {
                min_autocorrelation: sustained.min_autocorrelation,
            };
            return Ok(finish(outcome, Some(stabilize), None));
        }

        let eval = match self.simulator.step(&network, params, &stabilize) {
            Ok(traj) => traj,
            Err(DynamicsError::Solve(e)) => {
                warn!(topology = %topology, phase = "step", error = %e, "Solve failed");
                return Ok(finish(
                    Outcome::NumericalFailure(e.into()),
                    Some(stabilize),
                    None,
                ));
            }
            Err(e) => return Err(e),
        };

        let response = eval.series(output);
        let reference = match self.oscillation.damped_reference {
            DampedReference::PostStep => response.last(),
            DampedReference::PreStep => stabilize.series(output).last(),
        }
        .copied()
        .unwrap_or(f64::NAN);
        if let DampedVerdict::Rings {
            overshoot,
            trough_gap,
        } = oscillation::damped(response, reference, &self.oscillation)
        {
            let outcome = Outcome::DampedOscillation {
                overshoot,
                trough_gap,
            };
            return Ok(finish(outcome, Some(stabilize), Some(eval)));
        }

        let outcome = match Score::measure(
            &stabilize,
            &eval,
            output,
            self.simulator.inputs(),
            self.scoring.tail_points,
        ) {
            Ok(score) if score.is_success(&self.scoring) => Outcome::Adapted(score),
            Ok(score) => Outcome::NotAdapted(score),
            Err(e) => Outcome::NumericalFailure(e.into()),
        };
        Ok(finish(outcome, Some(stabilize), Some(eval)))
    }

    /// Run every slot in `slots` of `pool` against one topology.
    pub fn screen(
        &self,
        topology: &Topology,
        pool: &ParameterPool,
        slots: Range<usize>,
    ) -> Result<ScreenSummary, ScreenError> {
        let mut summary = ScreenSummary::default();
        for slot in slots {
            let params = pool.get(slot)?;
            let run = self.run(topology, params)?;
            summary.add(slot, &run.outcome);
        }
        debug!(
            topology = %topology,
            evaluated = summary.evaluated,
            adapted = summary.adapted,
            "Screened topology"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RewardMode;
    use circuit_core::Sign;
    use circuit_dynamics::SolverConfig;
    use circuit_params::SamplingConfig;

    /// Three-node inhibition ring tuned onto a limit cycle.
    fn ring_oscillator() -> (Topology, ParameterSet) {
        let topology = "ABO::ABi_BOi_OAi".parse().unwrap();
        let params = ParameterSet::uniform(3, 1.0, 1.0)
            .with_entry(Sign::Activates, 0, 3, 3.6, 21.0)
            .with_entry(Sign::Activates, 1, 3, 4.7, 99.0)
            .with_entry(Sign::Activates, 2, 3, 0.37, 0.74)
            .with_entry(Sign::Inhibits, 0, 2, 3.9, 0.82)
            .with_entry(Sign::Inhibits, 1, 0, 2.0, 1.5)
            .with_entry(Sign::Inhibits, 2, 1, 1.3, 0.001);
        (topology, params)
    }

    /// Negative feedback loop with a buffer node.
    fn feedback_adapter() -> (Topology, ParameterSet) {
        let topology = "ABO::AOa_BOi_OBa".parse().unwrap();
        let params = ParameterSet::uniform(3, 1.0, 1.0)
            .with_entry(Sign::Activates, 0, 3, 10.0, 10.0)
            .with_entry(Sign::Inhibits, 0, 3, 0.5, 0.01)
            .with_entry(Sign::Activates, 2, 0, 10.0, 0.1)
            .with_entry(Sign::Inhibits, 2, 1, 10.0, 0.1)
            .with_entry(Sign::Activates, 1, 2, 0.1, 0.001)
            .with_entry(Sign::Inhibits, 1, 3, 0.1, 0.001);
        (topology, params)
    }

    fn pipeline() -> AdaptationPipeline {
        AdaptationPipeline::new(
            DynamicsConfig::default(),
            OscillationConfig::default(),
            ScoringConfig::default(),
        )
    }

    #[test]
    fn test_ring_oscillator_is_rejected_before_step() {
        let (topology, params) = ring_oscillator();
        let run = pipeline().run(&topology, &params).unwrap();
        match run.outcome {
            Outcome::SustainedOscillation {
                min_autocorrelation,
            } => assert!(min_autocorrelation < -0.9, "{min_autocorrelation}"),
            other => panic!("expected sustained oscillation, got {other:?}"),
        }
        assert_eq!(run.reward, 0.0);
        assert!(run.stabilize.is_some());
        assert!(run.eval.is_none());
    }

    #[test]
    fn test_feedback_adapter_is_accepted() {
        let (topology, params) = feedback_adapter();
        let run = pipeline().run(&topology, &params).unwrap();
        let score = match &run.outcome {
            Outcome::Adapted(score) => *score,
            other => panic!("expected adaptation, got {other:?}"),
        };
        assert!(score.log_precision() >= 1.0, "{score:?}");
        assert!(score.log_sensitivity() >= 0.0, "{score:?}");
        assert_eq!(run.reward, 1.0);

        let binary = AdaptationPipeline::new(
            DynamicsConfig::default(),
            OscillationConfig::default(),
            ScoringConfig::default().with_reward_mode(RewardMode::Binary),
        );
        assert_eq!(binary.run(&topology, &params).unwrap().reward, 1.0);

        let post_step = AdaptationPipeline::new(
            DynamicsConfig::default(),
            OscillationConfig::default().with_reference(DampedReference::PostStep),
            ScoringConfig::default(),
        );
        assert!(post_step.run(&topology, &params).unwrap().outcome.is_adapted());
    }

    #[test]
    fn test_runs_are_bit_identical() {
        let (topology, params) = feedback_adapter();
        let p = AdaptationPipeline::new(
            DynamicsConfig::for_testing(),
            OscillationConfig::default(),
            ScoringConfig::default(),
        );
        let first = p.run(&topology, &params).unwrap();
        let second = p.run(&topology, &params).unwrap();
        assert_eq!(first.reward.to_bits(), second.reward.to_bits());
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_signal_path_skips_integration() {
        let p = pipeline();
        // Parameters of the wrong size would be rejected if integration ran.
        let params = ParameterSet::uniform(1, 1.0, 1.0);
        for state in ["ABO::OAa", "ABO::", "ABO::ABa_BAi"] {
            let topology: Topology = state.parse().unwrap();
            let run = p.run(&topology, &params).unwrap();
            assert_eq!(run.outcome, Outcome::NoSignalPath, "{state}");
            assert_eq!(run.reward, 0.0);
            assert!(run.stabilize.is_none());
        }
    }

    #[test]
    fn test_wrong_parameter_size_is_fatal() {
        let (topology, _) = feedback_adapter();
        let err = pipeline()
            .run(&topology, &ParameterSet::uniform(2, 1.0, 1.0))
            .unwrap_err();
        assert_eq!(
            err,
            DynamicsError::DimensionMismatch {
                network: 3,
                params: 2
            }
        );
    }

    #[test]
    fn test_solver_failure_is_an_outcome() {
        let (topology, params) = feedback_adapter();
        let p = AdaptationPipeline::new(
            DynamicsConfig::for_testing()
                .with_solver(SolverConfig::default().with_max_steps(5)),
            OscillationConfig::default(),
            ScoringConfig::default(),
        );
        let run = p.run(&topology, &params).unwrap();
        assert!(matches!(
            run.outcome,
            Outcome::NumericalFailure(NumericalFailure::Solve(SolveError::StepLimit { .. }))
        ));
        assert_eq!(run.reward, 0.0);
    }

    #[test]
    fn test_screen_summary() {
        let (topology, _) = feedback_adapter();
        let pool = ParameterPool::generate(3, &SamplingConfig::for_testing().with_pool_size(6), 11)
            .unwrap();
        let p = AdaptationPipeline::new(
            DynamicsConfig::for_testing(),
            OscillationConfig::default(),
            ScoringConfig::default(),
        );
        let summary = p.screen(&topology, &pool, 0..6).unwrap();
        assert_eq!(summary.evaluated, 6);
        let classified = summary.adapted
            + summary.not_adapted
            + summary.sustained
            + summary.damped
            + summary.no_signal_path
            + summary.numerical_failures;
        assert_eq!(classified, 6);
        assert_eq!(summary.successful_slots.len(), summary.adapted);
        assert_eq!(summary.no_signal_path, 0);

        assert!(matches!(
            p.screen(&topology, &pool, 5..7),
            Err(ScreenError::Params(ParamsError::SlotOutOfRange { .. }))
        ));
    }
}
