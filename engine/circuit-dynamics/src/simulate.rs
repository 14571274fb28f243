//! Two-phase step-response simulation.
//!
//! Phase 1 (`stabilize`) integrates from the uniform initial level at the
//! baseline input over a long horizon. Phase 2 (`step`) continues from the
//! final phase-1 state at the raised input over a shorter horizon. Callers
//! that gate on phase 1 can run the phases separately.

use crate::config::DynamicsConfig;
use crate::error::DynamicsError;
use crate::kinetics::{Kinetics, Levels};
use crate::network::RegulatoryNetwork;
use crate::solver::{Rosenbrock23, SolveStats};
use crate::trajectory::Trajectory;
use circuit_params::ParameterSet;
use tracing::debug;

/// Both phases of one simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationTrace {
    pub stabilize: Trajectory,
    pub eval: Trajectory,
    /// `(I_1, I_2)`
    pub inputs: (f64, f64),
}

#[derive(Debug, Clone)]
pub struct Simulator {
    config: DynamicsConfig,
    solver: Rosenbrock23,
}

impl Simulator {
    pub fn new(config: DynamicsConfig) -> Self {
        let solver = Rosenbrock23::new(config.solver.clone());
        Self { config, solver }
    }

    pub fn config(&self) -> &DynamicsConfig {
        &self.config
    }

    /// Input levels of the two phases.
    pub fn inputs(&self) -> (f64, f64) {
        self.config.input_levels()
    }

    fn levels(&self, input: f64) -> Levels {
        Levels {
            input,
            basal_activation: self.config.basal_activation,
            basal_inhibition: self.config.basal_inhibition,
        }
    }

    fn integrate(
        &self,
        network: &RegulatoryNetwork,
        params: &ParameterSet,
        input: f64,
        from: &[f64],
        times: Vec<f64>,
    ) -> Result<(Trajectory, SolveStats), DynamicsError> {
        let n = network.species_count();
        if n == 0 {
            return Err(DynamicsError::NoSpecies);
        }
        if from.len() != n {
            return Err(DynamicsError::StateLength {
                expected: n,
                found: from.len(),
            });
        }
        let kinetics = Kinetics::new(network, params, self.levels(input))?;
        Ok(self.solver.solve(&kinetics, from, times)?)
    }

    /// Phase 1: relax from the initial level at the baseline input.
    pub fn stabilize(
        &self,
        network: &RegulatoryNetwork,
        params: &ParameterSet,
    ) -> Result<Trajectory, DynamicsError> {
        let start = vec![self.config.initial_level; network.species_count()];
        let (traj, stats) = self.integrate(
            network,
            params,
            self.config.input_level,
            &start,
            self.config.stabilize.times(),
        )?;
        debug!(
            phase = "stabilize",
            accepted = stats.accepted,
            rejected = stats.rejected,
            "Integrated phase"
        );
        Ok(traj)
    }

    /// Phase 2: apply the input step starting from the end of phase 1.
    pub fn step(
        &self,
        network: &RegulatoryNetwork,
        params: &ParameterSet,
        stabilized: &Trajectory,
    ) -> Result<Trajectory, DynamicsError> {
        let (_, stepped) = self.inputs();
        let (traj, stats) = self.integrate(
            network,
            params,
            stepped,
            &stabilized.final_state(),
            self.config.eval.times(),
        )?;
        debug!(
            phase = "step",
            accepted = stats.accepted,
            rejected = stats.rejected,
            "Integrated phase"
        );
        Ok(traj)
    }

    /// Both phases back to back.
    pub fn run(
        &self,
        network: &RegulatoryNetwork,
        params: &ParameterSet,
    ) -> Result<SimulationTrace, DynamicsError> {
        let stabilize = self.stabilize(network, params)?;
        let eval = self.step(network, params, &stabilize)?;
        Ok(SimulationTrace {
            stabilize,
            eval,
            inputs: self.inputs(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SolverConfig, TimeGrid};
    use circuit_core::Topology;

    #[test]
    fn test_single_species_reaches_basal_balance() {
        // No edges: input drive against basal decay, both with k = K = 1.
        // Steady state solves 0.5 (1-x)/(2-x) = 0.5 x/(x+1), i.e. x = 0.5.
        let t: Topology = "A::".parse().unwrap();
        let net = RegulatoryNetwork::fixed(&t).unwrap();
        let sim = Simulator::new(DynamicsConfig::for_testing());
        let trace = sim.run(&net, &ParameterSet::uniform(1, 1.0, 1.0)).unwrap();

        assert!(trace.stabilize.is_finite());
        assert_eq!(trace.stabilize.len(), 2000);
        assert_eq!(trace.stabilize.series(0)[0], 0.05);
        let settled = trace.stabilize.final_state()[0];
        assert!((settled - 0.5).abs() < 1e-4, "{settled}");
        // Phase 2 starts where phase 1 ended.
        assert_eq!(trace.eval.series(0)[0], settled);
        // The raised input pushes the level up.
        assert!(trace.eval.final_state()[0] > settled);
    }

    #[test]
    fn test_levels_stay_in_unit_interval() {
        let t: Topology = "ABO::AOa_OBa_BOi".parse().unwrap();
        let net = RegulatoryNetwork::growing(&t).unwrap();
        let params = ParameterSet::uniform(3, 5.0, 0.01);
        let sim = Simulator::new(DynamicsConfig::for_testing());
        let trace = sim.run(&net, &params).unwrap();
        for traj in [&trace.stabilize, &trace.eval] {
            assert!(traj
                .as_matrix()
                .iter()
                .all(|&v| (-1e-4..=1.0 + 1e-4).contains(&v)));
        }
    }

    #[test]
    fn test_deterministic() {
        let t: Topology = "ABO::ABa_BOi_OAi".parse().unwrap();
        let net = RegulatoryNetwork::growing(&t).unwrap();
        let params = ParameterSet::uniform(3, 2.0, 0.3);
        let sim = Simulator::new(DynamicsConfig::for_testing());
        assert_eq!(sim.run(&net, &params).unwrap(), sim.run(&net, &params).unwrap());
    }

    #[test]
    fn test_errors() {
        let t: Topology = "ABO::AOa".parse().unwrap();
        let sim = Simulator::new(DynamicsConfig::for_testing());

        let net = RegulatoryNetwork::growing(&t).unwrap();
        let err = sim.run(&net, &ParameterSet::uniform(3, 1.0, 1.0)).unwrap_err();
        assert!(!err.is_numerical());

        let empty = RegulatoryNetwork::growing(&"ABO::".parse().unwrap()).unwrap();
        assert_eq!(
            sim.stabilize(&empty, &ParameterSet::uniform(1, 1.0, 1.0)),
            Err(DynamicsError::NoSpecies)
        );

        let starved = Simulator::new(
            DynamicsConfig::for_testing()
                .with_grids(TimeGrid::new(1000.0, 10), TimeGrid::new(10.0, 10))
                .with_solver(SolverConfig::default().with_max_steps(2)),
        );
        let err = starved
            .stabilize(&net, &ParameterSet::uniform(2, 1.0, 1.0))
            .unwrap_err();
        assert!(err.is_numerical());
    }
}
