//! Kinetic levels, time grids and integrator settings.

use std::time::Duration;

/// An evenly spaced output grid `0, dt, ..., horizon` with `points` samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeGrid {
    pub horizon: f64,
    pub points: usize,
}

impl TimeGrid {
    pub fn new(horizon: f64, points: usize) -> Self {
        Self { horizon, points }
    }

    /// Sample times, endpoints included.
    pub fn times(&self) -> Vec<f64> {
        let last = (self.points.max(2) - 1) as f64;
        (0..self.points)
            .map(|i| self.horizon * i as f64 / last)
            .collect()
    }
}

/// Configuration for the Rosenbrock integrator.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Relative error tolerance.
    pub rtol: f64,

    /// Absolute error tolerance.
    pub atol: f64,

    /// Step attempts (accepted + rejected) allowed per solve.
    pub max_steps: usize,

    /// Wall-clock budget per solve. `None` disables the check.
    pub max_wall: Option<Duration>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            rtol: 1e-6,
            atol: 1e-9,
            max_steps: 200_000,
            max_wall: Some(Duration::from_secs(30)),
        }
    }
}

impl SolverConfig {
    /// Builder pattern: set tolerances.
    pub fn with_tolerances(mut self, rtol: f64, atol: f64) -> Self {
        self.rtol = rtol;
        self.atol = atol;
        self
    }

    /// Builder pattern: set step limit.
    pub fn with_max_steps(mut self, n: usize) -> Self {
        self.max_steps = n;
        self
    }

    /// Builder pattern: set wall-clock budget.
    pub fn with_max_wall(mut self, budget: Option<Duration>) -> Self {
        self.max_wall = budget;
        self
    }
}

/// Configuration of the two-phase simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicsConfig {
    /// Starting level of every species.
    pub initial_level: f64,

    /// `E`: drive of species with no activator.
    pub basal_activation: f64,

    /// `F`: decay of species with no inhibitor.
    pub basal_inhibition: f64,

    /// Baseline input `I` of phase 1.
    pub input_level: f64,

    /// Phase 2 runs at `I * (1 + input_increase)`.
    pub input_increase: f64,

    pub stabilize: TimeGrid,
    pub eval: TimeGrid,
    pub solver: SolverConfig,
}

impl Default for DynamicsConfig {
    fn default() -> Self {
        Self {
            initial_level: 0.05,
            basal_activation: 0.5,
            basal_inhibition: 0.5,
            input_level: 0.5,
            input_increase: 0.2,
            stabilize: TimeGrid::new(5000.0, 20_000),
            eval: TimeGrid::new(2500.0, 10_000),
            solver: SolverConfig::default(),
        }
    }
}

impl DynamicsConfig {
    /// Short horizons and coarse grids for fast tests.
    pub fn for_testing() -> Self {
        Self {
            stabilize: TimeGrid::new(1000.0, 2000),
            eval: TimeGrid::new(500.0, 1000),
            ..Self::default()
        }
    }

    /// Builder pattern: set both time grids.
    pub fn with_grids(mut self, stabilize: TimeGrid, eval: TimeGrid) -> Self {
        self.stabilize = stabilize;
        self.eval = eval;
        self
    }

    /// Builder pattern: set the fractional input step.
    pub fn with_input_increase(mut self, increase: f64) -> Self {
        self.input_increase = increase;
        self
    }

    /// Builder pattern: set solver configuration.
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Input levels of the two phases.
    pub fn input_levels(&self) -> (f64, f64) {
        (
            self.input_level,
            self.input_level * (1.0 + self.input_increase),
        )
    }
}
