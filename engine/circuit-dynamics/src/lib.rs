//! Deterministic simulation of regulatory networks.
//!
//! - `RegulatoryNetwork`: a topology compiled to local species numbering
//! - `Kinetics`: saturating activation/inhibition right-hand side
//! - `Rosenbrock23`: adaptive linearly implicit integrator for stiff systems
//! - `Simulator`: the stabilize-then-step protocol on fixed time grids

pub mod config;
pub mod error;
pub mod kinetics;
pub mod network;
pub mod simulate;
pub mod solver;
pub mod trajectory;

pub use config::{DynamicsConfig, SolverConfig, TimeGrid};
pub use error::{DynamicsError, SolveError};
pub use kinetics::{Kinetics, Levels};
pub use network::RegulatoryNetwork;
pub use simulate::{SimulationTrace, Simulator};
pub use solver::{OdeSystem, Rosenbrock23, SolveStats};
pub use trajectory::Trajectory;
