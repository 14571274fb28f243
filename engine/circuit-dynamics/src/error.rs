use thiserror::Error;

/// Numerical failure of a single solve.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SolveError {
    #[error("exceeded {max_steps} steps at t = {t}")]
    StepLimit { max_steps: usize, t: f64 },

    #[error("wall-clock budget exhausted at t = {t}")]
    Timeout { t: f64 },

    #[error("step size underflow (h = {h:e}) at t = {t}")]
    StepSizeUnderflow { h: f64, t: f64 },

    #[error("iteration matrix is singular at t = {t}")]
    SingularMatrix { t: f64 },

    #[error("non-finite state at t = {t}")]
    NonFinite { t: f64 },
}

/// Errors raised while compiling or simulating a network.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DynamicsError {
    #[error("network has {network} species but parameter set was drawn for {params}")]
    DimensionMismatch { network: usize, params: usize },

    #[error("regulator {regulator} of species {target} is outside {species} species")]
    RegulatorOutOfRange {
        target: usize,
        regulator: usize,
        species: usize,
    },

    #[error("edge touches component {0} which the species map does not simulate")]
    UnmappedSpecies(char),

    #[error("network has no species to simulate")]
    NoSpecies,

    #[error("initial state has {found} entries, network has {expected} species")]
    StateLength { expected: usize, found: usize },

    #[error(transparent)]
    Solve(#[from] SolveError),
}

impl DynamicsError {
    /// Whether the error came from the integrator rather than from a
    /// malformed network or parameter set.
    pub fn is_numerical(&self) -> bool {
        matches!(self, DynamicsError::Solve(_))
    }
}
