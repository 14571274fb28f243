use circuit_core::TopologyId;
use thiserror::Error;

/// Errors from parameter sets, pools and the index table.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParamsError {
    #[error("parameter matrix is {rows}x{cols}, expected {expected}x{expected}")]
    InvalidShape {
        expected: usize,
        rows: usize,
        cols: usize,
    },

    #[error("parameter value {0} is not finite and positive")]
    NonPositive(f64),

    #[error("log-space range [{lo}, {hi}] is empty or not finite")]
    InvalidRange { lo: f64, hi: f64 },

    #[error("pool size must be in 1..=u32::MAX, got {0}")]
    InvalidPoolSize(usize),

    #[error("no parameter pool for {species} species (pools cover 1..={max})")]
    NoPool { species: usize, max: usize },

    #[error("slot {slot} outside a pool of {pool_size}")]
    SlotOutOfRange { slot: usize, pool_size: usize },

    #[error("topology {0:?} is not in the index table")]
    UnknownTopology(TopologyId),
}
