//! Kinetic parameter sampling for the adaptation-circuit search.
//!
//! - `ParameterSet`: `k_cat` / `K_threshold` matrices for one network size
//! - `ParameterPools`: Latin hypercube pools in log space, one per species count
//! - `IndexTable`: seeded per-topology permutations of pool slots
//! - `VisitCounter`: atomic visit numbering per topology
//!
//! All randomness comes from ChaCha20 streams derived from one master seed,
//! so pools and table rows reproduce exactly across runs and threads.

pub mod config;
pub mod error;
pub mod index_table;
pub mod lhs;
pub mod params;
pub mod pool;
pub mod seeds;
pub mod visits;

pub use config::SamplingConfig;
pub use error::ParamsError;
pub use index_table::IndexTable;
pub use lhs::LatinHypercube;
pub use params::ParameterSet;
pub use pool::{ParameterPool, ParameterPools};
pub use visits::VisitCounter;
