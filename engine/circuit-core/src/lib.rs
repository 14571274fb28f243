//! Core topology types for the adaptation-circuit search.
//!
//! This crate provides the search space the reward pipeline works over:
//! - `Topology`: signed regulatory graph with its single string form
//! - `Grammar`: component names and interaction alphabet
//! - `TopologySet`: exhaustive, order-stable enumeration with canonical lookup
//! - `SpeciesMap`: local/global species numbering for simulation

pub mod canonical;
pub mod enumerate;
pub mod error;
pub mod grammar;
pub mod species;
pub mod topology;

// Re-export main types for convenience
pub use canonical::Canonical;
pub use enumerate::{TopologyId, TopologySet};
pub use error::TopologyError;
pub use grammar::Grammar;
pub use species::SpeciesMap;
pub use topology::{EdgeKey, Interaction, Sign, Topology};
