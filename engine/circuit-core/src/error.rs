//! Errors raised while parsing, enumerating and canonicalizing topologies.

use thiserror::Error;

/// Errors produced by the topology layer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TopologyError {
    #[error("missing '::' separator in {0:?}")]
    MissingSeparator(String),

    #[error("topology declares no components")]
    EmptyComponents,

    #[error("component {0:?} is not a single uppercase ASCII letter")]
    InvalidComponent(char),

    #[error("component {0:?} declared twice")]
    DuplicateComponent(char),

    #[error("edge token {0:?} must be exactly three characters")]
    TokenLength(String),

    #[error("edge token {token:?} uses undeclared component {component:?}")]
    UnknownComponent { token: String, component: char },

    #[error("edge token {token:?} has unknown sign {sign:?} (expected 'a' or 'i')")]
    UnknownSign { token: String, sign: char },

    #[error("unknown interaction {0:?} (expected \"activates\" or \"inhibits\")")]
    UnknownInteraction(String),

    #[error("no interactions configured")]
    EmptyAlphabet,

    #[error("{components} components span too many topologies to enumerate")]
    EnumerationTooLarge { components: usize },

    #[error("state {0:?} is not a member of the enumerated topology set")]
    CanonicalizationMiss(String),

    #[error("state declares components {found:?}, topology set uses {expected:?}")]
    ComponentMismatch { expected: String, found: String },
}
