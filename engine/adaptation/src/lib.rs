//! Reward pipeline for the adaptation-circuit search.
//!
//! A search engine proposes regulatory topologies as strings. For each
//! proposal this crate:
//! 1. resolves the string to a member of the enumerated topology set
//! 2. picks a pre-drawn kinetic parameter set through the seeded index table
//! 3. relaxes the network, then steps its input
//! 4. rejects sustained and damped oscillators
//! 5. scores the output for precision and sensitivity
//!
//! # Example
//!
//! ```rust,ignore
//! use adaptation::{AdaptationEvaluator, RewardEvaluator};
//!
//! let config = circuit_config::load_config();
//! let evaluator = AdaptationEvaluator::from_config(&config)?;
//! let result = evaluator.evaluate_next("ABO::AOa_OBa_BOi")?;
//! println!("{}: {}", result.canonical, result.reward);
//! ```

pub mod config;
pub mod context;
pub mod evaluator;
pub mod oscillation;
pub mod pipeline;
pub mod scoring;
pub mod stats;

pub use config::{DampedReference, OscillationConfig, RewardMode, ScoringConfig};
pub use context::{ContextError, EvaluationContext};
pub use evaluator::{AdaptationEvaluator, AggregatedStats, Evaluation, RewardError, RewardEvaluator};
pub use oscillation::{DampedVerdict, SustainedVerdict};
pub use pipeline::{AdaptationPipeline, NumericalFailure, Outcome, Run, ScreenError, ScreenSummary};
pub use scoring::{Score, ScoreError};
pub use stats::{EvaluationStats, EvaluationStatsSnapshot, SuccessLog};
