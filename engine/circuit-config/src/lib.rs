//! Centralized configuration loading from config.toml.
//!
//! This crate provides the configuration structs and loading logic for the
//! adaptation reward pipeline. Runtime crates convert these sections into
//! their own typed settings.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`ADAPT_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (config.defaults.toml, embedded at compile time)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! ADAPT_<SECTION>_<KEY>=value
//!
//! Examples:
//!     ADAPT_COMMON_SEED=7
//!     ADAPT_GRAMMAR_COMPONENTS=A,B,C,O
//!     ADAPT_SAMPLING_POOL_SIZE=2000
//!     ADAPT_SAMPLING_RATE_LOG_RANGE=-2,1
//!     ADAPT_SCORING_REWARD_MODE=binary
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{apply_env_overrides, load_config, load_from_path, CONFIG_SEARCH_PATHS};
pub use structs::*;
