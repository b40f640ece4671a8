//! inisect-core: sectioned INI configuration with typed accessors
//!
//! This library parses INI-style config files into an ordered store of
//! global keys and flat subsections, and reads typed values back out with
//! throwing, fallback or flag-setting accessors. It is used by the
//! `inisect` CLI.
//!
//! # Main Entry Points
//!
//! - [`config`] - Parser, store, typed accessors and the subsection guard
//! - [`units`] - Human-readable byte counts and quotas
//! - [`errors`] - Error taxonomy shared by both

pub mod config;
pub mod errors;
pub mod events;
pub mod logging;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use config::{ConfigParser, ConfigStore, ConfigType, ConfigValue, SubsectionGuard};
pub use errors::{ConfigError, InisectError};
pub use units::{Bytes, PrefixType, Quota, RoundingMethod, UnitError};

// Re-export logging initialization
pub use logging::init_logging;
