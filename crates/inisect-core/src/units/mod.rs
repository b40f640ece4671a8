//! Human-readable byte counts and quotas.
//!
//! These are the value types behind the `Bytes` accessor kind and the
//! `get_quota*` accessors of [`crate::config::ConfigParser`].

pub mod bytes;
pub mod errors;
pub mod quota;

pub use bytes::{Bytes, PrefixType};
pub use errors::UnitError;
pub use quota::{Quota, RoundingMethod, parse_fraction};
