//! # Sectioned INI configuration
//!
//! Parses `key = value` files with optional flat `[Section]` groups and
//! reads typed values out of them.
//!
//! ## File format
//!
//! ```text
//! key = value          # comment to end of line, values only
//! [Section Name]       # every entry below belongs to this section
//!   key2 = value2
//! ```
//!
//! - Keys and section names are case-sensitive.
//! - Whitespace around `=` and around a heading is ignored.
//! - There is no way back to the global map once a heading is seen, and
//!   sections do not nest. Repeating a heading reopens that section.
//! - Booleans are exactly `true` or `false`.
//! - Floats must be finite; `NaN` and `inf` are format errors.
//! - Unknown lines are logged and skipped.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use inisect_core::config::ConfigParser;
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     // A missing file is the only hard failure
//!     let config = ConfigParser::open("/etc/example.conf")?;
//!
//!     let threads: usize = config.get("Threads")?;
//!     let verbose = config.get_or("Verbose", false);
//!     let limit: u64 = config.get_from_or("Limits", "Max Files", 1024);
//!
//!     for name in config.sections() {
//!         let size: String = config.with_subsection(name, |cfg| cfg.get_or("Size", String::new()))?;
//!         println!("{threads} {verbose} {limit} {name}: {size}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod accessors;
pub mod guard;
pub mod lines;
pub mod parser;
pub mod types;

// Public API exports
pub use accessors::ConfigType;
pub use guard::SubsectionGuard;
pub use lines::RecordType;
pub use parser::{ConfigParser, parse_str};
pub use types::{ConfigStore, ConfigValue, SectionMap};
