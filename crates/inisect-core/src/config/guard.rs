//! Scoped redirection of a [`ConfigParser`]'s read cursor.
//!
//! ```rust
//! use inisect_core::config::ConfigParser;
//!
//! let config: ConfigParser = "[Disk 1]\nsize = 4 TiB\n[Disk 2]\nsize = 8 TiB\n"
//!     .parse()
//!     .unwrap();
//!
//! let names: Vec<String> = config.sections().map(str::to_string).collect();
//! for name in &names {
//!     let guard = config.guard(name).unwrap();
//!     assert_eq!(guard.section(), name);
//!     let _size: String = config.get_or("size", String::new());
//!     // cursor goes back to the global map when `guard` drops
//! }
//! assert_eq!(config.current_section(), None);
//! ```

use tracing::debug;

use crate::config::parser::ConfigParser;
use crate::errors::ConfigError;

/// Keeps the read cursor on one subsection until dropped.
///
/// Only one guard may exist per parser at a time.
#[must_use = "the cursor is restored as soon as the guard is dropped"]
#[derive(Debug)]
pub struct SubsectionGuard<'a> {
    config: &'a ConfigParser,
    section: &'a str,
}

impl SubsectionGuard<'_> {
    /// Name of the guarded subsection.
    pub fn section(&self) -> &str {
        self.section
    }
}

impl Drop for SubsectionGuard<'_> {
    fn drop(&mut self) {
        self.config.cursor.set(None);
        self.config.guarded.set(false);
        debug!(event = "core.config.guard_released", section = self.section);
    }
}

impl ConfigParser {
    /// Redirect reads to `section` until the returned guard is dropped.
    ///
    /// # Errors
    ///
    /// [`ConfigError::GuardConflict`] if a guard is already in scope, and
    /// [`ConfigError::SectionNotFound`] if `section` is not a subsection.
    /// Neither touches the current cursor.
    pub fn guard(&self, section: &str) -> Result<SubsectionGuard<'_>, ConfigError> {
        if self.guarded.get() {
            return Err(ConfigError::GuardConflict {
                message: format!(
                    "Tried to guard [{}] while [{}] is already guarded",
                    section,
                    self.current_section().unwrap_or_default()
                ),
            });
        }

        // The guard borrows the name from the store, not from the caller.
        let (index, name) = self.store.section_index(section).ok_or_else(|| {
            ConfigError::SectionNotFound {
                section: section.to_string(),
            }
        })?;

        self.guarded.set(true);
        self.cursor.set(Some(index));
        debug!(event = "core.config.guard_acquired", section = name);

        Ok(SubsectionGuard {
            config: self,
            section: name,
        })
    }

    /// Run `f` with reads redirected to `section`, restoring the cursor
    /// afterwards even if `f` panics.
    ///
    /// # Errors
    ///
    /// Same as [`guard`](Self::guard); `f` is not called on error.
    pub fn with_subsection<R>(
        &self,
        section: &str,
        f: impl FnOnce(&Self) -> R,
    ) -> Result<R, ConfigError> {
        let _guard = self.guard(section)?;
        Ok(f(self))
    }

    /// Whether a [`SubsectionGuard`] is currently in scope.
    pub fn is_guarded(&self) -> bool {
        self.guarded.get()
    }
}
