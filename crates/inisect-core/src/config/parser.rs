//! Line-by-line parsing into a [`ConfigStore`], and the [`ConfigParser`]
//! reader that owns the result.

use std::cell::Cell;
use std::convert::Infallible;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, error, info, warn};

use crate::config::lines::{RecordType, classify, heading_name, split_entry};
use crate::config::types::ConfigStore;
use crate::errors::ConfigError;

/// Where new entries go while parsing. Moves forward to each heading and
/// never returns to the global map.
enum ParseCursor {
    Global,
    Section(String),
}

impl ParseCursor {
    fn target(&self) -> Option<&str> {
        match self {
            ParseCursor::Global => None,
            ParseCursor::Section(name) => Some(name.as_str()),
        }
    }
}

/// Parse INI text in a single forward pass.
///
/// Malformed lines are logged and skipped; parsing itself never fails.
pub fn parse_str(content: &str) -> ConfigStore {
    let mut store = ConfigStore::new();
    let mut cursor = ParseCursor::Global;

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        match classify(line) {
            RecordType::Empty => {}
            RecordType::Entry => {
                if let Some((key, value)) = split_entry(line) {
                    store.insert_entry(cursor.target(), key, value);
                }
            }
            RecordType::Heading => match heading_name(line) {
                Some(name) => {
                    store.open_subsection(name);
                    cursor = ParseCursor::Section(name.to_string());
                }
                None => {
                    warn!(
                        event = "core.config.heading_malformed",
                        line = line_number,
                        "Malformed config heading: {}",
                        line
                    );
                }
            },
            RecordType::Unknown => {
                warn!(
                    event = "core.config.entry_unknown",
                    line = line_number,
                    "Unknown config entry: {}",
                    line
                );
            }
        }
    }

    debug!(
        event = "core.config.parse_completed",
        entries = store.len(),
        sections = store.sections().count()
    );

    store
}

/// Owns a parsed config and reads typed values out of it.
///
/// Reads go through a read cursor that points at the global map unless a
/// [`SubsectionGuard`](crate::config::SubsectionGuard) redirects it. The
/// cursor is a single `Cell`, so a `ConfigParser` is not `Sync`: guarded reads
/// from several threads are impossible by construction. Share the
/// [`ConfigStore`] instead when concurrent readers are needed.
#[derive(Debug)]
pub struct ConfigParser {
    pub(super) store: ConfigStore,
    pub(super) path: Option<PathBuf>,
    /// Index of the subsection reads are redirected to, if any
    pub(super) cursor: Cell<Option<usize>>,
    pub(super) guarded: Cell<bool>,
}

impl ConfigParser {
    /// Read and parse the config file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ConfigNotFound`] if the file cannot be read.
    /// This is the only hard failure; bad lines are skipped.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| {
            error!(
                event = "core.config.load_failed",
                path = %path.display(),
                error = %source
            );
            ConfigError::ConfigNotFound {
                path: path.display().to_string(),
                source,
            }
        })?;

        let store = parse_str(&content);
        info!(
            event = "core.config.loaded",
            path = %path.display(),
            entries = store.len()
        );

        let mut parser = Self::from(store);
        parser.path = Some(path.to_path_buf());
        Ok(parser)
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn into_store(self) -> ConfigStore {
        self.store
    }

    /// Path the config was loaded from, if it came from a file.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Subsection names in file order.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.store.sections()
    }

    pub fn dump(&self) -> String {
        self.store.dump()
    }

    /// Name of the subsection reads are currently redirected to.
    pub fn current_section(&self) -> Option<&str> {
        self.cursor
            .get()
            .and_then(|index| self.store.section_at(index))
            .map(|(name, _)| name)
    }
}

impl From<ConfigStore> for ConfigParser {
    fn from(store: ConfigStore) -> Self {
        Self {
            store,
            path: None,
            cursor: Cell::new(None),
            guarded: Cell::new(false),
        }
    }
}

impl FromStr for ConfigParser {
    type Err = Infallible;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(parse_str(content)))
    }
}
