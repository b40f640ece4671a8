use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

/// Flat key/value map of one subsection.
pub type SectionMap = IndexMap<String, String>;

/// A value stored under a top-level key.
///
/// Subsections hold leaves only; there is a single level of nesting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Leaf(String),
    Section(SectionMap),
}

impl ConfigValue {
    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            ConfigValue::Leaf(value) => Some(value),
            ConfigValue::Section(_) => None,
        }
    }

    pub fn as_section(&self) -> Option<&SectionMap> {
        match self {
            ConfigValue::Leaf(_) => None,
            ConfigValue::Section(map) => Some(map),
        }
    }
}

/// Parsed contents of a config file.
///
/// Keys keep the order in which they were first declared. Re-declaring a key
/// overwrites its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConfigStore {
    entries: IndexMap<String, ConfigValue>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a leaf into the global map (`section == None`) or into the named
    /// subsection, opening the subsection first if needed.
    pub fn insert_entry(&mut self, section: Option<&str>, key: &str, value: &str) {
        match section {
            None => {
                self.entries
                    .insert(key.to_string(), ConfigValue::Leaf(value.to_string()));
            }
            Some(name) => {
                self.open_subsection(name);
                if let Some(ConfigValue::Section(map)) = self.entries.get_mut(name) {
                    map.insert(key.to_string(), value.to_string());
                }
            }
        }
    }

    /// Make sure `name` is a subsection of the global map.
    ///
    /// An existing subsection is reopened and keeps its entries. A leaf with
    /// the same name is replaced by an empty subsection.
    pub fn open_subsection(&mut self, name: &str) {
        let slot = self
            .entries
            .entry(name.to_string())
            .or_insert_with(|| ConfigValue::Section(SectionMap::new()));

        if let ConfigValue::Leaf(value) = slot {
            warn!(
                event = "core.config.leaf_replaced_by_section",
                section = name,
                value = %value,
                "Heading [{}] replaces the value of key {}",
                name,
                name
            );
            *slot = ConfigValue::Section(SectionMap::new());
        }
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.get(key)
    }

    /// Global leaf value for `key`; `None` if absent or a subsection.
    pub fn leaf(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(ConfigValue::as_leaf)
    }

    pub fn section(&self, name: &str) -> Option<&SectionMap> {
        self.entries.get(name).and_then(ConfigValue::as_section)
    }

    /// Names of all subsections, in file order.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, value)| value.as_section().is_some())
            .map(|(name, _)| name.as_str())
    }

    /// Global leaves, in file order.
    pub fn leaves(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(key, value)| value.as_leaf().map(|leaf| (key.as_str(), leaf)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position and stored name of subsection `name`.
    pub(crate) fn section_index(&self, name: &str) -> Option<(usize, &str)> {
        let (index, key, value) = self.entries.get_full(name)?;
        value.as_section().map(|_| (index, key.as_str()))
    }

    pub(crate) fn section_at(&self, index: usize) -> Option<(&str, &SectionMap)> {
        let (name, value) = self.entries.get_index(index)?;
        value.as_section().map(|map| (name.as_str(), map))
    }

    /// Render the store back to INI text.
    ///
    /// Global leaves come first so that parsing the output again cannot
    /// attach them to a subsection.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (key, value) in self.leaves() {
            out.push_str(&format!("{} = {}\n", key, value));
        }
        for (name, value) in &self.entries {
            if let ConfigValue::Section(map) = value {
                out.push_str(&format!("[{}]\n", name));
                for (key, value) in map {
                    out.push_str(&format!("\t{} = {}\n", key, value));
                }
            }
        }
        out
    }
}
