//! Declarative description of the component graph to build.
//!
//! A [`Topology`] is an ordered list of [`TopologyEntry`] records. The order
//! *is* the construction order: every dependency id an entry names must refer
//! to an earlier entry (the container does not sort).

use crate::config::{Config, ConfigEntry, ConfigValue, IntoConfigValue};
use crate::error::{Error, Result};
use crate::{DependencyIds, Id};
use std::fmt;

/// One component instance to be constructed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TopologyEntry {
    /// Component type name, resolved against the factory registry.
    pub type_name: String,
    /// Instance id, unique across the topology. Interfaces exposed by the
    /// component are registered under this id.
    pub id: Id,
    /// Ids of dependencies injected on construction, in declaration order.
    pub dependency_ids: DependencyIds,
    /// Instance configuration.
    pub config: Config,
}

/// Ordered collection of entries defining the instances to construct.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Topology {
    entries: Vec<TopologyEntry>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TopologyEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[TopologyEntry] {
        &self.entries
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'t> IntoIterator for &'t Topology {
    type Item = &'t TopologyEntry;
    type IntoIter = std::slice::Iter<'t, TopologyEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Fluent-style reconstruction of the builder program, one statement per
/// entry. Intended for debugging dumps.
impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            write!(
                f,
                "topology_builder.component(\"{}\", \"{}\")",
                entry.type_name, entry.id
            )?;

            for dependency_id in &entry.dependency_ids {
                write!(f, "\n    .dependency(\"{dependency_id}\")")?;
            }

            for config_entry in entry.config.iter() {
                match config_entry.value() {
                    ConfigValue::String(value) => write!(
                        f,
                        "\n    .config::<String>(\"{}\", \"{}\")",
                        config_entry.key(),
                        value
                    )?,
                    value => write!(
                        f,
                        "\n    .config::<{}>(\"{}\", {})",
                        config_entry.type_name(),
                        config_entry.key(),
                        value
                    )?,
                }
            }

            writeln!(f, ";")?;
        }

        Ok(())
    }
}

/// Configures a [`Topology`]. Construction clears the target.
pub struct TopologyBuilder<'t> {
    topology: &'t mut Topology,
}

impl<'t> TopologyBuilder<'t> {
    pub fn new(topology: &'t mut Topology) -> Self {
        topology.clear();
        Self { topology }
    }

    /// Append a new entry for the given component type and instance id.
    ///
    /// Fails with [`Error::ComponentIdDuplicated`] if the id is already used
    /// by an earlier entry.
    pub fn component(
        &mut self,
        type_name: impl Into<String>,
        id: impl Into<Id>,
    ) -> Result<TopologyEntryBuilder<'_>> {
        let type_name = type_name.into();
        let id = id.into();

        if self.topology.entries.iter().any(|entry| entry.id == id) {
            return Err(Error::ComponentIdDuplicated { type_name, id });
        }

        self.topology.entries.push(TopologyEntry {
            type_name,
            id,
            dependency_ids: DependencyIds::new(),
            config: Config::new(),
        });

        // Just pushed, so the slot exists.
        let entry = self.topology.entries.last_mut().expect("entry just pushed");
        Ok(TopologyEntryBuilder { entry })
    }
}

/// Fluent interface for a single entry under construction.
#[derive(Debug)]
pub struct TopologyEntryBuilder<'e> {
    entry: &'e mut TopologyEntry,
}

impl TopologyEntryBuilder<'_> {
    /// Append a dependency id to be injected.
    pub fn dependency(&mut self, id: impl Into<Id>) -> &mut Self {
        self.entry.dependency_ids.push(id.into());
        self
    }

    /// Set a config entry, failing with [`Error::ConfigEntryKeyDuplicated`]
    /// if the key is already set for this entry.
    pub fn config<T: IntoConfigValue>(
        &mut self,
        key: impl Into<String>,
        value: T,
    ) -> Result<&mut Self> {
        self.entry.config.insert(ConfigEntry::new(key, value))?;
        Ok(self)
    }
}
