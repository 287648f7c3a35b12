//! Error types for topology loading, wiring and configuration access.

use crate::name::TypeName;
use crate::Id;
use thiserror::Error;

/// Errors raised while describing, loading or building a topology.
///
/// `Display` strings are stable; tests compare them verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Topology names a component type with no registered factory.
    #[error("Factory of {type_name}{{}} not registered.")]
    FactoryNotFound { type_name: String },

    /// Lookup by an interface type never seen by the registry.
    #[error("Dependency {type_name}{{}} with id=\"{id}\" not found.")]
    DependencyRegisterNotFound { type_name: TypeName, id: Id },

    /// Interface known, id not registered.
    #[error("Dependency {type_name}{{}} with id=\"{id}\" not found.")]
    DependencyNotFound { type_name: TypeName, id: Id },

    /// Two components registered under the same (interface, id) pair.
    #[error("Dependency {type_name}{{}} already registered with id=\"{id}\".")]
    DependencyDuplicated { type_name: TypeName, id: Id },

    /// Component read a config key its topology entry does not define.
    #[error("Config entry \"{key}\" not found for component {type_name}{{\"{id}\"}}.")]
    ConfigEntryNotFound {
        type_name: String,
        id: Id,
        key: String,
    },

    /// Config value cannot be represented as the requested type.
    #[error("Could not cast config entry \"{key}\" from {source_type}{{{value}}} to {target}.")]
    ConfigEntryCastError {
        key: String,
        value: String,
        source_type: &'static str,
        target: &'static str,
    },

    /// Builder set the same config key twice for one entry.
    #[error("Config entry key duplicated: \"{key}\".")]
    ConfigEntryKeyDuplicated { key: String },

    /// Builder reused a component instance id.
    #[error("Component id duplicated for component {type_name}{{\"{id}\"}}.")]
    ComponentIdDuplicated { type_name: String, id: Id },

    /// Any JSON-schema violation detected by the topology loader.
    #[error("{0}")]
    TopologyLoader(String),

    /// Component exposed a side dependency under an empty side-id.
    #[error("Side dependency id shall not be empty. Component: \"{id}\".")]
    SideDependencyIdEmpty { id: Id },

    /// Component exposed two side dependencies under the same side-id.
    #[error("Side dependency id duplicated: \"{side_id}\". Component: \"{id}\".")]
    SideDependencyIdDuplicated { id: Id, side_id: Id },

    /// `construct` requested more injections than the topology entry provides.
    #[error("Component {type_name}{{\"{id}\"}} requests more dependencies than declared ({declared}).")]
    DependencyInjectionExhausted {
        type_name: String,
        id: Id,
        declared: usize,
    },
}

impl Error {
    /// Create a `DependencyRegisterNotFound` for interface `I`.
    #[inline]
    pub fn register_not_found<I: ?Sized + 'static>(id: impl Into<Id>) -> Self {
        Self::DependencyRegisterNotFound {
            type_name: TypeName::of::<I>(),
            id: id.into(),
        }
    }

    /// Create a `DependencyNotFound` for interface `I`.
    #[inline]
    pub fn dependency_not_found<I: ?Sized + 'static>(id: impl Into<Id>) -> Self {
        Self::DependencyNotFound {
            type_name: TypeName::of::<I>(),
            id: id.into(),
        }
    }

    /// Create a `DependencyDuplicated` for interface `I`.
    #[inline]
    pub fn dependency_duplicated<I: ?Sized + 'static>(id: impl Into<Id>) -> Self {
        Self::DependencyDuplicated {
            type_name: TypeName::of::<I>(),
            id: id.into(),
        }
    }

    /// Create a `FactoryNotFound` for the given component type name.
    #[inline]
    pub fn factory_not_found(type_name: impl Into<String>) -> Self {
        Self::FactoryNotFound {
            type_name: type_name.into(),
        }
    }
}

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
