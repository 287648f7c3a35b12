//! Component construction protocol.
//!
//! A component author implements [`Construct`]: `construct` pulls injected
//! dependencies and typed config through a [`Constructor`], and `register_as`
//! declares the interfaces (and side dependencies) the instance exposes
//! through a [`Registrar`]. The generic factory drives both; see
//! [`ComponentFactory`](crate::ComponentFactory).

use crate::config::{Config, FromConfigValue};
use crate::error::{Error, Result};
use crate::name::TypeName;
use crate::registry::DependencyRegistry;
use crate::Id;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Marker for instances a container can own. Automatically implemented for
/// every `Send + Sync + 'static` type; never implement it manually.
pub trait Component: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Component for T {}

/// Construction protocol of a concrete component type.
///
/// ```
/// use std::sync::Arc;
/// use wireup::{Construct, Constructor, Registrar, Result};
///
/// trait Clock: Send + Sync {
///     fn now(&self) -> u64;
/// }
///
/// struct FixedClock {
///     at: u64,
/// }
///
/// impl Clock for FixedClock {
///     fn now(&self) -> u64 {
///         self.at
///     }
/// }
///
/// impl Construct for FixedClock {
///     fn construct(scope: &mut Constructor<'_>) -> Result<Self> {
///         Ok(Self { at: scope.config::<u64>("at")? })
///     }
///
///     fn register_as(this: &Arc<Self>, registrar: &mut Registrar<'_>) -> Result<()> {
///         registrar.implements::<dyn Clock>(this.clone())
///     }
/// }
/// ```
pub trait Construct: Component + Sized {
    /// Construct an instance, resolving dependencies and configuration
    /// through `scope`. The i-th [`inject`](Constructor::inject) call binds
    /// the i-th dependency id of the topology entry.
    fn construct(scope: &mut Constructor<'_>) -> Result<Self>;

    /// Register the constructed instance under the interfaces it implements
    /// and expose its side dependencies. The default exposes nothing.
    fn register_as(this: &Arc<Self>, registrar: &mut Registrar<'_>) -> Result<()> {
        let _ = (this, registrar);
        Ok(())
    }
}

/// Construction scope handed to [`Construct::construct`]: the instance id,
/// the ordered dependency ids, the entry config and the registry to resolve
/// against.
pub struct Constructor<'c> {
    type_name: &'c str,
    id: &'c Id,
    dependency_ids: &'c [Id],
    next: usize,
    config: &'c Config,
    registry: &'c DependencyRegistry,
}

impl<'c> Constructor<'c> {
    pub(crate) fn new(
        type_name: &'c str,
        id: &'c Id,
        dependency_ids: &'c [Id],
        config: &'c Config,
        registry: &'c DependencyRegistry,
    ) -> Self {
        Self {
            type_name,
            id,
            dependency_ids,
            next: 0,
            config,
            registry,
        }
    }

    /// Id assigned to the instance under construction.
    pub fn id(&self) -> &Id {
        self.id
    }

    /// Type name of the component under construction, as the topology
    /// names it.
    pub fn type_name(&self) -> &str {
        self.type_name
    }

    /// Resolve the next dependency id against interface `I`.
    ///
    /// Consumes one id of the topology entry per call; requesting more
    /// injections than the entry declares fails with
    /// [`Error::DependencyInjectionExhausted`]. Resolution failures surface
    /// verbatim from the registry.
    pub fn inject<I>(&mut self) -> Result<Arc<I>>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        let Some(dependency_id) = self.dependency_ids.get(self.next) else {
            return Err(Error::DependencyInjectionExhausted {
                type_name: self.type_name.to_owned(),
                id: self.id.clone(),
                declared: self.dependency_ids.len(),
            });
        };
        self.next += 1;

        self.registry.get::<I>(dependency_id)
    }

    /// Retrieve the config value under `key` as `T`.
    ///
    /// Fails with [`Error::ConfigEntryNotFound`] for a missing key and
    /// [`Error::ConfigEntryCastError`] for a type or range mismatch.
    pub fn config<T: FromConfigValue>(&self, key: &str) -> Result<T> {
        let Some(entry) = self.config.get(key) else {
            return Err(Error::ConfigEntryNotFound {
                type_name: self.type_name.to_owned(),
                id: self.id.clone(),
                key: key.to_owned(),
            });
        };

        entry.get::<T>()
    }

    /// Whether the entry config defines `key`.
    pub fn has_config(&self, key: &str) -> bool {
        self.config.contains(key)
    }
}

/// Registration scope handed to [`Construct::register_as`].
pub struct Registrar<'r> {
    id: &'r Id,
    registry: &'r mut DependencyRegistry,
    interfaces: BTreeSet<TypeName>,
    side_ids: BTreeSet<Id>,
}

impl<'r> Registrar<'r> {
    pub(crate) fn new(id: &'r Id, registry: &'r mut DependencyRegistry) -> Self {
        Self {
            id,
            registry,
            interfaces: BTreeSet::new(),
            side_ids: BTreeSet::new(),
        }
    }

    /// Register the component under interface `I` with its instance id.
    ///
    /// Repeating the same interface for one component is a no-op; a clash
    /// with another component fails with [`Error::DependencyDuplicated`].
    pub fn implements<I>(&mut self, interface: Arc<I>) -> Result<()>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        if !self.interfaces.insert(TypeName::of::<I>()) {
            return Ok(());
        }

        self.registry.add::<I>(self.id.clone(), interface)
    }

    /// Expose a side dependency of type `S` under the composite id
    /// `"{component-id}_{side-id}"`.
    ///
    /// Side-ids must be non-empty and unique within the component across all
    /// side types.
    pub fn side<S>(&mut self, side_id: &str, dependency: Arc<S>) -> Result<()>
    where
        S: ?Sized + Send + Sync + 'static,
    {
        if side_id.is_empty() {
            return Err(Error::SideDependencyIdEmpty {
                id: self.id.clone(),
            });
        }

        let composite = format!("{}_{}", self.id, side_id);
        if !self.side_ids.insert(composite.clone()) {
            return Err(Error::SideDependencyIdDuplicated {
                id: self.id.clone(),
                side_id: side_id.to_owned(),
            });
        }

        self.registry.add::<S>(composite, dependency)
    }
}
