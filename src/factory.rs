//! Component factories and the process-wide factory registry.
//!
//! A [`Factory`] constructs one concrete component type; the generic
//! [`ComponentFactory`] adapts any [`Construct`] implementor. Factories reach
//! the [`FactoryRegistry`] singleton either at link time through the
//! [`register_factory!`](crate::register_factory) macro, or dynamically
//! through a [`FactoryRegisterer`] guard.

use crate::component::{Component, Construct, Constructor, Registrar};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::name::TypeName;
use crate::registry::DependencyRegistry;
use crate::Id;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::debug;

/// Constructs components of one type, identified by the type name used in
/// topology entries.
pub trait Factory: Send + Sync {
    /// Type name this factory is registered under.
    fn type_name(&self) -> &str;

    /// Construct a component: resolve its dependencies against `registry`,
    /// then register the instance under the interfaces it implements and any
    /// side dependencies it exposes.
    fn build(
        &self,
        id: &Id,
        dependency_ids: &[Id],
        config: &Config,
        registry: &mut DependencyRegistry,
    ) -> Result<Arc<dyn Component>>;
}

/// [`Factory`] implementation for any [`Construct`] component type.
pub struct ComponentFactory<C> {
    type_name: &'static str,
    _marker: PhantomData<fn() -> C>,
}

impl<C: Construct> ComponentFactory<C> {
    /// Factory registered under the component's own type name.
    pub fn new() -> Self {
        Self::named(TypeName::of::<C>().as_str())
    }

    /// Factory registered under an explicit type name.
    pub fn named(type_name: &'static str) -> Self {
        Self {
            type_name,
            _marker: PhantomData,
        }
    }
}

impl<C: Construct> Default for ComponentFactory<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Construct> Factory for ComponentFactory<C> {
    fn type_name(&self) -> &str {
        self.type_name
    }

    fn build(
        &self,
        id: &Id,
        dependency_ids: &[Id],
        config: &Config,
        registry: &mut DependencyRegistry,
    ) -> Result<Arc<dyn Component>> {
        #[cfg(feature = "logging")]
        debug!(
            component = self.type_name,
            id = %id,
            dependencies = dependency_ids.len(),
            "Constructing component"
        );

        let component = {
            let mut scope = Constructor::new(self.type_name, id, dependency_ids, config, registry);
            Arc::new(C::construct(&mut scope)?)
        };

        let mut registrar = Registrar::new(id, registry);
        C::register_as(&component, &mut registrar)?;

        Ok(component)
    }
}

/// Factory constructors contributed at link time; collected into the global
/// registry on first access.
#[linkme::distributed_slice]
pub static COMPONENT_FACTORIES: [fn() -> Arc<dyn Factory>] = [..];

#[doc(hidden)]
pub mod __private {
    pub use linkme;
}

/// Register a [`Construct`] component type with the global
/// [`FactoryRegistry`] at link time.
///
/// ```ignore
/// wireup::register_factory!(Recorder, "recorder");
/// wireup::register_factory!(FixedClock); // registered under its type name
/// ```
#[macro_export]
macro_rules! register_factory {
    ($component:ty) => {
        const _: () = {
            #[$crate::__private::linkme::distributed_slice($crate::COMPONENT_FACTORIES)]
            #[linkme(crate = $crate::__private::linkme)]
            static FACTORY: fn() -> ::std::sync::Arc<dyn $crate::Factory> =
                || ::std::sync::Arc::new($crate::ComponentFactory::<$component>::new());
        };
    };
    ($component:ty, $name:expr) => {
        const _: () = {
            #[$crate::__private::linkme::distributed_slice($crate::COMPONENT_FACTORIES)]
            #[linkme(crate = $crate::__private::linkme)]
            static FACTORY: fn() -> ::std::sync::Arc<dyn $crate::Factory> =
                || ::std::sync::Arc::new($crate::ComponentFactory::<$component>::named($name));
        };
    };
}

static GLOBAL: Lazy<FactoryRegistry> = Lazy::new(|| {
    let registry = FactoryRegistry::new();
    for make_factory in COMPONENT_FACTORIES {
        registry.add(make_factory());
    }
    registry
});

/// Aggregation point for the factories available within the process.
///
/// The singleton is seeded once from [`COMPONENT_FACTORIES`]; dynamic
/// mutation afterwards is guarded by a lock and intended for the
/// single-threaded initialization phase (or tests).
pub struct FactoryRegistry {
    factories: RwLock<BTreeMap<String, Arc<dyn Factory>>>,
}

impl FactoryRegistry {
    /// Empty registry, independent of the singleton.
    pub fn new() -> Self {
        Self {
            factories: RwLock::new(BTreeMap::new()),
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static FactoryRegistry {
        &GLOBAL
    }

    /// Register a factory. Returns `false` (and leaves the existing factory
    /// in place) if its type name is already taken.
    pub fn add(&self, factory: Arc<dyn Factory>) -> bool {
        let mut factories = self.factories.write();
        let type_name = factory.type_name().to_owned();

        match factories.entry(type_name) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(factory);
                true
            }
        }
    }

    /// Best-effort erase of the factory registered under `factory`'s type
    /// name.
    pub fn remove(&self, factory: &dyn Factory) {
        self.factories.write().remove(factory.type_name());
    }

    /// Whether a factory of the given type name is registered.
    pub fn has(&self, type_name: &str) -> bool {
        self.factories.read().contains_key(type_name)
    }

    /// The factory for the given type name, failing with
    /// [`Error::FactoryNotFound`] if none is registered.
    pub fn get(&self, type_name: &str) -> Result<Arc<dyn Factory>> {
        self.factories
            .read()
            .get(type_name)
            .cloned()
            .ok_or_else(|| Error::factory_not_found(type_name))
    }

    /// Type names of all registered factories, sorted.
    pub fn all(&self) -> Vec<String> {
        self.factories.read().keys().cloned().collect()
    }
}

impl Default for FactoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard that registers a factory with the global registry on construction
/// and removes it again on drop. The dynamic counterpart of
/// [`register_factory!`](crate::register_factory).
pub struct FactoryRegisterer {
    factory: Arc<dyn Factory>,
    registered: bool,
}

impl FactoryRegisterer {
    /// Register a factory for `C` under the component's own type name.
    pub fn new<C: Construct>() -> Self {
        Self::with_factory(Arc::new(ComponentFactory::<C>::new()))
    }

    /// Register a factory for `C` under an explicit type name.
    pub fn named<C: Construct>(type_name: &'static str) -> Self {
        Self::with_factory(Arc::new(ComponentFactory::<C>::named(type_name)))
    }

    /// Register an arbitrary factory.
    pub fn with_factory(factory: Arc<dyn Factory>) -> Self {
        let registered = FactoryRegistry::global().add(factory.clone());
        Self {
            factory,
            registered,
        }
    }

    /// Whether this guard's registration took effect (the type name was not
    /// already taken).
    pub fn registered(&self) -> bool {
        self.registered
    }
}

impl Drop for FactoryRegisterer {
    fn drop(&mut self) {
        if self.registered {
            FactoryRegistry::global().remove(self.factory.as_ref());
        }
    }
}
