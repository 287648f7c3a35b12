//! The container: instantiates a topology and owns the result.

use crate::error::Result;
use crate::factory::FactoryRegistry;
use crate::name::TypeName;
use crate::registry::DependencyRegistry;
use crate::topology::Topology;
use crate::{Component, Id};
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::debug;

/// Instantiates and owns the components defined by a [`Topology`].
///
/// Construction walks the topology in order, dispatching each entry to its
/// factory and wiring injected references through the internal
/// [`DependencyRegistry`]. A failure anywhere aborts construction and tears
/// down whatever was already built, in reverse order. After a successful
/// construction the container is immutable; `has`/`get`/`all` are pure reads
/// and safe to share across threads.
///
/// Teardown is strictly last-in-first-out: the registry releases its shared
/// handles first, then the owning stack pops. Later components may hold
/// references into earlier ones, never the other way around.
pub struct Build {
    // Field order is load-bearing: the registry must drop before the stack so
    // that popping the stack destroys each component.
    registry: DependencyRegistry,
    components: ComponentStack,
}

impl Build {
    /// Instantiate the components defined by `topology`, resolving factories
    /// through the global [`FactoryRegistry`].
    pub fn new(topology: &Topology) -> Result<Build> {
        Self::with_factories(topology, FactoryRegistry::global())
    }

    /// Instantiate against an explicit factory registry.
    pub fn with_factories(topology: &Topology, factories: &FactoryRegistry) -> Result<Build> {
        #[cfg(feature = "logging")]
        debug!(components = topology.len(), "Building topology");

        let mut build = Build {
            registry: DependencyRegistry::new(),
            components: ComponentStack::default(),
        };

        for entry in topology {
            let factory = factories.get(&entry.type_name)?;
            let component = factory.build(
                &entry.id,
                &entry.dependency_ids,
                &entry.config,
                &mut build.registry,
            )?;
            build.components.stack.push(component);
        }

        Ok(build)
    }

    /// `(type name, id)` of every exposed dependency.
    pub fn all(&self) -> Vec<(TypeName, Id)> {
        self.registry.all()
    }

    /// Whether a dependency of the given interface and id is available.
    pub fn has<I>(&self, id: &str) -> bool
    where
        I: ?Sized + Send + Sync + 'static,
    {
        self.registry.has::<I>(id)
    }

    /// The dependency exposed under interface `I` and `id`.
    ///
    /// Propagates [`DependencyRegisterNotFound`](crate::Error::DependencyRegisterNotFound)
    /// / [`DependencyNotFound`](crate::Error::DependencyNotFound) from the
    /// registry.
    pub fn get<I>(&self, id: &str) -> Result<Arc<I>>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        self.registry.get::<I>(id)
    }

    /// All dependencies exposed under interface `I`, in id order.
    pub fn get_all<I>(&self) -> Vec<Arc<I>>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        self.registry.get_all::<I>()
    }

    /// Number of owned components.
    pub fn len(&self) -> usize {
        self.components.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.stack.is_empty()
    }
}

impl std::fmt::Debug for Build {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Build")
            .field("components", &self.len())
            .field("registry", &self.registry)
            .finish()
    }
}

/// Owning stack of constructed components; pops back-to-front on drop so
/// destruction order is the reverse of construction order.
#[derive(Default)]
struct ComponentStack {
    stack: Vec<Arc<dyn Component>>,
}

impl Drop for ComponentStack {
    fn drop(&mut self) {
        while self.stack.pop().is_some() {}
    }
}
