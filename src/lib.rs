//! # wireup - topology-driven dependency injection
//!
//! A container for long-lived object graphs. A *topology* describes, in
//! order, the component instances to create: a type name, an instance id,
//! the ids of dependencies to inject, and a bag of typed configuration.
//! The container instantiates every component eagerly, wires injected
//! references into constructors, and exposes the instances for lookup by
//! interface type and id.
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use wireup::{
//!     Build, ComponentFactory, Construct, Constructor, FactoryRegistry, Registrar, Result,
//!     Topology, TopologyBuilder,
//! };
//!
//! // Interfaces are plain traits.
//! trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! trait Reporter: Send + Sync {
//!     fn report(&self) -> String;
//! }
//!
//! struct FixedClock {
//!     at: u64,
//! }
//!
//! impl Clock for FixedClock {
//!     fn now(&self) -> u64 {
//!         self.at
//!     }
//! }
//!
//! impl Construct for FixedClock {
//!     fn construct(scope: &mut Constructor<'_>) -> Result<Self> {
//!         Ok(Self { at: scope.config::<u64>("at")? })
//!     }
//!
//!     fn register_as(this: &Arc<Self>, registrar: &mut Registrar<'_>) -> Result<()> {
//!         registrar.implements::<dyn Clock>(this.clone())
//!     }
//! }
//!
//! struct ClockReporter {
//!     clock: Arc<dyn Clock>,
//! }
//!
//! impl Reporter for ClockReporter {
//!     fn report(&self) -> String {
//!         format!("t={}", self.clock.now())
//!     }
//! }
//!
//! impl Construct for ClockReporter {
//!     fn construct(scope: &mut Constructor<'_>) -> Result<Self> {
//!         Ok(Self { clock: scope.inject::<dyn Clock>()? })
//!     }
//!
//!     fn register_as(this: &Arc<Self>, registrar: &mut Registrar<'_>) -> Result<()> {
//!         registrar.implements::<dyn Reporter>(this.clone())
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let factories = FactoryRegistry::new();
//! factories.add(Arc::new(ComponentFactory::<FixedClock>::named("clock")));
//! factories.add(Arc::new(ComponentFactory::<ClockReporter>::named("reporter")));
//!
//! let mut topology = Topology::new();
//! let mut builder = TopologyBuilder::new(&mut topology);
//! builder.component("clock", "clock0")?.config("at", 42u64)?;
//! builder.component("reporter", "rep0")?.dependency("clock0");
//!
//! let build = Build::with_factories(&topology, &factories)?;
//! assert_eq!(build.get::<dyn Reporter>("rep0")?.report(), "t=42");
//! # Ok(())
//! # }
//! ```
//!
//! Components are usually registered once per binary with
//! [`register_factory!`] and built through the global
//! [`FactoryRegistry`]; topologies usually come from JSON through
//! [`TopologyLoader`]. Construction order is the topology order (every
//! dependency id must refer to an earlier entry) and teardown runs in
//! strict reverse.

mod build;
mod cast;
mod component;
mod config;
mod error;
mod factory;
mod loader;
#[cfg(feature = "logging")]
pub mod logging;
mod name;
mod registry;
mod topology;

pub use build::Build;
pub use cast::{check, Integral, IntegralType};
pub use component::{Component, Construct, Constructor, Registrar};
pub use config::{Config, ConfigEntry, ConfigValue, FromConfigValue, IntoConfigValue};
pub use error::{Error, Result};
pub use factory::{
    ComponentFactory, Factory, FactoryRegisterer, FactoryRegistry, COMPONENT_FACTORIES,
};
pub use loader::TopologyLoader;
pub use name::TypeName;
pub use registry::{DependencyRegister, DependencyRegistry};
pub use topology::{Topology, TopologyBuilder, TopologyEntry, TopologyEntryBuilder};

#[doc(hidden)]
pub use factory::__private;

/// Identifier of a component instance or dependency reference.
pub type Id = String;

/// Ordered dependency ids of one topology entry.
pub type DependencyIds = Vec<Id>;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Build, Component, ComponentFactory, Construct, Constructor, Error, Factory,
        FactoryRegisterer, FactoryRegistry, Registrar, Result, Topology, TopologyBuilder,
        TopologyLoader,
    };
    pub use std::sync::Arc;
}
