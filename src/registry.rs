//! Registry of constructed dependencies, keyed by interface type and id.
//!
//! A [`DependencyRegister`] tracks the instances exposed under one interface
//! type; the [`DependencyRegistry`] aggregates registers heterogeneously,
//! keyed by [`TypeName`]. Registers hold shared `Arc` handles; exclusive
//! ownership of every component stays with its [`Build`](crate::Build).

use crate::error::{Error, Result};
use crate::name::TypeName;
use crate::Id;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::trace;

/// Record of the dependencies exposed under a single interface type `I`.
pub struct DependencyRegister<I: ?Sized + Send + Sync + 'static> {
    dependencies: BTreeMap<Id, Arc<I>>,
}

impl<I: ?Sized + Send + Sync + 'static> DependencyRegister<I> {
    pub fn new() -> Self {
        Self {
            dependencies: BTreeMap::new(),
        }
    }

    /// Type name of the dependencies tracked by this register.
    pub fn type_name(&self) -> TypeName {
        TypeName::of::<I>()
    }

    /// Register a dependency, failing with [`Error::DependencyDuplicated`]
    /// if the id is already present.
    pub fn add(&mut self, id: Id, dependency: Arc<I>) -> Result<()> {
        if self.dependencies.contains_key(&id) {
            return Err(Error::dependency_duplicated::<I>(id));
        }

        #[cfg(feature = "logging")]
        trace!(interface = %self.type_name(), id = %id, "Registering dependency");

        self.dependencies.insert(id, dependency);
        Ok(())
    }

    /// Whether a dependency of the given id is registered.
    pub fn has(&self, id: &str) -> bool {
        self.dependencies.contains_key(id)
    }

    /// The dependency registered under `id`.
    pub fn get(&self, id: &str) -> Result<Arc<I>> {
        self.dependencies
            .get(id)
            .cloned()
            .ok_or_else(|| Error::dependency_not_found::<I>(id))
    }

    /// All registered dependencies, in id order.
    pub fn get_all(&self) -> Vec<Arc<I>> {
        self.dependencies.values().cloned().collect()
    }

    /// All registered ids, sorted.
    pub fn ids(&self) -> Vec<&Id> {
        self.dependencies.keys().collect()
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }
}

impl<I: ?Sized + Send + Sync + 'static> Default for DependencyRegister<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ?Sized + Send + Sync + 'static> fmt::Display for DependencyRegister<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let type_name = self.type_name();
        let mut ids = self.dependencies.keys();

        if let Some(id) = ids.next() {
            write!(f, "{type_name}{{{id}}}")?;
        }
        for id in ids {
            write!(f, "\n{type_name}{{{id}}}")?;
        }

        Ok(())
    }
}

/// Type-erased view over a `DependencyRegister<I>`, keyed in the registry by
/// the interface's [`TypeName`].
trait AnyRegister: Send + Sync {
    fn type_name(&self) -> TypeName;
    fn len(&self) -> usize;
    fn ids(&self) -> Vec<&Id>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn fmt_entries(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<I: ?Sized + Send + Sync + 'static> AnyRegister for DependencyRegister<I> {
    fn type_name(&self) -> TypeName {
        DependencyRegister::type_name(self)
    }

    fn len(&self) -> usize {
        DependencyRegister::len(self)
    }

    fn ids(&self) -> Vec<&Id> {
        DependencyRegister::ids(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn fmt_entries(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Aggregates [`DependencyRegister`] objects of multiple interface types and
/// resolves any previously registered dependency. Registers are iterated in
/// type-name order.
#[derive(Default)]
pub struct DependencyRegistry {
    registers: BTreeMap<TypeName, Box<dyn AnyRegister>>,
}

impl DependencyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dependency under interface `I`, lazily creating the
    /// register for `I` on first use.
    pub fn add<I>(&mut self, id: Id, dependency: Arc<I>) -> Result<()>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        let register = self
            .registers
            .entry(TypeName::of::<I>())
            .or_insert_with(|| Box::new(DependencyRegister::<I>::new()));

        downcast_mut::<I>(register.as_mut()).add(id, dependency)
    }

    /// Whether a dependency of the given interface and id is registered.
    pub fn has<I>(&self, id: &str) -> bool
    where
        I: ?Sized + Send + Sync + 'static,
    {
        self.register::<I>().is_some_and(|register| register.has(id))
    }

    /// The dependency registered under interface `I` and `id`.
    ///
    /// Fails with [`Error::DependencyRegisterNotFound`] if no dependency of
    /// type `I` was ever registered, [`Error::DependencyNotFound`] if the id
    /// is unknown within the register.
    pub fn get<I>(&self, id: &str) -> Result<Arc<I>>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        self.register::<I>()
            .ok_or_else(|| Error::register_not_found::<I>(id))?
            .get(id)
    }

    /// All dependencies registered under interface `I`, in id order. Empty if
    /// the interface was never seen.
    pub fn get_all<I>(&self) -> Vec<Arc<I>>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        self.register::<I>()
            .map(DependencyRegister::get_all)
            .unwrap_or_default()
    }

    /// `(type name, id)` of every registered dependency; registers in
    /// type-name order, ids sorted within a register.
    pub fn all(&self) -> Vec<(TypeName, Id)> {
        let mut result = Vec::with_capacity(self.registers.values().map(|r| r.len()).sum());

        for register in self.registers.values() {
            let type_name = register.type_name();
            for id in register.ids() {
                result.push((type_name, id.clone()));
            }
        }

        result
    }

    fn register<I>(&self) -> Option<&DependencyRegister<I>>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        self.registers
            .get(&TypeName::of::<I>())
            .map(|register| downcast::<I>(register.as_ref()))
    }
}

// The register stored under TypeName::of::<I>() is created by add::<I> and
// nowhere else, so the concrete type behind the erased box is always
// DependencyRegister<I>; the Any check still verifies it.
fn downcast<I: ?Sized + Send + Sync + 'static>(register: &dyn AnyRegister) -> &DependencyRegister<I> {
    register
        .as_any()
        .downcast_ref::<DependencyRegister<I>>()
        .expect("register stored under a foreign type name")
}

fn downcast_mut<I: ?Sized + Send + Sync + 'static>(
    register: &mut dyn AnyRegister,
) -> &mut DependencyRegister<I> {
    register
        .as_any_mut()
        .downcast_mut::<DependencyRegister<I>>()
        .expect("register stored under a foreign type name")
}

impl fmt::Display for DependencyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut registers = self.registers.values();

        if let Some(register) = registers.next() {
            register.fmt_entries(f)?;
        }
        for register in registers {
            writeln!(f)?;
            register.fmt_entries(f)?;
        }

        Ok(())
    }
}

impl fmt::Debug for DependencyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencyRegistry")
            .field("registers", &self.registers.len())
            .field(
                "dependencies",
                &self.registers.values().map(|r| r.len()).sum::<usize>(),
            )
            .finish()
    }
}
