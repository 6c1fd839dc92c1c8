//! Resolver and injector.
//!
//! The container turns a requested type into a shared, fully injected
//! singleton. Resolution is two-phase: the bare instance is constructed and
//! cached first, then its injection points are populated by resolving each
//! dependency recursively. Caching before populating is what makes mutual
//! dependencies terminate: the second request for a type that is still being
//! populated returns the cached instance instead of constructing it again.
//!
//! # Example
//!
//! ```ignore
//! let container = ContainerBuilder::new()
//!     .discover()
//!     .instance(config)
//!     .build()?;
//!
//! let bot: Arc<Bot> = container.resolve::<Bot>()?;
//! let greeter: Arc<dyn Greeter> = container.resolve::<dyn Greeter>()?;
//! ```

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use super::descriptor::{Injectable, Instance, TypeDescriptor};
use super::error::DiError;
use super::key::TypeKey;
use super::options::{ContainerOptions, CyclePolicy};
use super::registry::{Binding, Registry};
use super::INJECTABLES;

/// Assembles the universe of managed types and builds a [`Container`].
#[derive(Default)]
pub struct ContainerBuilder {
    descriptors: Vec<TypeDescriptor>,
    options: ContainerOptions,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every injectable linked into the binary.
    ///
    /// Discovered types are ordered by type path so the scan, and therefore
    /// the first-wins tie-break, does not depend on link order.
    pub fn discover(mut self) -> Self {
        let mut entries: Vec<_> = INJECTABLES.iter().collect();
        entries.sort_by_key(|entry| entry.name);
        tracing::debug!(count = entries.len(), "Discovered injectables");

        self.descriptors
            .extend(entries.into_iter().map(|entry| (entry.descriptor)()));
        self
    }

    /// Adds `T`; explicit registrations are scanned in call order.
    pub fn register<T: Injectable>(mut self) -> Self {
        self.descriptors.push(T::descriptor());
        self
    }

    /// Adds a hand-written descriptor.
    pub fn descriptor(mut self, descriptor: TypeDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Adds a ready-made singleton, resolvable as `T`.
    pub fn instance<T: Send + Sync + 'static>(mut self, value: T) -> Self {
        self.descriptors.push(TypeDescriptor::instance(value));
        self
    }

    pub fn options(mut self, options: ContainerOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the registry. The container starts with an empty cache.
    pub fn build(self) -> Result<Container, DiError> {
        let registry = Registry::build(self.descriptors, self.options.ambiguity)?;
        Ok(Container {
            registry,
            options: self.options,
            state: Mutex::new(ResolverState::default()),
        })
    }
}

/// Singleton instances and the bookkeeping of the resolution in progress.
#[derive(Default)]
struct ResolverState {
    cache: HashMap<TypeKey, Instance>,
    /// Types constructed but not yet fully injected, outermost first.
    resolving: Vec<TypeKey>,
    /// Cache entries created by the current top-level call.
    created: Vec<TypeKey>,
}

impl ResolverState {
    fn insert(&mut self, key: TypeKey, instance: Instance) {
        self.cache.insert(key, instance);
        self.created.push(key);
    }

    /// Forgets everything the failed call created.
    fn rollback(&mut self) {
        for key in self.created.drain(..) {
            self.cache.remove(&key);
        }
        self.resolving.clear();
    }

    fn cycle_path(&self, key: TypeKey) -> String {
        self.resolving
            .iter()
            .skip_while(|resolving| **resolving != key)
            .chain(std::iter::once(&key))
            .map(TypeKey::name)
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

/// Dependency injection container.
///
/// Holds the immutable registry and the singleton cache. One lock guards the
/// cache for the whole of a top-level `resolve`, so the container can be
/// shared between threads.
pub struct Container {
    registry: Registry,
    options: ContainerOptions,
    state: Mutex<ResolverState>,
}

impl Container {
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    /// Returns the singleton for `T`, constructing and injecting it on first use.
    ///
    /// `T` is either a concrete injectable or a contract such as `dyn Greeter`.
    /// Resolution is all-or-nothing: on error, every instance created during
    /// this call is dropped from the cache. A constructor that panics is
    /// reported as `DiError::Instantiation`.
    pub fn resolve<T>(&self) -> Result<Arc<T>, DiError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let mut state = self.state.lock().map_err(|_| DiError::Poisoned)?;
        state.created.clear();

        let result = Resolution {
            registry: &self.registry,
            state: &mut state,
            cycles: self.options.cycles,
        }
        .resolve::<T>();

        match &result {
            Ok(_) => state.created.clear(),
            Err(err) => {
                tracing::debug!(
                    requested = std::any::type_name::<T>(),
                    discarded = state.created.len(),
                    error = %err,
                    "Resolution failed, rolling back"
                );
                state.rollback();
            }
        }
        result
    }

    /// Whether `T` has a bound implementation.
    pub fn is_registered<T: ?Sized + 'static>(&self) -> bool {
        self.registry.is_bound(TypeKey::of::<T>())
    }

    /// Contract bindings, sorted by contract name.
    pub fn bindings(&self) -> Vec<&Binding> {
        self.registry.bindings()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn options(&self) -> ContainerOptions {
        self.options
    }

    /// Number of live singletons.
    pub fn cached_instances(&self) -> Result<usize, DiError> {
        let state = self.state.lock().map_err(|_| DiError::Poisoned)?;
        Ok(state.cache.len())
    }

    /// Concrete types that currently have a live singleton.
    pub fn cached_types(&self) -> Result<HashSet<TypeKey>, DiError> {
        let state = self.state.lock().map_err(|_| DiError::Poisoned)?;
        Ok(state.cache.keys().copied().collect())
    }
}

/// A resolution in progress, holding the locked state.
///
/// Injection points resolve their dependencies through this context, so
/// nested resolutions never take the lock again.
pub(crate) struct Resolution<'a> {
    registry: &'a Registry,
    state: &'a mut ResolverState,
    cycles: CyclePolicy,
}

impl Resolution<'_> {
    pub(crate) fn resolve<T>(&mut self) -> Result<Arc<T>, DiError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let requested = TypeKey::of::<T>();
        let registry = self.registry;
        let binding = registry.binding(requested)?;
        let implementation = binding.implementation();
        let instance = self.instance(implementation)?;

        binding
            .upcast(instance)
            .and_then(|erased| erased.downcast::<Arc<T>>().ok())
            .map(|shared| *shared)
            .ok_or(DiError::TypeMismatch {
                requested: requested.name(),
                implementation: implementation.name(),
            })
    }

    /// The singleton of a concrete type, creating and populating it if needed.
    fn instance(&mut self, key: TypeKey) -> Result<Instance, DiError> {
        if let Some(cached) = self.state.cache.get(&key) {
            if self.state.resolving.contains(&key) {
                let path = self.state.cycle_path(key);
                match self.cycles {
                    CyclePolicy::Allow => {
                        tracing::debug!(%path, "Cycle resolved to a partially injected instance")
                    }
                    CyclePolicy::Forbid => return Err(DiError::CircularDependency { path }),
                }
            }
            return Ok(Arc::clone(cached));
        }

        let registry = self.registry;
        let implementation = registry
            .implementation(key)
            .ok_or(DiError::UnregisteredType {
                type_name: key.name(),
            })?;

        tracing::debug!(type_name = %implementation.key(), "Constructing");
        // A panicking constructor must not unwind through the held lock
        let instance = panic::catch_unwind(AssertUnwindSafe(|| implementation.construct()))
            .unwrap_or_else(|payload| {
                Err(anyhow::anyhow!(
                    "constructor panicked: {}",
                    panic_message(payload.as_ref())
                ))
            })
            .map_err(|source| DiError::Instantiation {
                type_name: key.name(),
                source,
            })?;

        // Cache before populating so that cycles find this instance
        self.state.insert(key, Arc::clone(&instance));
        self.state.resolving.push(key);

        let populated = implementation.injection_points().iter().try_for_each(|point| {
            tracing::debug!(
                type_name = %key,
                field = point.field(),
                dependency = %point.dependency(),
                "Injecting"
            );
            point.inject(&*instance, self)
        });

        self.state.resolving.pop();
        populated.map(|()| instance)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
