//! Contract to implementation registry.
//!
//! Built once from the scanned descriptors and read-only afterwards.
//!
//! # Scan rules
//!
//! - Abstract descriptors are never implementations. They leave a *declared*
//!   entry behind so that resolving an unimplemented contract can be told
//!   apart from resolving something nobody ever mentioned.
//! - Concrete descriptors without a zero-argument constructor are skipped and
//!   logged. Requesting them later fails with `UnregisteredType`.
//! - A contract that is missing or only declared is bound to the concrete type
//!   being scanned. A contract already bound to a concrete type keeps its
//!   binding; the newcomer is ignored or rejected per [`AmbiguityPolicy`].
//! - A concrete type providing no contract is bound under its own identity.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use super::descriptor::{Constructor, ContractBinding, Instance, InjectionPoint, Kind};
use super::error::DiError;
use super::key::TypeKey;
use super::options::AmbiguityPolicy;
use super::TypeDescriptor;

enum Entry {
    Declared,
    Bound(Binding),
}

/// A contract bound to the concrete type that implements it.
pub struct Binding {
    contract: TypeKey,
    implementation: TypeKey,
    binding: ContractBinding,
}

impl Binding {
    pub fn contract(&self) -> TypeKey {
        self.contract
    }

    pub fn implementation(&self) -> TypeKey {
        self.implementation
    }

    /// Views an instance of the implementation as the contract.
    ///
    /// The returned box holds an `Arc<C>` for contract `C`.
    pub(crate) fn upcast(&self, instance: Instance) -> Option<Box<dyn Any + Send + Sync>> {
        (self.binding.upcast)(instance)
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.contract, self.implementation)
    }
}

/// A constructible concrete type.
pub(crate) struct Implementation {
    key: TypeKey,
    constructor: Constructor,
    injection_points: Vec<InjectionPoint>,
}

impl Implementation {
    pub(crate) fn key(&self) -> TypeKey {
        self.key
    }

    pub(crate) fn construct(&self) -> anyhow::Result<Instance> {
        (self.constructor)()
    }

    pub(crate) fn injection_points(&self) -> &[InjectionPoint] {
        &self.injection_points
    }
}

/// Immutable mapping from contracts to implementations.
pub struct Registry {
    entries: HashMap<TypeKey, Entry>,
    implementations: HashMap<TypeKey, Implementation>,
}

impl Registry {
    /// Builds the registry from descriptors in scan order.
    ///
    /// Only fails under [`AmbiguityPolicy::Reject`].
    pub fn build<I>(descriptors: I, ambiguity: AmbiguityPolicy) -> Result<Self, DiError>
    where
        I: IntoIterator<Item = TypeDescriptor>,
    {
        let mut registry = Self {
            entries: HashMap::new(),
            implementations: HashMap::new(),
        };

        for descriptor in descriptors {
            registry.scan(descriptor, ambiguity)?;
        }

        tracing::info!(
            contracts = registry.len(),
            implementations = registry.implementations.len(),
            "Registry built"
        );
        Ok(registry)
    }

    fn scan(&mut self, descriptor: TypeDescriptor, ambiguity: AmbiguityPolicy) -> Result<(), DiError> {
        let key = descriptor.key();
        let TypeDescriptor {
            kind,
            contracts,
            own,
            injection_points,
            ..
        } = descriptor;

        let constructor = match kind {
            Kind::Abstract => {
                self.entries.entry(key).or_insert_with(|| {
                    tracing::debug!(contract = %key, "Declared contract");
                    Entry::Declared
                });
                return Ok(());
            }
            Kind::Concrete(None) => {
                tracing::warn!(
                    type_name = %key,
                    "Skipping injectable without a zero-argument constructor"
                );
                return Ok(());
            }
            Kind::Concrete(Some(constructor)) => constructor,
        };

        if self.implementations.contains_key(&key) {
            tracing::debug!(type_name = %key, "Injectable scanned twice, keeping the first");
            return Ok(());
        }

        if contracts.is_empty() {
            if let Some(own) = own {
                self.bind(own, key, ambiguity)?;
            }
        } else {
            for binding in contracts {
                self.bind(binding, key, ambiguity)?;
            }
        }

        self.implementations.insert(
            key,
            Implementation {
                key,
                constructor,
                injection_points,
            },
        );
        Ok(())
    }

    fn bind(
        &mut self,
        binding: ContractBinding,
        implementation: TypeKey,
        ambiguity: AmbiguityPolicy,
    ) -> Result<(), DiError> {
        let contract = binding.contract;

        if let Some(Entry::Bound(existing)) = self.entries.get(&contract) {
            let kept = existing.implementation;
            return match ambiguity {
                AmbiguityPolicy::FirstWins => {
                    tracing::warn!(
                        contract = %contract,
                        kept = %kept,
                        ignored = %implementation,
                        "Contract already bound, ignoring later implementation"
                    );
                    Ok(())
                }
                AmbiguityPolicy::Reject => Err(DiError::AmbiguousBinding {
                    contract: contract.name(),
                    existing: kept.name(),
                    candidate: implementation.name(),
                }),
            };
        }

        tracing::debug!(contract = %contract, implementation = %implementation, "Bound contract");
        self.entries.insert(
            contract,
            Entry::Bound(Binding {
                contract,
                implementation,
                binding,
            }),
        );
        Ok(())
    }

    /// Binding for a requested type.
    pub fn binding(&self, requested: TypeKey) -> Result<&Binding, DiError> {
        match self.entries.get(&requested) {
            Some(Entry::Bound(binding)) => Ok(binding),
            Some(Entry::Declared) => {
                tracing::debug!(contract = %requested, "Contract declared but never implemented");
                Err(DiError::UnregisteredType {
                    type_name: requested.name(),
                })
            }
            None => Err(DiError::UnregisteredType {
                type_name: requested.name(),
            }),
        }
    }

    pub(crate) fn implementation(&self, key: TypeKey) -> Option<&Implementation> {
        self.implementations.get(&key)
    }

    /// Whether `key` resolves to an implementation.
    pub fn is_bound(&self, key: TypeKey) -> bool {
        matches!(self.entries.get(&key), Some(Entry::Bound(_)))
    }

    /// All bindings, sorted by contract name.
    pub fn bindings(&self) -> Vec<&Binding> {
        let mut bindings: Vec<&Binding> = self
            .entries
            .values()
            .filter_map(|entry| match entry {
                Entry::Bound(binding) => Some(binding),
                Entry::Declared => None,
            })
            .collect();
        bindings.sort_by_key(|binding| binding.contract.name());
        bindings
    }

    /// Declared contracts nobody implements, sorted by name.
    pub fn unimplemented(&self) -> Vec<TypeKey> {
        let mut declared: Vec<TypeKey> = self
            .entries
            .iter()
            .filter(|(_, entry)| matches!(entry, Entry::Declared))
            .map(|(key, _)| *key)
            .collect();
        declared.sort_by_key(|key| key.name());
        declared
    }

    /// Number of bound contracts.
    pub fn len(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| matches!(entry, Entry::Bound(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("bindings", &self.bindings())
            .field("unimplemented", &self.unimplemented())
            .finish()
    }
}
