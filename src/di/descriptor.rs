//! Type descriptors: what the registry knows about each managed type.
//!
//! A descriptor is the reflection-free stand-in for a scanned class: it says
//! whether the type is abstract, how to construct it without arguments, which
//! contracts it satisfies and which of its fields are injection points.
//! Descriptors are normally generated by `#[derive(Injectable)]`.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use super::container::Resolution;
use super::error::DiError;
use super::inject::Inject;
use super::key::TypeKey;

/// Type-erased shared instance, as stored in the instance cache.
pub type Instance = Arc<dyn Any + Send + Sync>;

pub(crate) type Constructor = Box<dyn Fn() -> anyhow::Result<Instance> + Send + Sync>;
type Upcast = Box<dyn Fn(Instance) -> Option<Box<dyn Any + Send + Sync>> + Send + Sync>;
type Fill =
    Box<dyn Fn(&(dyn Any + Send + Sync), &mut Resolution<'_>) -> Result<(), DiError> + Send + Sync>;

/// A type the container can manage.
///
/// Implemented by `#[derive(Injectable)]`; hand-written impls are fine too.
pub trait Injectable: Send + Sync + 'static {
    fn descriptor() -> TypeDescriptor;
}

/// Whether a descriptor can be instantiated.
pub(crate) enum Kind {
    /// A contract; never instantiated.
    Abstract,
    /// A concrete type, with its zero-argument constructor if it has one.
    Concrete(Option<Constructor>),
}

/// Registration record for one type.
pub struct TypeDescriptor {
    key: TypeKey,
    pub(crate) kind: Kind,
    pub(crate) contracts: Vec<ContractBinding>,
    /// Binding under the type's own identity, used when it provides no contract.
    pub(crate) own: Option<ContractBinding>,
    pub(crate) injection_points: Vec<InjectionPoint>,
}

impl TypeDescriptor {
    /// Describes an abstract contract such as `dyn Greeter`.
    pub fn contract<C: ?Sized + 'static>() -> Self {
        Self {
            key: TypeKey::of::<C>(),
            kind: Kind::Abstract,
            contracts: Vec::new(),
            own: None,
            injection_points: Vec::new(),
        }
    }

    /// Starts describing the concrete type `S`.
    pub fn concrete<S: Send + Sync + 'static>() -> ConcreteDescriptor<S> {
        ConcreteDescriptor {
            inner: Self {
                key: TypeKey::of::<S>(),
                kind: Kind::Concrete(None),
                contracts: Vec::new(),
                own: Some(ContractBinding::new::<S, S>(|this| this)),
                injection_points: Vec::new(),
            },
            _marker: PhantomData,
        }
    }

    /// Describes a ready-made singleton registered under its own type.
    pub fn instance<S: Send + Sync + 'static>(value: S) -> Self {
        let instance: Instance = Arc::new(value);
        let mut descriptor = Self::concrete::<S>().build();
        descriptor.kind = Kind::Concrete(Some(Box::new(move || Ok(Arc::clone(&instance)))));
        descriptor
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn is_abstract(&self) -> bool {
        matches!(self.kind, Kind::Abstract)
    }

    /// Whether the type can be built without arguments.
    pub fn is_constructible(&self) -> bool {
        matches!(self.kind, Kind::Concrete(Some(_)))
    }

    /// Contracts this type satisfies, in declaration order.
    pub fn contracts(&self) -> impl Iterator<Item = TypeKey> + '_ {
        self.contracts.iter().map(|binding| binding.contract)
    }

    /// Fields the container populates, in declaration order.
    pub fn injection_points(&self) -> impl Iterator<Item = &InjectionPoint> {
        self.injection_points.iter()
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("key", &self.key)
            .field("abstract", &self.is_abstract())
            .field("constructible", &self.is_constructible())
            .field("contracts", &self.contracts().collect::<Vec<_>>())
            .field("injection_points", &self.injection_points)
            .finish()
    }
}

/// Typed builder for a concrete type's descriptor.
///
/// Keeping `S` in the type means constructors, upcasts and slot accessors
/// cannot be attached to the wrong type.
pub struct ConcreteDescriptor<S> {
    inner: TypeDescriptor,
    _marker: PhantomData<fn() -> S>,
}

impl<S: Send + Sync + 'static> ConcreteDescriptor<S> {
    /// Sets the zero-argument constructor.
    pub fn constructor(mut self, construct: fn() -> anyhow::Result<S>) -> Self {
        self.inner.kind = Kind::Concrete(Some(Box::new(move || {
            construct().map(|value| Arc::new(value) as Instance)
        })));
        self
    }

    /// Declares that `S` satisfies contract `C`.
    ///
    /// `upcast` is the unsizing conversion, e.g. `|this| this` coerced to
    /// `fn(Arc<S>) -> Arc<dyn Greeter>`.
    pub fn provides<C>(mut self, upcast: fn(Arc<S>) -> Arc<C>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.inner
            .contracts
            .push(ContractBinding::new::<S, C>(upcast));
        self
    }

    /// Declares the injection point `field`, reached through `slot`.
    pub fn inject<D>(mut self, field: &'static str, slot: fn(&S) -> &Inject<D>) -> Self
    where
        D: ?Sized + Send + Sync + 'static,
    {
        let owner = TypeKey::of::<S>();
        let fill: Fill = Box::new(
            move |instance: &(dyn Any + Send + Sync), resolution: &mut Resolution<'_>| {
                let this = instance
                    .downcast_ref::<S>()
                    .ok_or_else(|| DiError::Injection {
                        type_name: owner.name(),
                        field,
                        reason: "instance is not of the declaring type".to_string(),
                    })?;
                let dependency = resolution.resolve::<D>()?;
                slot(this).fill(dependency).map_err(|_| DiError::Injection {
                    type_name: owner.name(),
                    field,
                    reason: "field is already populated".to_string(),
                })
            },
        );
        self.inner.injection_points.push(InjectionPoint {
            field,
            dependency: TypeKey::of::<D>(),
            fill,
        });
        self
    }

    pub fn build(self) -> TypeDescriptor {
        self.inner
    }
}

impl<S: Send + Sync + 'static> From<ConcreteDescriptor<S>> for TypeDescriptor {
    fn from(builder: ConcreteDescriptor<S>) -> Self {
        builder.build()
    }
}

/// A contract satisfied by a concrete type, with the conversion to it.
pub(crate) struct ContractBinding {
    pub(crate) contract: TypeKey,
    pub(crate) upcast: Upcast,
}

impl ContractBinding {
    fn new<S, C>(upcast: fn(Arc<S>) -> Arc<C>) -> Self
    where
        S: Send + Sync + 'static,
        C: ?Sized + Send + Sync + 'static,
    {
        Self {
            contract: TypeKey::of::<C>(),
            upcast: Box::new(move |instance: Instance| {
                let concrete = instance.downcast::<S>().ok()?;
                Some(Box::new(upcast(concrete)) as Box<dyn Any + Send + Sync>)
            }),
        }
    }
}

/// A field the container writes after construction.
pub struct InjectionPoint {
    field: &'static str,
    dependency: TypeKey,
    fill: Fill,
}

impl InjectionPoint {
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Declared type of the field's dependency.
    pub fn dependency(&self) -> TypeKey {
        self.dependency
    }

    pub(crate) fn inject(
        &self,
        instance: &(dyn Any + Send + Sync),
        resolution: &mut Resolution<'_>,
    ) -> Result<(), DiError> {
        (self.fill)(instance, resolution)
    }
}

impl fmt::Debug for InjectionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.dependency)
    }
}

/// Entry in the startup registration table.
///
/// `#[derive(Injectable)]` submits one of these per type into
/// [`INJECTABLES`](super::INJECTABLES).
pub struct InjectableEntry {
    /// Path of the type, used to order discovery deterministically.
    pub name: &'static str,
    /// Produces the type's descriptor.
    pub descriptor: fn() -> TypeDescriptor,
}
