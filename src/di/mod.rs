//! Dependency injection infrastructure.
//!
//! This module provides a small runtime container that wires singletons
//! together by type, using the `Injectable` derive macro from `di-macros`.
//!
//! # Overview
//!
//! - `#[derive(Injectable)]`: registers a type in the startup registration
//!   table and describes its constructor, contracts and injection points
//! - `Inject<T>`: a field the container populates after construction
//! - `declare_contract!`: declares a trait object as a known contract
//! - `ContainerBuilder` / `Container`: build the registry once, then resolve
//!   singletons on demand
//!
//! # Example
//!
//! ```ignore
//! use crate::di::{Container, Inject, Injectable};
//!
//! pub trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! #[derive(Injectable, Default)]
//! #[injectable(provides(dyn Greeter))]
//! pub struct DefaultGreeter;
//!
//! #[derive(Injectable, Default)]
//! pub struct Reception {
//!     #[inject]
//!     greeter: Inject<dyn Greeter>,  // populated by the container
//! }
//!
//! // Usage
//! let container = Container::builder().discover().build()?;
//! let reception = container.resolve::<Reception>()?;
//! ```

mod container;
mod descriptor;
mod error;
mod inject;
mod key;
mod macros;
mod options;
mod registry;

pub use container::{Container, ContainerBuilder};
pub use descriptor::{
    ConcreteDescriptor, Injectable, InjectableEntry, InjectionPoint, Instance, TypeDescriptor,
};
pub use error::DiError;
pub use inject::Inject;
pub use key::TypeKey;
pub use options::{AmbiguityPolicy, ContainerOptions, CyclePolicy};
pub use registry::{Binding, Registry};

// Re-exported for code generated by `#[derive(Injectable)]` and `declare_contract!`
#[doc(hidden)]
pub use linkme;

// Re-export derive macro
pub use di_macros::Injectable;

/// Startup registration table.
///
/// Every `#[derive(Injectable)]` type and every `declare_contract!` adds one
/// entry at link time; `ContainerBuilder::discover` scans it.
#[linkme::distributed_slice]
pub static INJECTABLES: [InjectableEntry] = [..];
