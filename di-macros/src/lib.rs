//! Dependency injection macros for trekbot.
//!
//! This crate provides `#[derive(Injectable)]`, which implements the
//! container's `Injectable` trait and adds the type to the startup
//! registration table. By default, generated code references
//! `crate::di::...`; override the path with `#[injectable(crate = "...")]`
//! when deriving outside the trekbot crate.

use proc_macro::TokenStream;

mod attrs;
mod injectable;

/// Derive macro for container-managed types.
///
/// # Attributes
///
/// - `#[injectable(provides(dyn A, dyn B))]`: contracts the type satisfies.
///   `Self` may be listed to also register the type under its own identity.
///   A type providing nothing is always registered under its own identity.
/// - `#[injectable(constructor = "path")]`: zero-argument constructor
///   returning `anyhow::Result<Self>`. Defaults to `Default::default`.
/// - `#[injectable(no_constructor)]`: the type cannot be built without
///   arguments; the registry skips it.
/// - `#[injectable(crate = "path")]`: path to the crate exposing `di`.
/// - `#[inject]` on a field of type `Inject<T>`: injection point.
///
/// # Example
///
/// ```ignore
/// use crate::di::{Inject, Injectable};
///
/// #[derive(Injectable, Default)]
/// #[injectable(provides(dyn CommandService))]
/// pub struct TravelCommandService {
///     #[inject]
///     logger: Inject<dyn Logger>,
/// }
///
/// // Generated implementation:
/// // impl Injectable for TravelCommandService {
/// //     fn descriptor() -> TypeDescriptor {
/// //         TypeDescriptor::concrete::<Self>()
/// //             .constructor(|| Ok(Default::default()))
/// //             .provides::<dyn CommandService>(|this| this)
/// //             .inject::<dyn Logger>("logger", |this| &this.logger)
/// //             .into()
/// //     }
/// // }
/// //
/// // plus an entry in `INJECTABLES`.
/// ```
#[proc_macro_derive(Injectable, attributes(injectable, inject))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    injectable::derive_injectable_impl(input)
}
