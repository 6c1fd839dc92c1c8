//! Errors raised while building the registry or resolving instances.

use thiserror::Error;

/// Dependency injection failures.
///
/// Every variant is fatal to the caller of `resolve`; the container never
/// retries and rolls back whatever the failed call created.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DiError {
    #[error("No implementation registered for: {type_name}")]
    UnregisteredType { type_name: &'static str },

    #[error("Could not instantiate service: {type_name}")]
    Instantiation {
        type_name: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("Could not set field '{field}' on '{type_name}': {reason}")]
    Injection {
        type_name: &'static str,
        field: &'static str,
        reason: String,
    },

    #[error("Circular dependency: {path}")]
    CircularDependency { path: String },

    #[error("Contract {contract} is provided by both {existing} and {candidate}")]
    AmbiguousBinding {
        contract: &'static str,
        existing: &'static str,
        candidate: &'static str,
    },

    #[error("Instance of {implementation} cannot be used as {requested}")]
    TypeMismatch {
        requested: &'static str,
        implementation: &'static str,
    },

    #[error("Container state is poisoned by a panic in an earlier resolution")]
    Poisoned,
}

impl DiError {
    /// Name of the type the failure is about, when there is one.
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            DiError::UnregisteredType { type_name }
            | DiError::Instantiation { type_name, .. }
            | DiError::Injection { type_name, .. } => Some(type_name),
            DiError::AmbiguousBinding { contract, .. } => Some(contract),
            DiError::TypeMismatch { requested, .. } => Some(requested),
            DiError::CircularDependency { .. } | DiError::Poisoned => None,
        }
    }
}
