//! Injection point slots.

use std::any::type_name;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use once_cell::sync::OnceCell;

/// A field populated by the container after the owner is constructed.
///
/// Slots start empty and are written exactly once. Writing happens through a
/// shared reference, which lets the container populate an instance that is
/// already cached (and possibly already handed to a dependent in a cycle).
///
/// Dereferencing an empty slot panics. An instance obtained from
/// `Container::resolve` always has its slots populated, except when it is
/// observed through a cycle before its own injection finished.
pub struct Inject<T: ?Sized> {
    cell: OnceCell<Arc<T>>,
}

impl<T: ?Sized> Inject<T> {
    /// An empty slot, waiting for the container.
    pub const fn empty() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// A slot wired by hand, bypassing the container.
    pub fn with(value: Arc<T>) -> Self {
        Self {
            cell: OnceCell::with_value(value),
        }
    }

    /// The injected dependency, if any.
    pub fn get(&self) -> Option<&Arc<T>> {
        self.cell.get()
    }

    /// A new handle to the dependency, for moving into tasks.
    ///
    /// Panics like `Deref` when the slot is empty.
    pub fn shared(&self) -> Arc<T> {
        match self.cell.get() {
            Some(value) => Arc::clone(value),
            None => panic!("dependency {} used before injection", type_name::<T>()),
        }
    }

    pub fn is_injected(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Writes the dependency; hands it back if the slot is already populated.
    pub fn fill(&self, value: Arc<T>) -> Result<(), Arc<T>> {
        self.cell.set(value)
    }
}

impl<T: ?Sized> Default for Inject<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: ?Sized> Deref for Inject<T> {
    type Target = T;

    fn deref(&self) -> &T {
        match self.cell.get() {
            Some(value) => value,
            None => panic!("dependency {} used before injection", type_name::<T>()),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Inject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_injected() {
            "injected"
        } else {
            "empty"
        };
        write!(f, "Inject<{}>({state})", type_name::<T>())
    }
}
