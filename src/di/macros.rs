//! Macro for declaring contracts.

/// Declares a trait object as a contract known to the container.
///
/// Declaring is optional: implementations bind their contracts on their own.
/// A declared contract without any implementation shows up in
/// `Registry::unimplemented`, which makes a missing `#[derive(Injectable)]`
/// easy to spot.
///
/// # Usage
///
/// ```ignore
/// pub trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// declare_contract!(GREETER_CONTRACT, dyn Greeter);
/// ```
#[macro_export]
macro_rules! declare_contract {
    ($name:ident, $contract:ty) => {
        #[$crate::di::linkme::distributed_slice($crate::di::INJECTABLES)]
        #[linkme(crate = $crate::di::linkme)]
        static $name: $crate::di::InjectableEntry = $crate::di::InjectableEntry {
            name: stringify!($contract),
            descriptor: || $crate::di::TypeDescriptor::contract::<$contract>(),
        };
    };
}

#[cfg(test)]
mod tests {
    use crate::di::{Container, DiError, TypeKey, INJECTABLES};

    trait Unimplemented: Send + Sync {}

    crate::declare_contract!(UNIMPLEMENTED_CONTRACT, dyn Unimplemented);

    #[test]
    fn test_declared_contract_is_discovered() {
        assert!(INJECTABLES
            .iter()
            .any(|entry| entry.name == "dyn Unimplemented"));

        let container = Container::builder().discover().build().unwrap();
        assert!(container
            .registry()
            .unimplemented()
            .contains(&TypeKey::of::<dyn Unimplemented>()));
        assert!(matches!(
            container.resolve::<dyn Unimplemented>(),
            Err(DiError::UnregisteredType { .. })
        ));
    }
}
