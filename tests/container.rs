//! Container behaviour as seen from outside the crate.

use std::sync::Arc;

use trekbot::di::{Container, ContainerBuilder, DiError, Inject, Injectable, TypeKey};

trait Greeter: Send + Sync {
    fn greet(&self) -> String;
}

trait UnregisteredInterface: Send + Sync {}

trait TestService: Send + Sync {
    fn name(&self) -> &'static str;
}

trait AnotherService: Send + Sync {
    fn name(&self) -> &'static str;
}

#[derive(Injectable, Default)]
#[injectable(crate = "trekbot", provides(dyn Greeter))]
struct EnglishGreeter;

impl Greeter for EnglishGreeter {
    fn greet(&self) -> String {
        "Hello".to_string()
    }
}

#[derive(Injectable, Default)]
#[injectable(crate = "trekbot", provides(dyn TestService))]
struct TestServiceImpl;

impl TestService for TestServiceImpl {
    fn name(&self) -> &'static str {
        "test"
    }
}

#[derive(Injectable, Default)]
#[injectable(crate = "trekbot", provides(dyn AnotherService))]
struct AnotherServiceImpl;

impl AnotherService for AnotherServiceImpl {
    fn name(&self) -> &'static str {
        "another"
    }
}

#[derive(Injectable, Default)]
#[injectable(crate = "trekbot")]
struct ServiceWithDependencies {
    #[inject]
    test_service: Inject<dyn TestService>,
    #[inject]
    another_service: Inject<dyn AnotherService>,
}

#[derive(Injectable, Default)]
#[injectable(crate = "trekbot")]
struct Chicken {
    #[inject]
    egg: Inject<Egg>,
}

#[derive(Injectable, Default)]
#[injectable(crate = "trekbot")]
struct Egg {
    #[inject]
    chicken: Inject<Chicken>,
}

#[derive(Injectable, Default)]
#[injectable(crate = "trekbot")]
struct NeedsUnregistered {
    #[inject]
    missing: Inject<dyn UnregisteredInterface>,
}

fn container() -> Container {
    ContainerBuilder::new()
        .register::<EnglishGreeter>()
        .register::<TestServiceImpl>()
        .register::<AnotherServiceImpl>()
        .register::<ServiceWithDependencies>()
        .register::<Chicken>()
        .register::<Egg>()
        .register::<NeedsUnregistered>()
        .build()
        .unwrap()
}

#[test]
fn test_should_register_and_resolve_service() {
    let container = container();

    let greeter = container.resolve::<dyn Greeter>().unwrap();
    assert_eq!(greeter.greet(), "Hello");
}

#[test]
fn test_should_return_same_instance_for_singleton() {
    let container = container();

    let first = container.resolve::<dyn Greeter>().unwrap();
    let second = container.resolve::<dyn Greeter>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_should_inject_dependencies() {
    let container = container();

    let service = container.resolve::<ServiceWithDependencies>().unwrap();
    assert_eq!(service.test_service.name(), "test");
    assert_eq!(service.another_service.name(), "another");
    assert!(Arc::ptr_eq(
        service.test_service.get().unwrap(),
        &container.resolve::<dyn TestService>().unwrap()
    ));
}

#[test]
fn test_should_fail_for_unregistered_interface() {
    let container = container();

    let err = container.resolve::<dyn UnregisteredInterface>()
        .err()
        .expect("resolution should fail");
    assert!(matches!(err, DiError::UnregisteredType { .. }));
    assert!(err.to_string().contains("UnregisteredInterface"));
}

#[test]
fn test_unresolvable_field_discards_owner() {
    let container = container();

    let err = container.resolve::<NeedsUnregistered>()
        .err()
        .expect("resolution should fail");
    assert!(matches!(err, DiError::UnregisteredType { .. }));
    assert!(!container
        .cached_types()
        .unwrap()
        .contains(&TypeKey::of::<NeedsUnregistered>()));
}

#[test]
fn test_mutual_dependencies_terminate() {
    let container = container();

    let chicken = container.resolve::<Chicken>().unwrap();
    let egg = container.resolve::<Egg>().unwrap();
    assert!(Arc::ptr_eq(chicken.egg.get().unwrap(), &egg));
    assert!(Arc::ptr_eq(egg.chicken.get().unwrap(), &chicken));
    assert_eq!(container.cached_instances().unwrap(), 2);
}

#[test]
fn test_discovery_finds_linked_injectables() {
    let container = Container::builder().discover().build().unwrap();

    assert!(container.is_registered::<dyn Greeter>());
    assert!(container.is_registered::<ServiceWithDependencies>());
    assert!(container.is_registered::<dyn trekbot::logger::Logger>());
    assert!(!container.is_registered::<dyn UnregisteredInterface>());

    let service = container.resolve::<ServiceWithDependencies>().unwrap();
    assert_eq!(service.another_service.name(), "another");
}

#[test]
fn test_descriptor_lists_injection_points() {
    let descriptor = ServiceWithDependencies::descriptor();

    let fields: Vec<_> = descriptor
        .injection_points()
        .map(|point| (point.field(), point.dependency()))
        .collect();
    assert_eq!(
        fields,
        vec![
            ("test_service", TypeKey::of::<dyn TestService>()),
            ("another_service", TypeKey::of::<dyn AnotherService>()),
        ]
    );
}
