//! Tests for the resolution macros and the per-thread global container:
//! - `resolve!` / `maybe_resolve!` against `global()`
//! - `resolve_from!` / `maybe_resolve_from!` against an explicit `Container`

use scoped_ioc::{
  global, maybe_resolve, maybe_resolve_from, resolve, resolve_from, with_global, Container,
  RegisterOptions,
};
use std::rc::Rc;

// --- Test Fixtures ---

struct MacroTestService {
  value: i32,
}
trait MacroTestTrait {
  fn value(&self) -> i32;
}
impl MacroTestTrait for MacroTestService {
  fn value(&self) -> i32 {
    self.value
  }
}
struct UnregisteredService;

// Tests may share a thread (and so a global container), hence `replace`.
fn populate(container: &Container, base: i32) {
  container
    .register_factory(
      "svc",
      move |_| Ok(MacroTestService { value: base }),
      RegisterOptions::singleton().replace(true),
    )
    .unwrap();
  container
    .register_factory(
      "svc",
      move |_| Ok(MacroTestService { value: base + 1 }),
      RegisterOptions::named("named").replace(true),
    )
    .unwrap();
  container
    .register_factory_trait::<dyn MacroTestTrait, _>(
      "svc_trait",
      move |_| Ok(Rc::new(MacroTestService { value: base + 2 })),
      RegisterOptions::new().replace(true),
    )
    .unwrap();
  container
    .register_factory_trait::<dyn MacroTestTrait, _>(
      "svc_trait",
      move |_| Ok(Rc::new(MacroTestService { value: base + 3 })),
      RegisterOptions::named("named_trait").replace(true),
    )
    .unwrap();
}

// --- Global Macro Tests ---

#[test]
fn test_maybe_resolve_global() {
  // Arrange
  populate(&global(), 42);

  // Act & Assert: Success cases
  assert_eq!(maybe_resolve!(MacroTestService, "svc").unwrap().value, 42);
  assert_eq!(maybe_resolve!(MacroTestService, "svc", "named").unwrap().value, 43);
  assert_eq!(maybe_resolve!(trait MacroTestTrait, "svc_trait").unwrap().value(), 44);
  assert_eq!(
    maybe_resolve!(trait MacroTestTrait, "svc_trait", "named_trait")
      .unwrap()
      .value(),
    45
  );

  // Act & Assert: Failure cases
  assert!(maybe_resolve!(UnregisteredService, "unregistered").is_none());
  assert!(maybe_resolve!(MacroTestService, "svc", "missing_name").is_none());
  assert!(maybe_resolve!(String, "svc").is_none());
  trait MissingTrait {}
  assert!(maybe_resolve!(trait MissingTrait, "missing_trait").is_none());
}

#[test]
fn test_resolve_global_singleton() {
  populate(&global(), 10);

  let r1 = resolve!(MacroTestService, "svc");
  let r2 = resolve!(MacroTestService, "svc");

  assert_eq!(r1.value, 10);
  assert!(Rc::ptr_eq(&r1, &r2));
}

#[test]
#[should_panic(expected = "Failed to resolve required service 'unregistered[default]'")]
fn test_resolve_panics_on_missing() {
  resolve!(UnregisteredService, "unregistered");
}

#[test]
fn test_global_is_shared_per_thread() {
  global()
    .register_constant("thread_marker", 1_u8, RegisterOptions::new().replace(true))
    .unwrap();

  assert!(with_global(|container| container.has("thread_marker", None)));

  let other_thread = std::thread::spawn(|| global().has("thread_marker", None))
    .join()
    .unwrap();
  assert!(!other_thread);
}

// --- `_from` Macro Tests ---

#[test]
fn test_macros_with_custom_container() {
  // Arrange
  let container = Container::new();
  populate(&container, 100);

  // Act & Assert with maybe_resolve_from!
  assert_eq!(maybe_resolve_from!(&container, MacroTestService, "svc").unwrap().value, 100);
  assert_eq!(
    maybe_resolve_from!(&container, MacroTestService, "svc", "named")
      .unwrap()
      .value,
    101
  );
  assert!(maybe_resolve_from!(&container, UnregisteredService, "unregistered").is_none());

  // Act & Assert with resolve_from!
  assert_eq!(resolve_from!(&container, trait MacroTestTrait, "svc_trait").value(), 102);
  assert_eq!(
    resolve_from!(&container, trait MacroTestTrait, "svc_trait", "named_trait").value(),
    103
  );
}

#[test]
#[should_panic(expected = "Failed to resolve required service 'svc_trait[default]'")]
fn test_resolve_from_panics_on_missing_in_custom_container() {
  let container = Container::new();
  trait MissingTrait {}
  resolve_from!(&container, trait MissingTrait, "svc_trait");
}
