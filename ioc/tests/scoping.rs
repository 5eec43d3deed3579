use pretty_assertions::assert_eq;
use scoped_ioc::{Container, Error, RegisterOptions};
use std::rc::Rc;

// --- Test Fixtures ---

struct AppConfig {
  database_url: String,
}

struct DatabaseConnection {
  url: String,
}

fn register_database(container: &Container) {
  container
    .register_factory(
      "db",
      |ctx| {
        let config = ctx.resolve::<AppConfig>("config", None)?;
        Ok(DatabaseConnection {
          url: config.database_url.clone(),
        })
      },
      RegisterOptions::new(),
    )
    .unwrap();
}

fn config(url: &str) -> AppConfig {
  AppConfig {
    database_url: url.to_string(),
  }
}

// --- Scoping Tests ---

#[test]
fn test_child_resolves_parent_only_registration() {
  let parent = Container::new();
  parent
    .register_constant("config", config("postgres://parent"), RegisterOptions::new())
    .unwrap();
  let child = parent.create_child();

  let config = child.resolve::<AppConfig>("config", None).unwrap();

  assert_eq!(config.database_url, "postgres://parent");
  assert!(child.parent().is_some_and(|p| p.ptr_eq(&parent)));
  assert!(parent.parent().is_none());
}

#[test]
fn test_child_override_does_not_affect_parent() {
  // Arrange
  let parent = Container::new();
  parent
    .register_constant("config", config("postgres://parent"), RegisterOptions::new())
    .unwrap();
  register_database(&parent);
  let child = parent.create_child();

  // Act: the child rebinds the config; the parent's factory sees the child's
  // config when resolved through the child.
  child
    .register_constant("config", config("postgres://child"), RegisterOptions::new())
    .unwrap();

  // Assert
  assert_eq!(child.resolve::<DatabaseConnection>("db", None).unwrap().url, "postgres://child");
  assert_eq!(parent.resolve::<DatabaseConnection>("db", None).unwrap().url, "postgres://parent");
}

#[test]
fn test_child_registration_takes_the_parent_slot() {
  let parent = Container::new();
  parent.register_constant("handler", "p-a", RegisterOptions::named("a")).unwrap();
  parent.register_constant("handler", "p-b", RegisterOptions::named("b")).unwrap();
  let child = parent.create_child();
  child.register_constant("handler", "c-c", RegisterOptions::named("c")).unwrap();
  child.register_constant("handler", "c-a", RegisterOptions::named("a")).unwrap();

  let values: Vec<&str> = child
    .resolve_all::<&str>("handler")
    .unwrap()
    .iter()
    .map(|v| **v)
    .collect();

  assert_eq!(values, vec!["c-a", "p-b", "c-c"]);
  assert_eq!(parent.get_service_names("handler").unwrap(), vec!["a", "b"]);
}

#[test]
fn test_grandchild_merges_recursively() {
  let root = Container::new();
  root.register_constant("level", 0_u8, RegisterOptions::new()).unwrap();
  root.register_constant("root_only", 10_u8, RegisterOptions::new()).unwrap();
  let middle = root.create_child();
  middle.register_constant("level", 1_u8, RegisterOptions::new()).unwrap();
  let leaf = middle.create_child();

  assert_eq!(*leaf.resolve::<u8>("level", None).unwrap(), 1);
  assert_eq!(*leaf.resolve::<u8>("root_only", None).unwrap(), 10);
  let keys: Vec<String> = leaf.keys().unwrap().iter().map(ToString::to_string).collect();
  assert_eq!(keys, vec!["level", "root_only"]);
}

#[test]
fn test_parent_registrations_after_child_creation_are_visible() {
  let parent = Container::new();
  let child = parent.create_child();

  assert!(matches!(
    child.resolve::<u8>("late", None),
    Err(Error::ServiceNotFound { .. })
  ));
  parent.register_constant("late", 7_u8, RegisterOptions::new()).unwrap();

  assert_eq!(*child.resolve::<u8>("late", None).unwrap(), 7);
}

#[test]
fn test_singleton_memoized_through_child_is_shared_with_parent() {
  let parent = Container::new();
  parent
    .register_factory("conn", |_| Ok(String::from("conn")), RegisterOptions::singleton())
    .unwrap();
  let child = parent.create_child();

  let via_child = child.resolve::<String>("conn", None).unwrap();
  let via_parent = parent.resolve::<String>("conn", None).unwrap();

  assert!(Rc::ptr_eq(&via_child, &via_parent));
}

#[test]
fn test_unregister_cascade_reaches_ancestors() {
  let parent = Container::new();
  parent.register_constant("svc", 1_u8, RegisterOptions::new()).unwrap();
  let child = parent.create_child();
  child.register_constant("svc", 2_u8, RegisterOptions::new()).unwrap();

  assert_eq!(child.unregister("svc", None, false), 1);
  assert_eq!(*child.resolve::<u8>("svc", None).unwrap(), 1);

  child.register_constant("svc", 2_u8, RegisterOptions::new()).unwrap();
  assert_eq!(child.unregister("svc", Some("default"), true), 2);
  assert!(!child.has("svc", None));
  assert!(!parent.has("svc", None));
}

#[test]
fn test_dropped_parent_is_reported() {
  let parent = Container::new();
  parent.register_constant("svc", 1_u8, RegisterOptions::new()).unwrap();
  let child = parent.create_child();
  child.register_constant("own", 2_u8, RegisterOptions::new()).unwrap();
  drop(parent);

  assert!(child.parent().is_none());
  assert!(child.has("own", None));
  assert!(!child.has("svc", None));
  assert!(matches!(child.resolve::<u8>("own", None), Err(Error::ParentDropped)));
  assert!(matches!(child.get_service_names("own"), Err(Error::ParentDropped)));
  assert!(matches!(child.keys(), Err(Error::ParentDropped)));
}
