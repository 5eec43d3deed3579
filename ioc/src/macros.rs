//! Public macros for ergonomic service resolution.
//!
//! Every macro takes the service key first and an optional registration
//! name after it. `trait Name` in place of a type resolves `Rc<dyn Name>`.

/// Resolves a service from a given container, panicking if it cannot.
///
/// # Panics
///
/// Panics with the underlying [`Error`](crate::Error) message if resolution fails.
///
/// # Examples
///
/// ```
/// use scoped_ioc::{resolve_from, Container, RegisterOptions};
///
/// let container = Container::new();
/// container
///   .register_constant("port", 8080_u16, RegisterOptions::named("http"))
///   .unwrap();
///
/// let port = resolve_from!(&container, u16, "port", "http");
/// assert_eq!(*port, 8080);
/// ```
#[macro_export]
macro_rules! resolve_from {
  (@named $container:expr, $type:ty, $key:expr, $name:expr) => {{
    let key: $crate::ServiceKey = ::std::convert::Into::into($key);
    let name: &str = &$name;
    ($container)
      .resolve::<$type>(&key, Some(name))
      .unwrap_or_else(|err| {
        panic!(
          "Failed to resolve required service '{}[{}]' as {}: {}",
          key,
          name,
          std::any::type_name::<$type>(),
          err
        )
      })
  }};

  // resolve_from!(&container, trait MyTrait, "key")
  ($container:expr, trait $trait_ident:ident, $key:expr) => {
    $crate::resolve_from!(@named $container, dyn $trait_ident, $key, $crate::DEFAULT_NAME)
  };

  // resolve_from!(&container, trait MyTrait, "key", "name")
  ($container:expr, trait $trait_ident:ident, $key:expr, $name:expr) => {
    $crate::resolve_from!(@named $container, dyn $trait_ident, $key, $name)
  };

  // resolve_from!(&container, MyService, "key")
  ($container:expr, $type:ty, $key:expr) => {
    $crate::resolve_from!(@named $container, $type, $key, $crate::DEFAULT_NAME)
  };

  // resolve_from!(&container, MyService, "key", "name")
  ($container:expr, $type:ty, $key:expr, $name:expr) => {
    $crate::resolve_from!(@named $container, $type, $key, $name)
  };
}

/// Resolves a service from a given container, returning `None` on any failure.
#[macro_export]
macro_rules! maybe_resolve_from {
  (@named $container:expr, $type:ty, $key:expr, $name:expr) => {{
    let name: &str = &$name;
    ($container).resolve::<$type>($key, Some(name)).ok()
  }};

  ($container:expr, trait $trait_ident:ident, $key:expr) => {
    $crate::maybe_resolve_from!(@named $container, dyn $trait_ident, $key, $crate::DEFAULT_NAME)
  };

  ($container:expr, trait $trait_ident:ident, $key:expr, $name:expr) => {
    $crate::maybe_resolve_from!(@named $container, dyn $trait_ident, $key, $name)
  };

  ($container:expr, $type:ty, $key:expr) => {
    $crate::maybe_resolve_from!(@named $container, $type, $key, $crate::DEFAULT_NAME)
  };

  ($container:expr, $type:ty, $key:expr, $name:expr) => {
    $crate::maybe_resolve_from!(@named $container, $type, $key, $name)
  };
}

/// Resolves a service from this thread's global container.
///
/// This macro is the primary way to pull required dependencies. For a
/// non-panicking version, use [`maybe_resolve!`] or `global().resolve(...)`.
///
/// # Panics
///
/// Panics with the underlying [`Error`](crate::Error) message if resolution fails.
///
/// # Examples
///
/// ```
/// use scoped_ioc::{global, resolve, RegisterOptions};
///
/// global()
///   .register_factory("message", |_| Ok(String::from("hello")), RegisterOptions::singleton())
///   .unwrap();
///
/// let message = resolve!(String, "message");
/// assert_eq!(*message, "hello");
/// ```
///
/// ```
/// use scoped_ioc::{global, resolve, RegisterOptions};
/// use std::rc::Rc;
///
/// trait Greeter { fn greet(&self) -> String; }
/// struct EnglishGreeter;
/// impl Greeter for EnglishGreeter { fn greet(&self) -> String { "Hello!".to_string() } }
///
/// global()
///   .register_factory_trait::<dyn Greeter, _>(
///     "greeter",
///     |_| Ok(Rc::new(EnglishGreeter)),
///     RegisterOptions::named("english"),
///   )
///   .unwrap();
///
/// let greeter = resolve!(trait Greeter, "greeter", "english");
/// assert_eq!(greeter.greet(), "Hello!");
/// ```
#[macro_export]
macro_rules! resolve {
  ($($args:tt)+) => {
    $crate::resolve_from!(&$crate::global(), $($args)+)
  };
}

/// Resolves a service from this thread's global container, returning `None`
/// on any failure.
#[macro_export]
macro_rules! maybe_resolve {
  ($($args:tt)+) => {
    $crate::maybe_resolve_from!(&$crate::global(), $($args)+)
  };
}
