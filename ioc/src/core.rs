//! Core data structures shared by the registry, the resolution context and the container.

use crate::context::ResolutionContext;
use crate::error::BoxError;
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// The registration name used when the caller does not supply one.
pub const DEFAULT_NAME: &str = "default";

/// Identifies a category of interchangeable services.
///
/// Keys are compared by equality only. They are cheap to clone, so they can be
/// passed around freely while building resolution stacks.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceKey(Arc<str>);

impl ServiceKey {
  pub fn new(key: impl AsRef<str>) -> Self {
    Self(Arc::from(key.as_ref()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl From<&str> for ServiceKey {
  fn from(key: &str) -> Self {
    Self::new(key)
  }
}

impl From<String> for ServiceKey {
  fn from(key: String) -> Self {
    Self(Arc::from(key))
  }
}

impl From<&ServiceKey> for ServiceKey {
  fn from(key: &ServiceKey) -> Self {
    key.clone()
  }
}

impl fmt::Display for ServiceKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl fmt::Debug for ServiceKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Key({})", self.0)
  }
}

/// One in-flight `{key, name}` pair on the resolution stack.
///
/// Renders as `key[name]`, which is also the token format used in
/// circular-dependency messages.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ResolutionFrame {
  pub key: ServiceKey,
  pub name: String,
}

impl ResolutionFrame {
  pub fn new(key: impl Into<ServiceKey>, name: Option<&str>) -> Self {
    Self {
      key: key.into(),
      name: name.unwrap_or(DEFAULT_NAME).to_owned(),
    }
  }

  /// Whether this frame is for `key`, and for `name` when one is given.
  pub fn matches(&self, key: &ServiceKey, name: Option<&str>) -> bool {
    &self.key == key && name.map_or(true, |n| n == self.name)
  }
}

impl fmt::Display for ResolutionFrame {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}[{}]", self.key, self.name)
  }
}

impl fmt::Debug for ResolutionFrame {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(self, f)
  }
}

/// Instance reuse policy of a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
  /// The factory runs on every resolution.
  #[default]
  Transient,
  /// The factory runs once; the result is stored on the registration itself.
  Singleton,
  /// The factory runs once per top-level resolution call.
  Request,
}

impl fmt::Display for Lifecycle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Lifecycle::Transient => "transient",
      Lifecycle::Singleton => "singleton",
      Lifecycle::Request => "request",
    })
  }
}

/// A type-erased, reference-counted service value.
///
/// Internally this is an `Rc<dyn Any>` wrapping an `Rc<T>`, which lets `T` be
/// unsized (e.g. `dyn Trait`) while still supporting a checked downcast.
#[derive(Clone)]
pub struct Instance {
  value: Rc<dyn Any>,
  type_name: &'static str,
}

impl Instance {
  pub fn new<T: Any>(value: T) -> Self {
    Self::from_rc(Rc::new(value))
  }

  pub fn from_rc<T: ?Sized + 'static>(value: Rc<T>) -> Self {
    Self {
      value: Rc::new(value),
      type_name: std::any::type_name::<T>(),
    }
  }

  /// Recovers the typed handle, or `None` if the stored type is not `T`.
  pub fn downcast<T: ?Sized + 'static>(&self) -> Option<Rc<T>> {
    self.value.downcast_ref::<Rc<T>>().cloned()
  }

  /// Reference equality: true when both handles point at the same resolved value.
  pub fn ptr_eq(&self, other: &Instance) -> bool {
    Rc::ptr_eq(&self.value, &other.value)
  }

  pub fn type_name(&self) -> &'static str {
    self.type_name
  }
}

impl fmt::Debug for Instance {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Instance({})", self.type_name)
  }
}

pub(crate) type Factory = Rc<dyn Fn(&mut ResolutionContext) -> Result<Instance, BoxError>>;

pub(crate) enum Provider {
  Constant(Instance),
  Factory {
    factory: Factory,
    // Written each time a singleton factory completes.
    memo: RefCell<Option<Instance>>,
  },
}

/// Where a resolution of one registration starts.
pub(crate) enum Source {
  Ready(Instance),
  Factory(Factory),
}

/// One named binding under a service key.
pub(crate) struct Registration {
  name: String,
  lifecycle: Lifecycle,
  provider: Provider,
}

impl Registration {
  pub(crate) fn constant(name: String, instance: Instance) -> Self {
    Self {
      name,
      lifecycle: Lifecycle::Singleton,
      provider: Provider::Constant(instance),
    }
  }

  pub(crate) fn factory(name: String, lifecycle: Lifecycle, factory: Factory) -> Self {
    Self {
      name,
      lifecycle,
      provider: Provider::Factory {
        factory,
        memo: RefCell::new(None),
      },
    }
  }

  pub(crate) fn name(&self) -> &str {
    &self.name
  }

  pub(crate) fn lifecycle(&self) -> Lifecycle {
    self.lifecycle
  }

  /// What resolving this registration starts from: a value that can be handed
  /// out as is, or the factory to run.
  pub(crate) fn source(&self) -> Source {
    match &self.provider {
      Provider::Constant(instance) => Source::Ready(instance.clone()),
      Provider::Factory { factory, memo } => match memo.borrow().as_ref() {
        Some(instance) => Source::Ready(instance.clone()),
        None => Source::Factory(Rc::clone(factory)),
      },
    }
  }

  /// Writes a singleton back into the registration, replacing any value a
  /// re-entrant resolution of the same registration stored first.
  pub(crate) fn memoize(&self, instance: &Instance) {
    if let Provider::Factory { memo, .. } = &self.provider {
      *memo.borrow_mut() = Some(instance.clone());
    }
  }

  /// A copy that shares the factory but owns its own memo cell.
  pub(crate) fn deep_copy(&self) -> Self {
    let provider = match &self.provider {
      Provider::Constant(instance) => Provider::Constant(instance.clone()),
      Provider::Factory { factory, memo } => Provider::Factory {
        factory: Rc::clone(factory),
        memo: RefCell::new(memo.borrow().clone()),
      },
    };
    Self {
      name: self.name.clone(),
      lifecycle: self.lifecycle,
      provider,
    }
  }
}

impl fmt::Debug for Registration {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let kind = match &self.provider {
      Provider::Constant(_) => "constant",
      Provider::Factory { memo, .. } if memo.borrow().is_some() => "factory(memoized)",
      Provider::Factory { .. } => "factory",
    };
    f.debug_struct("Registration")
      .field("name", &self.name)
      .field("lifecycle", &self.lifecycle)
      .field("kind", &kind)
      .finish()
  }
}

/// Per-call registration settings.
///
/// ```
/// use scoped_ioc::{Lifecycle, RegisterOptions};
///
/// let options = RegisterOptions::named("primary")
///   .lifecycle(Lifecycle::Singleton)
///   .replace(true);
/// assert_eq!(options.registration_name(), "primary");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RegisterOptions {
  name: Option<String>,
  replace: bool,
  lifecycle: Lifecycle,
}

impl RegisterOptions {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn named(name: impl Into<String>) -> Self {
    Self::new().name(name)
  }

  pub fn singleton() -> Self {
    Self::new().lifecycle(Lifecycle::Singleton)
  }

  pub fn request() -> Self {
    Self::new().lifecycle(Lifecycle::Request)
  }

  pub fn name(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }

  /// Allow overwriting an existing registration with the same name.
  pub fn replace(mut self, replace: bool) -> Self {
    self.replace = replace;
    self
  }

  /// Ignored for constant registrations.
  pub fn lifecycle(mut self, lifecycle: Lifecycle) -> Self {
    self.lifecycle = lifecycle;
    self
  }

  pub fn registration_name(&self) -> &str {
    self.name.as_deref().unwrap_or(DEFAULT_NAME)
  }

  pub fn is_replace(&self) -> bool {
    self.replace
  }

  pub fn get_lifecycle(&self) -> Lifecycle {
    self.lifecycle
  }
}
