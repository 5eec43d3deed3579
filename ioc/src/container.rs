//! The main `Container` struct and its associated methods.

use crate::context::ResolutionContext;
use crate::core::{Instance, RegisterOptions, Registration, ServiceKey};
use crate::error::{BoxError, Error, Result};
use crate::registry::Registry;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

struct Scope {
  registry: RefCell<Registry>,
  snapshots: RefCell<Vec<Registry>>,
  parent: Option<Weak<Scope>>,
}

/// A registry of named, lazily-instantiated services.
///
/// `Container` is a cheap, clonable handle; clones refer to the same
/// registrations. Children created with [`create_child`](Self::create_child)
/// layer their own registrations over their parent's when resolving. A child
/// only holds a weak reference to its parent, so the parent must be kept alive
/// for as long as the child resolves through it.
///
/// The container is single-threaded and re-entrant: factories may resolve,
/// register or unregister through it while a resolution is running. A
/// running resolution never observes those changes; the next one does.
#[derive(Clone)]
pub struct Container {
  scope: Rc<Scope>,
}

impl Default for Container {
  fn default() -> Self {
    Self::new()
  }
}

impl Container {
  /// Creates a new, empty root `Container`.
  pub fn new() -> Self {
    Self::with_parent(None)
  }

  fn with_parent(parent: Option<Weak<Scope>>) -> Self {
    Self {
      scope: Rc::new(Scope {
        registry: RefCell::new(Registry::default()),
        snapshots: RefCell::new(Vec::new()),
        parent,
      }),
    }
  }

  // --- Scoping ---

  /// Creates an empty child that resolves through this container.
  pub fn create_child(&self) -> Container {
    tracing::debug!("creating child container");
    Self::with_parent(Some(Rc::downgrade(&self.scope)))
  }

  /// The parent of this container, if it has one and it is still alive.
  pub fn parent(&self) -> Option<Container> {
    self
      .scope
      .parent
      .as_ref()
      .and_then(Weak::upgrade)
      .map(|scope| Container { scope })
  }

  /// Whether both handles refer to the same container.
  pub fn ptr_eq(&self, other: &Container) -> bool {
    Rc::ptr_eq(&self.scope, &other.scope)
  }

  fn live_parent(&self) -> Result<Option<Container>> {
    match &self.scope.parent {
      None => Ok(None),
      Some(weak) => weak
        .upgrade()
        .map(|scope| Some(Container { scope }))
        .ok_or(Error::ParentDropped),
    }
  }

  // --- Registration ---

  /// Binds a fixed value.
  pub fn register_constant<T: 'static>(
    &self,
    key: impl Into<ServiceKey>,
    value: T,
    options: RegisterOptions,
  ) -> Result<()> {
    self.register_constant_trait(key, Rc::new(value), options)
  }

  /// Binds an already shared value, which may be a trait object.
  pub fn register_constant_trait<T: ?Sized + 'static>(
    &self,
    key: impl Into<ServiceKey>,
    value: Rc<T>,
    options: RegisterOptions,
  ) -> Result<()> {
    let registration = Registration::constant(
      options.registration_name().to_owned(),
      Instance::from_rc(value),
    );
    self.insert(key.into(), registration, options.is_replace())
  }

  /// Binds a factory producing a `T`.
  ///
  /// The factory receives the resolution context and may resolve its own
  /// dependencies through it. Forwarding a resolution error with `?` keeps it
  /// intact; any other error is reported as [`Error::FactoryFailed`].
  pub fn register_factory<T, F>(
    &self,
    key: impl Into<ServiceKey>,
    factory: F,
    options: RegisterOptions,
  ) -> Result<()>
  where
    T: 'static,
    F: Fn(&mut ResolutionContext) -> Result<T, BoxError> + 'static,
  {
    self.register_factory_trait(key, move |ctx| factory(ctx).map(Rc::new), options)
  }

  /// Binds a factory producing a shared value, which may be a trait object.
  pub fn register_factory_trait<T, F>(
    &self,
    key: impl Into<ServiceKey>,
    factory: F,
    options: RegisterOptions,
  ) -> Result<()>
  where
    T: ?Sized + 'static,
    F: Fn(&mut ResolutionContext) -> Result<Rc<T>, BoxError> + 'static,
  {
    let registration = Registration::factory(
      options.registration_name().to_owned(),
      options.get_lifecycle(),
      Rc::new(move |ctx: &mut ResolutionContext| factory(ctx).map(Instance::from_rc)),
    );
    self.insert(key.into(), registration, options.is_replace())
  }

  fn insert(&self, key: ServiceKey, registration: Registration, replace: bool) -> Result<()> {
    tracing::debug!(
      key = %key,
      name = registration.name(),
      lifecycle = %registration.lifecycle(),
      replace,
      "registering service"
    );
    self.scope.registry.borrow_mut().insert(key, registration, replace)
  }

  /// Removes the registration `name` under `key`, or all of them when `name`
  /// is `None`. With `cascade`, the same removal is applied to every ancestor.
  ///
  /// Returns the number of registrations removed across all affected containers.
  pub fn unregister(&self, key: impl Into<ServiceKey>, name: Option<&str>, cascade: bool) -> usize {
    let key = key.into();
    let mut removed = self.scope.registry.borrow_mut().remove(&key, name);
    tracing::debug!(key = %key, name, removed, cascade, "unregistered service");
    if cascade {
      if let Some(parent) = self.parent() {
        removed += parent.unregister(key, name, true);
      }
    }
    removed
  }

  // --- Queries ---

  /// Whether `key` (under `name`, or under any name when `None`) resolves
  /// from this container or one of its live ancestors.
  pub fn has(&self, key: impl Into<ServiceKey>, name: Option<&str>) -> bool {
    let key = key.into();
    self.scope.registry.borrow().contains(&key, name)
      || self.parent().is_some_and(|parent| parent.has(key, name))
  }

  /// Like [`has`](Self::has), but only looks at this container's own registrations.
  pub fn has_own(&self, key: impl Into<ServiceKey>, name: Option<&str>) -> bool {
    self.scope.registry.borrow().contains(&key.into(), name)
  }

  /// Registration names under `key`, in the order `resolve_all` visits them.
  pub fn get_service_names(&self, key: impl Into<ServiceKey>) -> Result<Vec<String>> {
    Ok(self.effective_registry()?.names(&key.into()))
  }

  /// Every key visible from this container, sorted.
  pub fn keys(&self) -> Result<Vec<ServiceKey>> {
    let registry = self.effective_registry()?;
    let mut keys: Vec<ServiceKey> = registry.keys().cloned().collect();
    keys.sort();
    Ok(keys)
  }

  /// This container's registrations layered over its ancestors'.
  ///
  /// Rebuilt on every call so that a new resolution sees every registration
  /// change made before it started.
  fn effective_registry(&self) -> Result<Registry> {
    let own = self.scope.registry.borrow();
    match self.live_parent()? {
      None => Ok(own.share()),
      Some(parent) => Ok(Registry::layered(parent.effective_registry()?, &own)),
    }
  }

  // --- Resolution ---

  /// Resolves a service as an `Rc<T>` in a fresh resolution context.
  pub fn resolve<T: ?Sized + 'static>(
    &self,
    key: impl Into<ServiceKey>,
    name: Option<&str>,
  ) -> Result<Rc<T>> {
    let key = key.into();
    self.with_context(|ctx| ctx.resolve::<T>(key, name))
  }

  /// Resolves a service without a type check.
  pub fn resolve_instance(
    &self,
    key: impl Into<ServiceKey>,
    name: Option<&str>,
  ) -> Result<Instance> {
    let key = key.into();
    self.with_context(|ctx| ctx.resolve_instance(key, name))
  }

  /// Resolves every registration under `key` in one context, in registry order.
  /// Returns an empty list when the key is absent.
  pub fn resolve_all<T: ?Sized + 'static>(&self, key: impl Into<ServiceKey>) -> Result<Vec<Rc<T>>> {
    let key = key.into();
    self.with_context(|ctx| ctx.resolve_all::<T>(key))
  }

  /// Resolves a fixed list of services inside one context, preserving order.
  ///
  /// `request`-scoped dependencies shared by the members are the same instance.
  pub fn resolve_tuple<K>(&self, services: &[(K, Option<&str>)]) -> Result<Vec<Instance>>
  where
    K: Into<ServiceKey> + Clone,
  {
    self.with_context(|ctx| ctx.resolve_tuple(services))
  }

  /// Runs `f` against one fresh resolution context.
  ///
  /// Use this to resolve several differently-typed services that must share
  /// `request`-scoped instances:
  ///
  /// ```
  /// use scoped_ioc::{Container, RegisterOptions};
  /// use std::rc::Rc;
  ///
  /// struct Conn;
  /// let container = Container::new();
  /// container
  ///   .register_factory("conn", |_| Ok(Conn), RegisterOptions::request())
  ///   .unwrap();
  ///
  /// let (a, b) = container
  ///   .with_context(|ctx| {
  ///     let first = ctx.resolve::<Conn>("conn", None)?;
  ///     let second = ctx.resolve::<Conn>("conn", None)?;
  ///     Ok((first, second))
  ///   })
  ///   .unwrap();
  /// assert!(Rc::ptr_eq(&a, &b));
  /// ```
  ///
  /// Callbacks queued with [`ResolutionContext::delay`] that are still pending
  /// when `f` returns are drained before this call returns.
  pub fn with_context<R>(&self, f: impl FnOnce(&mut ResolutionContext) -> Result<R>) -> Result<R> {
    let mut ctx = ResolutionContext::new(self.effective_registry()?);
    let value = f(&mut ctx)?;
    ctx.drain_deferred()?;
    Ok(value)
  }

  // --- Transactions ---

  /// Pushes a deep copy of this container's own registrations onto the
  /// snapshot stack. With `cascade`, every ancestor does the same.
  pub fn backup(&self, cascade: bool) {
    let snapshot = self.scope.registry.borrow().deep_copy();
    let mut snapshots = self.scope.snapshots.borrow_mut();
    snapshots.push(snapshot);
    tracing::debug!(depth = snapshots.len(), cascade, "backed up registry");
    drop(snapshots);
    if cascade {
      if let Some(parent) = self.parent() {
        parent.backup(true);
      }
    }
  }

  /// Replaces this container's own registrations with the most recent
  /// snapshot, discarding everything registered or memoized since. A no-op
  /// when there is no snapshot. With `cascade`, every ancestor does the same.
  pub fn restore(&self, cascade: bool) {
    let snapshot = self.scope.snapshots.borrow_mut().pop();
    match snapshot {
      Some(snapshot) => {
        let registrations = snapshot.len();
        *self.scope.registry.borrow_mut() = snapshot;
        tracing::debug!(registrations, cascade, "restored registry");
      }
      None => tracing::warn!("restore requested with no backup; ignoring"),
    }
    if cascade {
      if let Some(parent) = self.parent() {
        parent.restore(true);
      }
    }
  }

  /// Number of snapshots waiting to be restored.
  pub fn snapshot_depth(&self) -> usize {
    self.scope.snapshots.borrow().len()
  }
}

impl fmt::Debug for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let registry = self.scope.registry.borrow();
    let mut keys: Vec<&ServiceKey> = registry.keys().collect();
    keys.sort();
    f.debug_struct("Container")
      .field("keys", &keys)
      .field("registrations", &registry.len())
      .field("snapshots", &self.snapshot_depth())
      .field("has_parent", &self.scope.parent.is_some())
      .finish()
  }
}
