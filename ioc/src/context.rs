//! The per-call resolution engine handed to every factory.

use crate::core::{Instance, Lifecycle, Registration, ResolutionFrame, ServiceKey, Source};
use crate::error::{BoxError, Error, Result};
use crate::registry::Registry;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;

type Deferred = Box<dyn FnOnce(&mut ResolutionContext) -> Result<(), BoxError>>;

/// Walks the dependency graph for one top-level resolution call.
///
/// A fresh context is built by the [`Container`](crate::Container) for every
/// `resolve`, `resolve_all`, `resolve_tuple` and `with_context` call. It sees
/// the effective registry as it was when the call started, caches `request`
/// and `singleton` instances for the duration of the call, and tracks the
/// stack of in-flight services. Factories receive it as their only argument
/// and must not keep it beyond the call.
pub struct ResolutionContext {
  registry: Registry,
  cache: HashMap<ResolutionFrame, Instance>,
  stack: Vec<ResolutionFrame>,
  deferred: VecDeque<Deferred>,
}

impl ResolutionContext {
  pub(crate) fn new(registry: Registry) -> Self {
    Self {
      registry,
      cache: HashMap::new(),
      stack: Vec::new(),
      deferred: VecDeque::new(),
    }
  }

  // --- Resolution ---

  /// Resolves `key` under `name` (or `"default"`) as an `Rc<T>`.
  pub fn resolve<T: ?Sized + 'static>(
    &mut self,
    key: impl Into<ServiceKey>,
    name: Option<&str>,
  ) -> Result<Rc<T>> {
    let frame = ResolutionFrame::new(key, name);
    let instance = self.resolve_frame(frame.clone())?;
    downcast(&instance, frame)
  }

  /// Resolves without a type check.
  pub fn resolve_instance(
    &mut self,
    key: impl Into<ServiceKey>,
    name: Option<&str>,
  ) -> Result<Instance> {
    self.resolve_frame(ResolutionFrame::new(key, name))
  }

  /// Resolves every registration under `key`, in registry order.
  ///
  /// An absent key yields an empty list rather than an error.
  pub fn resolve_all<T: ?Sized + 'static>(
    &mut self,
    key: impl Into<ServiceKey>,
  ) -> Result<Vec<Rc<T>>> {
    let key = key.into();
    self
      .resolve_all_instances(&key)?
      .into_iter()
      .map(|(frame, instance)| downcast(&instance, frame))
      .collect()
  }

  fn resolve_all_instances(
    &mut self,
    key: &ServiceKey,
  ) -> Result<Vec<(ResolutionFrame, Instance)>> {
    let frames: Vec<ResolutionFrame> = self
      .registry
      .names(key)
      .into_iter()
      .map(|name| ResolutionFrame {
        key: key.clone(),
        name,
      })
      .collect();
    frames
      .into_iter()
      .map(|frame| {
        let instance = self.resolve_frame(frame.clone())?;
        Ok((frame, instance))
      })
      .collect()
  }

  /// Resolves a fixed list of services in order, sharing request-scoped instances.
  pub fn resolve_tuple<K>(&mut self, services: &[(K, Option<&str>)]) -> Result<Vec<Instance>>
  where
    K: Into<ServiceKey> + Clone,
  {
    services
      .iter()
      .map(|(key, name)| self.resolve_instance(key.clone(), *name))
      .collect()
  }

  /// Whether the effective registry this context resolves against has a binding.
  pub fn has(&self, key: impl Into<ServiceKey>, name: Option<&str>) -> bool {
    self.registry.contains(&key.into(), name)
  }

  // --- Introspection ---

  /// The in-flight frames, outermost first. The last frame is the service
  /// whose factory is currently running.
  pub fn stack(&self) -> &[ResolutionFrame] {
    &self.stack
  }

  /// Whether `key` (and `name`, if given) is being resolved further up the
  /// stack than the current factory.
  pub fn is_resolving_for(&self, key: impl Into<ServiceKey>, name: Option<&str>) -> bool {
    let key = key.into();
    self.ancestors().iter().any(|frame| frame.matches(&key, name))
  }

  /// Whether the frame directly below the current one is `key` (and `name`).
  ///
  /// This is what a factory checks to recognise its own parent calling back
  /// into it, e.g. to wire a back-reference through [`delay`](Self::delay).
  pub fn is_directly_resolving_for(&self, key: impl Into<ServiceKey>, name: Option<&str>) -> bool {
    let key = key.into();
    self
      .ancestors()
      .last()
      .is_some_and(|frame| frame.matches(&key, name))
  }

  fn ancestors(&self) -> &[ResolutionFrame] {
    match self.stack.split_last() {
      Some((_, rest)) => rest,
      None => &[],
    }
  }

  // --- Deferred work ---

  /// Queues `callback` to run when the next resolution in this context completes.
  ///
  /// The queue is shared by the whole call: whichever `resolve` returns first
  /// drains everything queued so far, oldest first, including callbacks
  /// queued while draining.
  pub fn delay<F>(&mut self, callback: F)
  where
    F: FnOnce(&mut ResolutionContext) -> Result<(), BoxError> + 'static,
  {
    self.deferred.push_back(Box::new(callback));
  }

  pub(crate) fn drain_deferred(&mut self) -> Result<()> {
    if !self.deferred.is_empty() {
      tracing::trace!(pending = self.deferred.len(), "draining deferred callbacks");
    }
    while let Some(callback) = self.deferred.pop_front() {
      callback(self).map_err(|err| Error::from_boxed(err, &self.stack))?;
    }
    Ok(())
  }

  // --- Algorithm ---

  fn resolve_frame(&mut self, frame: ResolutionFrame) -> Result<Instance> {
    self.stack.push(frame.clone());
    let result = self.resolve_top(frame);
    self.stack.pop();
    result
  }

  // Resolves `frame`, which has just been pushed onto the stack.
  fn resolve_top(&mut self, frame: ResolutionFrame) -> Result<Instance> {
    detect_cycle(&self.stack)?;

    if let Some(instance) = self.cache.get(&frame) {
      tracing::trace!(service = %frame, "request cache hit");
      return Ok(instance.clone());
    }

    let registration = self.lookup(&frame)?;
    let factory = match registration.source() {
      Source::Ready(instance) => {
        tracing::trace!(service = %frame, "ready instance");
        return Ok(instance);
      }
      Source::Factory(factory) => factory,
    };

    tracing::trace!(service = %frame, lifecycle = %registration.lifecycle(), "invoking factory");
    let instance = factory(self).map_err(|err| Error::from_boxed(err, &self.stack))?;

    match registration.lifecycle() {
      Lifecycle::Transient => {}
      Lifecycle::Request => {
        self.cache.insert(frame, instance.clone());
      }
      Lifecycle::Singleton => {
        registration.memoize(&instance);
        self.cache.insert(frame, instance.clone());
      }
    }

    self.drain_deferred()?;
    Ok(instance)
  }

  fn lookup(&self, frame: &ResolutionFrame) -> Result<Rc<Registration>> {
    let list = self
      .registry
      .get(&frame.key)
      .ok_or_else(|| Error::ServiceNotFound {
        key: frame.key.clone(),
      })?;
    list
      .iter()
      .find(|r| r.name() == frame.name)
      .cloned()
      .ok_or_else(|| Error::NamedServiceNotFound {
        key: frame.key.clone(),
        name: frame.name.clone(),
      })
  }
}

impl fmt::Debug for ResolutionContext {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ResolutionContext")
      .field("stack", &self.stack)
      .field("cached", &self.cache.len())
      .field("deferred", &self.deferred.len())
      .finish()
  }
}

fn downcast<T: ?Sized + 'static>(instance: &Instance, frame: ResolutionFrame) -> Result<Rc<T>> {
  instance.downcast::<T>().ok_or_else(|| Error::TypeMismatch {
    frame,
    expected: std::any::type_name::<T>(),
    actual: instance.type_name(),
  })
}

/// Fails when the stack ends in an exactly repeated path.
///
/// Take the last frame as `current`. If it appears earlier, the suffix of the
/// earlier frames starting at its first occurrence must split into two
/// identical halves for this to count as a cycle. Odd-length suffixes and
/// unequal halves are diamond-shaped re-resolutions and are allowed.
fn detect_cycle(stack: &[ResolutionFrame]) -> Result<()> {
  let Some((current, rest)) = stack.split_last() else {
    return Ok(());
  };
  let Some(start) = rest.iter().position(|frame| frame == current) else {
    return Ok(());
  };
  let substack = &rest[start..];
  if substack.len() % 2 != 0 {
    return Ok(());
  }
  let (first, second) = substack.split_at(substack.len() / 2);
  if first != second {
    return Ok(());
  }
  Err(Error::CircularDependency {
    cycle: stack[start..].to_vec(),
    stack: stack.to_vec(),
  })
}
