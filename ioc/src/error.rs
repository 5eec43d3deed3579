use crate::core::{ResolutionFrame, ServiceKey};
use thiserror::Error;

/// The error type factories and deferred callbacks may return.
///
/// A crate [`Error`] coming back through this type (e.g. from a nested
/// `resolve` forwarded with `?`) is recognised and propagated unchanged.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Everything that can abort a resolution or reject a registration.
#[derive(Debug, Error)]
pub enum Error {
  #[error("Service not found: '{key}'")]
  ServiceNotFound { key: ServiceKey },

  #[error("Service '{key}' has no registration named '{name}'")]
  NamedServiceNotFound { key: ServiceKey, name: String },

  #[error("Service '{key}' already has a registration named '{name}'")]
  DuplicateRegistration { key: ServiceKey, name: String },

  #[error("Circular dependency detected: {}", render_path(.cycle))]
  CircularDependency {
    /// The repeating path, ending with the frame that closed the loop.
    cycle: Vec<ResolutionFrame>,
    /// The whole resolution stack at detection time.
    stack: Vec<ResolutionFrame>,
  },

  #[error("Factory failed while resolving {}: {source}", render_path(.stack))]
  FactoryFailed {
    stack: Vec<ResolutionFrame>,
    #[source]
    source: BoxError,
  },

  #[error("Service {frame} holds a {actual}, not the requested {expected}")]
  TypeMismatch {
    frame: ResolutionFrame,
    expected: &'static str,
    actual: &'static str,
  },

  #[error("The parent of a child container was dropped before the child")]
  ParentDropped,
}

impl Error {
  /// The resolution stack captured by the error, if it carries one.
  pub fn stack(&self) -> Option<&[ResolutionFrame]> {
    match self {
      Error::CircularDependency { stack, .. } | Error::FactoryFailed { stack, .. } => {
        Some(stack.as_slice())
      }
      _ => None,
    }
  }

  pub(crate) fn from_boxed(err: BoxError, stack: &[ResolutionFrame]) -> Self {
    match err.downcast::<Error>() {
      Ok(err) => *err,
      Err(source) => Error::FactoryFailed {
        stack: stack.to_vec(),
        source,
      },
    }
  }
}

fn render_path(path: &[ResolutionFrame]) -> String {
  if path.is_empty() {
    return "<top level>".to_owned();
  }
  path
    .iter()
    .map(ResolutionFrame::to_string)
    .collect::<Vec<_>>()
    .join(" -> ")
}

/// A specialized `Result` type for container operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
