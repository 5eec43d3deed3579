//! The per-thread default container and access functions.

use crate::container::Container;

thread_local! {
  // Containers are single-threaded, so each thread gets its own default.
  static GLOBAL_CONTAINER: Container = Container::new();
}

/// Returns a handle to this thread's default container.
///
/// Handles are cheap clones of the same container, so registrations made
/// through one are visible to every later call on the same thread.
///
/// # Examples
///
/// ```
/// use scoped_ioc::{global, RegisterOptions};
///
/// fn register_services() {
///   global()
///     .register_constant("greeting", String::from("Hello from global!"), RegisterOptions::new())
///     .unwrap();
/// }
///
/// register_services();
/// assert!(global().has("greeting", None));
/// ```
pub fn global() -> Container {
  GLOBAL_CONTAINER.with(Container::clone)
}

/// Runs `f` with a borrow of this thread's default container.
pub fn with_global<R>(f: impl FnOnce(&Container) -> R) -> R {
  GLOBAL_CONTAINER.with(f)
}
