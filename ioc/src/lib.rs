//! # Scoped IoC
//!
//! A single-threaded dependency-resolution container: a registry of named,
//! lazily-instantiated services with configurable lifecycles, hierarchical
//! scoping, transactional registration rollback and cycle detection.
//!
//! ## Core Concepts
//!
//! - **Container**: owns registrations, each bound under a service key and a
//!   registration name (`"default"` unless given).
//! - **Lifecycle**: `Transient` services are rebuilt on every resolution,
//!   `Singleton` services once ever, `Request` services once per top-level
//!   resolution call.
//! - **Scoping**: `create_child()` gives a container whose own registrations
//!   are layered over its parent's.
//! - **Transactions**: `backup()` / `restore()` roll the registry back,
//!   including singleton values memoized in between.
//! - **Resolution context**: every factory receives the context of the
//!   running call, through which it resolves its own dependencies, inspects
//!   the resolution stack, or defers work until the graph has settled.
//!
//! ## Quick Start
//!
//! ```
//! use scoped_ioc::{Container, RegisterOptions};
//! use std::rc::Rc;
//!
//! struct Config {
//!   url: String,
//! }
//!
//! struct Database {
//!   url: String,
//! }
//!
//! let container = Container::new();
//! container
//!   .register_constant("config", Config { url: "postgres://db".into() }, RegisterOptions::new())
//!   .unwrap();
//! container
//!   .register_factory(
//!     "database",
//!     |ctx| {
//!       let config = ctx.resolve::<Config>("config", None)?;
//!       Ok(Database { url: config.url.clone() })
//!     },
//!     RegisterOptions::singleton(),
//!   )
//!   .unwrap();
//!
//! // A child scope can override bindings without touching the parent.
//! let scope = container.create_child();
//! let db = scope.resolve::<Database>("database", None).unwrap();
//! assert_eq!(db.url, "postgres://db");
//! assert!(Rc::ptr_eq(&db, &container.resolve::<Database>("database", None).unwrap()));
//! ```

mod container;
mod context;
mod core;
mod error;
mod global;
mod macros;
mod registry;

pub use crate::core::{
  Instance, Lifecycle, RegisterOptions, ResolutionFrame, ServiceKey, DEFAULT_NAME,
};
pub use container::Container;
pub use context::ResolutionContext;
pub use error::{BoxError, Error, Result};
pub use global::{global, with_global};
