use scoped_ioc::{global, resolve, BoxError, RegisterOptions, ResolutionContext};
use std::cell::Cell;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

// A simple service that gets a unique ID upon creation.
struct RequestTracker {
  id: usize,
}

fn tracker_factory(
  ids: &Rc<Cell<usize>>,
  label: &'static str,
) -> impl Fn(&mut ResolutionContext) -> Result<RequestTracker, BoxError> {
  let ids = Rc::clone(ids);
  move |_| {
    println!("Creating {label} RequestTracker...");
    let id = ids.get();
    ids.set(id + 1);
    Ok(RequestTracker { id })
  }
}

fn main() {
  // RUST_LOG=scoped_ioc=trace shows every resolution step.
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let ids = Rc::new(Cell::new(0));
  let container = global();

  // --- Registration ---
  container
    .register_factory(
      "singleton_tracker",
      tracker_factory(&ids, "SINGLETON"),
      RegisterOptions::singleton(),
    )
    .unwrap();
  container
    .register_factory(
      "transient_tracker",
      tracker_factory(&ids, "TRANSIENT"),
      RegisterOptions::new(),
    )
    .unwrap();
  container
    .register_factory(
      "request_tracker",
      tracker_factory(&ids, "REQUEST"),
      RegisterOptions::request(),
    )
    .unwrap();

  println!("--- Resolving Singletons ---");
  let s1 = resolve!(RequestTracker, "singleton_tracker");
  let s2 = resolve!(RequestTracker, "singleton_tracker");
  println!("Singleton 1 ID: {}, Singleton 2 ID: {}", s1.id, s2.id);
  assert!(Rc::ptr_eq(&s1, &s2), "Singleton instances should be identical");

  println!("\n--- Resolving Transients ---");
  let t1 = resolve!(RequestTracker, "transient_tracker");
  let t2 = resolve!(RequestTracker, "transient_tracker");
  println!("Transient 1 ID: {}, Transient 2 ID: {}", t1.id, t2.id);
  assert!(!Rc::ptr_eq(&t1, &t2), "Transient instances should be different");

  println!("\n--- Resolving Request-scoped ---");
  let pair = container
    .resolve_tuple(&[("request_tracker", None), ("request_tracker", None)])
    .unwrap();
  assert!(pair[0].ptr_eq(&pair[1]), "Same call, same instance");
  let r1 = resolve!(RequestTracker, "request_tracker");
  let r2 = resolve!(RequestTracker, "request_tracker");
  println!("Separate calls got IDs {} and {}", r1.id, r2.id);
  assert!(!Rc::ptr_eq(&r1, &r2), "Separate calls, separate instances");
}
