use scoped_ioc::{global, maybe_resolve, resolve, Error};
use std::panic;

struct UnregisteredService;

fn main() {
  // --- Using the panicking `resolve!` macro ---
  println!("Attempting to resolve a service that was never registered...");

  let result = panic::catch_unwind(|| {
    // This line will panic!
    let _service = resolve!(UnregisteredService, "unregistered");
  });

  assert!(result.is_err(), "resolve! should have panicked.");
  println!("Successfully caught the expected panic from resolve!.");

  // --- Using the non-panicking alternatives ---
  println!("\nNow, attempting to resolve using the fallible APIs...");
  assert!(maybe_resolve!(UnregisteredService, "unregistered").is_none());

  match global().resolve::<UnregisteredService>("unregistered", None) {
    Ok(_) => panic!("Should not have found the service!"),
    Err(err @ Error::ServiceNotFound { .. }) => println!("Correctly received an error: {}", err),
    Err(other) => panic!("Unexpected error: {}", other),
  }
}
