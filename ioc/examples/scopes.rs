use scoped_ioc::{Container, RegisterOptions};

// A function that configures dependencies and runs some logic.
// By accepting a `&Container`, it can be exercised against a child scope.
fn process_data(container: &Container) -> String {
  let data = container
    .resolve::<String>("data", None)
    .expect("Data not found in container");
  format!("Processed: {}", data.to_uppercase())
}

fn main() {
  let app = Container::new();
  app
    .register_constant("data", String::from("production data"), RegisterOptions::new())
    .unwrap();

  // --- A child scope overrides one binding ---
  println!("--- Running with a child scope ---");
  let test_scope = app.create_child();
  test_scope
    .register_constant("data", String::from("test data"), RegisterOptions::new())
    .unwrap();
  let result = process_data(&test_scope);
  println!("Result: {}", result);
  assert_eq!(result, "Processed: TEST DATA");

  // --- Verify Isolation ---
  // The override lives only in the child; the parent still serves its own binding.
  let result = process_data(&app);
  println!("Result: {}", result);
  assert_eq!(result, "Processed: PRODUCTION DATA");
  assert!(!app.has_own("missing", None));

  println!("\nVerified that the child scope does not leak into its parent.");
}
