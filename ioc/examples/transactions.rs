use scoped_ioc::{Container, RegisterOptions};

fn main() {
  let container = Container::new();
  container
    .register_constant(
      "endpoint",
      String::from("https://api.example.com"),
      RegisterOptions::new(),
    )
    .unwrap();

  // --- Try some registrations, then roll them back ---
  container.backup(false);
  container
    .register_constant(
      "endpoint",
      String::from("http://localhost:8080"),
      RegisterOptions::new().replace(true),
    )
    .unwrap();
  container
    .register_constant("debug", true, RegisterOptions::new())
    .unwrap();
  println!(
    "During the transaction: {} (debug registered: {})",
    container.resolve::<String>("endpoint", None).unwrap(),
    container.has("debug", None)
  );

  container.restore(false);
  println!(
    "After restore: {} (debug registered: {})",
    container.resolve::<String>("endpoint", None).unwrap(),
    container.has("debug", None)
  );
  assert_eq!(
    *container.resolve::<String>("endpoint", None).unwrap(),
    "https://api.example.com"
  );
  assert!(!container.has("debug", None));
}
