use scoped_ioc::{global, resolve, RegisterOptions};
use std::rc::Rc;

// --- Abstraction and Implementations ---
trait MessageSender {
  fn send(&self, to: &str, message: &str) -> String;
}

struct EmailSender;
impl MessageSender for EmailSender {
  fn send(&self, to: &str, message: &str) -> String {
    format!("Sending email to {}: '{}'", to, message)
  }
}

struct SmsSender;
impl MessageSender for SmsSender {
  fn send(&self, to: &str, message: &str) -> String {
    format!("Sending SMS to {}: '{}'", to, message)
  }
}

fn main() {
  // --- Registration ---
  // Register both implementations under one key with unique names.
  global()
    .register_constant_trait::<dyn MessageSender>(
      "sender",
      Rc::new(EmailSender),
      RegisterOptions::named("email"),
    )
    .unwrap();
  global()
    .register_constant_trait::<dyn MessageSender>(
      "sender",
      Rc::new(SmsSender),
      RegisterOptions::named("sms"),
    )
    .unwrap();

  // --- Resolution ---
  // Choose an implementation at the point of resolution...
  let email_notifier = resolve!(trait MessageSender, "sender", "email");
  let sms_notifier = resolve!(trait MessageSender, "sender", "sms");

  let result1 = email_notifier.send("test@example.com", "Hello!");
  let result2 = sms_notifier.send("+123456789", "Hello!");
  println!("{}", result1);
  println!("{}", result2);
  assert!(result1.contains("email"));
  assert!(result2.contains("SMS"));

  // ...or fan out to all of them, in registration order.
  let names = global().get_service_names("sender").unwrap();
  let all = global().resolve_all::<dyn MessageSender>("sender").unwrap();
  for (name, sender) in names.iter().zip(&all) {
    println!("[{}] {}", name, sender.send("ops", "broadcast"));
  }
  assert_eq!(all.len(), 2);
}
