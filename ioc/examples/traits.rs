use scoped_ioc::{global, resolve, RegisterOptions};
use std::rc::Rc;

// 1. Define the abstraction (the trait)
trait Logger {
  fn log(&self, message: &str);
}

// 2. Define a concrete implementation
struct ConsoleLogger;
impl Logger for ConsoleLogger {
  fn log(&self, message: &str) {
    println!("[CONSOLE LOG]: {}", message);
  }
}

// 3. Define a service that depends on the abstraction
struct ReportService {
  logger: Rc<dyn Logger>,
}

impl ReportService {
  fn generate_report(&self) {
    self.logger.log("Starting report generation.");
    self.logger.log("Finished report generation.");
  }
}

fn main() {
  // --- Registration ---

  // The container stores Rc<ConsoleLogger> but serves it as Rc<dyn Logger>.
  global()
    .register_factory_trait::<dyn Logger, _>(
      "logger",
      |_| Ok(Rc::new(ConsoleLogger)),
      RegisterOptions::singleton(),
    )
    .unwrap();

  // ReportService resolves its own dependency through the resolution context.
  global()
    .register_factory(
      "reports",
      |ctx| {
        Ok(ReportService {
          logger: ctx.resolve::<dyn Logger>("logger", None)?,
        })
      },
      RegisterOptions::singleton(),
    )
    .unwrap();

  // --- Resolution and Usage ---
  println!("Resolving the high-level service...");
  let report_service = resolve!(ReportService, "reports");

  println!("Using the service...");
  report_service.generate_report();
}
