//! Mail transports.
//!
//! Delivery itself is someone else's job: the console transport logs the
//! message, the in-memory transport keeps an outbox for inspection.

mod console;
mod memory;

pub use console::ConsoleMailer;
pub use memory::InMemoryMailer;
