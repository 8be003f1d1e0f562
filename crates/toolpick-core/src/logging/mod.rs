//! Logging abstractions
//!
//! The picker logs through an injected `Arc<dyn Logger>` so that the host can
//! route messages to its own output channel.

mod traits;
mod noop;
mod console;
mod memory;

pub use traits::{Logger, SharedLogger};
pub use noop::NoOpLogger;
pub use console::ConsoleLogger;
pub use memory::{LogLevel, MemoryLogger};
