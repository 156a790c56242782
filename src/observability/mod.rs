//! Observability for consentry
//!
//! Diagnostics are structured JSON log lines plus a typed event vocabulary.
//! All consent lifecycle logging routes through this module; nothing here
//! ever fails the calling operation.

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};
