//! Observability for the datasheet core
//!
//! Structured JSON logging of access decisions and uniqueness checks.
//! Logging is read-only and never changes a decision. Per-decision TRACE
//! events are dropped unless `Logger::set_min_severity(Severity::Trace)` is
//! called.
//!
//! ```ignore
//! use datasheet_core::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::AccessDenied, &[("operation", "update")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log an event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log an event with fields at its own severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
