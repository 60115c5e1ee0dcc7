//! Event routing
//!
//! Pure lookups over the static configuration: which project an event
//! belongs to, and whether the event should be acted on at all.

mod origin;
mod resolver;

pub use origin::OriginFilter;
pub use resolver::ProjectResolver;
