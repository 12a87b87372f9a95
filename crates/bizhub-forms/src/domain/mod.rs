//! Domain module
//!
//! Form schema, per-type field behaviour, validation and rendering.

pub mod aggregates;
pub mod events;
pub mod services;
pub mod value_objects;

pub use aggregates::*;
pub use events::*;
pub use value_objects::*;
