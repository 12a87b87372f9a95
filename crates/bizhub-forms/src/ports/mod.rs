//! Ports module (Hexagonal Architecture)
//!
//! Interfaces between the form model and whatever stores and transports it.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
