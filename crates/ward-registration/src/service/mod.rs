//! # Registration Service
//!
//! High-level service implementing the `RegistrationApi` port. Wraps the
//! session, its step sequence, the poll discipline, and the relay
//! coordinator behind one event-driven surface.

pub mod core;
pub mod events;
pub mod polling;

pub use core::{CoordinatorConfig, RegistrationService};
pub use events::SessionEvent;
pub use polling::{PollPermit, StatusPoller};
