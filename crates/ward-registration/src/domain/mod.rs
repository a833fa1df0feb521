//! # Domain Module
//!
//! Core domain types for registration coordination.

pub mod chain_roles;
pub mod entities;
pub mod errors;
pub mod invariants;
pub mod value_objects;

pub use chain_roles::*;
pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use value_objects::*;
