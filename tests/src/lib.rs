//! # Ward Test Suite
//!
//! Unified test crate for cross-crate behavior:
//!
//! ```text
//! tests/src/
//! └── integration/      # Full-session choreography
//!     ├── wallet_flows.rs       # Every (variant, mode) walkthrough
//!     └── relay_choreography.rs # Two-role p2p relay coordination
//! ```
//!
//! Unit tests live next to their modules inside each crate; this crate only
//! holds scenarios that span the service, its adapters, and the ports.

pub mod integration;
