//! # Adapters Module
//!
//! Implementations over the outbound ports: the batched status gateway and
//! the peer relay coordinator.

pub mod peer_relay;
pub mod status_gateway;

pub use peer_relay::{check_relay_connection_open, PeerRelayCoordinator, RelayProbeOutcome};
pub use status_gateway::{RegistryStatusGateway, RegistryStatusSnapshot};
