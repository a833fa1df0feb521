//! # Shared Types Crate
//!
//! Chain and peer primitives shared across the Ward workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-crate primitives are defined here.
//! - **Newtypes over aliases**: A `ContractAddress` is not a `WalletAddress`,
//!   even though both are 20 bytes on the wire.
//! - **No business logic**: Routing, sequencing, and polling live in the
//!   subsystem crates, not here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chain;
pub mod errors;
pub mod peer;

pub use chain::{
    BlockNumber, ChainId, ContractAddress, CrossChainMessageId, TxHash, WalletAddress,
};
pub use errors::ParseError;
pub use peer::PeerId;
