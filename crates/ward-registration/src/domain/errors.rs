//! # Domain Errors
//!
//! Error types for registration coordination. Recoverable conditions (read
//! failures, connectivity failures, stalls) never surface here; they are
//! absorbed into snapshots and session phase. Only resolution failures,
//! guard violations, and fatal session failures cross component boundaries.

use super::value_objects::{FailureReason, RegistrationStep, TransitionReason};
use shared_types::ChainId;
use thiserror::Error;

/// Registration coordination error types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    /// The chain has no configured role mapping.
    #[error("Unresolved chain role for chain {chain_id}")]
    UnresolvedChainRole {
        /// The chain that could not be routed.
        chain_id: ChainId,
    },

    /// A requested transition's guard is unmet.
    #[error("Transition rejected at {step:?}: {reason:?}")]
    TransitionViolation {
        /// The step the session was at when the request was rejected.
        step: RegistrationStep,
        /// Machine-readable reason code.
        reason: TransitionReason,
    },

    /// The session reached a terminal failure.
    #[error("Session failed: {reason:?}")]
    SessionFailed {
        /// Why the session cannot continue.
        reason: FailureReason,
    },
}

/// Errors from the batched chain read port.
#[derive(Debug, Error)]
pub enum ChainReadError {
    /// The whole round trip failed before any sub-read ran.
    #[error("Chain read transport error: {0}")]
    Transport(String),

    /// No client is configured for the chain.
    #[error("Unsupported chain: {0}")]
    UnsupportedChain(ChainId),
}

/// Errors from the peer networking port.
#[derive(Debug, Error)]
pub enum PeerNetworkError {
    /// The peer did not answer the probe.
    #[error("Peer unreachable: {0}")]
    Unreachable(String),

    /// The networking stack exposes no ping capability.
    #[error("Ping capability unavailable")]
    PingUnsupported,
}

/// Errors from the external signer/broadcaster.
#[derive(Debug, Error)]
pub enum SignerError {
    /// The wallet rejected the request.
    #[error("Signer rejected request: {0}")]
    Rejected(String),

    /// The wallet/client layer is not reachable.
    #[error("Signer unavailable: {0}")]
    Unavailable(String),
}
