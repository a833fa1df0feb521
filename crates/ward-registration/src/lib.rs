//! # Ward Registration
//!
//! Coordination protocol for registering a compromised wallet or fraudulent
//! transaction into a cross-chain registry.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! The hard part of the registry is not any single transaction; it is the
//! multi-step, multi-party choreography around them:
//! - sequence signature and payment steps across registeree and relayer
//! - enforce the mandatory grace period between acknowledgement and
//!   registration
//! - route every action to the chain it must settle on (hub vs spoke)
//! - detect on-chain transitions through batched registry reads
//! - for p2p relay, watch the direct registeree/relayer connection
//!
//! ## Module Structure
//!
//! ```text
//! ward-registration/
//! ├── domain/          # Session, records, chain roles, guards, errors
//! ├── algorithms/      # Step sequencing, grace timing, waiting projection
//! ├── ports/           # RegistrationApi, ChainReadPort, PeerNetworkPort
//! ├── adapters/        # Status gateway, peer relay coordinator
//! └── service/         # Orchestrating service and poll discipline
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{
    check_relay_connection_open, PeerRelayCoordinator, RegistryStatusGateway,
    RegistryStatusSnapshot, RelayProbeOutcome,
};
pub use algorithms::{
    estimate_remaining, first_step, grace_status, sequence_for, successor, waiting_notice,
    ModeProfile, MASTER_SEQUENCE,
};
pub use domain::{
    AcknowledgementRecord, ChainReadError, ChainRoleConfig, ChainRoleResolver, ConnectionStatus,
    FailureReason, GraceStatus, HubResolution, PeerConnection, PeerNetworkError,
    RegistrationError, RegistrationRecord, RegistrationSession, RegistrationStep,
    RegistrationVariant, RelayMode, SessionParams, SessionPhase, SessionRole, SignatureKind,
    SignerError, StallReason, StepSignature, Timestamp, TransitionReason,
};
pub use ports::{
    CallOutcome, CallReturn, ChainReadPort, OpenConnection, PeerNetworkEvent, PeerNetworkPort,
    RegistrationApi, RegistryCall, SignerPort, SigningPayload, SubmissionReceipt,
    SubmissionRequest, SystemTimeSource, TimeSource,
};
pub use service::{CoordinatorConfig, RegistrationService, SessionEvent, StatusPoller};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    #[allow(clippy::const_is_empty)]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
