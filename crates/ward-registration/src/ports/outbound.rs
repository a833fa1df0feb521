//! # Outbound Ports
//!
//! Traits for external dependencies: the batched chain read interface, the
//! peer networking stack, the signer/broadcaster, and the clock.

use crate::domain::{
    AcknowledgementRecord, ChainReadError, PeerNetworkError, RegistrationRecord, SignatureKind,
    SignerError, StepSignature, Timestamp,
};
use async_trait::async_trait;
use shared_types::{
    BlockNumber, ChainId, ContractAddress, CrossChainMessageId, PeerId, TxHash, WalletAddress,
};
use std::time::Duration;

// =============================================================================
// Chain reads
// =============================================================================

/// One logical read in a batched registry query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryCall {
    /// Whether the address is registered.
    IsRegistered {
        /// The queried wallet.
        registeree: WalletAddress,
    },
    /// Whether the address has a pending acknowledgement.
    IsPending {
        /// The queried wallet.
        registeree: WalletAddress,
    },
    /// The registration entry for the address.
    RegistrationEntry {
        /// The queried wallet.
        registeree: WalletAddress,
    },
    /// The acknowledgement entry for the address.
    AcknowledgementEntry {
        /// The queried wallet.
        registeree: WalletAddress,
    },
}

/// Typed payload of a successful sub-read.
///
/// Consumers must match on the tag; a payload of the wrong shape for its
/// query is treated as a failed read, never assumed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallReturn {
    /// Boolean flag read.
    Flag(bool),
    /// Registration entry read.
    Registration(RegistrationRecord),
    /// Acknowledgement entry read.
    Acknowledgement(AcknowledgementRecord),
}

/// Tagged outcome of one sub-read; each succeeds or fails independently.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallOutcome {
    /// The sub-read returned a decoded payload.
    Success(CallReturn),
    /// The sub-read reverted or could not be decoded.
    Failure(String),
}

/// Batched multi-call capable chain read interface - outbound port.
#[async_trait]
pub trait ChainReadPort: Send + Sync {
    /// Execute `calls` against the registry contract in one round trip.
    ///
    /// The returned vector is positionally aligned with `calls`.
    async fn multicall(
        &self,
        chain: ChainId,
        contract: ContractAddress,
        calls: &[RegistryCall],
    ) -> Result<Vec<CallOutcome>, ChainReadError>;

    /// Current block height on `chain`.
    async fn block_number(&self, chain: ChainId) -> Result<BlockNumber, ChainReadError>;
}

// =============================================================================
// Peer networking
// =============================================================================

/// A connection currently known to the networking layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenConnection {
    /// Remote peer of the connection.
    pub peer_id: PeerId,
    /// Whether the connection is open.
    pub is_open: bool,
}

/// Event emitted by the networking layer, folded into connection state by
/// the peer relay coordinator. Nothing else consumes these directly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PeerNetworkEvent {
    /// A connection to `peer_id` opened.
    ConnectionOpened {
        /// Remote peer.
        peer_id: PeerId,
    },
    /// The connection to `peer_id` closed.
    ConnectionClosed {
        /// Remote peer.
        peer_id: PeerId,
    },
    /// An active probe finished.
    ProbeCompleted {
        /// Probed peer.
        peer_id: PeerId,
        /// Measured round trip, absent on failure.
        latency: Option<Duration>,
    },
}

/// Peer networking stack - outbound port.
#[async_trait]
pub trait PeerNetworkPort: Send + Sync {
    /// Connections currently known to the networking layer.
    fn open_connections(&self) -> Vec<OpenConnection>;

    /// Whether an active ping capability is available.
    fn supports_ping(&self) -> bool;

    /// Round trip to `peer`. Completion of the future is the measurement;
    /// callers time it themselves.
    async fn ping(&self, peer: &PeerId) -> Result<(), PeerNetworkError>;
}

// =============================================================================
// Signer / broadcaster
// =============================================================================

/// Typed payload handed to the external wallet layer for signing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SigningPayload {
    /// Which payload family to sign.
    pub kind: SignatureKind,
    /// Chain the signature is valid on.
    pub chain_id: ChainId,
    /// The wallet being registered.
    pub registeree: WalletAddress,
    /// Attached transactions (transaction variant).
    pub transactions: Vec<TxHash>,
}

/// A submission handed to the external broadcaster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionRequest {
    /// Which payload family is being submitted.
    pub kind: SignatureKind,
    /// Chain to submit on.
    pub chain_id: ChainId,
    /// The signature authorizing the submission.
    pub signature: StepSignature,
}

/// Handle returned by the broadcaster; opaque until confirmed on-chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// Submitted transaction hash.
    pub tx_hash: TxHash,
    /// Bridged message id, present for registration submissions.
    pub cross_chain_message_id: Option<CrossChainMessageId>,
}

/// External signer/broadcaster - outbound port, consumed only.
#[async_trait]
pub trait SignerPort: Send + Sync {
    /// Sign a typed payload.
    async fn sign(&self, payload: SigningPayload) -> Result<StepSignature, SignerError>;

    /// Broadcast a signed submission.
    async fn submit(&self, request: SubmissionRequest) -> Result<SubmissionReceipt, SignerError>;
}

// =============================================================================
// Clock
// =============================================================================

/// Provider for current time - outbound port.
pub trait TimeSource: Send + Sync {
    /// Current time.
    fn now(&self) -> Timestamp;
}

impl<T: TimeSource + ?Sized> TimeSource for std::sync::Arc<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// System clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        let secs = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Timestamp::new(secs)
    }
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Scriptable registry state backing [`MockChainReadPort`].
#[derive(Clone, Debug, Default)]
pub struct MockRegistryState {
    /// `IsRegistered` result; `None` makes the sub-read fail.
    pub registered: Option<bool>,
    /// `IsPending` result; `None` makes the sub-read fail.
    pub pending: Option<bool>,
    /// `RegistrationEntry` payload; `None` makes the sub-read fail.
    pub registration: Option<RegistrationRecord>,
    /// `AcknowledgementEntry` payload; `None` makes the sub-read fail.
    pub acknowledgement: Option<AcknowledgementRecord>,
    /// Fail the whole round trip before any sub-read runs.
    pub fail_transport: bool,
    /// Current block height.
    pub block: BlockNumber,
}

/// Mock chain read client for testing.
#[derive(Debug, Default)]
pub struct MockChainReadPort {
    state: parking_lot::Mutex<MockRegistryState>,
}

impl MockChainReadPort {
    /// Create a mock starting from `state`.
    pub fn new(state: MockRegistryState) -> Self {
        Self {
            state: parking_lot::Mutex::new(state),
        }
    }

    /// Replace the scripted state.
    pub fn set_state(&self, state: MockRegistryState) {
        *self.state.lock() = state;
    }

    /// Mutate the scripted state in place.
    pub fn update_state(&self, f: impl FnOnce(&mut MockRegistryState)) {
        f(&mut self.state.lock());
    }
}

#[async_trait]
impl ChainReadPort for MockChainReadPort {
    async fn multicall(
        &self,
        _chain: ChainId,
        _contract: ContractAddress,
        calls: &[RegistryCall],
    ) -> Result<Vec<CallOutcome>, ChainReadError> {
        let state = self.state.lock().clone();
        if state.fail_transport {
            return Err(ChainReadError::Transport("mock transport failure".into()));
        }

        Ok(calls
            .iter()
            .map(|call| match call {
                RegistryCall::IsRegistered { .. } => match state.registered {
                    Some(flag) => CallOutcome::Success(CallReturn::Flag(flag)),
                    None => CallOutcome::Failure("registered read reverted".into()),
                },
                RegistryCall::IsPending { .. } => match state.pending {
                    Some(flag) => CallOutcome::Success(CallReturn::Flag(flag)),
                    None => CallOutcome::Failure("pending read reverted".into()),
                },
                RegistryCall::RegistrationEntry { .. } => match &state.registration {
                    Some(entry) => CallOutcome::Success(CallReturn::Registration(entry.clone())),
                    None => CallOutcome::Failure("registration read reverted".into()),
                },
                RegistryCall::AcknowledgementEntry { .. } => match &state.acknowledgement {
                    Some(entry) => CallOutcome::Success(CallReturn::Acknowledgement(entry.clone())),
                    None => CallOutcome::Failure("acknowledgement read reverted".into()),
                },
            })
            .collect())
    }

    async fn block_number(&self, _chain: ChainId) -> Result<BlockNumber, ChainReadError> {
        Ok(self.state.lock().block)
    }
}

/// Mock peer networking stack for testing.
#[derive(Debug)]
pub struct MockPeerNetworkPort {
    connections: parking_lot::Mutex<Vec<OpenConnection>>,
    ping_supported: bool,
    ping_fails: bool,
    ping_delay: Duration,
}

impl Default for MockPeerNetworkPort {
    fn default() -> Self {
        Self {
            connections: parking_lot::Mutex::new(Vec::new()),
            ping_supported: true,
            ping_fails: false,
            ping_delay: Duration::ZERO,
        }
    }
}

impl MockPeerNetworkPort {
    /// Mock with the given open connections.
    pub fn with_connections(connections: Vec<OpenConnection>) -> Self {
        Self {
            connections: parking_lot::Mutex::new(connections),
            ..Default::default()
        }
    }

    /// Mock whose networking stack exposes no ping capability.
    pub fn without_ping() -> Self {
        Self {
            ping_supported: false,
            ..Default::default()
        }
    }

    /// Mock whose pings always fail.
    pub fn with_failing_ping() -> Self {
        Self {
            ping_fails: true,
            ..Default::default()
        }
    }

    /// Mock whose pings take `delay` to answer.
    pub fn with_ping_delay(delay: Duration) -> Self {
        Self {
            ping_delay: delay,
            ..Default::default()
        }
    }

    /// Replace the open connection list.
    pub fn set_connections(&self, connections: Vec<OpenConnection>) {
        *self.connections.lock() = connections;
    }
}

#[async_trait]
impl PeerNetworkPort for MockPeerNetworkPort {
    fn open_connections(&self) -> Vec<OpenConnection> {
        self.connections.lock().clone()
    }

    fn supports_ping(&self) -> bool {
        self.ping_supported
    }

    async fn ping(&self, peer: &PeerId) -> Result<(), PeerNetworkError> {
        if !self.ping_supported {
            return Err(PeerNetworkError::PingUnsupported);
        }
        if self.ping_delay > Duration::ZERO {
            tokio::time::sleep(self.ping_delay).await;
        }
        if self.ping_fails {
            return Err(PeerNetworkError::Unreachable(peer.to_string()));
        }
        Ok(())
    }
}

/// Mock signer/broadcaster for testing.
#[derive(Debug)]
pub struct MockSignerPort {
    /// Expiry block stamped onto produced signatures.
    pub signature_ttl_block: BlockNumber,
    /// Message id attached to registration submissions.
    pub message_id: CrossChainMessageId,
}

impl Default for MockSignerPort {
    fn default() -> Self {
        Self {
            signature_ttl_block: BlockNumber::new(u64::MAX),
            message_id: CrossChainMessageId::new([0x42u8; 32]),
        }
    }
}

#[async_trait]
impl SignerPort for MockSignerPort {
    async fn sign(&self, payload: SigningPayload) -> Result<StepSignature, SignerError> {
        Ok(StepSignature {
            kind: payload.kind,
            bytes: vec![0xAB; 65],
            expires_at_block: self.signature_ttl_block,
        })
    }

    async fn submit(&self, request: SubmissionRequest) -> Result<SubmissionReceipt, SignerError> {
        let cross_chain_message_id = match request.kind {
            SignatureKind::Registration => Some(self.message_id),
            SignatureKind::Acknowledgement => None,
        };
        Ok(SubmissionReceipt {
            tx_hash: TxHash::new([0x99u8; 32]),
            cross_chain_message_id,
        })
    }
}

/// Mock clock advanced explicitly by tests.
#[derive(Debug, Default)]
pub struct MockTimeSource {
    now: parking_lot::Mutex<Timestamp>,
}

impl MockTimeSource {
    /// Mock starting at `secs` past the epoch.
    pub fn at(secs: u64) -> Self {
        Self {
            now: parking_lot::Mutex::new(Timestamp::new(secs)),
        }
    }

    /// Advance the clock.
    pub fn advance_secs(&self, secs: u64) {
        let mut now = self.now.lock();
        *now = Timestamp::new(now.as_secs() + secs);
    }
}

impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        *self.now.lock()
    }
}
