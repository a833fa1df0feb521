//! # Domain Entities
//!
//! The registration session and its on-chain records. Sessions hold only
//! observed state: acknowledgement and registration records are copied from
//! registry snapshots, never fabricated locally.

use super::value_objects::{
    ConnectionStatus, RegistrationStep, RegistrationVariant, RelayMode, SessionPhase, SessionRole,
    Timestamp, TransitionReason,
};
use serde::{Deserialize, Serialize};
use shared_types::{
    BlockNumber, ChainId, ContractAddress, CrossChainMessageId, PeerId, TxHash, WalletAddress,
};
use std::time::Duration;
use uuid::Uuid;

/// The payload family a signature covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignatureKind {
    /// The time-bounded acknowledgement declaration.
    Acknowledgement,
    /// The final registration.
    Registration,
}

/// A signature produced by the external signer for one step.
///
/// Treated as opaque bytes; only the expiry block is interpreted here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSignature {
    /// Which payload family was signed.
    pub kind: SignatureKind,
    /// Opaque signature bytes.
    pub bytes: Vec<u8>,
    /// Block at which the signature stops being acceptable.
    pub expires_at_block: BlockNumber,
}

impl StepSignature {
    /// Check whether the signature is still acceptable at `block`.
    pub fn is_fresh(&self, block: BlockNumber) -> bool {
        block < self.expires_at_block
    }
}

/// Acknowledgement entry as reported by the registry contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcknowledgementRecord {
    /// Forwarder contract trusted to relay the registration.
    pub trusted_forwarder: ContractAddress,
    /// First block of the grace window.
    pub start_block: BlockNumber,
    /// Block at which the grace window expires.
    pub expiry_block: BlockNumber,
}

/// Registration entry as reported by the registry contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    /// Registration timestamp reported by the contract.
    pub registered_at: Timestamp,
    /// Chain the registration intent originated from.
    pub source_chain_id: ChainId,
    /// Bridge used to carry the intent to the settlement chain.
    pub bridge_id: u32,
    /// Whether a relayer sponsored the gas.
    pub is_sponsored: bool,
    /// Identifier of the bridged message that settled the registration.
    pub cross_chain_message_id: CrossChainMessageId,
}

/// Direct relay connection state, p2p mode only.
///
/// Mutated only by the peer relay coordinator; everything else reads it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerConnection {
    /// Which party this client is acting as.
    pub local_role: SessionRole,
    /// Remote peer, set once a candidate connection opens.
    pub remote_peer_id: Option<PeerId>,
    /// Candidate relay peers to watch for.
    pub relay_peer_ids: Vec<PeerId>,
    /// Folded connection status.
    pub status: ConnectionStatus,
    /// Last measured round trip, if any probe completed.
    pub latency: Option<Duration>,
}

impl PeerConnection {
    /// Create a disconnected connection watching `relay_peer_ids`.
    pub fn new(local_role: SessionRole, relay_peer_ids: Vec<PeerId>) -> Self {
        Self {
            local_role,
            remote_peer_id: None,
            relay_peer_ids,
            status: ConnectionStatus::Disconnected,
            latency: None,
        }
    }

    /// Whether an open connection to a candidate relay peer exists.
    pub fn is_open(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }
}

/// Parameters for creating a registration session.
#[derive(Clone, Debug)]
pub struct SessionParams {
    /// What is being registered.
    pub variant: RegistrationVariant,
    /// Who submits which transactions.
    pub mode: RelayMode,
    /// The wallet being registered.
    pub registeree: WalletAddress,
    /// Chain the registeree starts from.
    pub origin_chain_id: ChainId,
}

/// One in-progress registration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegistrationSession {
    /// Correlation id for logs.
    pub id: Uuid,
    /// What is being registered.
    pub variant: RegistrationVariant,
    /// Who submits which transactions.
    pub mode: RelayMode,
    /// Current position in the step sequence.
    pub step: RegistrationStep,
    /// Whether the session accepts events.
    pub phase: SessionPhase,
    /// The wallet being registered.
    pub registeree: WalletAddress,
    /// Transactions attached to the report (transaction variant).
    pub selected_transactions: Vec<TxHash>,
    /// Chain the registeree starts from.
    pub origin_chain_id: ChainId,
    /// Settlement chain, derived from the origin; never user-set.
    pub hub_chain_id: Option<ChainId>,
    /// Registry contract for the settlement path; `None` when unresolved.
    pub contract_address: Option<ContractAddress>,
    /// Most recent step signature, consumed by the matching pay step.
    pub signature: Option<StepSignature>,
    /// Acknowledgement entry observed on-chain.
    pub acknowledgement: Option<AcknowledgementRecord>,
    /// Registration entry observed on-chain.
    pub registration: Option<RegistrationRecord>,
    /// Message id recorded at registration submission.
    pub submitted_message_id: Option<CrossChainMessageId>,
    /// Relay connection snapshot, p2p mode only.
    pub peer_connection: Option<PeerConnection>,
}

impl RegistrationSession {
    /// Create a session at the given first step.
    pub fn new(params: SessionParams, first_step: RegistrationStep) -> Self {
        Self {
            id: Uuid::new_v4(),
            variant: params.variant,
            mode: params.mode,
            step: first_step,
            phase: SessionPhase::Active,
            registeree: params.registeree,
            selected_transactions: Vec::new(),
            origin_chain_id: params.origin_chain_id,
            hub_chain_id: None,
            contract_address: None,
            signature: None,
            acknowledgement: None,
            registration: None,
            submitted_message_id: None,
            peer_connection: None,
        }
    }

    /// Advance to `next`, which must be the immediate successor of the
    /// current step within `sequence`. Forward-only: skipping and regression
    /// are rejected at the data layer regardless of what the caller computed.
    pub fn advance_to(
        &mut self,
        next: RegistrationStep,
        sequence: &[RegistrationStep],
    ) -> Result<(), TransitionReason> {
        let current_idx = sequence
            .iter()
            .position(|s| *s == self.step)
            .ok_or(TransitionReason::StepNotInSequence)?;
        match sequence.get(current_idx + 1) {
            Some(expected) if *expected == next => {
                self.step = next;
                Ok(())
            }
            _ => Err(TransitionReason::StepNotInSequence),
        }
    }

    /// Record the transactions attached to a transaction-variant report.
    pub fn select_transactions(&mut self, transactions: Vec<TxHash>) -> Result<(), TransitionReason> {
        if transactions.is_empty() {
            return Err(TransitionReason::TransactionsNotSelected);
        }
        self.selected_transactions = transactions;
        Ok(())
    }

    /// Record a freshly produced step signature.
    pub fn record_signature(&mut self, signature: StepSignature) {
        self.signature = Some(signature);
    }

    /// Record the acknowledgement entry observed on-chain.
    pub fn record_acknowledgement(&mut self, record: AcknowledgementRecord) {
        self.acknowledgement = Some(record);
    }

    /// Record the registration entry observed on-chain.
    pub fn record_registration(&mut self, record: RegistrationRecord) {
        self.registration = Some(record);
    }

    /// Whether the session has reached its in-sequence terminal step.
    pub fn is_complete(&self) -> bool {
        self.step.is_terminal() && self.phase == SessionPhase::Active
    }
}
