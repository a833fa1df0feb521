//! # Session Events
//!
//! Inputs to the registration state machine. UI actions, signer results,
//! chain observations, and relay observations all arrive as events; the
//! service decides whether each one advances the session.

use crate::adapters::status_gateway::RegistryStatusSnapshot;
use crate::domain::value_objects::{FailureReason, RegistrationStep};
use crate::domain::StepSignature;
use crate::ports::outbound::SubmissionReceipt;
use shared_types::{BlockNumber, ChainId, TxHash};

/// An input to the registration state machine.
#[derive(Clone, Debug)]
pub enum SessionEvent {
    /// The registeree chose which transactions to attach to the report.
    TransactionsSelected {
        /// The chosen transactions.
        transactions: Vec<TxHash>,
    },
    /// The external signer produced a step signature.
    SignatureProduced {
        /// The fresh signature.
        signature: StepSignature,
    },
    /// The broadcaster accepted a submission.
    PaymentSubmitted {
        /// Opaque handle for the submitted transaction.
        receipt: SubmissionReceipt,
    },
    /// The payer's wallet switched to another chain.
    ChainSwitched {
        /// The chain now active in the wallet.
        chain_id: ChainId,
    },
    /// The relay coordinator observed an open connection.
    ConnectionObserved,
    /// A registry status poll completed.
    StatusObserved {
        /// The fetched snapshot.
        snapshot: RegistryStatusSnapshot,
    },
    /// A new block height was observed on the settlement path.
    BlockObserved {
        /// The observed height.
        block: BlockNumber,
    },
    /// The caller explicitly requests entry into a step, subject to guards.
    StepChangeRequested {
        /// The requested step.
        step: RegistrationStep,
    },
    /// The caller retries out of a stalled phase.
    RetryRequested,
    /// An unrecoverable condition was detected by a collaborator.
    FatalError {
        /// Why the session cannot continue.
        reason: FailureReason,
    },
}
