//! # Domain Value Objects
//!
//! Immutable value types for registration coordination: what is being
//! registered, who submits which transactions, and where a session sits in
//! its step sequence.

use serde::{Deserialize, Serialize};

/// What is being registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegistrationVariant {
    /// A compromised wallet.
    Wallet,
    /// One or more fraudulent transactions.
    Transaction,
}

/// Who submits which transactions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelayMode {
    /// The relay service pays gas on the registeree's behalf.
    Standard,
    /// The registeree submits every transaction, on one or two chains.
    SelfRelay,
    /// A directly connected peer relayer submits on the registeree's behalf.
    P2pRelay,
}

/// Position in the step sequence for a (variant, mode) pair.
///
/// The full list is the master sequence; each mode elides the steps it has
/// no use for (see `algorithms::steps`). `Success` is the only in-sequence
/// terminal step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegistrationStep {
    /// Choose which transactions to attach to the report (transaction variant).
    SelectTransactions,
    /// Registeree signs the acknowledgement payload.
    AcknowledgeAndSign,
    /// Payer submits the acknowledgement transaction.
    AcknowledgeAndPay,
    /// Payer switches to the settlement chain and pays the first leg.
    SwitchAndPayOne,
    /// Wait for a direct relay connection to open.
    WaitForConnection,
    /// Wait for the acknowledgement transaction to confirm on-chain.
    AcknowledgementPayment,
    /// Mandatory block-bounded delay between acknowledgement and registration.
    GracePeriod,
    /// Registeree signs the registration payload.
    RegisterAndSign,
    /// Payer submits the registration transaction.
    RegisterAndPay,
    /// Payer switches to the settlement chain and pays the second leg.
    SwitchAndPayTwo,
    /// Wait for the registration to be reported by the on-chain registry.
    RegistrationPayment,
    /// Registration observed on-chain with a matching message id.
    Success,
}

impl RegistrationStep {
    /// Steps whose progress is detected by polling the registry.
    pub fn polls_registry(&self) -> bool {
        matches!(
            self,
            Self::AcknowledgementPayment | Self::RegistrationPayment
        )
    }

    /// Whether the step is the in-sequence terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Whether a session can make progress, and if not, why.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// The session accepts events.
    Active,
    /// A bounded wait ran out; the caller may retry from the same step.
    Stalled(StallReason),
    /// Unrecoverable; a new session must be started.
    Failed(FailureReason),
}

impl SessionPhase {
    /// Whether events are currently accepted.
    pub fn accepts_events(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Recoverable timeout conditions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StallReason {
    /// No relay connection opened within the configured bound.
    ConnectionWaitTimedOut,
    /// A payment did not confirm within the configured bound.
    ConfirmationTimedOut,
}

/// Unrecoverable conditions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureReason {
    /// A step signature expired past its recovery window.
    SignatureExpired,
    /// The origin chain could not be routed to a settlement chain.
    ChainResolutionFailed,
    /// The relayer abandoned the session past the timeout.
    RelayAbandoned,
    /// Confirmed on-chain state cannot be reconciled with the session.
    IrreconcilableOnChainState,
}

/// Reason codes attached to rejected transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionReason {
    /// No signature is recorded for the pending pay step.
    SignatureMissing,
    /// The recorded signature's block window has passed.
    SignatureExpired,
    /// The acknowledgement has not been observed on-chain.
    AcknowledgementUnconfirmed,
    /// The grace period has not reached its expiry block.
    GracePeriodNotExpired,
    /// The registry does not report a matching registration.
    RegistrationNotObserved,
    /// No relay connection is open.
    ConnectionNotOpen,
    /// The transaction variant requires a non-empty selection first.
    TransactionsNotSelected,
    /// The requested step is not the immediate successor in the sequence.
    StepNotInSequence,
    /// The event is not meaningful at the current step.
    EventNotAccepted,
    /// The session is stalled or failed and accepts no events.
    SessionNotActive,
    /// Retry was requested but the session is not stalled.
    NotStalled,
}

/// Which party a local client is acting as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionRole {
    /// The wallet owner registering the compromise.
    Registeree,
    /// The peer paying gas on the registeree's behalf.
    Relayer,
}

/// Relay connection state as folded from networking events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionStatus {
    /// No candidate relay connection is open.
    #[default]
    Disconnected,
    /// A connection attempt is in flight.
    Connecting,
    /// An open connection to a candidate relay peer exists.
    Connected,
}

/// Where the current block sits relative to a grace window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraceStatus {
    /// Before the window's start block.
    Pending,
    /// Inside the window.
    Active,
    /// At or past the expiry block.
    Expired,
}

/// Seconds since the Unix epoch, injected through a `TimeSource`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Create a timestamp from epoch seconds.
    pub const fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Epoch seconds.
    pub const fn as_secs(&self) -> u64 {
        self.0
    }

    /// Seconds elapsed since `earlier`, saturating at zero.
    pub fn secs_since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}
