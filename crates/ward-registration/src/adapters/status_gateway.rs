//! # Registry Status Gateway
//!
//! Bundles the four registry reads into one multicall round trip and
//! normalizes the result into a typed snapshot. Every sub-read degrades
//! independently: a failed read leaves its field absent or false, and the
//! caller treats "false because the read failed" and "actually false" the
//! same way - neither permits progress.

use crate::domain::{AcknowledgementRecord, RegistrationRecord};
use crate::ports::outbound::{CallOutcome, CallReturn, ChainReadPort, RegistryCall};
use shared_types::{BlockNumber, ChainId, ContractAddress, WalletAddress};
use std::sync::Arc;
use tracing::{debug, warn};

/// Normalized registry state for one registeree at one point in time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistryStatusSnapshot {
    /// Whether the registry reports the address as registered.
    pub is_registered: bool,
    /// Whether the registry reports a pending acknowledgement.
    pub is_pending: bool,
    /// Registration entry; present only when `is_registered` held.
    pub registration: Option<RegistrationRecord>,
    /// Acknowledgement entry; present only when `is_pending` held.
    pub acknowledgement: Option<AcknowledgementRecord>,
}

/// Gateway over the batched chain read port.
#[derive(Clone)]
pub struct RegistryStatusGateway {
    client: Arc<dyn ChainReadPort>,
}

impl RegistryStatusGateway {
    /// Create a gateway over `client`.
    pub fn new(client: Arc<dyn ChainReadPort>) -> Self {
        Self { client }
    }

    /// Fetch the registry status for `registeree` in one round trip.
    ///
    /// A transport-level failure degrades to the all-absent snapshot; it is
    /// retried on the caller's next poll cycle, not here.
    pub async fn fetch_status(
        &self,
        chain: ChainId,
        contract: ContractAddress,
        registeree: WalletAddress,
    ) -> RegistryStatusSnapshot {
        let calls = [
            RegistryCall::IsRegistered { registeree },
            RegistryCall::IsPending { registeree },
            RegistryCall::RegistrationEntry { registeree },
            RegistryCall::AcknowledgementEntry { registeree },
        ];

        let outcomes = match self.client.multicall(chain, contract, &calls).await {
            Ok(outcomes) if outcomes.len() == calls.len() => outcomes,
            Ok(outcomes) => {
                warn!(
                    chain = %chain,
                    expected = calls.len(),
                    got = outcomes.len(),
                    "multicall returned misaligned outcome count"
                );
                return RegistryStatusSnapshot::default();
            }
            Err(err) => {
                warn!(chain = %chain, error = %err, "registry multicall failed");
                return RegistryStatusSnapshot::default();
            }
        };

        let registered_flag = decode_flag(&outcomes[0]);
        let pending_flag = decode_flag(&outcomes[1]);

        // Entry reads are only trusted when their gating flag read itself
        // succeeded and reported true; a flag failure suppresses even a
        // successful dependent read.
        let registration = match registered_flag {
            Some(true) => decode_registration(&outcomes[2]),
            _ => None,
        };
        let acknowledgement = match pending_flag {
            Some(true) => decode_acknowledgement(&outcomes[3]),
            _ => None,
        };

        let snapshot = RegistryStatusSnapshot {
            is_registered: registered_flag.unwrap_or(false),
            is_pending: pending_flag.unwrap_or(false),
            registration,
            acknowledgement,
        };
        debug!(
            chain = %chain,
            registered = snapshot.is_registered,
            pending = snapshot.is_pending,
            "registry status fetched"
        );
        snapshot
    }

    /// Current block height on `chain`, absent on read failure.
    pub async fn block_number(&self, chain: ChainId) -> Option<BlockNumber> {
        match self.client.block_number(chain).await {
            Ok(block) => Some(block),
            Err(err) => {
                debug!(chain = %chain, error = %err, "block number read failed");
                None
            }
        }
    }
}

fn decode_flag(outcome: &CallOutcome) -> Option<bool> {
    match outcome {
        CallOutcome::Success(CallReturn::Flag(flag)) => Some(*flag),
        CallOutcome::Success(other) => {
            debug!(?other, "flag read returned unexpected payload shape");
            None
        }
        CallOutcome::Failure(reason) => {
            debug!(reason, "flag read failed");
            None
        }
    }
}

fn decode_registration(outcome: &CallOutcome) -> Option<RegistrationRecord> {
    match outcome {
        CallOutcome::Success(CallReturn::Registration(entry)) => Some(entry.clone()),
        CallOutcome::Success(other) => {
            debug!(?other, "registration read returned unexpected payload shape");
            None
        }
        CallOutcome::Failure(reason) => {
            debug!(reason, "registration read failed");
            None
        }
    }
}

fn decode_acknowledgement(outcome: &CallOutcome) -> Option<AcknowledgementRecord> {
    match outcome {
        CallOutcome::Success(CallReturn::Acknowledgement(entry)) => Some(entry.clone()),
        CallOutcome::Success(other) => {
            debug!(?other, "acknowledgement read returned unexpected payload shape");
            None
        }
        CallOutcome::Failure(reason) => {
            debug!(reason, "acknowledgement read failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Timestamp;
    use crate::domain::ChainReadError;
    use crate::ports::outbound::{MockChainReadPort, MockRegistryState};
    use async_trait::async_trait;
    use shared_types::{BlockNumber, CrossChainMessageId};

    fn registeree() -> WalletAddress {
        WalletAddress::new([0xAAu8; 20])
    }

    fn test_ack() -> AcknowledgementRecord {
        AcknowledgementRecord {
            trusted_forwarder: ContractAddress::new([0x01u8; 20]),
            start_block: BlockNumber::new(100),
            expiry_block: BlockNumber::new(200),
        }
    }

    fn test_registration() -> RegistrationRecord {
        RegistrationRecord {
            registered_at: Timestamp::new(1_700_000_000),
            source_chain_id: ChainId::new(10),
            bridge_id: 1,
            is_sponsored: false,
            cross_chain_message_id: CrossChainMessageId::new([0x42u8; 32]),
        }
    }

    async fn fetch(state: MockRegistryState) -> RegistryStatusSnapshot {
        let gateway = RegistryStatusGateway::new(Arc::new(MockChainReadPort::new(state)));
        gateway
            .fetch_status(ChainId::new(8453), ContractAddress::zero(), registeree())
            .await
    }

    #[tokio::test]
    async fn test_registered_snapshot_carries_entry() {
        let snapshot = fetch(MockRegistryState {
            registered: Some(true),
            pending: Some(false),
            registration: Some(test_registration()),
            ..Default::default()
        })
        .await;
        assert!(snapshot.is_registered);
        assert_eq!(snapshot.registration, Some(test_registration()));
        assert!(snapshot.acknowledgement.is_none());
    }

    #[tokio::test]
    async fn test_pending_snapshot_carries_acknowledgement() {
        let snapshot = fetch(MockRegistryState {
            registered: Some(false),
            pending: Some(true),
            acknowledgement: Some(test_ack()),
            ..Default::default()
        })
        .await;
        assert!(snapshot.is_pending);
        assert_eq!(snapshot.acknowledgement, Some(test_ack()));
    }

    #[tokio::test]
    async fn test_failed_pending_read_suppresses_successful_ack_read() {
        let snapshot = fetch(MockRegistryState {
            registered: Some(false),
            pending: None, // pending read fails
            acknowledgement: Some(test_ack()),
            ..Default::default()
        })
        .await;
        assert!(!snapshot.is_pending);
        assert!(snapshot.acknowledgement.is_none());
    }

    #[tokio::test]
    async fn test_failed_registered_read_degrades_to_false() {
        let snapshot = fetch(MockRegistryState {
            registered: None,
            pending: Some(false),
            registration: Some(test_registration()),
            ..Default::default()
        })
        .await;
        assert!(!snapshot.is_registered);
        assert!(snapshot.registration.is_none());
    }

    #[tokio::test]
    async fn test_entry_not_read_when_flag_is_false() {
        let snapshot = fetch(MockRegistryState {
            registered: Some(false),
            pending: Some(false),
            registration: Some(test_registration()),
            acknowledgement: Some(test_ack()),
            ..Default::default()
        })
        .await;
        assert!(snapshot.registration.is_none());
        assert!(snapshot.acknowledgement.is_none());
    }

    #[tokio::test]
    async fn test_transport_failure_degrades_to_default_snapshot() {
        let snapshot = fetch(MockRegistryState {
            registered: Some(true),
            pending: Some(true),
            registration: Some(test_registration()),
            acknowledgement: Some(test_ack()),
            fail_transport: true,
            ..Default::default()
        })
        .await;
        assert_eq!(snapshot, RegistryStatusSnapshot::default());
    }

    /// Port returning scripted raw outcomes, for shape-mismatch cases the
    /// state-based mock cannot produce.
    struct ScriptedPort {
        outcomes: Vec<CallOutcome>,
    }

    #[async_trait]
    impl ChainReadPort for ScriptedPort {
        async fn multicall(
            &self,
            _chain: ChainId,
            _contract: ContractAddress,
            _calls: &[RegistryCall],
        ) -> Result<Vec<CallOutcome>, ChainReadError> {
            Ok(self.outcomes.clone())
        }

        async fn block_number(&self, _chain: ChainId) -> Result<BlockNumber, ChainReadError> {
            Ok(BlockNumber::new(0))
        }
    }

    #[tokio::test]
    async fn test_shape_mismatch_counts_as_failed_read() {
        // The registered slot answers with an acknowledgement payload; the
        // tag check must reject it rather than assume.
        let gateway = RegistryStatusGateway::new(Arc::new(ScriptedPort {
            outcomes: vec![
                CallOutcome::Success(CallReturn::Acknowledgement(test_ack())),
                CallOutcome::Success(CallReturn::Flag(true)),
                CallOutcome::Failure("reverted".into()),
                CallOutcome::Success(CallReturn::Acknowledgement(test_ack())),
            ],
        }));
        let snapshot = gateway
            .fetch_status(ChainId::new(8453), ContractAddress::zero(), registeree())
            .await;
        assert!(!snapshot.is_registered);
        assert!(snapshot.is_pending);
        assert_eq!(snapshot.acknowledgement, Some(test_ack()));
    }

    #[tokio::test]
    async fn test_misaligned_outcome_count_degrades() {
        let gateway = RegistryStatusGateway::new(Arc::new(ScriptedPort {
            outcomes: vec![CallOutcome::Success(CallReturn::Flag(true))],
        }));
        let snapshot = gateway
            .fetch_status(ChainId::new(8453), ContractAddress::zero(), registeree())
            .await;
        assert_eq!(snapshot, RegistryStatusSnapshot::default());
    }
}
