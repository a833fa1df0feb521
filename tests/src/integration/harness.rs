//! Fixtures for full-session walkthroughs.

use anyhow::{bail, Context, Result};
use shared_types::{BlockNumber, ChainId, ContractAddress, CrossChainMessageId, PeerId, TxHash,
    WalletAddress};
use std::sync::Arc;
use tokio::sync::mpsc;
use ward_registration::{
    AcknowledgementRecord, ChainRoleConfig, ChainRoleResolver, CoordinatorConfig,
    PeerRelayCoordinator, RegistrationRecord, RegistrationService, RegistrationStep,
    RegistrationVariant, RegistryStatusGateway, RelayMode, SessionEvent, SessionParams,
    SessionRole, SignatureKind, SigningPayload, SubmissionRequest, Timestamp,
};
use ward_registration::ports::outbound::{
    MockChainReadPort, MockPeerNetworkPort, MockSignerPort, MockTimeSource, OpenConnection,
    PeerNetworkEvent, SignerPort,
};
use ward_registration::RegistrationApi;

/// Candidate relay peer used across the suite.
pub const RELAY_PEER: &str = "relay-1";

/// Grace window bounds used by the scripted acknowledgement.
pub const GRACE_START: u64 = 100;
/// Expiry block of the scripted acknowledgement.
pub const GRACE_EXPIRY: u64 = 200;

/// Resolver with registry contracts on every hub.
pub fn resolver() -> ChainRoleResolver {
    let config = ChainRoleConfig::default().with_contracts([
        (ChainId::new(8453), ContractAddress::new([0x01u8; 20])),
        (ChainId::new(84532), ContractAddress::new([0x02u8; 20])),
        (ChainId::new(31337), ContractAddress::new([0x03u8; 20])),
    ]);
    ChainRoleResolver::new(Arc::new(config))
}

/// The acknowledgement entry the mock contract reports once pending.
pub fn ack_record() -> AcknowledgementRecord {
    AcknowledgementRecord {
        trusted_forwarder: ContractAddress::new([0x0Fu8; 20]),
        start_block: BlockNumber::new(GRACE_START),
        expiry_block: BlockNumber::new(GRACE_EXPIRY),
    }
}

/// The registration entry the mock contract reports once registered.
pub fn registration_record(message_id: CrossChainMessageId, origin: ChainId) -> RegistrationRecord {
    RegistrationRecord {
        registered_at: Timestamp::new(1_700_000_000),
        source_chain_id: origin,
        bridge_id: 1,
        is_sponsored: false,
        cross_chain_message_id: message_id,
    }
}

/// One session with its collaborators, driven through the public API.
pub struct FlowHarness {
    pub service: RegistrationService,
    pub chain: Arc<MockChainReadPort>,
    pub network: Option<Arc<MockPeerNetworkPort>>,
    pub relay_events: Option<mpsc::Sender<PeerNetworkEvent>>,
    pub signer: MockSignerPort,
    pub clock: Arc<MockTimeSource>,
    origin: ChainId,
}

impl FlowHarness {
    /// Build a harness acting as the registeree.
    pub fn new(variant: RegistrationVariant, mode: RelayMode, origin: u64) -> Self {
        Self::with_role(variant, mode, origin, SessionRole::Registeree)
    }

    /// Build a harness acting as the given role.
    pub fn with_role(
        variant: RegistrationVariant,
        mode: RelayMode,
        origin: u64,
        role: SessionRole,
    ) -> Self {
        let chain = Arc::new(MockChainReadPort::default());
        let clock = Arc::new(MockTimeSource::at(10_000));
        let gateway = RegistryStatusGateway::new(chain.clone());

        let (network, relay_events, coordinator) = if mode == RelayMode::P2pRelay {
            let network = Arc::new(MockPeerNetworkPort::default());
            let (tx, rx) = mpsc::channel(32);
            let coordinator = PeerRelayCoordinator::new(
                network.clone(),
                role,
                vec![PeerId::from(RELAY_PEER)],
                rx,
            );
            (Some(network), Some(tx), Some(coordinator))
        } else {
            (None, None, None)
        };

        let service = RegistrationService::new(
            SessionParams {
                variant,
                mode,
                registeree: WalletAddress::new([0xAAu8; 20]),
                origin_chain_id: ChainId::new(origin),
            },
            resolver(),
            gateway,
            coordinator,
            Box::new(clock.clone()),
            CoordinatorConfig::default(),
        );
        Self {
            service,
            chain,
            network,
            relay_events,
            signer: MockSignerPort::default(),
            clock,
            origin: ChainId::new(origin),
        }
    }

    fn settlement_chain(&self) -> ChainId {
        self.service
            .session()
            .hub_chain_id
            .unwrap_or(self.origin)
    }

    /// Perform the action the current step permits, returning the step the
    /// session lands on afterwards.
    pub async fn act(&mut self) -> Result<RegistrationStep> {
        use RegistrationStep as Step;
        let step = self.service.current_step();
        match step {
            Step::SelectTransactions => {
                self.service.advance(SessionEvent::TransactionsSelected {
                    transactions: vec![TxHash::new([0x11u8; 32])],
                })?;
            }
            Step::AcknowledgeAndSign | Step::RegisterAndSign => {
                let kind = if step == Step::AcknowledgeAndSign {
                    SignatureKind::Acknowledgement
                } else {
                    SignatureKind::Registration
                };
                let signature = self
                    .signer
                    .sign(SigningPayload {
                        kind,
                        chain_id: self.settlement_chain(),
                        registeree: self.service.session().registeree,
                        transactions: self.service.session().selected_transactions.clone(),
                    })
                    .await
                    .context("signer refused")?;
                self.service
                    .advance(SessionEvent::SignatureProduced { signature })?;
            }
            Step::AcknowledgeAndPay
            | Step::SwitchAndPayOne
            | Step::RegisterAndPay
            | Step::SwitchAndPayTwo => {
                if matches!(step, Step::SwitchAndPayOne | Step::SwitchAndPayTwo) {
                    self.service.advance(SessionEvent::ChainSwitched {
                        chain_id: self.settlement_chain(),
                    })?;
                }
                let kind = match step {
                    Step::AcknowledgeAndPay | Step::SwitchAndPayOne => {
                        SignatureKind::Acknowledgement
                    }
                    _ => SignatureKind::Registration,
                };
                let signature = self
                    .service
                    .session()
                    .signature
                    .clone()
                    .context("no signature recorded before pay step")?;
                let receipt = self
                    .signer
                    .submit(SubmissionRequest {
                        kind,
                        chain_id: self.settlement_chain(),
                        signature,
                    })
                    .await
                    .context("broadcast refused")?;
                self.service
                    .advance(SessionEvent::PaymentSubmitted { receipt })?;
            }
            Step::WaitForConnection => {
                let network = self
                    .network
                    .as_ref()
                    .context("p2p step without a network fixture")?;
                network.set_connections(vec![OpenConnection {
                    peer_id: PeerId::from(RELAY_PEER),
                    is_open: true,
                }]);
                self.service.refresh_relay();
            }
            Step::AcknowledgementPayment => {
                self.chain.update_state(|s| {
                    s.pending = Some(true);
                    s.acknowledgement = Some(ack_record());
                    s.block = BlockNumber::new(GRACE_START + 50);
                });
                self.service.poll_status().await?;
            }
            Step::GracePeriod => {
                self.chain
                    .update_state(|s| s.block = BlockNumber::new(GRACE_EXPIRY));
                self.service.sync_block().await?;
            }
            Step::RegistrationPayment => {
                let message_id = self.signer.message_id;
                let origin = self.origin;
                self.chain.update_state(|s| {
                    s.registered = Some(true);
                    s.registration = Some(registration_record(message_id, origin));
                });
                self.service.poll_status().await?;
            }
            Step::Success => bail!("already complete"),
        }
        Ok(self.service.current_step())
    }

    /// Drive the session to `Success`, returning every step visited in
    /// order, including the starting step.
    pub async fn run_to_completion(&mut self) -> Result<Vec<RegistrationStep>> {
        let mut visited = vec![self.service.current_step()];
        for _ in 0..64 {
            if self.service.current_step() == RegistrationStep::Success {
                return Ok(visited);
            }
            let landed = self.act().await?;
            if landed != *visited.last().expect("visited is never empty") {
                visited.push(landed);
            }
        }
        bail!("session did not complete within the iteration bound")
    }
}
