//! # Registration Service
//!
//! The top-level orchestrator for one registration session. It consumes
//! events, enforces the transition guards, and reads status through its
//! collaborators; it never signs or submits anything itself.

use crate::adapters::peer_relay::PeerRelayCoordinator;
use crate::adapters::status_gateway::{RegistryStatusGateway, RegistryStatusSnapshot};
use crate::algorithms::steps::{sequence_for, successor, ModeProfile};
use crate::algorithms::waiting::waiting_notice;
use crate::domain::chain_roles::{ChainRoleResolver, HubResolution};
use crate::domain::invariants::{
    invariant_acknowledgement_confirmed, invariant_grace_expired, invariant_registration_matches,
    invariant_signature_fresh,
};
use crate::domain::{
    FailureReason, RegistrationError, RegistrationSession, RegistrationStep, SessionParams,
    SessionPhase, SessionRole, SignatureKind, StallReason, Timestamp, TransitionReason,
};
use crate::ports::inbound::RegistrationApi;
use crate::ports::outbound::TimeSource;
use crate::service::events::SessionEvent;
use crate::service::polling::StatusPoller;
use async_trait::async_trait;
use shared_types::{BlockNumber, ChainId};
use tracing::{debug, info, warn};

use crate::domain::value_objects::ConnectionStatus;
use RegistrationStep as Step;

/// Timing bounds for the session's waits.
#[derive(Clone, Copy, Debug)]
pub struct CoordinatorConfig {
    /// Seconds to wait for a relay connection before stalling.
    pub connection_wait_timeout_secs: u64,
    /// Seconds to wait for a payment confirmation before stalling.
    pub confirmation_timeout_secs: u64,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            connection_wait_timeout_secs: 120,
            confirmation_timeout_secs: 300,
        }
    }
}

/// Coordinating service for one registration session.
///
/// Drives the session through its step sequence: events arrive through
/// [`Self::advance`], registry truth through [`Self::poll_status`], relay
/// state through [`Self::refresh_relay`], and wall-clock stall detection
/// through [`Self::on_tick`].
pub struct RegistrationService {
    session: RegistrationSession,
    sequence: Vec<RegistrationStep>,
    resolver: ChainRoleResolver,
    gateway: RegistryStatusGateway,
    coordinator: Option<PeerRelayCoordinator>,
    poller: StatusPoller,
    time_source: Box<dyn TimeSource>,
    config: CoordinatorConfig,
    step_entered_at: Timestamp,
    last_block: Option<BlockNumber>,
}

impl RegistrationService {
    /// Create a service for a fresh session.
    ///
    /// The origin chain is routed immediately; an unknown spoke leaves the
    /// route unresolved (with a warning) and any later attempt to pay on it
    /// fails the session.
    pub fn new(
        params: SessionParams,
        resolver: ChainRoleResolver,
        gateway: RegistryStatusGateway,
        coordinator: Option<PeerRelayCoordinator>,
        time_source: Box<dyn TimeSource>,
        config: CoordinatorConfig,
    ) -> Self {
        let profile = ModeProfile::resolve(params.mode, resolver.is_spoke_chain(params.origin_chain_id));
        let sequence = sequence_for(params.variant, profile);
        let mut session = RegistrationSession::new(params, sequence[0]);
        Self::route(&resolver, &mut session);
        session.peer_connection = coordinator.as_ref().map(|c| c.connection().clone());

        let step_entered_at = time_source.now();
        info!(
            session = %session.id,
            variant = ?session.variant,
            mode = ?session.mode,
            origin = %session.origin_chain_id,
            "registration session started"
        );
        Self {
            session,
            sequence,
            resolver,
            gateway,
            coordinator,
            poller: StatusPoller::new(),
            time_source,
            config,
            step_entered_at,
            last_block: None,
        }
    }

    /// Derive the settlement route for the session's origin chain.
    fn route(resolver: &ChainRoleResolver, session: &mut RegistrationSession) {
        session.hub_chain_id = match resolver.resolve(session.origin_chain_id) {
            HubResolution::AlreadyHub => Some(session.origin_chain_id),
            HubResolution::Mapped(hub) => Some(hub),
            HubResolution::Unmapped => {
                warn!(
                    session = %session.id,
                    chain = %session.origin_chain_id,
                    "origin chain has no settlement route"
                );
                None
            }
        };
        session.contract_address = session
            .hub_chain_id
            .and_then(|hub| resolver.registry_contract(hub));
    }

    /// Change the origin chain. Only permitted before any progress has been
    /// made; the settlement route is recomputed, never carried over.
    pub fn set_origin_chain(&mut self, chain_id: ChainId) -> Result<(), RegistrationError> {
        if self.session.step != self.sequence[0] {
            return Err(self.violation(TransitionReason::EventNotAccepted));
        }
        self.session.origin_chain_id = chain_id;
        let profile = ModeProfile::resolve(self.session.mode, self.resolver.is_spoke_chain(chain_id));
        self.sequence = sequence_for(self.session.variant, profile);
        Self::route(&self.resolver, &mut self.session);
        if self.session.hub_chain_id.is_none() {
            return Err(RegistrationError::UnresolvedChainRole { chain_id });
        }
        Ok(())
    }

    /// The step sequence this session walks.
    pub fn sequence(&self) -> &[RegistrationStep] {
        &self.sequence
    }

    /// The session's phase.
    pub fn phase(&self) -> SessionPhase {
        self.session.phase
    }

    /// Last block height observed on the settlement path.
    pub fn last_block(&self) -> Option<BlockNumber> {
        self.last_block
    }

    /// Apply `event`, returning the step the session lands on.
    pub fn advance(&mut self, event: SessionEvent) -> Result<Step, RegistrationError> {
        if let SessionEvent::FatalError { reason } = &event {
            let reason = *reason;
            return Err(self.fail(reason));
        }

        match self.session.phase {
            SessionPhase::Active => {
                if matches!(event, SessionEvent::RetryRequested) {
                    return Err(self.violation(TransitionReason::NotStalled));
                }
            }
            SessionPhase::Stalled(reason) => {
                if matches!(event, SessionEvent::RetryRequested) {
                    info!(session = %self.session.id, ?reason, "retrying from stalled phase");
                    self.session.phase = SessionPhase::Active;
                    self.step_entered_at = self.time_source.now();
                    return Ok(self.session.step);
                }
                return Err(self.violation(TransitionReason::SessionNotActive));
            }
            SessionPhase::Failed(_) => {
                return Err(self.violation(TransitionReason::SessionNotActive));
            }
        }

        match event {
            SessionEvent::TransactionsSelected { transactions } => {
                if self.session.step != Step::SelectTransactions {
                    return Err(self.violation(TransitionReason::EventNotAccepted));
                }
                if let Err(reason) = self.session.select_transactions(transactions) {
                    return Err(self.violation(reason));
                }
                self.try_advance()
            }
            SessionEvent::SignatureProduced { signature } => {
                let expected = match self.session.step {
                    Step::AcknowledgeAndSign => SignatureKind::Acknowledgement,
                    Step::RegisterAndSign => SignatureKind::Registration,
                    _ => return Err(self.violation(TransitionReason::EventNotAccepted)),
                };
                if signature.kind != expected {
                    return Err(self.violation(TransitionReason::EventNotAccepted));
                }
                self.session.record_signature(signature);
                self.try_advance()
            }
            SessionEvent::PaymentSubmitted { receipt } => {
                if !matches!(
                    self.session.step,
                    Step::AcknowledgeAndPay
                        | Step::SwitchAndPayOne
                        | Step::RegisterAndPay
                        | Step::SwitchAndPayTwo
                ) {
                    return Err(self.violation(TransitionReason::EventNotAccepted));
                }
                if self.session.contract_address.is_none() {
                    return Err(self.fail(FailureReason::ChainResolutionFailed));
                }
                // The submission consumes the recorded signature; an expired
                // one is confirmed-invalid, not retryable.
                match invariant_signature_fresh(self.session.signature.as_ref(), self.last_block) {
                    Err(TransitionReason::SignatureExpired) => {
                        return Err(self.fail(FailureReason::SignatureExpired));
                    }
                    Err(reason) => return Err(self.violation(reason)),
                    Ok(()) => {}
                }
                if let Some(message_id) = receipt.cross_chain_message_id {
                    self.session.submitted_message_id = Some(message_id);
                }
                self.try_advance()
            }
            SessionEvent::ChainSwitched { chain_id } => {
                if !matches!(self.session.step, Step::SwitchAndPayOne | Step::SwitchAndPayTwo) {
                    return Err(self.violation(TransitionReason::EventNotAccepted));
                }
                debug!(session = %self.session.id, chain = %chain_id, "payer switched chain");
                Ok(self.session.step)
            }
            SessionEvent::ConnectionObserved => {
                if self.session.step != Step::WaitForConnection {
                    return Err(self.violation(TransitionReason::EventNotAccepted));
                }
                self.try_advance()
            }
            SessionEvent::StatusObserved { snapshot } => self.apply_snapshot(snapshot),
            SessionEvent::BlockObserved { block } => {
                self.last_block = Some(block);
                if self.session.step == Step::GracePeriod
                    && invariant_grace_expired(
                        self.session.acknowledgement.as_ref(),
                        self.last_block,
                    )
                    .is_ok()
                {
                    return self.try_advance();
                }
                Ok(self.session.step)
            }
            SessionEvent::StepChangeRequested { step } => {
                match successor(self.session.step, &self.sequence) {
                    Some(next) if next == step => self.try_advance(),
                    _ => Err(self.violation(TransitionReason::StepNotInSequence)),
                }
            }
            SessionEvent::RetryRequested | SessionEvent::FatalError { .. } => {
                // Handled above; kept for exhaustiveness.
                Ok(self.session.step)
            }
        }
    }

    /// Fold a registry snapshot into the session, advancing when a guard
    /// becomes satisfied. A snapshot that shows no progress is not an error;
    /// the next poll cycle retries.
    fn apply_snapshot(&mut self, snapshot: RegistryStatusSnapshot) -> Result<Step, RegistrationError> {
        match self.session.step {
            Step::AcknowledgementPayment => {
                if let Some(ack) = snapshot.acknowledgement {
                    self.session.record_acknowledgement(ack);
                    return self.try_advance();
                }
                Ok(self.session.step)
            }
            Step::RegistrationPayment => {
                if snapshot.is_registered {
                    match invariant_registration_matches(
                        snapshot.registration.as_ref(),
                        self.session.submitted_message_id.as_ref(),
                    ) {
                        Ok(()) => {
                            if let Some(record) = snapshot.registration {
                                self.session.record_registration(record);
                            }
                            return self.try_advance();
                        }
                        Err(_) => {
                            debug!(
                                session = %self.session.id,
                                "registry reports a registration that does not match this session"
                            );
                        }
                    }
                }
                Ok(self.session.step)
            }
            _ => Err(self.violation(TransitionReason::EventNotAccepted)),
        }
    }

    /// Advance to the successor step if its entry guard is satisfied.
    fn try_advance(&mut self) -> Result<Step, RegistrationError> {
        let Some(next) = successor(self.session.step, &self.sequence) else {
            return Err(self.violation(TransitionReason::StepNotInSequence));
        };
        if let Err(reason) = self.entry_guard(next) {
            if reason == TransitionReason::SignatureExpired {
                return Err(self.fail(FailureReason::SignatureExpired));
            }
            return Err(self.violation(reason));
        }
        if let Err(reason) = self.session.advance_to(next, &self.sequence) {
            return Err(self.violation(reason));
        }
        self.step_entered_at = self.time_source.now();
        if !next.polls_registry() {
            // Leaving a status-dependent step invalidates outstanding polls.
            self.poller.cancel();
        }
        info!(session = %self.session.id, step = ?next, "step advanced");
        Ok(next)
    }

    /// Entry guard for `next`, evaluated from the current step's state.
    fn entry_guard(&self, next: Step) -> Result<(), TransitionReason> {
        match next {
            Step::AcknowledgeAndPay
            | Step::SwitchAndPayOne
            | Step::RegisterAndPay
            | Step::SwitchAndPayTwo => {
                invariant_signature_fresh(self.session.signature.as_ref(), self.last_block)
            }
            Step::AcknowledgementPayment if self.session.step == Step::WaitForConnection => {
                let open = self
                    .coordinator
                    .as_ref()
                    .map(|c| c.connection().is_open())
                    .unwrap_or(false);
                if open {
                    Ok(())
                } else {
                    Err(TransitionReason::ConnectionNotOpen)
                }
            }
            Step::GracePeriod => {
                invariant_acknowledgement_confirmed(self.session.acknowledgement.as_ref())
            }
            Step::RegisterAndSign => {
                invariant_grace_expired(self.session.acknowledgement.as_ref(), self.last_block)
            }
            Step::Success => invariant_registration_matches(
                self.session.registration.as_ref(),
                self.session.submitted_message_id.as_ref(),
            ),
            _ => Ok(()),
        }
    }

    /// Poll the registry once under the poll discipline.
    ///
    /// Returns `Ok(false)` when the step does not depend on registry status,
    /// a poll is already in flight, or the completion was superseded.
    pub async fn poll_status(&mut self) -> Result<bool, RegistrationError> {
        if !self.session.phase.accepts_events() || !self.session.step.polls_registry() {
            return Ok(false);
        }
        let (Some(chain), Some(contract)) = (self.session.hub_chain_id, self.session.contract_address)
        else {
            return Err(self.fail(FailureReason::ChainResolutionFailed));
        };
        let Some(permit) = self.poller.begin() else {
            return Ok(false);
        };

        let snapshot = self
            .gateway
            .fetch_status(chain, contract, self.session.registeree)
            .await;

        if !self.poller.complete(permit) {
            debug!(session = %self.session.id, "discarding superseded status poll");
            return Ok(false);
        }
        self.advance(SessionEvent::StatusObserved { snapshot })?;
        Ok(true)
    }

    /// Observe the settlement chain's block height once.
    pub async fn sync_block(&mut self) -> Result<Option<BlockNumber>, RegistrationError> {
        let Some(chain) = self.session.hub_chain_id else {
            return Ok(None);
        };
        let Some(block) = self.gateway.block_number(chain).await else {
            return Ok(None);
        };
        self.advance(SessionEvent::BlockObserved { block })?;
        Ok(Some(block))
    }

    /// Drain relay events and re-check the connection, folding the result
    /// into the session. Advances out of the connection wait when an open
    /// connection is observed.
    pub fn refresh_relay(&mut self) -> Option<ConnectionStatus> {
        let coordinator = self.coordinator.as_mut()?;
        let status = coordinator.refresh();
        self.session.peer_connection = Some(coordinator.connection().clone());
        if status == ConnectionStatus::Connected
            && self.session.step == Step::WaitForConnection
            && self.session.phase.accepts_events()
        {
            let _ = self.advance(SessionEvent::ConnectionObserved);
        }
        Some(status)
    }

    /// Actively probe the relay peer and fold the measured latency into the
    /// session, for liveness display during the connection wait.
    pub async fn probe_relay(&mut self) -> Option<crate::adapters::peer_relay::RelayProbeOutcome> {
        let coordinator = self.coordinator.as_mut()?;
        let peer = coordinator
            .connection()
            .remote_peer_id
            .clone()
            .or_else(|| coordinator.connection().relay_peer_ids.first().cloned())?;
        let outcome = coordinator.probe_peer_latency(&peer).await;
        self.session.peer_connection = Some(coordinator.connection().clone());
        Some(outcome)
    }

    /// Wall-clock stall detection. Stalls are recoverable: the caller may
    /// issue [`SessionEvent::RetryRequested`] to continue from the same step.
    pub fn on_tick(&mut self) -> Option<StallReason> {
        if !self.session.phase.accepts_events() {
            return None;
        }
        let elapsed = self.time_source.now().secs_since(self.step_entered_at);
        let reason = match self.session.step {
            Step::WaitForConnection if elapsed >= self.config.connection_wait_timeout_secs => {
                StallReason::ConnectionWaitTimedOut
            }
            Step::AcknowledgementPayment | Step::RegistrationPayment
                if elapsed >= self.config.confirmation_timeout_secs =>
            {
                StallReason::ConfirmationTimedOut
            }
            _ => return None,
        };
        warn!(session = %self.session.id, ?reason, step = ?self.session.step, "session stalled");
        self.session.phase = SessionPhase::Stalled(reason);
        self.poller.cancel();
        Some(reason)
    }

    fn violation(&self, reason: TransitionReason) -> RegistrationError {
        debug!(session = %self.session.id, step = ?self.session.step, ?reason, "transition rejected");
        RegistrationError::TransitionViolation {
            step: self.session.step,
            reason,
        }
    }

    fn fail(&mut self, reason: FailureReason) -> RegistrationError {
        warn!(session = %self.session.id, ?reason, "session failed");
        self.session.phase = SessionPhase::Failed(reason);
        self.poller.cancel();
        RegistrationError::SessionFailed { reason }
    }
}

#[async_trait]
impl RegistrationApi for RegistrationService {
    fn advance(&mut self, event: SessionEvent) -> Result<Step, RegistrationError> {
        RegistrationService::advance(self, event)
    }

    fn current_step(&self) -> Step {
        self.session.step
    }

    fn waiting_notice(&self, role: SessionRole) -> Option<&'static str> {
        waiting_notice(self.session.step, self.session.mode, role)
    }

    fn session(&self) -> &RegistrationSession {
        &self.session
    }

    async fn poll_status(&mut self) -> Result<bool, RegistrationError> {
        RegistrationService::poll_status(self).await
    }

    fn abandon(&mut self) {
        info!(session = %self.session.id, "session abandoned");
        self.poller.cancel();
        self.coordinator = None;
    }
}
