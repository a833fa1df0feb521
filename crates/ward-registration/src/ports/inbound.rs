//! # Inbound Ports
//!
//! API trait defining what the registration subsystem can do for its
//! callers (UI drivers, relay clients).

use crate::domain::{RegistrationError, RegistrationSession, RegistrationStep, SessionRole};
use crate::service::events::SessionEvent;
use async_trait::async_trait;

/// Registration coordination API - inbound port.
#[async_trait]
pub trait RegistrationApi: Send {
    /// Apply an event to the session, returning the step it lands on.
    fn advance(&mut self, event: SessionEvent) -> Result<RegistrationStep, RegistrationError>;

    /// The session's current step.
    fn current_step(&self) -> RegistrationStep;

    /// The waiting notice for the given local role, if the step is a wait.
    fn waiting_notice(&self, role: SessionRole) -> Option<&'static str>;

    /// Read-only view of the session.
    fn session(&self) -> &RegistrationSession;

    /// Poll the registry once, folding the snapshot into the session.
    ///
    /// Returns `Ok(false)` when the poll was coalesced, superseded, or the
    /// current step does not depend on registry status.
    async fn poll_status(&mut self) -> Result<bool, RegistrationError>;

    /// Tear the session down, cancelling outstanding polls and probes.
    fn abandon(&mut self);
}
