//! # Waiting Projections
//!
//! User-facing "waiting for X" state is a pure projection of
//! (step, mode, role). One table serves every screen; rendering code never
//! branches on session internals.

use crate::domain::value_objects::{RegistrationStep, RelayMode, SessionRole};

use RegistrationStep as Step;
use RelayMode::{P2pRelay, SelfRelay, Standard};
use SessionRole::{Registeree, Relayer};

/// The waiting notice for a (step, mode, role) triple, or `None` when the
/// local party is expected to act at this step.
pub fn waiting_notice(
    step: RegistrationStep,
    mode: RelayMode,
    role: SessionRole,
) -> Option<&'static str> {
    match (step, mode, role) {
        // The counterpart role waits while the registeree signs.
        (Step::AcknowledgeAndSign, P2pRelay, Relayer) => {
            Some("waiting for registeree to sign acknowledgement")
        }
        (Step::RegisterAndSign, P2pRelay, Relayer) => {
            Some("waiting for registeree to sign registration")
        }

        // The registeree waits while someone else pays.
        (Step::AcknowledgeAndPay | Step::AcknowledgementPayment, P2pRelay, Registeree) => {
            Some("waiting for relayer to submit acknowledgement transaction")
        }
        (Step::RegisterAndPay | Step::RegistrationPayment, P2pRelay, Registeree) => {
            Some("waiting for relayer to submit registration transaction")
        }
        (Step::AcknowledgeAndPay, Standard, Registeree) => {
            Some("waiting for relay service to submit acknowledgement transaction")
        }
        (Step::RegisterAndPay, Standard, Registeree) => {
            Some("waiting for relay service to submit registration transaction")
        }

        // Everyone waits on chains and clocks.
        (Step::WaitForConnection, P2pRelay, _) => Some("waiting for relay connection"),
        (Step::AcknowledgementPayment, Standard | SelfRelay, _) => {
            Some("waiting for acknowledgement transaction to confirm")
        }
        (Step::AcknowledgementPayment, P2pRelay, Relayer) => {
            Some("waiting for acknowledgement transaction to confirm")
        }
        (Step::RegistrationPayment, Standard | SelfRelay, _) => {
            Some("waiting for registration transaction to confirm")
        }
        (Step::RegistrationPayment, P2pRelay, Relayer) => {
            Some("waiting for registration transaction to confirm")
        }
        (Step::GracePeriod, _, _) => Some("waiting for grace period to expire"),

        // Local action or terminal: nothing to wait on.
        _ => None,
    }
}
