//! # Domain Invariants
//!
//! Guard predicates for step transitions. Each returns the reason code the
//! caller attaches to a rejected transition.

use super::entities::{AcknowledgementRecord, RegistrationRecord, StepSignature};
use super::value_objects::TransitionReason;
use shared_types::{BlockNumber, CrossChainMessageId};

/// Invariant: entry into a pay step requires a present, unexpired signature.
///
/// An unknown current block counts as fresh; expiry is enforced as soon as a
/// block height has been observed.
pub fn invariant_signature_fresh(
    signature: Option<&StepSignature>,
    current_block: Option<BlockNumber>,
) -> Result<(), TransitionReason> {
    let signature = signature.ok_or(TransitionReason::SignatureMissing)?;
    match current_block {
        Some(block) if !signature.is_fresh(block) => Err(TransitionReason::SignatureExpired),
        _ => Ok(()),
    }
}

/// Invariant: entry into the grace period requires the acknowledgement to
/// have been observed on-chain, not assumed from a local submit.
pub fn invariant_acknowledgement_confirmed(
    acknowledgement: Option<&AcknowledgementRecord>,
) -> Result<(), TransitionReason> {
    acknowledgement
        .map(|_| ())
        .ok_or(TransitionReason::AcknowledgementUnconfirmed)
}

/// Invariant: exit from the grace period requires the window to be expired,
/// which holds at and after the acknowledgement's expiry block.
pub fn invariant_grace_expired(
    acknowledgement: Option<&AcknowledgementRecord>,
    current_block: Option<BlockNumber>,
) -> Result<(), TransitionReason> {
    let ack = acknowledgement.ok_or(TransitionReason::AcknowledgementUnconfirmed)?;
    let block = current_block.ok_or(TransitionReason::GracePeriodNotExpired)?;
    if block >= ack.expiry_block {
        Ok(())
    } else {
        Err(TransitionReason::GracePeriodNotExpired)
    }
}

/// Invariant: entry into success requires the registry to report a
/// registration whose message id matches what this session submitted,
/// guarding against observing a stale or previous registration.
pub fn invariant_registration_matches(
    registration: Option<&RegistrationRecord>,
    submitted: Option<&CrossChainMessageId>,
) -> Result<(), TransitionReason> {
    let record = registration.ok_or(TransitionReason::RegistrationNotObserved)?;
    let submitted = submitted.ok_or(TransitionReason::RegistrationNotObserved)?;
    if record.cross_chain_message_id == *submitted {
        Ok(())
    } else {
        Err(TransitionReason::RegistrationNotObserved)
    }
}
