//! # Step Sequencing
//!
//! One master step list serves every (variant, mode) pair. A mode that lacks
//! a capability elides the steps needing it; adding a mode means defining a
//! new capability profile, not duplicating the sequence.

use crate::domain::value_objects::{RegistrationStep, RegistrationVariant, RelayMode};

use RegistrationStep as Step;

/// The master ordered step list. Per-session sequences are filtered views of
/// this list, never reorderings.
pub const MASTER_SEQUENCE: [RegistrationStep; 12] = [
    Step::SelectTransactions,
    Step::AcknowledgeAndSign,
    Step::AcknowledgeAndPay,
    Step::SwitchAndPayOne,
    Step::WaitForConnection,
    Step::AcknowledgementPayment,
    Step::GracePeriod,
    Step::RegisterAndSign,
    Step::RegisterAndPay,
    Step::SwitchAndPayTwo,
    Step::RegistrationPayment,
    Step::Success,
];

/// Capabilities a relay mode requires of the sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModeProfile {
    /// The payer must hop to the settlement chain mid-flow.
    pub chain_switch: bool,
    /// A direct relay connection must open before the relayer can act.
    pub relay_connection: bool,
}

impl ModeProfile {
    /// Derive the profile for `mode` given whether the origin is a spoke.
    pub fn resolve(mode: RelayMode, origin_is_spoke: bool) -> Self {
        match mode {
            RelayMode::Standard => Self::default(),
            RelayMode::SelfRelay => Self {
                chain_switch: origin_is_spoke,
                relay_connection: false,
            },
            RelayMode::P2pRelay => Self {
                chain_switch: false,
                relay_connection: true,
            },
        }
    }
}

/// Whether `step` appears in the sequence for (variant, profile).
fn step_required(step: RegistrationStep, variant: RegistrationVariant, profile: ModeProfile) -> bool {
    match step {
        Step::SelectTransactions => variant == RegistrationVariant::Transaction,
        Step::SwitchAndPayOne | Step::SwitchAndPayTwo => profile.chain_switch,
        Step::WaitForConnection => profile.relay_connection,
        _ => true,
    }
}

/// The ordered step sequence for a (variant, profile) pair.
pub fn sequence_for(variant: RegistrationVariant, profile: ModeProfile) -> Vec<RegistrationStep> {
    MASTER_SEQUENCE
        .iter()
        .copied()
        .filter(|step| step_required(*step, variant, profile))
        .collect()
}

/// The first step of a sequence.
pub fn first_step(variant: RegistrationVariant, profile: ModeProfile) -> RegistrationStep {
    sequence_for(variant, profile)[0]
}

/// The immediate successor of `current` within `sequence`, or `None` at the
/// terminal step or when `current` is not in the sequence.
pub fn successor(
    current: RegistrationStep,
    sequence: &[RegistrationStep],
) -> Option<RegistrationStep> {
    let idx = sequence.iter().position(|s| *s == current)?;
    sequence.get(idx + 1).copied()
}
