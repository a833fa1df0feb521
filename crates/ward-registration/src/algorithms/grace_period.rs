//! # Grace Period Timing
//!
//! The mandatory delay between acknowledgement confirmation and eligibility
//! to register, measured in block numbers because settlement finality is
//! block-bound. Wall-clock estimates exist for display only and never gate
//! a transition.

use crate::domain::entities::AcknowledgementRecord;
use crate::domain::value_objects::GraceStatus;
use shared_types::BlockNumber;
use std::time::Duration;

/// Where `current_block` sits relative to the acknowledgement's window:
/// `Pending` strictly before the start block, `Active` from the start block
/// up to but excluding the expiry block, `Expired` at or after expiry.
pub fn grace_status(ack: &AcknowledgementRecord, current_block: BlockNumber) -> GraceStatus {
    if current_block < ack.start_block {
        GraceStatus::Pending
    } else if current_block < ack.expiry_block {
        GraceStatus::Active
    } else {
        GraceStatus::Expired
    }
}

/// Wall-clock estimate of the time remaining until expiry, for display.
///
/// Derived from an externally supplied average block time; zero once the
/// window has expired.
pub fn estimate_remaining(
    ack: &AcknowledgementRecord,
    current_block: BlockNumber,
    avg_block_time: Duration,
) -> Duration {
    let blocks_left = current_block.distance_to(ack.expiry_block);
    avg_block_time.saturating_mul(blocks_left as u32)
}
