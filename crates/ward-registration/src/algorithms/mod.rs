//! # Algorithms Module
//!
//! Pure sequencing and timing logic: the master step list with per-mode
//! elision, grace-period status, and the waiting-notice projection.

pub mod grace_period;
pub mod steps;
pub mod waiting;

pub use grace_period::{estimate_remaining, grace_status};
pub use steps::{first_step, sequence_for, successor, ModeProfile, MASTER_SEQUENCE};
pub use waiting::waiting_notice;
