//! # Full-Session Walkthroughs
//!
//! Drives every (variant, mode) pair through its whole step sequence with
//! satisfied guards and asserts the documented order is visited exactly
//! once, ending in success.

use super::harness::FlowHarness;
use std::collections::HashSet;
use ward_registration::{RegistrationApi, RegistrationStep, RegistrationVariant, RelayMode};

use RegistrationStep as Step;

async fn assert_full_walkthrough(variant: RegistrationVariant, mode: RelayMode, origin: u64) {
    ward_telemetry::init_for_tests();
    let mut h = FlowHarness::new(variant, mode, origin);
    let expected = h.service.sequence().to_vec();

    let visited = h
        .run_to_completion()
        .await
        .unwrap_or_else(|e| panic!("{variant:?}/{mode:?} from {origin}: {e}"));

    assert_eq!(
        visited, expected,
        "{variant:?}/{mode:?} from {origin} visited steps out of order"
    );
    let unique: HashSet<_> = visited.iter().collect();
    assert_eq!(unique.len(), visited.len(), "a step was visited twice");
    assert_eq!(*visited.last().unwrap(), Step::Success);
    assert!(h.service.session().is_complete());
}

#[tokio::test]
async fn test_wallet_standard_from_spoke() {
    assert_full_walkthrough(RegistrationVariant::Wallet, RelayMode::Standard, 10).await;
}

#[tokio::test]
async fn test_wallet_standard_from_hub() {
    assert_full_walkthrough(RegistrationVariant::Wallet, RelayMode::Standard, 8453).await;
}

#[tokio::test]
async fn test_wallet_self_relay_from_spoke() {
    let mut h = FlowHarness::new(RegistrationVariant::Wallet, RelayMode::SelfRelay, 10);
    assert!(h.service.sequence().contains(&Step::SwitchAndPayOne));
    assert!(h.service.sequence().contains(&Step::SwitchAndPayTwo));
    let visited = h.run_to_completion().await.unwrap();
    assert_eq!(visited, h.service.sequence().to_vec());
}

#[tokio::test]
async fn test_wallet_self_relay_from_hub_skips_switch_steps() {
    let mut h = FlowHarness::new(RegistrationVariant::Wallet, RelayMode::SelfRelay, 31337);
    assert!(!h.service.sequence().contains(&Step::SwitchAndPayOne));
    let visited = h.run_to_completion().await.unwrap();
    assert!(!visited.contains(&Step::SwitchAndPayOne));
    assert_eq!(*visited.last().unwrap(), Step::Success);
}

#[tokio::test]
async fn test_wallet_p2p_relay_from_hub() {
    assert_full_walkthrough(RegistrationVariant::Wallet, RelayMode::P2pRelay, 8453).await;
}

#[tokio::test]
async fn test_wallet_p2p_relay_from_spoke() {
    assert_full_walkthrough(RegistrationVariant::Wallet, RelayMode::P2pRelay, 11155420).await;
}

#[tokio::test]
async fn test_transaction_standard_from_spoke() {
    assert_full_walkthrough(RegistrationVariant::Transaction, RelayMode::Standard, 10).await;
}

#[tokio::test]
async fn test_transaction_self_relay_from_spoke() {
    assert_full_walkthrough(RegistrationVariant::Transaction, RelayMode::SelfRelay, 31338).await;
}

#[tokio::test]
async fn test_transaction_p2p_relay_from_hub() {
    assert_full_walkthrough(RegistrationVariant::Transaction, RelayMode::P2pRelay, 84532).await;
}

#[tokio::test]
async fn test_transaction_flow_prefixes_selection_step() {
    let mut h = FlowHarness::new(RegistrationVariant::Transaction, RelayMode::Standard, 10);
    let visited = h.run_to_completion().await.unwrap();
    assert_eq!(visited[0], Step::SelectTransactions);
    assert_eq!(visited[1], Step::AcknowledgeAndSign);
    assert_eq!(
        h.service.session().selected_transactions.len(),
        1,
        "selection must be recorded on the session"
    );
}

#[tokio::test]
async fn test_registration_record_is_copied_from_chain() {
    let mut h = FlowHarness::new(RegistrationVariant::Wallet, RelayMode::Standard, 10);
    h.run_to_completion().await.unwrap();
    let record = h.service.session().registration.as_ref().unwrap();
    assert_eq!(record.cross_chain_message_id, h.signer.message_id);
    assert_eq!(
        h.service.session().submitted_message_id,
        Some(h.signer.message_id)
    );
}
