//! # P2P Relay Choreography
//!
//! Two-role coordination over the direct registeree/relayer connection:
//! waiting projections per role, event-driven connection detection, latency
//! probing, and stall recovery.

use super::harness::{FlowHarness, RELAY_PEER};
use shared_types::PeerId;
use std::time::Duration;
use ward_registration::ports::outbound::PeerNetworkEvent;
use ward_registration::{
    ConnectionStatus, RegistrationApi, RegistrationStep, RegistrationVariant, RelayMode,
    SessionEvent, SessionRole, StallReason,
};

use RegistrationStep as Step;

fn p2p_harness(role: SessionRole) -> FlowHarness {
    FlowHarness::with_role(RegistrationVariant::Wallet, RelayMode::P2pRelay, 8453, role)
}

#[tokio::test]
async fn test_counterpart_roles_see_mirrored_waits() {
    let registeree = p2p_harness(SessionRole::Registeree);
    let relayer = p2p_harness(SessionRole::Relayer);

    // Both sessions sit at the acknowledgement signature step: the
    // registeree acts, the relayer waits on them.
    assert_eq!(registeree.service.waiting_notice(SessionRole::Registeree), None);
    assert_eq!(
        relayer.service.waiting_notice(SessionRole::Relayer),
        Some("waiting for registeree to sign acknowledgement")
    );
}

#[tokio::test]
async fn test_connection_opens_via_network_events() {
    let mut h = p2p_harness(SessionRole::Registeree);
    // Walk to the connection wait.
    while h.service.current_step() != Step::WaitForConnection {
        h.act().await.unwrap();
    }

    // The networking layer announces the relay peer through the event
    // channel rather than the connection list.
    h.relay_events
        .as_ref()
        .unwrap()
        .send(PeerNetworkEvent::ConnectionOpened {
            peer_id: PeerId::from(RELAY_PEER),
        })
        .await
        .unwrap();

    // refresh folds queued events before consulting the open list; the
    // passive list is still empty, so also present it there.
    h.network.as_ref().unwrap().set_connections(vec![
        ward_registration::OpenConnection {
            peer_id: PeerId::from(RELAY_PEER),
            is_open: true,
        },
    ]);
    assert_eq!(h.service.refresh_relay(), Some(ConnectionStatus::Connected));
    assert_eq!(h.service.current_step(), Step::AcknowledgementPayment);

    let conn = h.service.session().peer_connection.as_ref().unwrap();
    assert_eq!(conn.remote_peer_id, Some(PeerId::from(RELAY_PEER)));
    assert_eq!(conn.local_role, SessionRole::Registeree);
}

#[tokio::test]
async fn test_latency_probe_reports_liveness_during_wait() {
    let mut h = p2p_harness(SessionRole::Registeree);
    while h.service.current_step() != Step::WaitForConnection {
        h.act().await.unwrap();
    }

    let outcome = h.service.probe_relay().await.unwrap();
    assert!(outcome.connected);
    assert!(outcome.latency.is_some());

    let conn = h.service.session().peer_connection.as_ref().unwrap();
    assert!(conn.latency.is_some());
    assert!(conn.latency.unwrap() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_stalled_connection_wait_recovers_and_completes() {
    let mut h = p2p_harness(SessionRole::Registeree);
    while h.service.current_step() != Step::WaitForConnection {
        h.act().await.unwrap();
    }

    // Nothing connects within the bound.
    h.clock.advance_secs(600);
    assert_eq!(
        h.service.on_tick(),
        Some(StallReason::ConnectionWaitTimedOut)
    );

    // The registeree retries; the relayer shows up; the flow completes.
    h.service.advance(SessionEvent::RetryRequested).unwrap();
    let visited = h.run_to_completion().await.unwrap();
    assert_eq!(*visited.last().unwrap(), Step::Success);
}

#[tokio::test]
async fn test_relayer_role_flow_completes() {
    // The relayer walks the same sequence; its pay steps are local actions
    // and its sign steps are waits on the registeree (events arrive relayed).
    let mut h = p2p_harness(SessionRole::Relayer);
    let visited = h.run_to_completion().await.unwrap();
    assert_eq!(visited, h.service.sequence().to_vec());
}

#[tokio::test]
async fn test_connection_loss_is_reported_not_fatal() {
    let mut h = p2p_harness(SessionRole::Registeree);
    while h.service.current_step() != Step::WaitForConnection {
        h.act().await.unwrap();
    }
    h.act().await.unwrap(); // opens the connection, advances

    // The relay drops mid-wait for the acknowledgement payment.
    h.network.as_ref().unwrap().set_connections(vec![]);
    assert_eq!(
        h.service.refresh_relay(),
        Some(ConnectionStatus::Disconnected)
    );
    // Session is unaffected: the coordinator keeps retrying on cadence.
    assert_eq!(h.service.current_step(), Step::AcknowledgementPayment);
    assert!(h.service.phase().accepts_events());
}
