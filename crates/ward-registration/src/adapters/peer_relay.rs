//! # Peer Relay Coordination
//!
//! Lifecycle of the direct registeree/relayer connection in p2p relay mode:
//! passive open-detection against the networking layer's connection list,
//! active latency probing, and folding of networking events into a single
//! `PeerConnection` value. The coordinator is the only writer of that value;
//! the state machine and UI only read the folded state.

use crate::domain::entities::PeerConnection;
use crate::domain::value_objects::{ConnectionStatus, SessionRole};
use crate::ports::outbound::{OpenConnection, PeerNetworkEvent, PeerNetworkPort};
use shared_types::PeerId;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Result of a connection check or probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RelayProbeOutcome {
    /// Whether a relay connection is considered open.
    pub connected: bool,
    /// Measured round trip; only ever present for active probes.
    pub latency: Option<Duration>,
}

impl RelayProbeOutcome {
    /// Outcome for an unreachable or unprobeable peer.
    pub const fn disconnected() -> Self {
        Self {
            connected: false,
            latency: None,
        }
    }
}

/// The first open connection whose remote peer is in the candidate set.
fn matching_peer(open_connections: &[OpenConnection], candidates: &[PeerId]) -> Option<PeerId> {
    open_connections
        .iter()
        .find(|conn| conn.is_open && candidates.contains(&conn.peer_id))
        .map(|conn| conn.peer_id.clone())
}

/// Pure, synchronous open-check: connected iff any open connection's remote
/// peer identifier is in the candidate set. Performs no I/O and never
/// reports a latency - an open check is not a round-trip measurement.
pub fn check_relay_connection_open(
    open_connections: &[OpenConnection],
    candidates: &[PeerId],
) -> RelayProbeOutcome {
    RelayProbeOutcome {
        connected: matching_peer(open_connections, candidates).is_some(),
        latency: None,
    }
}

/// Coordinator owning the relay connection state for one session.
pub struct PeerRelayCoordinator {
    network: Arc<dyn PeerNetworkPort>,
    connection: PeerConnection,
    events: mpsc::Receiver<PeerNetworkEvent>,
}

impl PeerRelayCoordinator {
    /// Create a coordinator watching `relay_peer_ids`.
    ///
    /// `events` is the channel the networking layer publishes connection
    /// events on.
    pub fn new(
        network: Arc<dyn PeerNetworkPort>,
        local_role: SessionRole,
        relay_peer_ids: Vec<PeerId>,
        events: mpsc::Receiver<PeerNetworkEvent>,
    ) -> Self {
        Self {
            network,
            connection: PeerConnection::new(local_role, relay_peer_ids),
            events,
        }
    }

    /// The folded connection state.
    pub fn connection(&self) -> &PeerConnection {
        &self.connection
    }

    /// Fold all queued networking events into the connection state.
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.apply_event(event);
        }
    }

    /// Fold one networking event into the connection state.
    pub fn apply_event(&mut self, event: PeerNetworkEvent) {
        match event {
            PeerNetworkEvent::ConnectionOpened { peer_id } => {
                if self.connection.relay_peer_ids.contains(&peer_id) {
                    debug!(peer = %peer_id, "relay connection opened");
                    self.connection.status = ConnectionStatus::Connected;
                    self.connection.remote_peer_id = Some(peer_id);
                } else {
                    trace!(peer = %peer_id, "ignoring connection from non-candidate peer");
                }
            }
            PeerNetworkEvent::ConnectionClosed { peer_id } => {
                if self.connection.remote_peer_id.as_ref() == Some(&peer_id) {
                    debug!(peer = %peer_id, "relay connection closed");
                    self.disconnect();
                }
            }
            PeerNetworkEvent::ProbeCompleted { peer_id, latency } => {
                if self.connection.remote_peer_id.as_ref() == Some(&peer_id) {
                    self.connection.latency = latency;
                }
            }
        }
    }

    /// Drain events, then passively re-check the networking layer's open
    /// connection list. Returns the folded status.
    pub fn refresh(&mut self) -> ConnectionStatus {
        self.drain_events();
        let open = self.network.open_connections();
        match matching_peer(&open, &self.connection.relay_peer_ids) {
            Some(peer) => {
                if self.connection.status != ConnectionStatus::Connected {
                    debug!(peer = %peer, "relay connection observed open");
                }
                self.connection.status = ConnectionStatus::Connected;
                self.connection.remote_peer_id = Some(peer);
            }
            None => self.disconnect(),
        }
        self.connection.status
    }

    /// Actively probe `peer`, measuring wall-clock time around the round
    /// trip. Unreachable peer, absent ping capability, and every other probe
    /// failure uniformly yield a disconnected outcome - never an error.
    pub async fn probe_peer_latency(&mut self, peer: &PeerId) -> RelayProbeOutcome {
        if !self.network.supports_ping() {
            trace!("ping capability unavailable; reporting disconnected");
            return RelayProbeOutcome::disconnected();
        }

        let started = Instant::now();
        match self.network.ping(peer).await {
            Ok(()) => {
                let latency = started.elapsed();
                if self.connection.relay_peer_ids.contains(peer) {
                    self.connection.status = ConnectionStatus::Connected;
                    self.connection.remote_peer_id = Some(peer.clone());
                    self.connection.latency = Some(latency);
                }
                RelayProbeOutcome {
                    connected: true,
                    latency: Some(latency),
                }
            }
            Err(err) => {
                debug!(peer = %peer, error = %err, "peer probe failed");
                if self.connection.remote_peer_id.as_ref() == Some(peer) {
                    self.disconnect();
                }
                RelayProbeOutcome::disconnected()
            }
        }
    }

    fn disconnect(&mut self) {
        self.connection.status = ConnectionStatus::Disconnected;
        self.connection.remote_peer_id = None;
        self.connection.latency = None;
    }
}
