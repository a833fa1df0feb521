//! # Peer Primitives
//!
//! Opaque peer identifiers used by the peer-to-peer relay path.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a peer on the relay network.
///
/// The networking layer assigns these; this crate never inspects their
/// internal structure beyond equality.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(pub String);

impl PeerId {
    /// Wrap a raw peer identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PeerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
