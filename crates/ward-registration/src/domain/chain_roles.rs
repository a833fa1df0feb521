//! # Chain Role Resolution
//!
//! Maps a chain identifier to its role: a hub chain is where a registration
//! ultimately settles; a spoke chain bridges its registration intent to a
//! hub. The tables are fixed at process start and never mutated afterwards.
//!
//! A spoke with no configured mapping is an unknown spoke. Resolution for an
//! unknown spoke is reported explicitly; silently defaulting it to some hub
//! could route signatures or funds to the wrong settlement chain.

use serde::{Deserialize, Serialize};
use shared_types::{ChainId, ContractAddress};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::warn;

/// Outcome of resolving a chain to its settlement hub.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HubResolution {
    /// The chain is itself a hub; nothing to bridge.
    AlreadyHub,
    /// The chain is a spoke settling on the given hub.
    Mapped(ChainId),
    /// The chain has no configured mapping.
    Unmapped,
}

/// Fixed role tables, loaded once at startup.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChainRoleConfig {
    hub_chains: BTreeSet<ChainId>,
    spoke_to_hub: BTreeMap<ChainId, ChainId>,
    registry_contracts: BTreeMap<ChainId, ContractAddress>,
}

impl Default for ChainRoleConfig {
    fn default() -> Self {
        Self {
            hub_chains: BTreeSet::from([
                ChainId::new(8453),   // Base
                ChainId::new(84532),  // Base Sepolia
                ChainId::new(31337),  // local devnet
            ]),
            spoke_to_hub: BTreeMap::from([
                (ChainId::new(10), ChainId::new(8453)),        // OP Mainnet -> Base
                (ChainId::new(11155420), ChainId::new(84532)), // OP Sepolia -> Base Sepolia
                (ChainId::new(31338), ChainId::new(31337)),    // local spoke -> local hub
            ]),
            registry_contracts: BTreeMap::new(),
        }
    }
}

impl ChainRoleConfig {
    /// Build a config from explicit tables.
    pub fn new(
        hub_chains: BTreeSet<ChainId>,
        spoke_to_hub: BTreeMap<ChainId, ChainId>,
        registry_contracts: BTreeMap<ChainId, ContractAddress>,
    ) -> Self {
        Self {
            hub_chains,
            spoke_to_hub,
            registry_contracts,
        }
    }

    /// Attach per-chain registry contract addresses to the default tables.
    pub fn with_contracts(
        mut self,
        contracts: impl IntoIterator<Item = (ChainId, ContractAddress)>,
    ) -> Self {
        self.registry_contracts.extend(contracts);
        self
    }
}

/// Resolver over an immutable, shared role config.
#[derive(Clone, Debug)]
pub struct ChainRoleResolver {
    config: Arc<ChainRoleConfig>,
}

impl ChainRoleResolver {
    /// Create a resolver over `config`.
    pub fn new(config: Arc<ChainRoleConfig>) -> Self {
        Self { config }
    }

    /// Whether `id` is a settlement hub.
    pub fn is_hub_chain(&self, id: ChainId) -> bool {
        self.config.hub_chains.contains(&id)
    }

    /// Whether `id` is a spoke. Exact negation of [`Self::is_hub_chain`];
    /// unknown chains count as (unknown) spokes.
    pub fn is_spoke_chain(&self, id: ChainId) -> bool {
        !self.is_hub_chain(id)
    }

    /// Resolve `id` to its settlement hub.
    pub fn resolve(&self, id: ChainId) -> HubResolution {
        if self.is_hub_chain(id) {
            return HubResolution::AlreadyHub;
        }
        match self.config.spoke_to_hub.get(&id) {
            Some(hub) => HubResolution::Mapped(*hub),
            None => HubResolution::Unmapped,
        }
    }

    /// The hub chain `id` bridges to, or `None` when `id` is itself a hub.
    ///
    /// An unknown spoke also yields `None`, with a warning; it is never
    /// substituted with a default hub.
    pub fn hub_chain_id(&self, id: ChainId) -> Option<ChainId> {
        match self.resolve(id) {
            HubResolution::AlreadyHub => None,
            HubResolution::Mapped(hub) => Some(hub),
            HubResolution::Unmapped => {
                warn!(chain_id = %id, "no hub mapping configured for spoke chain");
                None
            }
        }
    }

    /// The registry contract deployed on `id`, if configured.
    pub fn registry_contract(&self, id: ChainId) -> Option<ContractAddress> {
        self.config.registry_contracts.get(&id).copied()
    }
}
