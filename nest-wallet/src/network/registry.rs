//! Network registry with a single active network

use std::collections::HashSet;

use tracing::{debug, info};

use crate::error::ValidationError;
use super::{builtin_networks, Network};

/// Outcome of replacing the registry contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryChange {
    /// Active network before the replacement
    pub previous: Network,
    /// Active network after the replacement
    pub active: Network,
}

impl RegistryChange {
    /// Whether the previously active network had to be abandoned
    pub fn active_changed(&self) -> bool {
        self.previous.id != self.active.id
    }
}

/// Ordered set of networks keyed by id, exactly one of which is active.
///
/// The active network is always a member of the current set.
#[derive(Debug, Clone)]
pub struct NetworkRegistry {
    networks: Vec<Network>,
    active: usize,
}

impl NetworkRegistry {
    /// Create a registry; the first network flagged default-active starts
    /// active, falling back to the first network.
    pub fn new(networks: Vec<Network>) -> Result<Self, ValidationError> {
        validate_network_set(&networks)?;
        let active = networks.iter().position(|n| n.is_default_active).unwrap_or(0);
        Ok(Self { networks, active })
    }

    /// Registry of the built-in networks
    pub fn builtin() -> Self {
        let networks = builtin_networks();
        let active = networks.iter().position(|n| n.is_default_active).unwrap_or(0);
        Self { networks, active }
    }

    /// All networks in registry order
    pub fn networks(&self) -> &[Network] {
        &self.networks
    }

    /// The active network
    pub fn active(&self) -> &Network {
        &self.networks[self.active]
    }

    /// The first network flagged default-active, else the first network
    pub fn default_network(&self) -> &Network {
        self.networks
            .iter()
            .find(|n| n.is_default_active)
            .unwrap_or(&self.networks[0])
    }

    /// Look up a network by id
    pub fn get(&self, id: &str) -> Option<&Network> {
        self.networks.iter().find(|n| n.id == id)
    }

    /// Whether `id` is in the registry
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Make `id` the active network. Returns false, changing nothing, when
    /// `id` is not registered.
    pub fn set_active(&mut self, id: &str) -> bool {
        match self.networks.iter().position(|n| n.id == id) {
            Some(index) => {
                self.active = index;
                debug!(network = id, "active network set");
                true
            }
            None => false,
        }
    }

    /// Replace the whole set. The active network keeps its id when still
    /// present; otherwise the first network of the new set becomes active.
    pub fn replace(&mut self, networks: Vec<Network>) -> Result<RegistryChange, ValidationError> {
        validate_network_set(&networks)?;

        let previous = self.active().clone();
        let active = networks.iter().position(|n| n.id == previous.id).unwrap_or(0);

        self.networks = networks;
        self.active = active;

        let change = RegistryChange {
            previous,
            active: self.active().clone(),
        };
        info!(
            count = self.networks.len(),
            previous = %change.previous.id,
            active = %change.active.id,
            "network registry replaced"
        );
        Ok(change)
    }
}

impl Default for NetworkRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn validate_network_set(networks: &[Network]) -> Result<(), ValidationError> {
    if networks.is_empty() {
        return Err(ValidationError::InvalidNetworkSet("no networks".to_string()));
    }

    let mut seen = HashSet::new();
    for network in networks {
        if !seen.insert(network.id.as_str()) {
            return Err(ValidationError::InvalidNetworkSet(format!(
                "duplicate network id '{}'",
                network.id
            )));
        }
    }
    Ok(())
}
