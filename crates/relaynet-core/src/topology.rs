//! Network topology.
//!
//! The topology is data, not code: producers, receivers and the link table
//! are all derived from these two lists, so adding a node is a config change.

use std::collections::BTreeSet;

use relaynet_proto::{LinkId, NodeId};

use crate::ConfigError;

/// Source nodes of the default scenario.
pub const DEFAULT_SOURCES: [u8; 2] = [1, 2];

/// Destination nodes of the default scenario.
pub const DEFAULT_DESTINATIONS: [u8; 2] = [3, 4];

/// The set of producing and consuming nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    sources: Vec<NodeId>,
    destinations: Vec<NodeId>,
}

impl Topology {
    /// Create a topology from raw node ids.
    pub fn new(
        sources: impl IntoIterator<Item = u8>,
        destinations: impl IntoIterator<Item = u8>,
    ) -> Self {
        Self {
            sources: sources.into_iter().map(NodeId).collect(),
            destinations: destinations.into_iter().map(NodeId).collect(),
        }
    }

    /// Nodes that produce frames.
    pub fn sources(&self) -> &[NodeId] {
        &self.sources
    }

    /// Nodes that consume frames.
    pub fn destinations(&self) -> &[NodeId] {
        &self.destinations
    }

    /// Whether `node` is a destination.
    pub fn is_destination(&self, node: NodeId) -> bool {
        self.destinations.contains(&node)
    }

    /// Every (source, destination) pair, source-major.
    pub fn links(&self) -> impl Iterator<Item = LinkId> + '_ {
        self.sources.iter().flat_map(move |&source| {
            self.destinations.iter().map(move |&destination| LinkId { source, destination })
        })
    }

    /// Check the topology is non-empty and every node id is unique.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() || self.destinations.is_empty() {
            return Err(ConfigError::EmptyTopology);
        }

        let mut seen = BTreeSet::new();
        for &node in self.sources.iter().chain(&self.destinations) {
            if !seen.insert(node) {
                return Err(ConfigError::DuplicateNode(node));
            }
        }

        Ok(())
    }
}

impl Default for Topology {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCES, DEFAULT_DESTINATIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_topology_has_four_links() {
        let links: Vec<_> = Topology::default().links().collect();
        assert_eq!(
            links,
            vec![LinkId::new(1, 3), LinkId::new(1, 4), LinkId::new(2, 3), LinkId::new(2, 4)]
        );
    }

    #[test]
    fn only_destinations_are_destinations() {
        let topology = Topology::default();
        assert!(topology.is_destination(NodeId(3)));
        assert!(topology.is_destination(NodeId(4)));
        assert!(!topology.is_destination(NodeId(1)));
        assert!(!topology.is_destination(NodeId(9)));
    }

    #[test]
    fn rejects_empty_topology() {
        let topology = Topology::new([1], []);
        assert_eq!(topology.validate(), Err(ConfigError::EmptyTopology));
    }

    #[test]
    fn rejects_node_used_as_source_and_destination() {
        let topology = Topology::new([1, 2], [2, 3]);
        assert_eq!(topology.validate(), Err(ConfigError::DuplicateNode(NodeId(2))));
    }
}
