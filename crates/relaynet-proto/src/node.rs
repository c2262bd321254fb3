//! Node and link identifiers.

use std::fmt;

/// Identifier of a node in the simulated network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u8);

impl NodeId {
    /// Raw numeric id.
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node{}", self.0)
    }
}

impl From<u8> for NodeId {
    fn from(id: u8) -> Self {
        Self(id)
    }
}

/// A directed (source, destination) pair.
///
/// Sequence numbers and loss accounting are both scoped to a link: each
/// source numbers its frames independently for every destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinkId {
    /// Originating node
    pub source: NodeId,
    /// Target node
    pub destination: NodeId,
}

impl LinkId {
    /// Create a link id.
    pub fn new(source: impl Into<NodeId>, destination: impl Into<NodeId>) -> Self {
        Self { source: source.into(), destination: destination.into() }
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.source, self.destination)
    }
}
