//! Actor roles.

use std::fmt;

use relaynet_proto::NodeId;

/// Nominal scheduling priority of an actor.
///
/// tokio does not prioritise tasks; the value documents intent and is logged
/// at spawn. The router is the one actor that must never fall behind, since
/// a backed-up central channel throttles every producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    /// Receivers and analytics
    Low,
    /// Producers
    Medium,
    /// Router
    High,
}

/// The six kinds of actor in a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRole {
    /// Frame source
    Producer(NodeId),
    /// Central forwarder
    Router,
    /// Frame sink
    Receiver(NodeId),
    /// Reporting and shutdown orchestration
    Analytics,
}

impl ActorRole {
    /// Nominal priority of this role.
    pub fn priority(self) -> Priority {
        match self {
            Self::Router => Priority::High,
            Self::Producer(_) => Priority::Medium,
            Self::Receiver(_) | Self::Analytics => Priority::Low,
        }
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Producer(node) => write!(f, "tx-{node}"),
            Self::Router => f.write_str("router"),
            Self::Receiver(node) => write!(f, "rx-{node}"),
            Self::Analytics => f.write_str("analytics"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn router_outranks_everyone() {
        let roles = [
            ActorRole::Producer(NodeId(1)),
            ActorRole::Receiver(NodeId(3)),
            ActorRole::Analytics,
        ];
        assert!(roles.iter().all(|r| r.priority() < ActorRole::Router.priority()));
        assert_eq!(ActorRole::Producer(NodeId(2)).to_string(), "tx-Node2");
    }
}
