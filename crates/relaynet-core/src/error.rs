//! Configuration errors.

use relaynet_proto::NodeId;
use thiserror::Error;

/// A [`crate::NetworkConfig`] that cannot describe a runnable network.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// No source or no destination nodes
    #[error("topology needs at least one source and one destination")]
    EmptyTopology,

    /// A node id appears twice, or as both source and destination
    #[error("{0} appears more than once in the topology")]
    DuplicateNode(NodeId),

    /// Channels must hold at least one frame
    #[error("channel capacity must be non-zero")]
    ZeroCapacity,

    /// Producers need something to send
    #[error("frames per destination must be non-zero")]
    ZeroTarget,

    /// Sequences are 32-bit, so a link cannot carry more frames than that
    #[error("frames per destination {0} exceeds the sequence range")]
    TargetTooLarge(u64),

    /// Reporting boundaries must advance
    #[error("report step must be non-zero")]
    ZeroReportStep,

    /// Drop probability outside `[0, 1]`
    #[error("drop rate {0} is not a probability")]
    InvalidDropRate(f64),
}
