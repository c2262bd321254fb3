//! Fatal runtime errors.
//!
//! Everything that can go wrong with an individual frame is absorbed by the
//! actor that holds it. Only startup failures and crashed actors reach the
//! caller of [`crate::Network::run`].

use relaynet_core::ConfigError;
use thiserror::Error;

/// Errors that stop the network.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The configuration cannot describe a runnable network
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A channel could not be created
    #[error("failed to create {name} channel: {reason}")]
    QueueCreation {
        /// Channel name
        name: String,
        /// Why creation failed
        reason: &'static str,
    },

    /// An actor task panicked or was cancelled
    #[error("{actor} actor failed")]
    ActorFailed {
        /// Actor name
        actor: String,
        /// Join failure reported by tokio
        #[source]
        source: tokio::task::JoinError,
    },
}
