//! Async runtime for relaynet
//!
//! Turns the state machines of `relaynet-core` into six concurrently running
//! tokio tasks connected by bounded channels:
//!
//! ```text
//! Producer(1) ─┐                       ┌─> destination(3) ─> Receiver(3) ─┐
//!              ├─> central ─> Router ──┤                                  ├─> NetworkStats <─ Analytics
//! Producer(2) ─┘                       └─> destination(4) ─> Receiver(4) ─┘
//! ```
//!
//! Actors are generic over [`relaynet_core::Environment`], so the same code
//! runs against the wall clock ([`SystemEnv`]) and under the deterministic
//! simulation harness.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod actor;
pub mod analytics;
pub mod channel;
pub mod env;
pub mod error;
pub mod network;
pub mod producer;
pub mod receiver;
pub mod router;
pub mod shutdown;

pub use actor::{ActorRole, Priority};
pub use analytics::{Analytics, REPORT_TARGET};
pub use channel::{ChannelGauge, ChannelReceiver, ChannelSender, SendError, bounded};
pub use env::SystemEnv;
pub use error::NetworkError;
pub use network::{CENTRAL_CHANNEL, Network, NetworkOutcome};
pub use producer::Producer;
pub use receiver::Receiver;
pub use router::Router;
pub use shutdown::{Shutdown, ShutdownListener};
