//! relaynet core logic
//!
//! Everything in this crate is free of I/O and scheduling. Time and
//! randomness come in through [`env::Environment`], counters are plain
//! atomics, and the decision-making pieces (sequence tracking, reservation,
//! loss injection, threshold reporting) are synchronous state machines the
//! async actors in `relaynet-runtime` drive.
//!
//! # Components
//!
//! - [`config`]: Scenario parameters and their defaults
//! - [`topology`]: Source and destination node sets
//! - [`mod@env`]: Environment abstraction (time, RNG)
//! - [`stats`]: Atomic per-link counters and snapshots
//! - [`sequence`]: Receiver-side gap detection
//! - [`sequencer`]: Producer-side sequence reservation
//! - [`loss`]: Router loss injection
//! - [`completion`]: Producer completion latch
//! - [`analytics`]: Threshold reporting state machine
//! - [`report`]: Status table and final report rendering
//! - [`error`]: Configuration errors

pub mod analytics;
pub mod completion;
pub mod config;
pub mod env;
pub mod error;
pub mod loss;
pub mod report;
pub mod sequence;
pub mod sequencer;
pub mod stats;
pub mod topology;

pub use analytics::{AnalyticsPhase, Reporter};
pub use completion::Completion;
pub use config::NetworkConfig;
pub use env::Environment;
pub use error::ConfigError;
pub use loss::LossModel;
pub use report::{FinalReport, LinkReport, StatusTable, percent};
pub use sequence::{Observation, SequenceTracker};
pub use sequencer::{Reservation, Sequencer};
pub use stats::{
    LinkCounters, LinkSnapshot, LinkTable, NetworkSnapshot, NetworkStats, TransportCounters,
    TransportSnapshot,
};
pub use topology::Topology;
