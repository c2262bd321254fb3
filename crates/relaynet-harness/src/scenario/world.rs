//! World state after a scenario run.

use std::time::Duration;

use relaynet_core::{FinalReport, LinkSnapshot, NetworkConfig, NetworkSnapshot, TransportSnapshot};
use relaynet_proto::LinkId;
use relaynet_runtime::NetworkOutcome;

/// Everything an oracle can inspect once the network reached idle.
#[derive(Debug, Clone)]
pub struct World {
    name: String,
    seed: u64,
    config: NetworkConfig,
    report: FinalReport,
    snapshot: NetworkSnapshot,
    elapsed: Duration,
}

impl World {
    /// World for a finished run.
    pub fn new(
        name: String,
        seed: u64,
        config: NetworkConfig,
        outcome: NetworkOutcome,
        elapsed: Duration,
    ) -> Self {
        Self { name, seed, config, report: outcome.report, snapshot: outcome.snapshot, elapsed }
    }

    /// Scenario name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Seed of the simulated environment.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Configuration the network ran with.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Final report published by analytics.
    pub fn report(&self) -> &FinalReport {
        &self.report
    }

    /// Counters after every actor stopped.
    pub fn snapshot(&self) -> &NetworkSnapshot {
        &self.snapshot
    }

    /// Counters for one link.
    pub fn link(&self, source: u8, destination: u8) -> LinkSnapshot {
        self.snapshot.link(LinkId::new(source, destination))
    }

    /// Diagnostic counters.
    pub fn transport(&self) -> &TransportSnapshot {
        &self.snapshot.transport
    }

    /// Virtual time from start to idle.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}
