//! Scenario builder API.

use std::collections::BTreeSet;

use relaynet_core::{LossModel, NetworkConfig};
use relaynet_proto::LinkId;
use relaynet_runtime::Network;
use tracing::info;

use crate::{
    SimEnv,
    scenario::{OracleFn, World},
    sim_env::DEFAULT_SEED,
};

/// Scenario builder.
///
/// Starts from the default network configuration. Call `.oracle()` to get a
/// [`RunnableScenario`].
pub struct Scenario {
    name: String,
    seed: u64,
    config: NetworkConfig,
}

impl Scenario {
    /// Scenario with the default configuration and seed.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), seed: DEFAULT_SEED, config: NetworkConfig::default() }
    }

    /// Seed for the simulated environment.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: NetworkConfig) -> Self {
        self.config = config;
        self
    }

    /// Frames each producer must deliver to each destination.
    pub fn frames(mut self, frames_per_destination: u64) -> Self {
        self.config.frames_per_destination = frames_per_destination;
        self
    }

    /// Capacity of every channel.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.channel_capacity = capacity;
        self
    }

    /// Router loss model.
    pub fn loss(mut self, loss: LossModel) -> Self {
        self.config.loss = loss;
        self
    }

    /// Have the router drop one specific frame. Replaces any rate-based loss.
    pub fn drop_frame(mut self, source: u8, destination: u8, sequence: u32) -> Self {
        let target = (LinkId::new(source, destination), sequence);
        match &mut self.config.loss {
            LossModel::Targeted(frames) => {
                frames.insert(target);
            },
            other => *other = LossModel::Targeted(BTreeSet::from([target])),
        }
        self
    }

    /// Set the oracle and return a runnable scenario.
    ///
    /// The oracle is mandatory: a scenario cannot run without verification.
    pub fn oracle(self, oracle: OracleFn) -> RunnableScenario {
        RunnableScenario { scenario: self, oracle }
    }
}

/// A scenario with an oracle, ready to execute.
pub struct RunnableScenario {
    scenario: Scenario,
    oracle: OracleFn,
}

impl RunnableScenario {
    /// Run the network to idle in virtual time, then apply the oracle.
    ///
    /// Startup and actor failures are reported as errors before the oracle
    /// is consulted.
    pub fn run(self) -> Result<(), String> {
        let Scenario { name, seed, config } = self.scenario;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .map_err(|e| format!("Scenario '{name}': failed to build runtime: {e}"))?;

        let network = Network::new(config.clone(), SimEnv::with_seed(seed))
            .map_err(|e| format!("Scenario '{name}': {e}"))?;

        let (outcome, elapsed) = runtime.block_on(async {
            let start = tokio::time::Instant::now();
            let outcome = network.run().await;
            (outcome, start.elapsed())
        });
        let outcome = outcome.map_err(|e| format!("Scenario '{name}': {e}"))?;

        info!(scenario = %name, seed, ?elapsed, "scenario finished");
        let world = World::new(name, seed, config, outcome, elapsed);
        (self.oracle)(&world)
    }
}
