//! Network assembly.
//!
//! [`Network::run`] validates the configuration, creates every channel,
//! spawns the actors and waits for analytics to reach idle. Channel creation
//! happens before any task is spawned, so a startup failure leaves nothing
//! running.

use std::{collections::BTreeMap, future::Future, sync::Arc};

use relaynet_core::{
    Completion, Environment, FinalReport, NetworkConfig, NetworkSnapshot, NetworkStats,
};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::{ActorRole, Analytics, NetworkError, Producer, Receiver, Router, Shutdown, bounded};

/// Name of the channel every producer writes to.
pub const CENTRAL_CHANNEL: &str = "central";

/// Everything a finished run leaves behind.
#[derive(Debug, Clone)]
pub struct NetworkOutcome {
    /// Report emitted by analytics
    pub report: FinalReport,
    /// Counters after every actor stopped
    pub snapshot: NetworkSnapshot,
}

/// A configured, not yet running network.
pub struct Network<E> {
    config: Arc<NetworkConfig>,
    env: E,
    stats: Arc<NetworkStats>,
}

impl<E: Environment> Network<E> {
    /// Validate `config` and allocate the counters.
    pub fn new(config: NetworkConfig, env: E) -> Result<Self, NetworkError> {
        config.validate()?;
        let stats = Arc::new(NetworkStats::new(&config.topology));
        Ok(Self { config: Arc::new(config), env, stats })
    }

    /// Configuration in use.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Run to idle.
    ///
    /// Must be called inside a tokio runtime. Returns once analytics has
    /// published the final report and every other actor has stopped.
    pub async fn run(self) -> Result<NetworkOutcome, NetworkError> {
        let topology = &self.config.topology;
        let capacity = self.config.channel_capacity;

        let (central_tx, central_rx) = bounded(CENTRAL_CHANNEL, capacity)?;
        let mut outbound = BTreeMap::new();
        let mut inbound = Vec::new();
        for &node in topology.destinations() {
            let (tx, rx) = bounded(format!("node{}", node.get()), capacity)?;
            outbound.insert(node, tx);
            inbound.push((node, rx));
        }

        let shutdown = Shutdown::new();
        let completion = Arc::new(Completion::new(topology.sources().len()));
        let mut gauges = vec![central_tx.gauge()];
        gauges.extend(outbound.values().map(crate::ChannelSender::gauge));

        let mut workers = Vec::new();

        for (node, rx) in inbound {
            let receiver = Receiver::new(node, rx, self.stats.clone(), shutdown.listener());
            workers.push(spawn(ActorRole::Receiver(node), receiver.run()));
        }

        let router = Router::new(
            central_rx,
            outbound,
            self.config.clone(),
            self.env.clone(),
            self.stats.clone(),
            shutdown.listener(),
        );
        workers.push(spawn(ActorRole::Router, router.run()));

        for (index, &source) in topology.sources().iter().enumerate() {
            let producer = Producer::new(
                index,
                source,
                self.config.clone(),
                self.env.clone(),
                central_tx.clone(),
                self.stats.clone(),
                completion.clone(),
                shutdown.listener(),
            );
            workers.push(spawn(ActorRole::Producer(source), async move {
                producer.run().await;
            }));
        }
        drop(central_tx);

        let analytics = Analytics::new(
            self.config.clone(),
            self.env.clone(),
            self.stats.clone(),
            completion,
            gauges,
            shutdown,
        );
        let (role, handle) = spawn(ActorRole::Analytics, analytics.run());
        let report = join(role, handle).await?;

        for (role, handle) in workers {
            join(role, handle).await?;
        }
        info!("all actors stopped");

        Ok(NetworkOutcome { report, snapshot: self.stats.snapshot() })
    }
}

fn spawn<F>(role: ActorRole, task: F) -> (ActorRole, JoinHandle<F::Output>)
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    info!(actor = %role, priority = ?role.priority(), "spawning actor");
    (role, tokio::spawn(task))
}

async fn join<T>(role: ActorRole, handle: JoinHandle<T>) -> Result<T, NetworkError> {
    handle.await.map_err(|source| {
        error!(actor = %role, %source, "actor failed");
        NetworkError::ActorFailed { actor: role.to_string(), source }
    })
}
