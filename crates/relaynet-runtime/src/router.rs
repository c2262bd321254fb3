//! Router actor: the single consumer of the central channel.
//!
//! Frames leave in the order they arrived. Each one is either dropped by the
//! loss model or, after the transit delay, handed to its destination channel
//! with a single timed attempt. The router never retries: a frame that
//! cannot be placed is gone, and the receiver infers the loss from the gap.

use std::{collections::BTreeMap, sync::Arc};

use relaynet_core::{Environment, NetworkConfig, NetworkStats};
use relaynet_proto::{Frame, NodeId};
use tracing::{debug, info, warn};

use crate::{ChannelReceiver, ChannelSender, ShutdownListener};

/// Forwarder between producers and receivers.
pub struct Router<E> {
    inbound: ChannelReceiver,
    outbound: BTreeMap<NodeId, ChannelSender>,
    config: Arc<NetworkConfig>,
    env: E,
    stats: Arc<NetworkStats>,
    shutdown: ShutdownListener,
}

impl<E: Environment> Router<E> {
    /// Router reading `inbound` and writing to one channel per destination.
    pub fn new(
        inbound: ChannelReceiver,
        outbound: BTreeMap<NodeId, ChannelSender>,
        config: Arc<NetworkConfig>,
        env: E,
        stats: Arc<NetworkStats>,
        shutdown: ShutdownListener,
    ) -> Self {
        Self { inbound, outbound, config, env, stats, shutdown }
    }

    /// Forward frames until shutdown or until every producer is gone and the
    /// central channel is empty.
    pub async fn run(mut self) {
        info!(channel = self.inbound.name(), "router started");

        loop {
            let frame = tokio::select! {
                biased;
                () = self.shutdown.wait() => break,
                frame = self.inbound.recv() => frame,
            };
            let Some(frame) = frame else {
                break;
            };
            self.route(frame).await;
        }

        info!("router stopped");
    }

    async fn route(&self, frame: Frame) {
        if self.config.loss.should_drop(&frame, &self.env) {
            self.stats.transport.record_injected_drop();
            warn!(link = %frame.link(), sequence = frame.sequence, "frame dropped in transit");
            return;
        }

        if !self.config.topology.is_destination(frame.destination) {
            self.stats.transport.record_forward_failure();
            warn!(link = %frame.link(), sequence = frame.sequence, "not a destination node");
            return;
        }
        let Some(outbound) = self.outbound.get(&frame.destination) else {
            self.stats.transport.record_forward_failure();
            warn!(link = %frame.link(), sequence = frame.sequence, "no route to destination");
            return;
        };

        if !self.config.transit_delay.is_zero() {
            self.env.sleep(self.config.transit_delay).await;
        }

        let link = frame.link();
        let sequence = frame.sequence;
        match outbound.send_timeout(frame, self.config.forward_timeout).await {
            Ok(()) => {
                self.stats.transport.record_forwarded();
                debug!(%link, sequence, "forwarded frame");
            },
            Err(err) => {
                self.stats.transport.record_forward_failure();
                let reason = err.to_string();
                let frame = err.into_frame();
                warn!(
                    link = %frame.link(),
                    sequence = frame.sequence,
                    channel = outbound.name(),
                    %reason,
                    "forward failed"
                );
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use relaynet_core::{LossModel, Topology};
    use relaynet_proto::LinkId;

    use super::*;
    use crate::{Shutdown, SystemEnv, bounded};

    struct Fixture {
        central: ChannelSender,
        node3: ChannelReceiver,
        node4: ChannelReceiver,
        stats: Arc<NetworkStats>,
        shutdown: Shutdown,
        router: Router<SystemEnv>,
    }

    fn fixture(loss: LossModel, outbound_capacity: usize) -> Fixture {
        let config = Arc::new(NetworkConfig {
            topology: Topology::new([1, 2], [3, 4]),
            loss,
            ..Default::default()
        });
        let stats = Arc::new(NetworkStats::new(&config.topology));
        let shutdown = Shutdown::new();
        let (central, inbound) = bounded("central", 16).unwrap();
        let (tx3, node3) = bounded("node3", outbound_capacity).unwrap();
        let (tx4, node4) = bounded("node4", outbound_capacity).unwrap();
        let outbound = BTreeMap::from([(NodeId(3), tx3), (NodeId(4), tx4)]);
        let router = Router::new(
            inbound,
            outbound,
            config,
            SystemEnv::seeded(5),
            stats.clone(),
            shutdown.listener(),
        );
        Fixture { central, node3, node4, stats, shutdown, router }
    }

    async fn send(central: &ChannelSender, source: u8, destination: u8, sequence: u32) {
        let frame = Frame::new(NodeId(source), NodeId(destination), sequence).unwrap();
        central.send_timeout(frame, Duration::from_millis(100)).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn forwards_by_destination_in_arrival_order() {
        let mut f = fixture(LossModel::None, 16);
        for (source, destination, sequence) in [(1, 3, 0), (2, 4, 0), (1, 3, 1), (2, 3, 0)] {
            send(&f.central, source, destination, sequence).await;
        }
        drop(f.central);
        f.router.run().await;

        let mut at3 = Vec::new();
        while let Some(frame) = f.node3.recv().await {
            at3.push((frame.source.get(), frame.sequence));
        }
        assert_eq!(at3, vec![(1, 0), (1, 1), (2, 0)]);
        assert_eq!(f.node4.recv().await.unwrap().link(), LinkId::new(2, 4));
        assert_eq!(f.stats.snapshot().transport.forwarded, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn targeted_loss_removes_exactly_one_frame() {
        let mut f = fixture(LossModel::targeted(LinkId::new(1, 3), [1]), 16);
        for sequence in 0..3 {
            send(&f.central, 1, 3, sequence).await;
        }
        drop(f.central);
        f.router.run().await;

        let mut sequences = Vec::new();
        while let Some(frame) = f.node3.recv().await {
            sequences.push(frame.sequence);
        }
        assert_eq!(sequences, vec![0, 2]);

        let transport = f.stats.snapshot().transport;
        assert_eq!(transport.injected_drops, 1);
        assert_eq!(transport.forwarded, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn full_destination_fails_without_retry() {
        let f = fixture(LossModel::None, 1);
        send(&f.central, 1, 3, 0).await;
        send(&f.central, 1, 3, 1).await;
        drop(f.central);

        let start = tokio::time::Instant::now();
        f.router.run().await;

        let transport = f.stats.snapshot().transport;
        assert_eq!(transport.forwarded, 1);
        assert_eq!(transport.forward_failures, 1);
        // Two transit delays plus one forward timeout
        assert!(start.elapsed() < Duration::from_millis(200));
        drop(f.node3);
        drop(f.node4);
    }

    #[tokio::test(start_paused = true)]
    async fn frame_for_non_destination_is_not_forwarded() {
        let mut f = fixture(LossModel::None, 16);
        // Node 2 is a source and node 7 is not in the topology
        send(&f.central, 1, 2, 0).await;
        send(&f.central, 1, 7, 0).await;
        send(&f.central, 1, 3, 0).await;
        drop(f.central);
        f.router.run().await;

        assert_eq!(f.node3.recv().await.unwrap().link(), LinkId::new(1, 3));
        assert!(f.node4.recv().await.is_none());
        let transport = f.stats.snapshot().transport;
        assert_eq!(transport.forward_failures, 2);
        assert_eq!(transport.forwarded, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_on_shutdown_with_producers_alive() {
        let f = fixture(LossModel::None, 16);
        let handle = tokio::spawn(f.router.run());

        tokio::time::sleep(Duration::from_millis(50)).await;
        f.shutdown.signal();
        handle.await.unwrap();

        // The central sender is still alive, so only the signal ended the loop
        assert_eq!(f.central.pending(), 0);
        drop(f.node3);
        drop(f.node4);
    }
}
