//! Receiver actor: sink for one destination node.
//!
//! Loss is never reported by the router. The receiver infers it from gaps
//! in each source's sequence and books it against the link.

use std::{collections::BTreeMap, sync::Arc};

use relaynet_core::{NetworkStats, Observation, SequenceTracker};
use relaynet_proto::{Frame, LinkId, NodeId};
use tracing::{debug, info, warn};

use crate::{ChannelReceiver, ShutdownListener};

/// Frame sink for one destination.
pub struct Receiver {
    node: NodeId,
    inbound: ChannelReceiver,
    stats: Arc<NetworkStats>,
    trackers: BTreeMap<NodeId, SequenceTracker>,
    shutdown: ShutdownListener,
}

impl Receiver {
    /// Receiver for `node`, reading its destination channel.
    pub fn new(
        node: NodeId,
        inbound: ChannelReceiver,
        stats: Arc<NetworkStats>,
        shutdown: ShutdownListener,
    ) -> Self {
        Self { node, inbound, stats, trackers: BTreeMap::new(), shutdown }
    }

    /// Consume frames until shutdown or until the router is gone and the
    /// channel is empty.
    pub async fn run(mut self) {
        info!(node = %self.node, channel = self.inbound.name(), "receiver started");

        loop {
            let frame = tokio::select! {
                biased;
                () = self.shutdown.wait() => break,
                frame = self.inbound.recv() => frame,
            };
            let Some(frame) = frame else {
                break;
            };
            self.process(&frame);
        }

        info!(node = %self.node, "receiver stopped");
    }

    /// Account for one arrival.
    pub fn process(&mut self, frame: &Frame) {
        let link = LinkId { source: frame.source, destination: self.node };
        let counters = match self.stats.links.get(link) {
            Some(counters) if frame.destination == self.node => counters,
            _ => {
                self.stats.transport.record_misrouted();
                warn!(
                    node = %self.node,
                    link = %frame.link(),
                    sequence = frame.sequence,
                    "misrouted frame"
                );
                return;
            },
        };

        counters.record_received();
        let tracker = self.trackers.entry(frame.source).or_default();
        match tracker.observe(frame.sequence) {
            Observation::InOrder => {
                debug!(%link, sequence = frame.sequence, "received frame");
            },
            Observation::Gap { expected, missed } => {
                counters.record_lost(missed);
                warn!(%link, expected, got = frame.sequence, missed, "sequence gap");
            },
            Observation::Regression { expected } => {
                self.stats.transport.record_out_of_order();
                warn!(%link, expected, got = frame.sequence, "out-of-order frame");
            },
        }
        counters.set_expected(tracker.expected());
    }
}
