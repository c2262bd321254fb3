//! Producer actor.
//!
//! Each producer owns one source node. It keeps sending until every
//! destination has accepted the configured number of frames, picking a
//! destination at random among those still short of target. A frame's
//! sequence is reserved before the send and committed only once the central
//! channel took it, so frames the producer gives up on never show up as loss
//! downstream.

use std::sync::Arc;

use relaynet_core::{Completion, Environment, NetworkConfig, NetworkStats, Reservation, Sequencer};
use relaynet_proto::{Frame, LinkId, NodeId};
use tracing::{debug, error, info, warn};

use crate::{ChannelSender, SendError, ShutdownListener};

/// What happened to one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delivery {
    /// Accepted into the central channel
    Sent,
    /// Every attempt timed out
    GaveUp,
    /// The router side is gone
    Closed,
}

/// Frame source for one node.
pub struct Producer<E> {
    index: usize,
    source: NodeId,
    config: Arc<NetworkConfig>,
    env: E,
    central: ChannelSender,
    stats: Arc<NetworkStats>,
    completion: Arc<Completion>,
    shutdown: ShutdownListener,
}

impl<E: Environment> Producer<E> {
    /// Producer number `index` (its start is staggered by `index` steps)
    /// for node `source`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        index: usize,
        source: NodeId,
        config: Arc<NetworkConfig>,
        env: E,
        central: ChannelSender,
        stats: Arc<NetworkStats>,
        completion: Arc<Completion>,
        shutdown: ShutdownListener,
    ) -> Self {
        Self { index, source, config, env, central, stats, completion, shutdown }
    }

    /// Send until every destination reached its target.
    ///
    /// Returns the final sequencer state. Completion is only signalled when
    /// the target was actually reached, not when the loop was cut short by
    /// shutdown or a closed channel.
    pub async fn run(self) -> Sequencer {
        let stagger = self.config.start_stagger * self.index as u32;
        if !stagger.is_zero() {
            self.env.sleep(stagger).await;
        }

        let mut sequencer = Sequencer::new(
            self.source,
            self.config.topology.destinations(),
            self.config.frames_per_destination,
        );
        info!(source = %self.source, "transmission started");

        while !sequencer.is_complete() {
            if self.shutdown.is_signaled() {
                warn!(source = %self.source, "shutdown before transmission completed");
                self.log_shortfall(&sequencer);
                return sequencer;
            }

            if self.step(&mut sequencer).await == Some(Delivery::Closed) {
                error!(source = %self.source, channel = self.central.name(), "channel closed");
                self.log_shortfall(&sequencer);
                return sequencer;
            }

            self.env.sleep(self.config.send_interval).await;
        }

        info!(source = %self.source, "transmission complete");
        if self.completion.producer_done() {
            info!("all producers complete");
        }
        sequencer
    }

    /// One iteration: pick, allocate, send, commit. `None` when no frame was
    /// attempted.
    async fn step(&self, sequencer: &mut Sequencer) -> Option<Delivery> {
        let remaining = sequencer.remaining();
        if remaining.is_empty() {
            return None;
        }
        let destination = remaining[self.env.random_index(remaining.len())];
        let reservation = sequencer.reserve(destination)?;

        let frame = match Frame::new(self.source, destination, reservation.sequence) {
            Ok(frame) => frame,
            Err(err) => {
                self.stats.transport.record_allocation_failure();
                warn!(source = %self.source, %err, "frame allocation failed");
                return None;
            },
        };

        let delivery = self.send_with_retry(frame).await;
        match delivery {
            Delivery::Sent => self.commit(sequencer, reservation),
            Delivery::GaveUp => {
                self.stats.transport.record_producer_drop();
                warn!(
                    link = %reservation.link,
                    sequence = reservation.sequence,
                    "dropped frame after {} attempts",
                    self.config.send_attempts()
                );
            },
            Delivery::Closed => {},
        }
        Some(delivery)
    }

    fn log_shortfall(&self, sequencer: &Sequencer) {
        for destination in sequencer.remaining() {
            warn!(
                link = %LinkId { source: self.source, destination },
                committed = sequencer.committed(destination),
                target = self.config.frames_per_destination,
                "link short of target"
            );
        }
    }

    fn commit(&self, sequencer: &mut Sequencer, reservation: Reservation) {
        let Some(committed) = sequencer.commit(reservation) else {
            return;
        };
        if let Some(counters) = self.stats.links.get(reservation.link) {
            counters.record_sent();
        }
        debug!(
            link = %reservation.link,
            sequence = reservation.sequence,
            committed,
            "sent frame"
        );
    }

    /// First attempt plus up to `max_send_retries` retries, backing off
    /// linearly between them.
    async fn send_with_retry(&self, mut frame: Frame) -> Delivery {
        let attempts = self.config.send_attempts();

        for attempt in 1..=attempts {
            match self.central.send_timeout(frame, self.config.send_timeout).await {
                Ok(()) => return Delivery::Sent,
                Err(SendError::Closed(_)) => return Delivery::Closed,
                Err(SendError::Full(returned)) => {
                    frame = returned;
                    if attempt < attempts {
                        self.stats.transport.record_retry();
                        warn!(
                            link = %frame.link(),
                            sequence = frame.sequence,
                            retry = attempt,
                            "central channel full, retrying"
                        );
                        self.env.sleep(self.config.backoff(attempt)).await;
                    }
                },
            }
        }

        Delivery::GaveUp
    }
}
