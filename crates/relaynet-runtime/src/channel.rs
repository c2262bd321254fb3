//! Bounded frame channels.
//!
//! Thin wrappers over `tokio::sync::mpsc` that add a name for logging, a
//! timed send that hands the frame back on failure, and a pending-count
//! gauge for the analytics drain phase.

use relaynet_proto::Frame;
use thiserror::Error;
use tokio::{
    sync::{Semaphore, mpsc},
    time::Duration,
};

use crate::NetworkError;

/// A timed send that did not deliver. The frame comes back to the caller,
/// which decides whether to retry or release it.
#[derive(Debug, Error)]
pub enum SendError {
    /// No slot freed up within the timeout
    #[error("channel full")]
    Full(Frame),

    /// The receiving side is gone
    #[error("channel closed")]
    Closed(Frame),
}

impl SendError {
    /// Recover the undelivered frame.
    pub fn into_frame(self) -> Frame {
        match self {
            Self::Full(frame) | Self::Closed(frame) => frame,
        }
    }
}

/// Create a channel with `capacity` slots.
///
/// Fails with [`NetworkError::QueueCreation`] for capacities tokio cannot
/// back with permits.
pub fn bounded(
    name: impl Into<String>,
    capacity: usize,
) -> Result<(ChannelSender, ChannelReceiver), NetworkError> {
    let name = name.into();
    if capacity == 0 {
        return Err(NetworkError::QueueCreation { name, reason: "capacity must be non-zero" });
    }
    if capacity > Semaphore::MAX_PERMITS {
        return Err(NetworkError::QueueCreation { name, reason: "capacity exceeds permit limit" });
    }

    let (tx, rx) = mpsc::channel(capacity);
    Ok((ChannelSender { name: name.clone(), tx }, ChannelReceiver { name, rx }))
}

/// Sending half; clone it for every producer.
#[derive(Debug, Clone)]
pub struct ChannelSender {
    name: String,
    tx: mpsc::Sender<Frame>,
}

impl ChannelSender {
    /// Channel name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Enqueue `frame`, waiting at most `timeout` for a free slot.
    pub async fn send_timeout(&self, frame: Frame, timeout: Duration) -> Result<(), SendError> {
        self.tx.send_timeout(frame, timeout).await.map_err(|err| match err {
            mpsc::error::SendTimeoutError::Timeout(frame) => SendError::Full(frame),
            mpsc::error::SendTimeoutError::Closed(frame) => SendError::Closed(frame),
        })
    }

    /// Frames queued and not yet received.
    pub fn pending(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    /// Read-only handle for pending counts.
    pub fn gauge(&self) -> ChannelGauge {
        ChannelGauge { sender: self.clone() }
    }
}

/// Receiving half; exactly one consumer owns it.
#[derive(Debug)]
pub struct ChannelReceiver {
    name: String,
    rx: mpsc::Receiver<Frame>,
}

impl ChannelReceiver {
    /// Channel name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wait for the next frame. `None` once every sender is gone and the
    /// queue is empty.
    pub async fn recv(&mut self) -> Option<Frame> {
        self.rx.recv().await
    }
}

/// Pending-count view of a channel.
///
/// Holds a sender, so a gauged channel stays open until the gauge is
/// dropped; actors therefore stop on the shutdown signal, not on closure.
#[derive(Debug, Clone)]
pub struct ChannelGauge {
    sender: ChannelSender,
}

impl ChannelGauge {
    /// Channel name.
    pub fn name(&self) -> &str {
        self.sender.name()
    }

    /// Frames currently queued.
    pub fn pending(&self) -> usize {
        self.sender.pending()
    }
}
