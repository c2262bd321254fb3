//! Data frames.
//!
//! Frames are a fixed 1000 bytes on the modelled device: one byte each for
//! the destination and source, four for the sequence, two for the length and
//! the rest filler. The payload keeps that size so memory pressure in the
//! simulation matches the device.

use bytes::Bytes;

use crate::{FrameError, LinkId, NodeId, Result};

/// Nominal frame size carried in [`Frame::length`].
pub const FRAME_LENGTH: u16 = 1000;

/// Payload bytes left after the addressing and sequencing fields.
pub const PAYLOAD_SIZE: usize = FRAME_LENGTH as usize - 1 - 1 - 4 - 2;

/// A single unit of simulated traffic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Node this frame is addressed to
    pub destination: NodeId,
    /// Node that produced this frame
    pub source: NodeId,
    /// Position of this frame on its (source, destination) link
    pub sequence: u32,
    /// Always [`FRAME_LENGTH`]
    pub length: u16,
    /// Filler bytes identifying the source
    pub payload: Bytes,
}

impl Frame {
    /// Build a frame with a freshly allocated payload.
    ///
    /// The payload is reserved fallibly so an exhausted allocator surfaces as
    /// [`FrameError::AllocationFailed`] instead of aborting.
    pub fn new(source: NodeId, destination: NodeId, sequence: u32) -> Result<Self> {
        let mut payload = Vec::new();
        payload
            .try_reserve_exact(PAYLOAD_SIZE)
            .map_err(|_| FrameError::AllocationFailed { size: PAYLOAD_SIZE })?;
        payload.resize(PAYLOAD_SIZE, Self::filler(source));

        Ok(Self { destination, source, sequence, length: FRAME_LENGTH, payload: payload.into() })
    }

    /// Marker byte for a source: `'X'` for node 1, `'Y'` for node 2, and so on.
    #[must_use]
    pub fn filler(source: NodeId) -> u8 {
        b'W'.wrapping_add(source.get())
    }

    /// Link this frame travels on.
    #[must_use]
    pub fn link(&self) -> LinkId {
        LinkId { source: self.source, destination: self.destination }
    }
}
