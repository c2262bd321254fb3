//! Producer-side sequence reservation.
//!
//! A producer must not let a failed send leave a hole in its numbering, or
//! the receiver would count a loss that never crossed the network. So the
//! sequence for a frame is only *reserved* before the send attempt, and only
//! *committed* once the central channel accepted the frame. An abandoned
//! reservation needs no rollback: nothing was mutated.

use std::collections::BTreeMap;

use relaynet_proto::{LinkId, NodeId};

/// A sequence number held across one send attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a reservation only takes effect once committed"]
pub struct Reservation {
    /// Link the frame travels on
    pub link: LinkId,
    /// Sequence assigned to the frame
    pub sequence: u32,
}

/// Per-destination sequence cursors for one producer.
#[derive(Debug, Clone)]
pub struct Sequencer {
    source: NodeId,
    target: u64,
    next: BTreeMap<NodeId, u32>,
}

impl Sequencer {
    /// Cursors at zero for each destination, each aiming at `target` frames.
    pub fn new(source: NodeId, destinations: &[NodeId], target: u64) -> Self {
        Self { source, target, next: destinations.iter().map(|&d| (d, 0)).collect() }
    }

    /// Frames committed towards `destination`.
    pub fn committed(&self, destination: NodeId) -> u64 {
        self.next.get(&destination).map_or(0, |&next| u64::from(next))
    }

    /// Destinations still short of the target, in id order.
    pub fn remaining(&self) -> Vec<NodeId> {
        self.next
            .iter()
            .filter(|&(_, &next)| u64::from(next) < self.target)
            .map(|(&destination, _)| destination)
            .collect()
    }

    /// Whether every destination reached the target.
    pub fn is_complete(&self) -> bool {
        self.next.values().all(|&next| u64::from(next) >= self.target)
    }

    /// Reserve the next sequence towards `destination`.
    ///
    /// Returns `None` for unknown destinations and for destinations that
    /// already reached the target.
    pub fn reserve(&self, destination: NodeId) -> Option<Reservation> {
        let &sequence = self.next.get(&destination)?;
        if u64::from(sequence) >= self.target {
            return None;
        }
        Some(Reservation { link: LinkId { source: self.source, destination }, sequence })
    }

    /// Commit a reservation after its frame was accepted.
    ///
    /// Returns the number of frames now committed on that link. Stale
    /// reservations (already committed, or from another producer) are ignored
    /// and return `None`.
    pub fn commit(&mut self, reservation: Reservation) -> Option<u64> {
        if reservation.link.source != self.source {
            return None;
        }
        let next = self.next.get_mut(&reservation.link.destination)?;
        if *next != reservation.sequence {
            return None;
        }
        *next += 1;
        Some(u64::from(*next))
    }
}
