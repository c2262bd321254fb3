//! Shared traffic counters.
//!
//! Each counter has exactly one writer (the producer for `sent`, the
//! receiver for the rest) and any number of readers. Writers publish with
//! `Release`, readers load with `Acquire`; a snapshot is consistent per field
//! but not across links, which is all the reporting needs.

use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicU64, Ordering},
};

use relaynet_proto::LinkId;

use crate::Topology;

/// Counters for one (source, destination) link.
#[derive(Debug, Default)]
pub struct LinkCounters {
    sent: AtomicU64,
    received: AtomicU64,
    lost: AtomicU64,
    expected: AtomicU64,
}

impl LinkCounters {
    /// A frame was accepted into the central channel.
    pub fn record_sent(&self) {
        self.sent.fetch_add(1, Ordering::Release);
    }

    /// A frame reached its destination.
    pub fn record_received(&self) {
        self.received.fetch_add(1, Ordering::Release);
    }

    /// `count` frames were inferred lost from a sequence gap.
    pub fn record_lost(&self, count: u64) {
        self.lost.fetch_add(count, Ordering::Release);
    }

    /// Advance the receiver cursor.
    pub fn set_expected(&self, next: u64) {
        self.expected.store(next, Ordering::Release);
    }

    /// Point-in-time copy of all four counters.
    pub fn snapshot(&self) -> LinkSnapshot {
        LinkSnapshot {
            sent: self.sent.load(Ordering::Acquire),
            received: self.received.load(Ordering::Acquire),
            lost: self.lost.load(Ordering::Acquire),
            expected: self.expected.load(Ordering::Acquire),
        }
    }
}

/// Plain copy of a link's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkSnapshot {
    /// Frames accepted into the central channel
    pub sent: u64,
    /// Frames processed by the receiver
    pub received: u64,
    /// Frames inferred lost from gaps
    pub lost: u64,
    /// Receiver's next expected sequence
    pub expected: u64,
}

/// Counters for every link in a topology.
#[derive(Debug)]
pub struct LinkTable {
    links: BTreeMap<LinkId, LinkCounters>,
}

impl LinkTable {
    /// One zeroed counter set per link of `topology`.
    pub fn new(topology: &Topology) -> Self {
        Self { links: topology.links().map(|link| (link, LinkCounters::default())).collect() }
    }

    /// Counters for `link`, if it belongs to the topology.
    pub fn get(&self, link: LinkId) -> Option<&LinkCounters> {
        self.links.get(&link)
    }

    /// All links in (source, destination) order.
    pub fn links(&self) -> impl Iterator<Item = LinkId> + '_ {
        self.links.keys().copied()
    }

    /// Snapshot every link.
    pub fn snapshot(&self) -> BTreeMap<LinkId, LinkSnapshot> {
        self.links.iter().map(|(&link, counters)| (link, counters.snapshot())).collect()
    }
}

/// Transport-level diagnostics that never feed the link loss figures.
#[derive(Debug, Default)]
pub struct TransportCounters {
    retries: AtomicU64,
    producer_drops: AtomicU64,
    allocation_failures: AtomicU64,
    forwarded: AtomicU64,
    injected_drops: AtomicU64,
    forward_failures: AtomicU64,
    misrouted: AtomicU64,
    out_of_order: AtomicU64,
}

macro_rules! bump {
    ($($(#[$doc:meta])* $name:ident => $field:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(&self) {
                self.$field.fetch_add(1, Ordering::Relaxed);
            }
        )*
    };
}

impl TransportCounters {
    bump! {
        /// A producer enqueue attempt timed out and will be retried.
        record_retry => retries;
        /// A producer gave up on a frame after every attempt failed.
        record_producer_drop => producer_drops;
        /// A producer could not allocate a frame.
        record_allocation_failure => allocation_failures;
        /// The router handed a frame to a destination channel.
        record_forwarded => forwarded;
        /// The router discarded a frame by loss injection.
        record_injected_drop => injected_drops;
        /// The router could not enqueue on a destination channel.
        record_forward_failure => forward_failures;
        /// A receiver got a frame addressed elsewhere.
        record_misrouted => misrouted;
        /// A receiver saw a sequence below its cursor.
        record_out_of_order => out_of_order;
    }

    /// Point-in-time copy.
    pub fn snapshot(&self) -> TransportSnapshot {
        TransportSnapshot {
            retries: self.retries.load(Ordering::Relaxed),
            producer_drops: self.producer_drops.load(Ordering::Relaxed),
            allocation_failures: self.allocation_failures.load(Ordering::Relaxed),
            forwarded: self.forwarded.load(Ordering::Relaxed),
            injected_drops: self.injected_drops.load(Ordering::Relaxed),
            forward_failures: self.forward_failures.load(Ordering::Relaxed),
            misrouted: self.misrouted.load(Ordering::Relaxed),
            out_of_order: self.out_of_order.load(Ordering::Relaxed),
        }
    }
}

/// Plain copy of [`TransportCounters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransportSnapshot {
    /// Producer retries
    pub retries: u64,
    /// Frames abandoned by producers
    pub producer_drops: u64,
    /// Failed frame allocations
    pub allocation_failures: u64,
    /// Frames forwarded by the router
    pub forwarded: u64,
    /// Frames discarded by loss injection
    pub injected_drops: u64,
    /// Frames the router could not forward
    pub forward_failures: u64,
    /// Frames delivered to the wrong receiver
    pub misrouted: u64,
    /// Sequence regressions seen by receivers
    pub out_of_order: u64,
}

/// Everything the actors count.
#[derive(Debug)]
pub struct NetworkStats {
    /// Per-link traffic
    pub links: LinkTable,
    /// Diagnostics
    pub transport: TransportCounters,
}

impl NetworkStats {
    /// Zeroed statistics for `topology`.
    pub fn new(topology: &Topology) -> Self {
        Self { links: LinkTable::new(topology), transport: TransportCounters::default() }
    }

    /// Snapshot links and diagnostics.
    pub fn snapshot(&self) -> NetworkSnapshot {
        NetworkSnapshot { links: self.links.snapshot(), transport: self.transport.snapshot() }
    }
}

/// Snapshot of [`NetworkStats`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkSnapshot {
    /// Per-link counters in (source, destination) order
    pub links: BTreeMap<LinkId, LinkSnapshot>,
    /// Diagnostics
    pub transport: TransportSnapshot,
}

impl NetworkSnapshot {
    /// Counters for one link, zero if unknown.
    pub fn link(&self, link: LinkId) -> LinkSnapshot {
        self.links.get(&link).copied().unwrap_or_default()
    }

    /// Sum of `sent` over all links.
    pub fn total_sent(&self) -> u64 {
        self.links.values().map(|l| l.sent).sum()
    }

    /// Sum of `received` over all links.
    pub fn total_received(&self) -> u64 {
        self.links.values().map(|l| l.received).sum()
    }

    /// Sum of `lost` over all links.
    pub fn total_lost(&self) -> u64 {
        self.links.values().map(|l| l.lost).sum()
    }
}
