//! Analytics state machine.
//!
//! ```text
//! ┌───────────┐ producers done ┌──────────┐ channels empty ┌────────────────┐ shutdown ┌──────┐
//! │ Reporting │───────────────>│ Draining │───────────────>│ ReportingFinal │─────────>│ Idle │
//! └───────────┘                └──────────┘                └────────────────┘          └──────┘
//! ```
//!
//! While reporting, the [`Reporter`] decides when a status table is worth
//! printing: each link has a marker at the last reported multiple of the
//! report step, and any link moving a full step past its marker (or reaching
//! its target for the first time) refreshes the whole table.

use std::{collections::BTreeMap, fmt};

use relaynet_proto::LinkId;
use tracing::trace;

use crate::{NetworkSnapshot, StatusTable};

/// Analytics lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsPhase {
    /// Traffic flowing; periodic status tables
    Reporting,
    /// Producers finished; waiting for channels to empty
    Draining,
    /// Channels empty; settling and printing the final report
    ReportingFinal,
    /// Other actors stopped; nothing left to do
    Idle,
}

impl AnalyticsPhase {
    /// Following phase. `Idle` is terminal.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Reporting => Self::Draining,
            Self::Draining => Self::ReportingFinal,
            Self::ReportingFinal | Self::Idle => Self::Idle,
        }
    }
}

impl fmt::Display for AnalyticsPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Reporting => "reporting",
            Self::Draining => "draining",
            Self::ReportingFinal => "reporting-final",
            Self::Idle => "idle",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Marker {
    last: u64,
    target_reported: bool,
}

/// Threshold-triggered status reporting.
#[derive(Debug, Clone)]
pub struct Reporter {
    step: u64,
    target: u64,
    markers: BTreeMap<LinkId, Marker>,
}

impl Reporter {
    /// Reporter with the given step and per-link target. `step` must be
    /// non-zero.
    pub fn new(step: u64, target: u64) -> Self {
        debug_assert!(step > 0);
        Self { step, target, markers: BTreeMap::new() }
    }

    /// Last reported boundary for `link`.
    pub fn marker(&self, link: LinkId) -> u64 {
        self.markers.get(&link).map_or(0, |m| m.last)
    }

    /// Feed a poll's snapshot; returns a table if any link crossed a boundary.
    pub fn observe(&mut self, snapshot: &NetworkSnapshot) -> Option<StatusTable> {
        let mut crossed = false;

        for (&link, counters) in &snapshot.links {
            let marker = self.markers.entry(link).or_default();
            let stepped = counters.sent >= marker.last + self.step;
            let finished = counters.sent >= self.target && !marker.target_reported;

            if stepped || finished {
                marker.last = counters.sent / self.step * self.step;
                marker.target_reported |= counters.sent >= self.target;
                crossed = true;
                trace!(
                    %link,
                    sent = counters.sent,
                    marker = marker.last,
                    finished,
                    "report boundary crossed"
                );
            }
        }

        crossed.then(|| StatusTable::from_snapshot(snapshot))
    }
}
