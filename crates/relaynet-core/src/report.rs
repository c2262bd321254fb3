//! Status table and final report rendering.
//!
//! Both render as plain text; the runtime logs them line by line so the
//! layout survives any log formatter.

use std::fmt;

use relaynet_proto::LinkId;

use crate::NetworkSnapshot;

/// `part` as a whole percentage of `whole`, rounded down. Zero when `whole`
/// is zero.
pub fn percent(part: u64, whole: u64) -> u64 {
    if whole == 0 { 0 } else { (u128::from(part) * 100 / u128::from(whole)) as u64 }
}

/// Figures for one link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkReport {
    /// Link described
    pub link: LinkId,
    /// Frames committed by the producer
    pub sent: u64,
    /// Frames processed by the receiver
    pub received: u64,
    /// Frames inferred lost
    pub lost: u64,
}

impl LinkReport {
    /// Received share of sent.
    pub fn received_percent(&self) -> u64 {
        percent(self.received, self.sent)
    }

    /// Lost share of sent.
    pub fn lost_percent(&self) -> u64 {
        percent(self.lost, self.sent)
    }
}

/// Rows grouped by destination, then source.
fn rows(snapshot: &NetworkSnapshot) -> Vec<LinkReport> {
    let mut rows: Vec<LinkReport> = snapshot
        .links
        .iter()
        .map(|(&link, s)| LinkReport { link, sent: s.sent, received: s.received, lost: s.lost })
        .collect();
    rows.sort_by_key(|row| (row.link.destination, row.link.source));
    rows
}

/// Periodic status table covering every link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTable {
    /// One row per link
    pub rows: Vec<LinkReport>,
}

impl StatusTable {
    /// Table for the current counters.
    pub fn from_snapshot(snapshot: &NetworkSnapshot) -> Self {
        Self { rows: rows(snapshot) }
    }
}

const TABLE_RULE: &str = "+------+--------+------+------+-------+------+";

impl fmt::Display for StatusTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{TABLE_RULE}")?;
        writeln!(f, "|            NETWORK STATUS UPDATE           |")?;
        writeln!(f, "{TABLE_RULE}")?;
        writeln!(f, "| Dest | Source | Sent | Recv | Recv% | Lost |")?;
        writeln!(f, "{TABLE_RULE}")?;
        for row in &self.rows {
            writeln!(
                f,
                "| {:>4} | Node {:<2}| {:>4} | {:>4} | {:>4}% | {:>4} |",
                row.link.destination.get(),
                row.link.source.get(),
                row.sent,
                row.received,
                row.received_percent(),
                row.lost,
            )?;
        }
        write!(f, "{TABLE_RULE}")
    }
}

/// Summary emitted once all traffic has drained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalReport {
    /// One entry per link, grouped by destination
    pub links: Vec<LinkReport>,
    /// Sum of link `sent`
    pub total_sent: u64,
    /// Sum of link `received`
    pub total_received: u64,
    /// Sum of link `lost`
    pub total_lost: u64,
}

impl FinalReport {
    /// Report for the given counters.
    pub fn from_snapshot(snapshot: &NetworkSnapshot) -> Self {
        Self {
            links: rows(snapshot),
            total_sent: snapshot.total_sent(),
            total_received: snapshot.total_received(),
            total_lost: snapshot.total_lost(),
        }
    }

    /// Figures for one link.
    pub fn link(&self, link: LinkId) -> Option<&LinkReport> {
        self.links.iter().find(|row| row.link == link)
    }

    /// Network-wide received share.
    pub fn received_percent(&self) -> u64 {
        percent(self.total_received, self.total_sent)
    }

    /// Network-wide lost share.
    pub fn lost_percent(&self) -> u64 {
        percent(self.total_lost, self.total_sent)
    }
}

const REPORT_RULE: &str = "=========================================";
const SECTION_RULE: &str = "  ---------------------------------------";

impl fmt::Display for FinalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{REPORT_RULE}")?;
        writeln!(f, "          FINAL NETWORK REPORT")?;
        writeln!(f, "{REPORT_RULE}")?;

        let mut current = None;
        for row in &self.links {
            if current != Some(row.link.destination) {
                if current.is_some() {
                    writeln!(f, "{SECTION_RULE}")?;
                }
                current = Some(row.link.destination);
                writeln!(f, "  Destination {} metrics:", row.link.destination)?;
                writeln!(f, "{SECTION_RULE}")?;
            }
            writeln!(f, "    Source {}:", row.link.source)?;
            writeln!(f, "      Sent:     {:>4} frames", row.sent)?;
            writeln!(
                f,
                "      Received: {:>4} frames ({}%)",
                row.received,
                row.received_percent()
            )?;
            writeln!(f, "      Lost:     {:>4} frames ({}%)", row.lost, row.lost_percent())?;
        }

        writeln!(f, "{SECTION_RULE}")?;
        writeln!(f, "  Network overview:")?;
        writeln!(f, "      Total Sent:     {:>4} frames", self.total_sent)?;
        writeln!(
            f,
            "      Total Received: {:>4} frames ({}%)",
            self.total_received,
            self.received_percent()
        )?;
        writeln!(
            f,
            "      Total Lost:     {:>4} frames ({}%)",
            self.total_lost,
            self.lost_percent()
        )?;
        write!(f, "{REPORT_RULE}")
    }
}
