//! Reusable oracles.
//!
//! Each helper returns an [`OracleFn`] that fails with a message naming the
//! scenario and the offending link or counter.

use crate::scenario::{OracleFn, World};

/// Pass only if every oracle passes. Stops at the first failure.
pub fn all_of(oracles: Vec<OracleFn>) -> OracleFn {
    Box::new(move |world| oracles.iter().try_for_each(|oracle| oracle(world)))
}

/// Wrap an ad-hoc check so it composes with [`all_of`].
pub fn custom(check: impl Fn(&World) -> Result<(), String> + 'static) -> OracleFn {
    Box::new(check)
}

/// Every link: `received + lost <= sent`.
pub fn received_within_sent() -> OracleFn {
    Box::new(|world: &World| {
        for (link, counters) in &world.snapshot().links {
            if counters.received + counters.lost > counters.sent {
                return Err(format!(
                    "Scenario '{}': {link} received {} + lost {} exceeds sent {}",
                    world.name(),
                    counters.received,
                    counters.lost,
                    counters.sent
                ));
            }
        }
        Ok(())
    })
}

/// Every link reached the configured per-destination target exactly.
pub fn every_link_reached_target() -> OracleFn {
    Box::new(|world: &World| {
        let target = world.config().frames_per_destination;
        for (link, counters) in &world.snapshot().links {
            if counters.sent != target {
                return Err(format!(
                    "Scenario '{}': {link} sent {} frames, expected {target}",
                    world.name(),
                    counters.sent
                ));
            }
        }
        Ok(())
    })
}

/// Report totals equal the sums of the link counters.
pub fn totals_match_links() -> OracleFn {
    Box::new(|world: &World| {
        let report = world.report();
        let snapshot = world.snapshot();
        let pairs = [
            ("sent", report.total_sent, snapshot.total_sent()),
            ("received", report.total_received, snapshot.total_received()),
            ("lost", report.total_lost, snapshot.total_lost()),
        ];
        for (what, reported, summed) in pairs {
            if reported != summed {
                return Err(format!(
                    "Scenario '{}': reported total {what} {reported} != link sum {summed}",
                    world.name()
                ));
            }
        }
        Ok(())
    })
}

/// No receiver ever saw a frame addressed elsewhere.
pub fn no_misrouted_frames() -> OracleFn {
    Box::new(|world: &World| match world.transport().misrouted {
        0 => Ok(()),
        n => Err(format!("Scenario '{}': {n} misrouted frames", world.name())),
    })
}

/// No receiver ever saw a sequence go backwards.
pub fn no_reordering() -> OracleFn {
    Box::new(|world: &World| match world.transport().out_of_order {
        0 => Ok(()),
        n => Err(format!("Scenario '{}': {n} out-of-order frames", world.name())),
    })
}

/// Nothing lost, everything sent was received.
pub fn lossless() -> OracleFn {
    Box::new(|world: &World| {
        let report = world.report();
        if report.total_lost == 0 && report.total_received == report.total_sent {
            Ok(())
        } else {
            Err(format!(
                "Scenario '{}': sent {}, received {}, lost {}",
                world.name(),
                report.total_sent,
                report.total_received,
                report.total_lost
            ))
        }
    })
}

/// The invariants every run must satisfy, whatever the loss model.
pub fn consistent() -> OracleFn {
    all_of(vec![
        received_within_sent(),
        totals_match_links(),
        no_misrouted_frames(),
        no_reordering(),
    ])
}
