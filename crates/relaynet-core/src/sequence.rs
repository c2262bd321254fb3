//! Receiver-side gap detection.
//!
//! A receiver keeps one cursor per source: the next sequence it expects.
//! Any frame above the cursor means the frames in between were lost. The
//! cursor then jumps to just past the frame, whatever its value, so a
//! duplicate or late frame simply becomes the new high-water mark.

/// What one arrival says about the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// Exactly the expected sequence
    InOrder,
    /// Sequence above the cursor; `missed` frames never arrived
    Gap {
        /// Cursor before this arrival
        expected: u64,
        /// Number of skipped sequences
        missed: u64,
    },
    /// Sequence below the cursor (duplicate or reordered)
    Regression {
        /// Cursor before this arrival
        expected: u64,
    },
}

/// Sequence cursor for one (source, destination) link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceTracker {
    expected: u64,
}

impl SequenceTracker {
    /// Tracker expecting sequence 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Next sequence this tracker expects.
    pub fn expected(&self) -> u64 {
        self.expected
    }

    /// Record an arrival and advance the cursor past it.
    pub fn observe(&mut self, sequence: u32) -> Observation {
        let sequence = u64::from(sequence);
        let expected = self.expected;
        self.expected = sequence + 1;

        match sequence.cmp(&expected) {
            std::cmp::Ordering::Equal => Observation::InOrder,
            std::cmp::Ordering::Greater => {
                Observation::Gap { expected, missed: sequence - expected }
            },
            std::cmp::Ordering::Less => Observation::Regression { expected },
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn dropped_middle_frame_is_one_loss() {
        let mut tracker = SequenceTracker::new();

        assert_eq!(tracker.observe(0), Observation::InOrder);
        assert_eq!(tracker.observe(2), Observation::Gap { expected: 1, missed: 1 });
        assert_eq!(tracker.expected(), 3);
    }

    #[test]
    fn first_frame_late_counts_leading_gap() {
        let mut tracker = SequenceTracker::new();
        assert_eq!(tracker.observe(5), Observation::Gap { expected: 0, missed: 5 });
    }

    #[test]
    fn regression_resets_high_water_mark() {
        let mut tracker = SequenceTracker::new();
        tracker.observe(0);
        tracker.observe(1);
        tracker.observe(2);

        assert_eq!(tracker.observe(1), Observation::Regression { expected: 3 });
        assert_eq!(tracker.expected(), 2);
    }

    proptest! {
        /// For any increasing arrival order the misses plus arrivals account
        /// for every sequence up to the last one seen.
        #[test]
        fn increasing_arrivals_account_for_every_sequence(
            sequences in prop::collection::btree_set(0u32..5000, 1..200)
                .prop_map(|set| set.into_iter().collect::<Vec<_>>())
        ) {
            let mut tracker = SequenceTracker::new();
            let mut missed_total = 0u64;

            for &sequence in &sequences {
                match tracker.observe(sequence) {
                    Observation::InOrder => {},
                    Observation::Gap { missed, .. } => missed_total += missed,
                    Observation::Regression { .. } => {
                        prop_assert!(false, "regression on sorted input");
                    },
                }
            }

            let last = u64::from(*sequences.last().unwrap());
            prop_assert_eq!(missed_total + sequences.len() as u64, last + 1);
            prop_assert_eq!(tracker.expected(), last + 1);
        }
    }
}
