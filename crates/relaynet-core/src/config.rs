//! Scenario parameters.
//!
//! Every timing and volume knob of the simulation lives here as a named
//! default. Actors read them from a shared [`NetworkConfig`].

use std::time::Duration;

use crate::{ConfigError, LossModel, Topology};

/// Frames each producer delivers to each destination.
pub const FRAMES_PER_DESTINATION: u64 = 1000;

/// Sent-count granularity that triggers a status table.
pub const REPORT_STEP: u64 = 100;

/// Slots in every channel.
pub const CHANNEL_CAPACITY: usize = 1000;

/// Bounded wait for one producer enqueue attempt.
pub const SEND_TIMEOUT: Duration = Duration::from_millis(100);

/// Extra enqueue attempts after the first one fails.
pub const MAX_SEND_RETRIES: u32 = 3;

/// Backoff unit; retry `n` waits `n` times this.
pub const RETRY_BACKOFF: Duration = Duration::from_millis(50);

/// Pacing between producer iterations.
pub const SEND_INTERVAL: Duration = Duration::from_millis(200);

/// Start offset between consecutive producers.
pub const START_STAGGER: Duration = Duration::from_millis(500);

/// Probability that the router discards a frame.
pub const DROP_RATE: f64 = 0.01;

/// Router processing delay per forwarded frame.
pub const TRANSIT_DELAY: Duration = Duration::from_millis(10);

/// Bounded wait for the router's single forward attempt.
pub const FORWARD_TIMEOUT: Duration = Duration::from_millis(100);

/// Analytics polling period while traffic is flowing.
pub const REPORT_INTERVAL: Duration = Duration::from_millis(500);

/// Analytics polling period while channels drain.
pub const DRAIN_INTERVAL: Duration = Duration::from_millis(200);

/// Pause between drained channels and the final report.
pub const SETTLE_DELAY: Duration = Duration::from_millis(1000);

/// Pause after signalling shutdown before going idle.
pub const FLUSH_DELAY: Duration = Duration::from_millis(2000);

/// Network configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkConfig {
    /// Participating nodes
    pub topology: Topology,
    /// Frames each producer sends to each destination
    pub frames_per_destination: u64,
    /// Status table granularity
    pub report_step: u64,
    /// Slots per channel
    pub channel_capacity: usize,
    /// Wait per producer enqueue attempt
    pub send_timeout: Duration,
    /// Retries after a failed enqueue
    pub max_send_retries: u32,
    /// Linear backoff unit between retries
    pub retry_backoff: Duration,
    /// Producer pacing
    pub send_interval: Duration,
    /// Delay between producer start times
    pub start_stagger: Duration,
    /// Router loss injection
    pub loss: LossModel,
    /// Router per-frame delay
    pub transit_delay: Duration,
    /// Router forward wait
    pub forward_timeout: Duration,
    /// Analytics poll period while reporting
    pub report_interval: Duration,
    /// Analytics poll period while draining
    pub drain_interval: Duration,
    /// Wait before the final report
    pub settle_delay: Duration,
    /// Wait after shutdown before idling
    pub flush_delay: Duration,
}

impl NetworkConfig {
    /// Reject configurations that cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.topology.validate()?;

        if self.channel_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.frames_per_destination == 0 {
            return Err(ConfigError::ZeroTarget);
        }
        if self.frames_per_destination > u64::from(u32::MAX) {
            return Err(ConfigError::TargetTooLarge(self.frames_per_destination));
        }
        if self.report_step == 0 {
            return Err(ConfigError::ZeroReportStep);
        }

        self.loss.validate()
    }

    /// Maximum enqueue attempts per frame.
    #[must_use]
    pub fn send_attempts(&self) -> u32 {
        self.max_send_retries + 1
    }

    /// Backoff before retry number `attempt` (1-based).
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.retry_backoff * attempt
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            topology: Topology::default(),
            frames_per_destination: FRAMES_PER_DESTINATION,
            report_step: REPORT_STEP,
            channel_capacity: CHANNEL_CAPACITY,
            send_timeout: SEND_TIMEOUT,
            max_send_retries: MAX_SEND_RETRIES,
            retry_backoff: RETRY_BACKOFF,
            send_interval: SEND_INTERVAL,
            start_stagger: START_STAGGER,
            loss: LossModel::Rate(DROP_RATE),
            transit_delay: TRANSIT_DELAY,
            forward_timeout: FORWARD_TIMEOUT,
            report_interval: REPORT_INTERVAL,
            drain_interval: DRAIN_INTERVAL,
            settle_delay: SETTLE_DELAY,
            flush_delay: FLUSH_DELAY,
        }
    }
}
