//! Analytics actor.
//!
//! Drives [`AnalyticsPhase`] from `Reporting` to `Idle`: threshold-triggered
//! status tables while producers run, pending-count polling while the
//! channels drain, then the final report and the shutdown signal.

use std::sync::Arc;

use relaynet_core::{
    AnalyticsPhase, Completion, Environment, FinalReport, NetworkConfig, NetworkStats, Reporter,
};
use tracing::info;

use crate::{ChannelGauge, Shutdown};

/// Log target for status tables and the final report.
pub const REPORT_TARGET: &str = "relaynet::report";

/// Emit a multi-line block one event per line, so formatters that escape
/// newlines keep the layout.
fn emit(block: &impl std::fmt::Display) {
    for line in block.to_string().lines() {
        info!(target: REPORT_TARGET, "{line}");
    }
}

/// Reporting and shutdown orchestration.
pub struct Analytics<E> {
    config: Arc<NetworkConfig>,
    env: E,
    stats: Arc<NetworkStats>,
    completion: Arc<Completion>,
    gauges: Vec<ChannelGauge>,
    shutdown: Shutdown,
    phase: AnalyticsPhase,
}

impl<E: Environment> Analytics<E> {
    /// Analytics over `stats`, watching the channels behind `gauges`.
    ///
    /// Takes ownership of the [`Shutdown`] handle: other actors stop when it
    /// is raised or when this actor goes away.
    pub fn new(
        config: Arc<NetworkConfig>,
        env: E,
        stats: Arc<NetworkStats>,
        completion: Arc<Completion>,
        gauges: Vec<ChannelGauge>,
        shutdown: Shutdown,
    ) -> Self {
        Self { config, env, stats, completion, gauges, shutdown, phase: AnalyticsPhase::Reporting }
    }

    /// Run every phase and return the final report once idle.
    pub async fn run(mut self) -> FinalReport {
        info!(phase = %self.phase, "analytics started");

        self.report_until_complete().await;
        self.advance();

        self.drain().await;
        self.advance();

        self.env.sleep(self.config.settle_delay).await;
        let report = FinalReport::from_snapshot(&self.stats.snapshot());
        emit(&report);
        info!(
            total_sent = report.total_sent,
            total_received = report.total_received,
            total_lost = report.total_lost,
            received_percent = report.received_percent(),
            "final report"
        );

        self.shutdown.signal();
        self.env.sleep(self.config.flush_delay).await;
        self.advance();

        report
    }

    fn advance(&mut self) {
        let from = self.phase;
        self.phase = from.next();
        info!(%from, to = %self.phase, "analytics phase change");
    }

    async fn report_until_complete(&self) {
        let mut reporter =
            Reporter::new(self.config.report_step, self.config.frames_per_destination);

        loop {
            self.env.sleep(self.config.report_interval).await;

            if let Some(table) = reporter.observe(&self.stats.snapshot()) {
                emit(&table);
            }
            if self.completion.is_complete() {
                info!("all producers complete");
                return;
            }
        }
    }

    async fn drain(&self) {
        loop {
            let mut total = 0;
            for gauge in &self.gauges {
                let pending = gauge.pending();
                total += pending;
                info!(channel = gauge.name(), pending, "draining");
            }
            info!(pending = total, "in-flight frames");

            if total == 0 {
                return;
            }
            self.env.sleep(self.config.drain_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{io, sync::Mutex, time::Duration};

    use relaynet_core::Topology;
    use relaynet_proto::{Frame, LinkId, NodeId};

    use super::*;
    use crate::{SystemEnv, bounded};

    fn setup(
        producers: usize,
    ) -> (Arc<NetworkConfig>, Arc<NetworkStats>, Arc<Completion>, Shutdown) {
        let config = Arc::new(NetworkConfig {
            topology: Topology::new([1], [3]),
            frames_per_destination: 2,
            ..Default::default()
        });
        let stats = Arc::new(NetworkStats::new(&config.topology));
        (config, stats, Arc::new(Completion::new(producers)), Shutdown::new())
    }

    #[tokio::test(start_paused = true)]
    async fn completed_network_goes_idle_with_totals() {
        let (config, stats, completion, shutdown) = setup(1);
        let link = stats.links.get(LinkId::new(1, 3)).unwrap();
        link.record_sent();
        link.record_sent();
        link.record_received();
        link.record_lost(1);
        assert!(completion.producer_done());

        let listener = shutdown.listener();
        let analytics = Analytics::new(
            config,
            SystemEnv::seeded(1),
            stats,
            completion,
            Vec::new(),
            shutdown,
        );

        let start = tokio::time::Instant::now();
        let report = analytics.run().await;

        assert!(listener.is_signaled());
        assert_eq!(report.total_sent, 2);
        assert_eq!(report.total_received, 1);
        assert_eq!(report.total_lost, 1);
        assert_eq!(report.received_percent(), 50);
        // One poll, settle, flush
        assert!(start.elapsed() >= Duration::from_millis(3500));
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_channels_to_drain() {
        let (config, stats, completion, shutdown) = setup(1);
        completion.producer_done();

        let (tx, mut rx) = bounded("node3", 4).unwrap();
        tx.send_timeout(Frame::new(NodeId(1), NodeId(3), 0).unwrap(), Duration::from_millis(1))
            .await
            .unwrap();

        let listener = shutdown.listener();
        let analytics = Analytics::new(
            config,
            SystemEnv::seeded(1),
            stats,
            completion,
            vec![tx.gauge()],
            shutdown,
        );
        let handle = tokio::spawn(analytics.run());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!listener.is_signaled(), "shutdown raised with frames in flight");

        rx.recv().await.unwrap();
        handle.await.unwrap();
        assert!(listener.is_signaled());
    }

    #[tokio::test(start_paused = true)]
    async fn keeps_reporting_while_producers_run() {
        let (config, stats, completion, shutdown) = setup(2);
        completion.producer_done();

        let listener = shutdown.listener();
        let analytics = Analytics::new(
            config,
            SystemEnv::seeded(1),
            stats,
            completion.clone(),
            Vec::new(),
            shutdown,
        );
        let handle = tokio::spawn(analytics.run());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(!listener.is_signaled());

        completion.producer_done();
        handle.await.unwrap();
        assert!(listener.is_signaled());
    }

    /// Log sink shared between the subscriber and the test.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for Captured {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn drain_logs_every_channel_at_info() {
        let (config, stats, completion, shutdown) = setup(1);
        let (central, _central_rx) = bounded("central", 4).unwrap();
        let (node3, _node3_rx) = bounded("node3", 4).unwrap();
        central
            .send_timeout(Frame::new(NodeId(1), NodeId(3), 0).unwrap(), Duration::from_millis(1))
            .await
            .unwrap();

        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_writer(captured.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let analytics = Analytics::new(
            config,
            SystemEnv::seeded(1),
            stats,
            completion,
            vec![central.gauge(), node3.gauge()],
            shutdown,
        );
        tokio::time::timeout(Duration::from_millis(1), analytics.drain()).await.unwrap_err();

        let logs = captured.text();
        let draining: Vec<_> = logs.lines().filter(|line| line.contains("draining")).collect();
        assert_eq!(draining.len(), 2, "{logs}");
        assert!(draining[0].contains("INFO") && draining[0].contains("central"), "{logs}");
        assert!(draining[0].contains("pending=1"), "{logs}");
        assert!(draining[1].contains("INFO") && draining[1].contains("node3"), "{logs}");
        assert!(logs.contains("in-flight frames"), "{logs}");
    }
}
