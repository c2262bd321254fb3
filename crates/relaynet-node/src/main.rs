//! relaynet node
//!
//! Runs the six-actor network against the wall clock with tokio timers,
//! logging status tables as traffic flows and a final report once every
//! channel has drained. After the report the process stays up doing nothing,
//! like a device that finished its job; pass `--exit-on-idle` to return
//! instead.

use std::process::ExitCode;

use clap::Parser;
use relaynet_core::{LossModel, NetworkConfig, config};
use relaynet_runtime::{Network, SystemEnv};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "relaynet-node", version, about = "Simulated relay network")]
struct Args {
    /// Frames each producer sends to each destination
    #[arg(long, default_value_t = config::FRAMES_PER_DESTINATION)]
    frames: u64,

    /// Sent-count step between status tables
    #[arg(long, default_value_t = config::REPORT_STEP)]
    report_step: u64,

    /// Capacity of every channel
    #[arg(long, default_value_t = config::CHANNEL_CAPACITY)]
    capacity: usize,

    /// Probability that the router drops a frame
    #[arg(long, default_value_t = config::DROP_RATE)]
    drop_rate: f64,

    /// Seed for destination choice and router drops (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Exit once the network is idle instead of parking
    #[arg(long)]
    exit_on_idle: bool,

    /// Log filter, used when RUST_LOG is unset
    #[arg(long, default_value = "relaynet=info")]
    log_filter: String,
}

impl Args {
    fn network_config(&self) -> NetworkConfig {
        let loss = if self.drop_rate == 0.0 {
            LossModel::None
        } else {
            LossModel::Rate(self.drop_rate)
        };
        NetworkConfig {
            frames_per_destination: self.frames,
            report_step: self.report_step,
            channel_capacity: self.capacity,
            loss,
            ..Default::default()
        }
    }

    fn env(&self) -> SystemEnv {
        self.seed.map_or_else(SystemEnv::new, SystemEnv::seeded)
    }
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry().with(fmt::layer().with_target(true)).with(filter).init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(&args.log_filter);

    let network = match Network::new(args.network_config(), args.env()) {
        Ok(network) => network,
        Err(err) => {
            error!(%err, "startup failed");
            return ExitCode::FAILURE;
        },
    };
    info!(
        frames = network.config().frames_per_destination,
        capacity = network.config().channel_capacity,
        seed = ?args.seed,
        "network starting"
    );

    match network.run().await {
        Ok(outcome) => {
            info!(total_sent = outcome.report.total_sent, "network idle");
        },
        Err(err) => {
            error!(%err, "network failed");
            return ExitCode::FAILURE;
        },
    }

    if !args.exit_on_idle {
        std::future::pending::<()>().await;
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn no_flags_means_default_scenario() {
        let args = Args::try_parse_from(["relaynet-node"]).unwrap();
        assert_eq!(args.network_config(), NetworkConfig::default());
        assert!(args.seed.is_none());
        assert!(!args.exit_on_idle);
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "relaynet-node",
            "--frames",
            "10",
            "--capacity",
            "4",
            "--drop-rate",
            "0",
            "--seed",
            "9",
            "--exit-on-idle",
        ])
        .unwrap();

        let config = args.network_config();
        assert_eq!(config.frames_per_destination, 10);
        assert_eq!(config.channel_capacity, 4);
        assert_eq!(config.loss, LossModel::None);
        assert_eq!(args.seed, Some(9));
        assert!(args.exit_on_idle);
    }

    #[test]
    fn out_of_range_drop_rate_fails_validation() {
        let args = Args::try_parse_from(["relaynet-node", "--drop-rate", "1.5"]).unwrap();
        assert!(Network::new(args.network_config(), args.env()).is_err());
    }

    #[test]
    fn frames_beyond_sequence_range_fail_validation() {
        let args = Args::try_parse_from(["relaynet-node", "--frames", "4294967296"]).unwrap();
        assert!(Network::new(args.network_config(), args.env()).is_err());
    }
}
