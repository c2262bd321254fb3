//! Deterministic simulation harness for relaynet.
//!
//! Runs a whole network on a single-threaded tokio runtime with a paused
//! clock and a seeded generator. Virtual time makes a 1000-frame run finish
//! in well under a second, and the seed makes every router drop repeat
//! exactly.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod scenario;
pub mod sim_env;

pub use sim_env::SimEnv;
