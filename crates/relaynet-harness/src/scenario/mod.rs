//! Scenario tests with mandatory oracles.
//!
//! A scenario describes a network configuration, runs it to idle under
//! virtual time, and hands the resulting [`World`] to an oracle. There is no
//! way to run a scenario without one.

pub mod builder;
pub mod oracle;
pub mod world;

pub use builder::{RunnableScenario, Scenario};
pub use world::World;

/// Verification run over the final world.
pub type OracleFn = Box<dyn Fn(&World) -> Result<(), String>>;
