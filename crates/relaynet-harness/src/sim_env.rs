//! Simulated environment.

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use relaynet_core::Environment;

/// Seed used by [`SimEnv::new`].
pub const DEFAULT_SEED: u64 = 0x5EED;

/// Environment for simulation: virtual tokio time, seeded randomness.
///
/// `now` reads the tokio clock, so under a paused runtime it only moves when
/// every task is asleep and the runtime skips ahead. Clones share one
/// generator; the order in which actors draw from it is fixed by the
/// single-threaded scheduler, which is what makes runs reproducible.
#[derive(Debug, Clone)]
pub struct SimEnv {
    seed: u64,
    rng: Arc<Mutex<ChaCha8Rng>>,
}

impl SimEnv {
    /// Environment with [`DEFAULT_SEED`].
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Environment with an explicit seed.
    pub fn with_seed(seed: u64) -> Self {
        Self { seed, rng: Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed))) }
    }

    /// Seed this environment was built from.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for SimEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for SimEnv {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }

    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner).fill_bytes(buffer);
    }
}
