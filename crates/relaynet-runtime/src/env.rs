//! Production environment.

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use relaynet_core::Environment;

/// Wall clock, tokio timers and a ChaCha generator.
///
/// The generator is seeded from OS entropy unless a seed is given, in which
/// case every random decision (destination choice, router drops) repeats
/// across runs.
#[derive(Debug, Clone)]
pub struct SystemEnv {
    rng: Arc<Mutex<ChaCha8Rng>>,
}

impl SystemEnv {
    /// Environment with an entropy-seeded generator.
    pub fn new() -> Self {
        Self::seeded(rand::random())
    }

    /// Environment with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self { rng: Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed))) }
    }
}

impl Default for SystemEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for SystemEnv {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner).fill_bytes(buffer);
    }
}
