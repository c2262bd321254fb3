//! Environment abstraction.
//!
//! Actors never read the clock or an RNG directly. Production passes an
//! environment backed by the tokio clock and an OS-seeded generator; the
//! simulation harness passes a seeded generator and a paused clock, which
//! makes whole runs reproducible.

use std::{future::Future, time::Duration};

/// Source of time and randomness for actors.
pub trait Environment: Clone + Send + Sync + 'static {
    /// Current instant on this environment's clock.
    fn now(&self) -> std::time::Instant;

    /// Suspend the caller for `duration`.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;

    /// Fill `buffer` with random bytes.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Uniform random `u64`.
    fn random_u64(&self) -> u64 {
        let mut bytes = [0u8; 8];
        self.random_bytes(&mut bytes);
        u64::from_le_bytes(bytes)
    }

    /// Uniform random value in `[0, 1)`.
    fn random_unit(&self) -> f64 {
        // 53 random mantissa bits
        (self.random_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform random index in `0..len`. `len` must be non-zero.
    fn random_index(&self, len: usize) -> usize {
        debug_assert!(len > 0);
        (self.random_u64() % len as u64) as usize
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::{
        sync::{Arc, Mutex},
        time::{Duration, Instant},
    };

    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use super::Environment;

    /// Seeded environment for unit tests. Sleeping is a no-op.
    #[derive(Clone)]
    pub struct SeededEnv {
        rng: Arc<Mutex<ChaCha8Rng>>,
    }

    impl SeededEnv {
        pub fn new(seed: u64) -> Self {
            Self { rng: Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed))) }
        }
    }

    impl Environment for SeededEnv {
        fn now(&self) -> Instant {
            Instant::now()
        }

        fn sleep(&self, _duration: Duration) -> impl std::future::Future<Output = ()> + Send {
            async {}
        }

        fn random_bytes(&self, buffer: &mut [u8]) {
            self.rng.lock().unwrap().fill_bytes(buffer);
        }
    }
}
