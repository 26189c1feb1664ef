//! Random pause between a worker's steps.
//!
//! The generator is seeded once when the policy is built and shared by every
//! worker of a job.

use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Config;

/// Uniform delay in `[0, max)`.
#[derive(Debug)]
pub struct Jitter {
    max: Duration,
    rng: Mutex<StdRng>,
}

impl Jitter {
    /// Seeded from the operating system.
    pub fn new(max: Duration) -> Self {
        Self {
            max,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Reproducible sequence of delays for a given seed.
    pub fn seeded(max: Duration, seed: u64) -> Self {
        Self {
            max,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Never pauses.
    pub fn none() -> Self {
        Self::seeded(Duration::ZERO, 0)
    }

    pub fn from_config(config: &Config) -> Self {
        match config.seed {
            Some(seed) => Self::seeded(config.jitter(), seed),
            None => Self::new(config.jitter()),
        }
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// Sample the next delay.
    pub fn delay(&self) -> Duration {
        let max_nanos = u64::try_from(self.max.as_nanos()).unwrap_or(u64::MAX);
        if max_nanos == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos(self.rng.lock().random_range(0..max_nanos))
    }

    /// Sleep for a freshly sampled delay.
    pub fn pause(&self) {
        let delay = self.delay();
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_stay_below_max() {
        let max = Duration::from_millis(5);
        let jitter = Jitter::new(max);
        for _ in 0..1000 {
            assert!(jitter.delay() < max);
        }
    }

    #[test]
    fn same_seed_same_delays() {
        let max = Duration::from_secs(1);
        let a = Jitter::seeded(max, 42);
        let b = Jitter::seeded(max, 42);
        let xs: Vec<_> = (0..16).map(|_| a.delay()).collect();
        let ys: Vec<_> = (0..16).map(|_| b.delay()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn none_never_sleeps() {
        let jitter = Jitter::none();
        assert_eq!(jitter.max(), Duration::ZERO);
        assert_eq!(jitter.delay(), Duration::ZERO);
    }

    #[test]
    fn config_seed_is_honored() {
        let config = Config {
            jitter_ms: 250,
            seed: Some(7),
            ..Config::default()
        };
        let a = Jitter::from_config(&config);
        let b = Jitter::seeded(Duration::from_millis(250), 7);
        assert_eq!(a.max(), Duration::from_millis(250));
        assert_eq!(a.delay(), b.delay());
    }
}
