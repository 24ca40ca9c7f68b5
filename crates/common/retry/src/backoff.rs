use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_INITIAL_INTERVAL: Duration = Duration::from_millis(500);
pub const DEFAULT_MULTIPLIER: f64 = 2.0;
pub const DEFAULT_RANDOMIZATION_FACTOR: f64 = 0.5;
pub const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(60);

/// Once the next interval would grow past this, the generator starts over from
/// `initial_interval`.
pub const DEFAULT_RESET_CEILING: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackoffConfig {
    pub initial_interval: Duration,
    pub multiplier: f64,
    /// Each wait is drawn uniformly from `current * (1 ± randomization_factor)`.
    pub randomization_factor: f64,
    pub max_interval: Duration,
    pub reset_ceiling: Duration,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_interval: DEFAULT_INITIAL_INTERVAL,
            multiplier: DEFAULT_MULTIPLIER,
            randomization_factor: DEFAULT_RANDOMIZATION_FACTOR,
            max_interval: DEFAULT_MAX_INTERVAL,
            reset_ceiling: DEFAULT_RESET_CEILING,
        }
    }
}

/// Backoff interval generator producing a sawtooth cadence.
///
/// The un-jittered interval starts at `initial_interval` and is multiplied by
/// `multiplier` after every wait, capped at `max_interval`. Whenever the grown interval
/// would exceed `reset_ceiling` the generator resets to `initial_interval` instead.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    config: BackoffConfig,
    current_interval: Duration,
}

impl ExponentialBackoff {
    pub fn new(config: BackoffConfig) -> Self {
        Self {
            current_interval: config.initial_interval,
            config,
        }
    }

    /// The un-jittered interval the next call to [`Self::next_backoff`] is based on.
    pub fn current_interval(&self) -> Duration {
        self.current_interval
    }

    pub fn reset(&mut self) {
        self.current_interval = self.config.initial_interval;
    }

    /// Returns the next wait and advances the generator.
    pub fn next_backoff(&mut self) -> Duration {
        let wait = self.jittered(self.current_interval);
        self.advance();
        wait
    }

    fn advance(&mut self) {
        let grown = self
            .current_interval
            .mul_f64(self.config.multiplier.max(1.0));
        if grown > self.config.reset_ceiling {
            self.reset();
        } else {
            self.current_interval = grown.min(self.config.max_interval);
        }
    }

    fn jittered(&self, interval: Duration) -> Duration {
        let factor = self.config.randomization_factor.clamp(0.0, 1.0);
        if factor == 0.0 || interval.is_zero() {
            return interval;
        }
        let base = interval.as_secs_f64();
        let delta = base * factor;
        Duration::from_secs_f64(rand::rng().random_range((base - delta)..=(base + delta)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(initial_ms: u64, max_ms: u64, ceiling_ms: u64, factor: f64) -> BackoffConfig {
        BackoffConfig {
            initial_interval: Duration::from_millis(initial_ms),
            multiplier: 2.0,
            randomization_factor: factor,
            max_interval: Duration::from_millis(max_ms),
            reset_ceiling: Duration::from_millis(ceiling_ms),
        }
    }

    #[test]
    fn test_doubles_then_resets_past_ceiling() {
        let mut backoff = ExponentialBackoff::new(config(500, 60_000, 60_000, 0.0));
        let waits: Vec<u128> = (0..10).map(|_| backoff.next_backoff().as_millis()).collect();
        assert_eq!(
            waits,
            vec![500, 1_000, 2_000, 4_000, 8_000, 16_000, 32_000, 500, 1_000, 2_000]
        );
    }

    #[test]
    fn test_interval_never_stays_above_ceiling() {
        let cfg = config(3, 1_000, 100, 0.5);
        let mut backoff = ExponentialBackoff::new(cfg);
        for _ in 0..1_000 {
            let before = backoff.current_interval();
            assert!(before <= cfg.reset_ceiling);
            backoff.next_backoff();
            if before.mul_f64(cfg.multiplier) > cfg.reset_ceiling {
                assert_eq!(backoff.current_interval(), cfg.initial_interval);
            }
        }
    }

    #[test]
    fn test_max_interval_caps_growth_below_ceiling() {
        let mut backoff = ExponentialBackoff::new(config(100, 300, 10_000, 0.0));
        let waits: Vec<u128> = (0..5).map(|_| backoff.next_backoff().as_millis()).collect();
        assert_eq!(waits, vec![100, 200, 300, 300, 300]);
    }

    #[test]
    fn test_jitter_stays_within_randomization_window() {
        let mut backoff = ExponentialBackoff::new(config(1_000, 1_000, 10_000, 0.5));
        for _ in 0..100 {
            let wait = backoff.next_backoff();
            assert!(wait >= Duration::from_millis(500));
            assert!(wait <= Duration::from_millis(1_500));
        }
    }

    #[test]
    fn test_reset_restores_initial_interval() {
        let mut backoff = ExponentialBackoff::new(config(10, 1_000, 1_000, 0.0));
        backoff.next_backoff();
        backoff.next_backoff();
        assert_eq!(backoff.current_interval(), Duration::from_millis(40));
        backoff.reset();
        assert_eq!(backoff.current_interval(), Duration::from_millis(10));
    }
}
