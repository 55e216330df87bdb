//! Poll configuration
//!
//! Timing knobs for a single wait: how long to hold off before the first
//! status check, how far apart checks are, and when to give up.

use std::time::Duration;

/// Starting value of the exponential backoff, doubled before the first sleep
pub const INITIAL_BACKOFF: Duration = Duration::from_millis(100);

/// Ceiling of the exponential backoff
pub const MAX_BACKOFF: Duration = Duration::from_secs(10);

/// Timing configuration of one wait
///
/// The timeout has no default: every call site states how long its kind of
/// operation may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Time to hold off before the first status check
    pub delay: Duration,

    /// Fixed time between checks; exponential backoff when unset
    pub interval: Option<Duration>,

    /// Floor applied to every sleep between checks
    pub min_interval: Duration,

    /// Overall budget, measured from the start of the wait
    pub timeout: Duration,
}

impl PollConfig {
    /// Creates a configuration that checks immediately and backs off exponentially
    pub fn new(timeout: Duration) -> Self {
        Self {
            delay: Duration::ZERO,
            interval: None,
            min_interval: Duration::ZERO,
            timeout,
        }
    }

    /// Policy used for compute operations: 10s initial delay, checks at least 2s apart
    pub fn compute(timeout: Duration) -> Self {
        Self {
            delay: Duration::from_secs(10),
            interval: None,
            min_interval: Duration::from_secs(2),
            timeout,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    /// Shortens the initial delay to at most half the timeout
    pub fn capped_delay(mut self) -> Self {
        self.delay = self.delay.min(self.timeout / 2);
        self
    }

    /// Sleep to apply before the next check, given the current backoff step
    pub fn wait_after(&self, backoff: Duration) -> Duration {
        match self.interval {
            Some(interval) => interval.max(self.min_interval),
            None => backoff.min(MAX_BACKOFF).max(self.min_interval),
        }
    }

    /// Applies overrides from environment variables on top of `self`
    ///
    /// Recognised variables (all in seconds, all optional):
    /// - CIRRUS_POLL_DELAY
    /// - CIRRUS_POLL_INTERVAL
    /// - CIRRUS_POLL_MIN_INTERVAL
    /// - CIRRUS_POLL_TIMEOUT
    pub fn from_env(self) -> anyhow::Result<Self> {
        Ok(Self {
            delay: env_secs("CIRRUS_POLL_DELAY")?.unwrap_or(self.delay),
            interval: env_secs("CIRRUS_POLL_INTERVAL")?.or(self.interval),
            min_interval: env_secs("CIRRUS_POLL_MIN_INTERVAL")?.unwrap_or(self.min_interval),
            timeout: env_secs("CIRRUS_POLL_TIMEOUT")?.unwrap_or(self.timeout),
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.timeout.is_zero() {
            anyhow::bail!("timeout must be greater than 0");
        }

        if self.interval.is_some_and(|i| i.is_zero()) {
            anyhow::bail!("interval must be greater than 0 when set");
        }

        if self.delay >= self.timeout {
            anyhow::bail!(
                "delay ({:?}) must be shorter than timeout ({:?})",
                self.delay,
                self.timeout
            );
        }

        Ok(())
    }
}

fn env_secs(name: &str) -> anyhow::Result<Option<Duration>> {
    match std::env::var(name) {
        Ok(value) => {
            let secs = value
                .trim()
                .parse::<u64>()
                .map_err(|e| anyhow::anyhow!("{} must be a number of seconds: {}", name, e))?;
            Ok(Some(Duration::from_secs(secs)))
        }
        Err(_) => Ok(None),
    }
}
