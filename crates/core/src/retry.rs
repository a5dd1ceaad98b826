//! Bounded retry with backoff for fallible async operations.
//!
//! # Example
//!
//! ```ignore
//! let policy = RetryPolicy::exponential(3, Duration::from_secs(1), Duration::from_secs(10));
//! let body = policy
//!     .run_when("fetch lineups", || client.fetch(&query), |e| e.is_transient())
//!     .await?;
//! ```

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Delay strategy between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same delay after every failed attempt.
    Fixed(Duration),
    /// `base * 2^(attempt - 1)`, capped at `max`.
    Exponential { base: Duration, max: Duration },
}

/// Retry policy parameterized by attempt count and delay strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::exponential(3, Duration::from_secs(2), Duration::from_secs(30))
    }
}

impl RetryPolicy {
    /// Creates a policy. `max_attempts` counts the first try and is at least 1.
    #[must_use]
    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    #[must_use]
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self::new(max_attempts, Backoff::Fixed(delay))
    }

    #[must_use]
    pub fn exponential(max_attempts: u32, base: Duration, max: Duration) -> Self {
        Self::new(max_attempts, Backoff::Exponential { base, max })
    }

    /// Single attempt, no retries.
    #[must_use]
    pub fn none() -> Self {
        Self::fixed(1, Duration::ZERO)
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to wait after the given failed attempt (1-based).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed(delay) => delay,
            Backoff::Exponential { base, max } => {
                let exponent = attempt.saturating_sub(1).min(31);
                base.checked_mul(1u32 << exponent).unwrap_or(max).min(max)
            }
        }
    }

    /// Runs `op`, retrying every error until attempts run out.
    ///
    /// # Errors
    /// Returns the last error once all attempts have failed.
    pub async fn run<T, E, F, Fut>(&self, label: &str, op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        self.run_when(label, op, |_| true).await
    }

    /// Runs `op`, retrying only errors for which `should_retry` returns true.
    ///
    /// # Errors
    /// Returns the first non-retryable error, or the last error once all
    /// attempts have failed.
    pub async fn run_when<T, E, F, Fut, P>(
        &self,
        label: &str,
        op: F,
        should_retry: P,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
        P: Fn(&E) -> bool,
    {
        self.run_with_hint(label, op, should_retry, |_| None).await
    }

    /// Like [`run_when`](Self::run_when), but waits at least as long as
    /// `delay_hint` asks for, e.g. a server's `Retry-After`.
    ///
    /// # Errors
    /// Returns the first non-retryable error, or the last error once all
    /// attempts have failed.
    pub async fn run_with_hint<T, E, F, Fut, P, H>(
        &self,
        label: &str,
        mut op: F,
        should_retry: P,
        delay_hint: H,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
        P: Fn(&E) -> bool,
        H: Fn(&E) -> Option<Duration>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_attempts && should_retry(&e) => {
                    let backoff = self.delay_for(attempt);
                    let delay = delay_hint(&e).map_or(backoff, |hint| hint.max(backoff));
                    tracing::warn!(
                        "{} failed (attempt {}/{}): {}. Retrying in {:?}",
                        label,
                        attempt,
                        self.max_attempts,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    if attempt > 1 {
                        tracing::error!("{} failed after {} attempts: {}", label, attempt, e);
                    }
                    return Err(e);
                }
            }
        }
    }
}
