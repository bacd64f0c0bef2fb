//! Bounded retry with exponential backoff around a single fetch.
//!
//! Only failures classified as [`TransferErrorKind::Transient`] are retried.
//! Attempt `n` (1-based, n > 1) is preceded by a sleep of
//! `initial_delay * multiplier^(n - 2)`, so five attempts sleep 2s, 4s, 8s, 16s.
//!
//! [`TransferErrorKind::Transient`]: crate::error::TransferErrorKind::Transient

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::error::TransferError;
use crate::output::{print_error, print_retry_notice};
use crate::status::StatusEventBus;

/// Attempts per object, including the first.
pub const MAX_ATTEMPTS: u32 = 5;

/// Delay before the second attempt.
pub const INITIAL_DELAY: Duration = Duration::from_secs(2);

/// Factor applied to the delay after every failed attempt.
pub const BACKOFF_MULTIPLIER: u32 = 2;

/// Retry limits. The same policy is used for every object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    backoff_multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            initial_delay: INITIAL_DELAY,
            backoff_multiplier: BACKOFF_MULTIPLIER,
        }
    }
}

impl RetryPolicy {
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Sleep after the failed attempt with 0-based index `attempt_index`.
    pub fn delay_after(&self, attempt_index: u32) -> Duration {
        self.initial_delay * self.backoff_multiplier.pow(attempt_index)
    }

    /// Every delay a fully failing object goes through, in order.
    pub fn delays(&self) -> Vec<Duration> {
        (0..self.max_attempts.saturating_sub(1))
            .map(|i| self.delay_after(i))
            .collect()
    }
}

/// One blocking fetch of one logical object.
#[async_trait(?Send)]
pub trait Fetch {
    type Output;

    /// How the object is named in failure messages.
    fn describe(&self) -> String;

    async fn fetch_once(&mut self, bus: &mut StatusEventBus)
        -> Result<Self::Output, TransferError>;
}

/// Runs a [`Fetch`] under the retry policy.
#[derive(Debug, Clone)]
pub struct RetryingTransfer {
    policy: RetryPolicy,
    announce: bool,
}

impl RetryingTransfer {
    /// `announce` prints a notice before every retry (progress display mode).
    pub fn new(announce: bool) -> Self {
        Self {
            policy: RetryPolicy::default(),
            announce,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetch until success, a non-retryable failure, or the attempt budget runs out.
    pub async fn attempt<F: Fetch>(
        &self,
        op: &mut F,
        bus: &mut StatusEventBus,
    ) -> Result<F::Output, TransferError> {
        let mut attempts = 0;

        loop {
            let err = match op.fetch_once(bus).await {
                Ok(output) => return Ok(output),
                Err(err) => err,
            };
            attempts += 1;

            bus.clear();
            print_error(&format!("Download failed for {}: {}", op.describe(), err));

            if !err.kind().is_retryable() {
                tracing::debug!("{:?} failure for {} is not retried", err.kind(), op.describe());
                return Err(err);
            }

            if attempts >= self.policy.max_attempts() {
                tracing::debug!("Giving up on {} after {} attempts", op.describe(), attempts);
                return Err(err);
            }

            let delay = self.policy.delay_after(attempts - 1);
            if self.announce {
                print_retry_notice(attempts, delay.as_secs());
            }
            tracing::debug!("Retrying {} in {:?}", op.describe(), delay);
            sleep(delay).await;
        }
    }
}
