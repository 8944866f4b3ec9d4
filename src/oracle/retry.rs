use std::time::Duration;

use crate::foundation::error::{InterpError, InterpResult};
use crate::oracle::{InterpolationOracle, InterpolationRequest};
use crate::raster::frame::Image;

/// Explicit retry policy for oracle calls.
///
/// The default (`max_attempts = 1`) never retries. Only `OracleError`s are retried; the delay
/// before attempt `n + 1` is `backoff_ms * 2^(n - 1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            backoff_ms: 250,
        }
    }
}

impl RetryPolicy {
    pub fn validate(&self) -> InterpResult<()> {
        if self.max_attempts == 0 {
            return Err(InterpError::validation("retry max_attempts must be >= 1"));
        }
        Ok(())
    }

    fn delay_before(&self, attempt: u32) -> Duration {
        let factor = 1u64 << (attempt.saturating_sub(2)).min(16);
        Duration::from_millis(self.backoff_ms.saturating_mul(factor))
    }
}

/// Wraps an oracle with a [`RetryPolicy`].
pub struct RetryingOracle<O> {
    inner: O,
    policy: RetryPolicy,
}

impl<O: InterpolationOracle> RetryingOracle<O> {
    pub fn new(inner: O, policy: RetryPolicy) -> InterpResult<Self> {
        policy.validate()?;
        Ok(Self { inner, policy })
    }
}

impl<O: InterpolationOracle> InterpolationOracle for RetryingOracle<O> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn interpolate(&self, req: &InterpolationRequest<'_>) -> InterpResult<Image> {
        let mut attempt = 1;
        loop {
            match self.inner.interpolate(req) {
                Ok(img) => return Ok(img),
                Err(InterpError::Oracle(msg)) if attempt < self.policy.max_attempts => {
                    attempt += 1;
                    let delay = self.policy.delay_before(attempt);
                    tracing::warn!(
                        oracle = self.inner.name(),
                        t = req.time,
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        ?delay,
                        "oracle call failed, retrying: {msg}"
                    );
                    std::thread::sleep(delay);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/oracle/retry.rs"]
mod tests;
