use std::time::Duration;

use anyhow::Result;

/// Outcome of one failed attempt.
#[derive(Debug)]
pub(crate) enum Failure {
    /// Rate limiting or a transient network/server error; worth trying again.
    Retryable(anyhow::Error),
    Fatal(anyhow::Error),
}

/// Fixed attempt limit with a fixed pause between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self { Self { max_attempts: 3, backoff: Duration::from_secs(10) } }
}

impl RetryPolicy {
    /// Run `attempt` until it succeeds, fails fatally, or the attempt limit is reached.
    pub(crate) fn run<T>(&self, label: &str, mut attempt: impl FnMut() -> Result<T, Failure>) -> Result<T> {
        let limit = self.max_attempts.max(1);
        let mut tries = 0;
        loop {
            tries += 1;
            match attempt() {
                Ok(value) => return Ok(value),
                Err(Failure::Fatal(err)) => return Err(err.context(format!("{label} failed"))),
                Err(Failure::Retryable(err)) if tries >= limit => {
                    return Err(err.context(format!("{label} failed after {tries} attempts")));
                }
                Err(Failure::Retryable(err)) => {
                    tracing::warn!("{label}: attempt {tries}/{limit} failed ({err:#}); retrying in {:?}", self.backoff);
                    std::thread::sleep(self.backoff);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    const FAST: RetryPolicy = RetryPolicy { max_attempts: 3, backoff: Duration::ZERO };

    #[test]
    fn stops_at_the_limit() {
        let mut calls = 0;
        let result: Result<()> = FAST.run("GET", || {
            calls += 1;
            Err(Failure::Retryable(anyhow!("429 Too Many Requests")))
        });
        assert!(result.is_err());
        assert_eq!(calls, 3);
        assert!(format!("{:#}", result.unwrap_err()).contains("after 3 attempts"));
    }

    #[test]
    fn fatal_errors_are_not_retried() {
        let mut calls = 0;
        let result: Result<()> = FAST.run("GET", || {
            calls += 1;
            Err(Failure::Fatal(anyhow!("400 Bad Request")))
        });
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn recovers_after_transient_failure() {
        let mut calls = 0;
        let result = FAST.run("GET", || {
            calls += 1;
            if calls < 2 { Err(Failure::Retryable(anyhow!("timeout"))) } else { Ok(calls) }
        });
        assert_eq!(result.unwrap(), 2);
    }

    #[test]
    fn default_policy() {
        assert_eq!(RetryPolicy::default(), RetryPolicy { max_attempts: 3, backoff: Duration::from_secs(10) });
    }
}
