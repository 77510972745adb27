//! Bounded retry with exponential backoff for aggregator calls

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::GameLaunchConfig;
use crate::errors::GameLaunchError;

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    /// Add up to 25% random jitter to each delay
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(2),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl From<&GameLaunchConfig> for RetryConfig {
    fn from(config: &GameLaunchConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            initial_delay: Duration::from_millis(config.initial_backoff_ms),
            max_delay: Duration::from_millis(config.max_backoff_ms),
            ..Default::default()
        }
    }
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// `config.max_attempts` is reached. The last error is returned.
pub async fn with_retry<T, F, Fut>(
    config: &RetryConfig,
    mut operation: F,
    operation_name: &str,
) -> Result<T, GameLaunchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GameLaunchError>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!(
                        "'{}' succeeded on attempt {}/{}",
                        operation_name, attempt, max_attempts
                    );
                }
                return Ok(result);
            }
            Err(err) if !err.is_retryable() => {
                debug!("'{}' failed with non-retryable error: {}", operation_name, err);
                return Err(err);
            }
            Err(err) if attempt >= max_attempts => {
                warn!(
                    "'{}' failed after {} attempts: {}",
                    operation_name, max_attempts, err
                );
                return Err(err);
            }
            Err(err) => {
                let delay = calculate_delay(config, attempt);
                warn!(
                    "'{}' failed on attempt {}/{}, retrying in {:?}: {}",
                    operation_name, attempt, max_attempts, delay, err
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

fn calculate_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let exponential = config.initial_delay.as_millis() as f64
        * config.backoff_multiplier.powi(attempt.saturating_sub(1) as i32);
    let delay_ms = exponential.min(config.max_delay.as_millis() as f64) as u64;

    let jitter_ms = if config.jitter && delay_ms > 0 {
        fastrand::u64(0..=delay_ms / 4)
    } else {
        0
    };

    Duration::from_millis(delay_ms + jitter_ms)
}
