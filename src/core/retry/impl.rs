use super::types::*;
use super::utils::*;
use crate::core::ErrorKind;
use crate::{ScraperError, ScraperResult, StatsTracker};
use log::{debug, warn};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            backoff_policy: BackoffPolicy::Exponential { factor: 2.0 },
            conditions: Vec::new(),
        }
    }
}

impl RetryState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RetryConfig {
    /// Retries stale and not-interactable errors with a constant delay,
    /// allowing `tries` attempts in total.
    pub fn transient(tries: usize, delay: Duration) -> Self {
        let retries = tries.saturating_sub(1);
        let category = |kind| CategoryConfig {
            max_retries: retries,
            initial_delay: delay,
            max_delay: delay,
            backoff_policy: BackoffPolicy::Constant,
            conditions: vec![RetryCondition::Error(kind)],
        };

        let mut config = RetryConfig {
            max_total_retries: Some(retries),
            ..Default::default()
        };
        config.categories.insert(
            RetryCategory::StaleElement,
            category(ErrorKind::StaleElement),
        );
        config.categories.insert(
            RetryCategory::NotInteractable,
            category(ErrorKind::NotInteractable),
        );
        config
    }

    /// Picks the category that wants to retry `error` and bumps its counter.
    pub fn should_retry(
        &self,
        state: &mut RetryState,
        error: &ScraperError,
    ) -> Option<(RetryCategory, Duration)> {
        if let Some(max_total) = self.max_total_retries {
            if state.total_retries >= max_total {
                return None;
            }
        }

        for (category, config) in &self.categories {
            let current_retries = state.counts.get(category).copied().unwrap_or(0);
            if current_retries >= config.max_retries {
                continue;
            }

            if config
                .conditions
                .iter()
                .any(|condition| retry_condition_should_apply(condition, error))
            {
                state.counts.insert(category.clone(), current_retries + 1);
                state.total_retries += 1;
                let delay = calculate_delay(config, current_retries);
                return Some((category.clone(), delay));
            }
        }
        None
    }

    /// Runs `op` until it succeeds or the error is no longer retryable.
    pub async fn run<T, F, Fut>(
        &self,
        operation: &str,
        stats: Option<&StatsTracker>,
        mut op: F,
    ) -> ScraperResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ScraperResult<T>>,
    {
        let mut state = RetryState::new();

        loop {
            let error = match op().await {
                Ok(value) => {
                    if state.total_retries > 0 {
                        debug!(
                            "{} succeeded after {} retries ({:?})",
                            operation, state.total_retries, state.counts
                        );
                    }
                    return Ok(value);
                }
                Err(e) => e,
            };

            let Some((category, delay)) = self.should_retry(&mut state, &error) else {
                return Err(error);
            };

            if let Some(stats) = stats {
                stats.record_retry(format!("{:?}", category));
            }
            warn!(
                "Retrying {} after error: {} (category={:?}, attempt={}/{}, delay={:?})",
                operation,
                error,
                category,
                state.counts.get(&category).copied().unwrap_or(0),
                self.categories
                    .get(&category)
                    .map(|c| c.max_retries)
                    .unwrap_or(0),
                delay
            );
            sleep(delay).await;
        }
    }
}

impl CategoryConfig {
    pub fn calculate_delay(&self, attempt: usize) -> Duration {
        calculate_delay(self, attempt)
    }
}
