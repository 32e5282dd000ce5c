use crate::{ScraperError, ScraperResult, StatsTracker};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Polling window for [`wait_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitOptions {
    #[serde(with = "crate::config::duration_ms")]
    pub timeout: Duration,
    #[serde(with = "crate::config::duration_ms")]
    pub poll_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(100),
        }
    }
}

impl WaitOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Polls `probe` until it yields a value or the window runs out.
///
/// `Ok(None)` and [`ScraperError::NoSuchElement`] both mean "not yet". Any
/// other error is returned as soon as it is seen. The probe sleeps one poll
/// interval after every attempt, including a failed one.
pub async fn wait_for<T, F, Fut>(
    condition: &str,
    options: &WaitOptions,
    stats: Option<&StatsTracker>,
    mut probe: F,
) -> ScraperResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ScraperResult<Option<T>>>,
{
    let start = Instant::now();
    let deadline = start + options.timeout;

    while Instant::now() < deadline {
        match probe().await {
            Ok(Some(value)) => {
                trace!("Condition '{}' met after {:?}", condition, start.elapsed());
                return Ok(value);
            }
            Ok(None) => trace!("Condition '{}' not met yet", condition),
            Err(ScraperError::NoSuchElement(what)) => {
                trace!("Condition '{}': {} not present yet", condition, what)
            }
            Err(e) => return Err(e),
        }
        sleep(options.poll_interval).await;
    }

    debug!("Gave up waiting for '{}' after {:?}", condition, options.timeout);
    if let Some(stats) = stats {
        stats.record_timeout();
    }
    Err(ScraperError::Timeout {
        condition: condition.to_string(),
        waited: options.timeout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast() -> WaitOptions {
        WaitOptions {
            timeout: Duration::from_millis(200),
            poll_interval: Duration::from_millis(10),
        }
    }

    #[tokio::test]
    async fn test_returns_first_truthy_value() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let value = wait_for("third call", &fast(), None, move || async move {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            Ok(if n >= 2 { Some(n) } else { None })
        })
        .await
        .unwrap();

        assert_eq!(value, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_tolerates_missing_element() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let value = wait_for("element appears", &fast(), None, move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(ScraperError::NoSuchElement("#late".into()))
            } else {
                Ok(Some("found"))
            }
        })
        .await
        .unwrap();

        assert_eq!(value, "found");
    }

    #[tokio::test]
    async fn test_other_errors_propagate_immediately() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let result: ScraperResult<()> = wait_for("stale", &fast(), None, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ScraperError::StaleElement("#button".into()))
        })
        .await;

        assert!(matches!(result, Err(ScraperError::StaleElement(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_times_out_and_records_stat() {
        let stats = StatsTracker::new();
        let start = std::time::Instant::now();
        let result: ScraperResult<()> =
            wait_for("never", &fast(), Some(&stats), || async { Ok(None) }).await;

        match result {
            Err(ScraperError::Timeout { condition, waited }) => {
                assert_eq!(condition, "never");
                assert_eq!(waited, Duration::from_millis(200));
            }
            other => panic!("expected timeout, got {:?}", other),
        }
        assert!(start.elapsed() >= Duration::from_millis(200));
        assert_eq!(stats.get_stats().wait_timeouts, 1);
    }
}
