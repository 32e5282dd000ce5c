use crate::core::retry::{
    BackoffPolicy, CategoryConfig, ContentRetryCondition, RetryCategory, RetryCondition,
    RetryConfig, RetryState,
};
use crate::core::ErrorKind;
use crate::{ScraperError, ScraperResult, StatsTracker};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn stale() -> ScraperError {
    ScraperError::StaleElement("#Asiakirjatyyppinimi_Link_Puheenvuoro".to_string())
}

#[tokio::test]
async fn test_stale_element_retry() {
    let counter = AtomicUsize::new(0);
    let calls = &counter;
    let stats = StatsTracker::new();
    let config = RetryConfig::transient(5, Duration::from_millis(10));

    let result = config
        .run("click", Some(&stats), move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(stale())
            } else {
                Ok("clicked")
            }
        })
        .await
        .unwrap();

    assert_eq!(result, "clicked");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    let snapshot = stats.get_stats();
    assert_eq!(snapshot.retry_count, 2);
    assert_eq!(snapshot.retry_reasons.get("StaleElement"), Some(&2));
}

#[tokio::test]
async fn test_total_tries_shared_between_categories() {
    let counter = AtomicUsize::new(0);
    let calls = &counter;
    let config = RetryConfig::transient(3, Duration::from_millis(5));

    let result: ScraperResult<()> = config
        .run("click", None, move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) % 2 == 0 {
                Err(stale())
            } else {
                Err(ScraperError::NotInteractable("#hidden".to_string()))
            }
        })
        .await;

    // three attempts in total, even though each category alone allows two retries
    assert!(matches!(result, Err(ScraperError::StaleElement(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_non_matching_error_is_not_retried() {
    let counter = AtomicUsize::new(0);
    let calls = &counter;
    let config = RetryConfig::transient(5, Duration::from_millis(5));

    let result: ScraperResult<()> = config
        .run("title check", None, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ScraperError::UnexpectedPage("Not found".to_string()))
        })
        .await;

    assert!(matches!(result, Err(ScraperError::UnexpectedPage(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_max_retries_exceeded() {
    let counter = AtomicUsize::new(0);
    let calls = &counter;
    let config = RetryConfig::transient(3, Duration::from_millis(5));

    let result: ScraperResult<()> = config
        .run("next page", None, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(stale())
        })
        .await;

    assert!(matches!(result, Err(ScraperError::StaleElement(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_exponential_backoff_waits() {
    let counter = AtomicUsize::new(0);
    let calls = &counter;
    let mut config = RetryConfig::default();
    config.categories.insert(
        RetryCategory::StaleElement,
        CategoryConfig {
            max_retries: 3,
            initial_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(1),
            backoff_policy: BackoffPolicy::Exponential { factor: 2.0 },
            conditions: vec![RetryCondition::Error(ErrorKind::StaleElement)],
        },
    );

    let start = std::time::Instant::now();
    config
        .run("click", None, move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(stale())
            } else {
                Ok(())
            }
        })
        .await
        .unwrap();

    // 50ms + 100ms
    assert!(start.elapsed() >= Duration::from_millis(150));
}

#[test]
fn test_message_conditions() {
    let mut config = RetryConfig::default();
    config.categories.insert(
        RetryCategory::Custom("BoxModel".to_string()),
        CategoryConfig {
            max_retries: 1,
            initial_delay: Duration::from_millis(10),
            conditions: vec![RetryCondition::Message(ContentRetryCondition {
                pattern: "could not compute box model".to_string(),
                is_regex: false,
            })],
            ..Default::default()
        },
    );
    config.categories.insert(
        RetryCategory::Custom("Context".to_string()),
        CategoryConfig {
            max_retries: 1,
            initial_delay: Duration::from_millis(20),
            conditions: vec![RetryCondition::Message(ContentRetryCondition {
                pattern: r"context with (specified|given) id".to_string(),
                is_regex: true,
            })],
            ..Default::default()
        },
    );

    let mut state = RetryState::new();
    let box_model = ScraperError::Browser("Could not compute box model.".to_string());
    assert_eq!(
        config.should_retry(&mut state, &box_model),
        Some((
            RetryCategory::Custom("BoxModel".to_string()),
            Duration::from_millis(10)
        ))
    );
    assert_eq!(config.should_retry(&mut state, &box_model), None);

    let context = ScraperError::Browser("Cannot find context with specified id".to_string());
    assert_eq!(
        config.should_retry(&mut state, &context),
        Some((
            RetryCategory::Custom("Context".to_string()),
            Duration::from_millis(20)
        ))
    );
    assert_eq!(state.total_retries, 2);
}

fn assert_close(actual: Duration, expected_ms: u64) {
    let expected = Duration::from_millis(expected_ms);
    let diff = if actual > expected {
        actual - expected
    } else {
        expected - actual
    };
    assert!(diff < Duration::from_micros(100), "{:?} != {:?}", actual, expected);
}

#[test]
fn test_delay_calculation() {
    let exponential = CategoryConfig {
        initial_delay: Duration::from_millis(100),
        max_delay: Duration::from_millis(500),
        backoff_policy: BackoffPolicy::Exponential { factor: 2.0 },
        ..Default::default()
    };
    assert_eq!(exponential.calculate_delay(0), Duration::from_millis(100));
    assert_close(exponential.calculate_delay(1), 200);
    assert_close(exponential.calculate_delay(2), 400);
    assert_eq!(exponential.calculate_delay(3), Duration::from_millis(500));

    let linear = CategoryConfig {
        backoff_policy: BackoffPolicy::Linear,
        ..exponential.clone()
    };
    assert_eq!(linear.calculate_delay(1), Duration::from_millis(200));
    assert_eq!(linear.calculate_delay(2), Duration::from_millis(300));

    let constant = CategoryConfig {
        backoff_policy: BackoffPolicy::Constant,
        ..exponential
    };
    assert_eq!(constant.calculate_delay(4), Duration::from_millis(100));
}
