use crate::core::ErrorKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRetryCondition {
    pub pattern: String,
    #[serde(default)]
    pub is_regex: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryCondition {
    Error(ErrorKind),
    Message(ContentRetryCondition),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffPolicy {
    Constant,
    Linear,
    Exponential { factor: f32 },
}

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryCategory {
    StaleElement,    // element detached by a re-render
    NotInteractable, // hidden, covered or still animating
    Custom(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryConfig {
    pub max_retries: usize,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_policy: BackoffPolicy,
    pub conditions: Vec<RetryCondition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryState {
    pub counts: HashMap<RetryCategory, usize>,
    pub total_retries: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RetryConfig {
    pub categories: HashMap<RetryCategory, CategoryConfig>,
    /// Cap on retries summed over all categories.
    pub max_total_retries: Option<usize>,
}
