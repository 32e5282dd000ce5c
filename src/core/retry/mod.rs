mod r#impl;
mod types;
mod utils;

pub use types::{
    BackoffPolicy, CategoryConfig, ContentRetryCondition, RetryCategory, RetryCondition,
    RetryConfig, RetryState,
};

#[cfg(test)]
mod tests;
