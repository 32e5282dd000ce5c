use crate::core::retry::{
    BackoffPolicy, CategoryConfig, ContentRetryCondition, RetryCategory, RetryCondition,
    RetryConfig,
};
use crate::core::WaitOptions;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use super::duration_ms;

pub const VASKI_SEARCH_URL: &str = "https://www.eduskunta.fi/FI/search/Sivut/Vaskiresults.aspx";

/// A filter control to click, and the element whose appearance confirms the
/// click took effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageButton {
    pub id_to_click: String,
    #[serde(default)]
    pub id_to_wait: Option<String>,
    /// Pause after the button has been handled.
    #[serde(default, with = "duration_ms")]
    pub delay: Duration,
}

impl PageButton {
    pub fn new(id_to_click: impl Into<String>, id_to_wait: impl Into<String>, delay_ms: u64) -> Self {
        Self {
            id_to_click: id_to_click.into(),
            id_to_wait: Some(id_to_wait.into()),
            delay: Duration::from_millis(delay_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub next_button_id: String,
    /// Pause after each page change before the next scrape.
    #[serde(with = "duration_ms")]
    pub settle_delay: Duration,
    /// How long to look for the next-page control before treating the
    /// current page as the last one.
    #[serde(with = "duration_ms")]
    pub timeout: Duration,
    /// Wait for the clicked control to detach instead of relying on
    /// `settle_delay` alone.
    pub wait_for_stale: bool,
    pub max_pages: Option<usize>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            next_button_id: "PageLinkNext".to_string(),
            settle_delay: Duration::from_millis(500),
            timeout: Duration::from_secs(10),
            wait_for_stale: false,
            max_pages: None,
        }
    }
}

/// Where the hits live in the results markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultSelectors {
    /// Class of the element whose inner HTML holds all hits of a page.
    pub container_class: String,
    pub item: String,
    pub title: String,
    pub speaker: String,
    pub intro: String,
    pub date: String,
}

impl Default for ResultSelectors {
    fn default() -> Self {
        Self {
            container_class: "ms-srch-group".to_string(),
            item: r#"div[name="Item"]"#.to_string(),
            title: "div.ms-srch-item-title a".to_string(),
            speaker: "div.edk-srch-tmpl-puhuja".to_string(),
            intro: "div.edk-srch-tmpl-puheenvuoro".to_string(),
            date: "div.edk-srch-tmpl-pvm".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Attempts in total, the first one included.
    pub tries: usize,
    #[serde(with = "duration_ms")]
    pub delay: Duration,
    /// Extra browser error messages worth retrying.
    #[serde(default)]
    pub messages: Vec<ContentRetryCondition>,
}

impl RetrySettings {
    pub fn new(tries: usize, delay_ms: u64) -> Self {
        Self {
            tries,
            delay: Duration::from_millis(delay_ms),
            messages: Vec::new(),
        }
    }

    pub fn to_retry_config(&self) -> RetryConfig {
        let mut config = RetryConfig::transient(self.tries, self.delay);
        if !self.messages.is_empty() {
            config.categories.insert(
                RetryCategory::Custom("BrowserMessage".to_string()),
                CategoryConfig {
                    max_retries: self.tries.saturating_sub(1),
                    initial_delay: self.delay,
                    max_delay: self.delay,
                    backoff_policy: BackoffPolicy::Constant,
                    conditions: self
                        .messages
                        .iter()
                        .cloned()
                        .map(RetryCondition::Message)
                        .collect(),
                },
            );
        }
        config
    }
}

/// A named configuration group: everything needed to reach one filtered
/// result list and scrape it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchProfile {
    #[serde(skip)]
    pub name: String,
    pub url: Url,
    /// Substring the document title must contain once the search page loads.
    pub expected_title: String,
    pub buttons: Vec<PageButton>,
    pub pagination: PaginationConfig,
    pub selectors: ResultSelectors,
    pub wait: WaitOptions,
    pub button_retry: RetrySettings,
    pub next_retry: RetrySettings,
}

impl Default for SearchProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            url: Url::parse(VASKI_SEARCH_URL).expect("static search url is valid"),
            expected_title: "Haku:".to_string(),
            buttons: Vec::new(),
            pagination: PaginationConfig::default(),
            selectors: ResultSelectors::default(),
            wait: WaitOptions::default(),
            button_retry: RetrySettings::new(5, 200),
            next_retry: RetrySettings::new(3, 1000),
        }
    }
}

impl SearchProfile {
    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        if max_pages.is_some() {
            self.pagination.max_pages = max_pages;
        }
        self
    }
}
