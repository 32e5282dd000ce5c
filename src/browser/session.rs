use super::Driver;
use crate::config::{PageButton, SearchProfile};
use crate::core::retry::RetryConfig;
use crate::core::{wait_for, WaitOptions};
use crate::{ScraperError, ScraperResult, StatsTracker};
use log::{debug, info};
use tokio::time::sleep;
use url::Url;

/// Drives one search page through the filter sequence of a
/// [`SearchProfile`] and across its result pages.
pub struct SearchSession<'a, D: Driver> {
    driver: &'a D,
    profile: &'a SearchProfile,
    stats: &'a StatsTracker,
    button_retry: RetryConfig,
    next_retry: RetryConfig,
}

impl<'a, D: Driver> SearchSession<'a, D> {
    pub fn new(driver: &'a D, profile: &'a SearchProfile, stats: &'a StatsTracker) -> Self {
        Self {
            driver,
            profile,
            stats,
            button_retry: profile.button_retry.to_retry_config(),
            next_retry: profile.next_retry.to_retry_config(),
        }
    }

    /// Opens the search page and clicks through every filter button.
    pub async fn init_page(&self) -> ScraperResult<()> {
        let profile = self.profile;
        info!("Opening {} for group '{}'", profile.url, profile.name);
        self.driver.goto(&profile.url).await?;

        let title = self.driver.title().await?;
        if !title.contains(&profile.expected_title) {
            return Err(ScraperError::UnexpectedPage(format!(
                "title '{}' does not contain '{}'",
                title, profile.expected_title
            )));
        }

        for button in &profile.buttons {
            let this = self;
            self.button_retry
                .run(
                    &format!("button #{}", button.id_to_click),
                    Some(self.stats),
                    move || this.press_button(button),
                )
                .await?;

            if !button.delay.is_zero() {
                sleep(button.delay).await;
            }
        }
        info!("Filters applied ({} buttons)", profile.buttons.len());
        Ok(())
    }

    async fn press_button(&self, button: &PageButton) -> ScraperResult<()> {
        debug!("Looking for button #{}", button.id_to_click);
        let element = self
            .wait_for_element(&button.id_to_click, &self.profile.wait)
            .await?;

        debug!("Clicking #{}", button.id_to_click);
        self.driver.click(&element).await?;
        self.stats.record_click();

        if let Some(wait_id) = &button.id_to_wait {
            debug!("Waiting for #{} to appear", wait_id);
            self.wait_for_element(wait_id, &self.profile.wait).await?;
        }
        Ok(())
    }

    /// Moves to the next result page. Returns `false` on the last page, i.e.
    /// when the next-page control does not show up within the pagination
    /// window.
    pub async fn next_page(&self) -> ScraperResult<bool> {
        let this = self;
        self.next_retry
            .run("next page", Some(self.stats), move || this.next_page_once())
            .await
    }

    async fn next_page_once(&self) -> ScraperResult<bool> {
        let pagination = &self.profile.pagination;
        let options = self.profile.wait.with_timeout(pagination.timeout);
        let id = pagination.next_button_id.as_str();

        let next = match self.wait_for_element(id, &options).await {
            Ok(element) => element,
            Err(e) if e.is_timeout() => {
                info!("No #{} control, last result page reached", id);
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        self.driver.press_end(&next).await?;
        if pagination.wait_for_stale {
            self.click_through(id, &next).await?;
        } else {
            self.driver.click(&next).await?;
            self.stats.record_click();
        }
        Ok(true)
    }

    /// Clicks `element` and waits until the page replaces it.
    pub async fn click_through(&self, id: &str, element: &D::Element) -> ScraperResult<()> {
        self.driver.click(element).await?;
        self.stats.record_click();

        let driver = self.driver;
        wait_for(
            &format!("#{} to go stale", id),
            &self.profile.wait,
            Some(self.stats),
            move || async move {
                driver
                    .is_stale(element)
                    .await
                    .map(|stale| stale.then_some(()))
            },
        )
        .await
    }

    /// Inner HTML of the results container, and the URL links in it are
    /// relative to.
    pub async fn results_html(&self) -> ScraperResult<(String, Url)> {
        let driver = self.driver;
        let class = self.profile.selectors.container_class.as_str();
        let html = wait_for(
            &format!("results .{}", class),
            &self.profile.wait,
            Some(self.stats),
            move || async move { driver.inner_html_by_class(class).await.map(Some) },
        )
        .await?;
        let url = self.driver.current_url().await?;
        Ok((html, url))
    }

    async fn wait_for_element(&self, id: &str, options: &WaitOptions) -> ScraperResult<D::Element> {
        let driver = self.driver;
        wait_for(
            &format!("element #{}", id),
            options,
            Some(self.stats),
            move || async move { driver.find_by_id(id).await.map(Some) },
        )
        .await
    }
}
