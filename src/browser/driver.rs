use crate::ScraperResult;
use async_trait::async_trait;
use url::Url;

/// The browser operations the search automation needs.
///
/// Element handles can go stale when the page re-renders; operations on a
/// stale handle fail with [`ScraperError::StaleElement`]. Lookups of absent
/// elements fail with [`ScraperError::NoSuchElement`].
///
/// [`ScraperError::StaleElement`]: crate::ScraperError::StaleElement
/// [`ScraperError::NoSuchElement`]: crate::ScraperError::NoSuchElement
#[async_trait]
pub trait Driver: Send + Sync {
    type Element: Send + Sync;

    async fn goto(&self, url: &Url) -> ScraperResult<()>;
    async fn title(&self) -> ScraperResult<String>;
    async fn current_url(&self) -> ScraperResult<Url>;
    async fn find_by_id(&self, id: &str) -> ScraperResult<Self::Element>;
    async fn click(&self, element: &Self::Element) -> ScraperResult<()>;
    async fn press_end(&self, element: &Self::Element) -> ScraperResult<()>;
    async fn is_stale(&self, element: &Self::Element) -> ScraperResult<bool>;
    /// Inner HTML of the first element carrying `class`.
    async fn inner_html_by_class(&self, class: &str) -> ScraperResult<String>;
}
