//! Scripted in-memory page for exercising the automation without a browser.

use super::Driver;
use crate::{ScraperError, ScraperResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet, VecDeque};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    Stale,
    NotInteractable,
}

#[derive(Debug, Clone)]
pub struct MockElement {
    id: String,
    generation: u64,
}

#[derive(Debug, Default)]
struct MockPage {
    title: String,
    url: Option<Url>,
    visible: HashSet<String>,
    reveals: HashMap<String, Vec<String>>,
    failures: HashMap<String, VecDeque<MockFailure>>,
    results_class: String,
    next_button_id: String,
    result_pages: Vec<String>,
    page_index: usize,
    broken_page: Option<usize>,
    // bumped whenever the DOM is replaced; older handles become stale
    generation: u64,
    clicks: Vec<String>,
}

pub struct MockDriver {
    page: Mutex<MockPage>,
}

impl MockDriver {
    pub fn new(title: &str) -> Self {
        Self {
            page: Mutex::new(MockPage {
                title: title.to_string(),
                results_class: "ms-srch-group".to_string(),
                next_button_id: "PageLinkNext".to_string(),
                ..Default::default()
            }),
        }
    }

    pub fn with_visible(self, id: &str) -> Self {
        self.page.lock().visible.insert(id.to_string());
        self
    }

    /// Clicking `id` makes `revealed` appear.
    pub fn with_reveal(self, id: &str, revealed: &[&str]) -> Self {
        self.page.lock().reveals.insert(
            id.to_string(),
            revealed.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    /// The next clicks on `id` fail in the given order.
    pub fn with_click_failures(self, id: &str, failures: Vec<MockFailure>) -> Self {
        self.page
            .lock()
            .failures
            .insert(id.to_string(), failures.into());
        self
    }

    pub fn with_result_pages(self, pages: Vec<String>) -> Self {
        self.page.lock().result_pages = pages;
        self
    }

    /// Reading the results of page `index` fails with a browser error.
    pub fn with_broken_page(self, index: usize) -> Self {
        self.page.lock().broken_page = Some(index);
        self
    }

    pub fn clicks(&self) -> Vec<String> {
        self.page.lock().clicks.clone()
    }

    pub fn page_index(&self) -> usize {
        self.page.lock().page_index
    }
}

impl MockPage {
    fn has_next_page(&self) -> bool {
        self.page_index + 1 < self.result_pages.len()
    }

    fn check_fresh(&self, element: &MockElement) -> ScraperResult<()> {
        if element.generation != self.generation {
            return Err(ScraperError::StaleElement(format!("#{}", element.id)));
        }
        Ok(())
    }
}

#[async_trait]
impl Driver for MockDriver {
    type Element = MockElement;

    async fn goto(&self, url: &Url) -> ScraperResult<()> {
        let mut page = self.page.lock();
        page.url = Some(url.clone());
        page.generation += 1;
        Ok(())
    }

    async fn title(&self) -> ScraperResult<String> {
        Ok(self.page.lock().title.clone())
    }

    async fn current_url(&self) -> ScraperResult<Url> {
        self.page
            .lock()
            .url
            .clone()
            .ok_or_else(|| ScraperError::Browser("no page loaded".to_string()))
    }

    async fn find_by_id(&self, id: &str) -> ScraperResult<MockElement> {
        let page = self.page.lock();
        let present = page.visible.contains(id)
            && (id != page.next_button_id || page.has_next_page());
        if !present {
            return Err(ScraperError::NoSuchElement(format!("#{}", id)));
        }
        Ok(MockElement {
            id: id.to_string(),
            generation: page.generation,
        })
    }

    async fn click(&self, element: &MockElement) -> ScraperResult<()> {
        let mut page = self.page.lock();
        page.check_fresh(element)?;

        if let Some(failure) = page
            .failures
            .get_mut(&element.id)
            .and_then(|queue| queue.pop_front())
        {
            // a failed click still re-renders, like a control swapped out mid-click
            page.generation += 1;
            return Err(match failure {
                MockFailure::Stale => ScraperError::StaleElement(format!("#{}", element.id)),
                MockFailure::NotInteractable => {
                    ScraperError::NotInteractable(format!("#{}", element.id))
                }
            });
        }

        page.clicks.push(element.id.clone());
        if element.id == page.next_button_id {
            page.page_index += 1;
            page.generation += 1;
        } else if let Some(revealed) = page.reveals.get(&element.id).cloned() {
            page.visible.extend(revealed);
        }
        Ok(())
    }

    async fn press_end(&self, element: &MockElement) -> ScraperResult<()> {
        self.page.lock().check_fresh(element)
    }

    async fn is_stale(&self, element: &MockElement) -> ScraperResult<bool> {
        Ok(element.generation != self.page.lock().generation)
    }

    async fn inner_html_by_class(&self, class: &str) -> ScraperResult<String> {
        let page = self.page.lock();
        if class != page.results_class || page.result_pages.is_empty() {
            return Err(ScraperError::NoSuchElement(format!(".{}", class)));
        }
        if page.broken_page == Some(page.page_index) {
            return Err(ScraperError::Browser(format!(
                "results of page {} unavailable",
                page.page_index + 1
            )));
        }
        Ok(page.result_pages[page.page_index].clone())
    }
}
