//! Chromium-backed [`Driver`] using chromiumoxide.

use super::Driver;
use crate::{ScraperError, ScraperResult};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::error::CdpError;
use chromiumoxide::page::Page;
use futures::StreamExt;
use log::{debug, info};
use std::path::PathBuf;
use tokio::task::JoinHandle;
use url::Url;

const STALE_MARKERS: &[&str] = &[
    "could not find object with given id",
    "cannot find context with specified id",
    "no node with given id",
    "node is detached",
    "node with given id does not belong to the document",
];

const NOT_INTERACTABLE_MARKERS: &[&str] = &[
    "could not compute box model",
    "node is either not visible",
    "not clickable",
    "element is not visible",
];

#[derive(Debug, Clone, Default)]
pub struct ChromiumOptions {
    pub headless: bool,
    pub executable: Option<PathBuf>,
}

fn shutdown_result(closed: ScraperResult<()>, exited: std::io::Result<()>) -> ScraperResult<()> {
    closed?;
    exited?;
    Ok(())
}

/// Attribute selector matching `id` exactly, quoted as a CSS string.
fn id_selector(id: &str) -> String {
    format!(r#"[id="{}"]"#, id.replace('\\', "\\\\").replace('"', "\\\""))
}

fn classify(target: &str, error: CdpError) -> ScraperError {
    classify_message(target, error.to_string())
}

/// Sorts a CDP failure message into the error kinds the retry layer
/// understands.
fn classify_message(target: &str, message: String) -> ScraperError {
    let lower = message.to_lowercase();
    if STALE_MARKERS.iter().any(|m| lower.contains(m)) {
        ScraperError::StaleElement(format!("{}: {}", target, message))
    } else if NOT_INTERACTABLE_MARKERS.iter().any(|m| lower.contains(m)) {
        ScraperError::NotInteractable(format!("{}: {}", target, message))
    } else {
        ScraperError::Browser(format!("{}: {}", target, message))
    }
}

pub struct ChromiumElement {
    id: String,
    inner: Element,
}

pub struct ChromiumDriver {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl ChromiumDriver {
    pub async fn launch(options: &ChromiumOptions) -> ScraperResult<Self> {
        let mut builder = BrowserConfig::builder()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions");
        if !options.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &options.executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder
            .build()
            .map_err(|e| ScraperError::Browser(format!("invalid browser config: {}", e)))?;

        info!(
            "Launching Chromium ({})",
            if options.headless { "headless" } else { "headful" }
        );
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| classify("launch", e))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP handler event error: {}", e);
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| classify("new page", e))?;

        Ok(Self {
            browser,
            page,
            handler,
        })
    }

    /// Closes the browser and waits for the process to exit. The handler
    /// task is stopped either way; the first failure is returned.
    pub async fn close(mut self) -> ScraperResult<()> {
        let closed = self
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| classify("close", e));
        let exited = self.browser.wait().await.map(|_| ());
        self.handler.abort();
        shutdown_result(closed, exited)
    }
}

#[async_trait]
impl Driver for ChromiumDriver {
    type Element = ChromiumElement;

    async fn goto(&self, url: &Url) -> ScraperResult<()> {
        debug!("Navigating to {}", url);
        self.page
            .goto(url.as_str())
            .await
            .map_err(|e| classify(url.as_str(), e))?;
        Ok(())
    }

    async fn title(&self) -> ScraperResult<String> {
        Ok(self
            .page
            .get_title()
            .await
            .map_err(|e| classify("title", e))?
            .unwrap_or_default())
    }

    async fn current_url(&self) -> ScraperResult<Url> {
        let url = self
            .page
            .url()
            .await
            .map_err(|e| classify("url", e))?
            .unwrap_or_default();
        Ok(Url::parse(&url)?)
    }

    async fn find_by_id(&self, id: &str) -> ScraperResult<ChromiumElement> {
        let mut found = self
            .page
            .find_elements(id_selector(id))
            .await
            .map_err(|e| classify(id, e))?;
        if found.is_empty() {
            return Err(ScraperError::NoSuchElement(format!("#{}", id)));
        }
        Ok(ChromiumElement {
            id: id.to_string(),
            inner: found.swap_remove(0),
        })
    }

    async fn click(&self, element: &ChromiumElement) -> ScraperResult<()> {
        if self.is_stale(element).await? {
            return Err(ScraperError::StaleElement(format!("#{}", element.id)));
        }
        element
            .inner
            .click()
            .await
            .map_err(|e| classify(&element.id, e))?;
        Ok(())
    }

    async fn press_end(&self, element: &ChromiumElement) -> ScraperResult<()> {
        element
            .inner
            .press_key("End")
            .await
            .map_err(|e| classify(&element.id, e))?;
        Ok(())
    }

    async fn is_stale(&self, element: &ChromiumElement) -> ScraperResult<bool> {
        match element
            .inner
            .call_js_fn("function() { return this.isConnected; }", false)
            .await
        {
            Ok(ret) => Ok(!matches!(
                ret.result.value,
                Some(serde_json::Value::Bool(true))
            )),
            Err(e) => match classify(&element.id, e) {
                ScraperError::StaleElement(_) => Ok(true),
                other => Err(other),
            },
        }
    }

    async fn inner_html_by_class(&self, class: &str) -> ScraperResult<String> {
        let selector = format!(".{}", class);
        let found = self
            .page
            .find_elements(selector)
            .await
            .map_err(|e| classify(class, e))?;
        let element = found
            .first()
            .ok_or_else(|| ScraperError::NoSuchElement(format!(".{}", class)))?;
        Ok(element
            .inner_html()
            .await
            .map_err(|e| classify(class, e))?
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_cdp_messages() {
        let stale = classify_message(
            "PageLinkNext",
            "Could not find object with given id".to_string(),
        );
        assert!(matches!(stale, ScraperError::StaleElement(_)));

        let hidden = classify_message("PageLinkNext", "Could not compute box model.".to_string());
        assert!(matches!(hidden, ScraperError::NotInteractable(_)));

        let other = classify_message("PageLinkNext", "Target closed".to_string());
        assert!(matches!(other, ScraperError::Browser(_)));
    }

    #[test]
    fn test_id_selector_escapes_quotes_and_backslashes() {
        assert_eq!(id_selector("PageLinkNext"), r#"[id="PageLinkNext"]"#);
        assert_eq!(id_selector(r#"a"b"#), r#"[id="a\"b"]"#);
        assert_eq!(id_selector(r"a\b"), r#"[id="a\\b"]"#);
        assert_eq!(id_selector(r#"a\""#), r#"[id="a\\\""]"#);
    }

    #[test]
    fn test_shutdown_reports_close_and_exit_failures() {
        assert!(shutdown_result(Ok(()), Ok(())).is_ok());

        let exited = std::io::Error::other("chromium did not exit");
        assert!(matches!(
            shutdown_result(Ok(()), Err(exited)),
            Err(ScraperError::Io(_))
        ));

        let closed = Err(ScraperError::Browser("close: Target closed".to_string()));
        assert!(matches!(
            shutdown_result(closed, Ok(())),
            Err(ScraperError::Browser(_))
        ));
    }
}
