use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("No such element: {0}")]
    NoSuchElement(String),

    #[error("Stale element reference: {0}")]
    StaleElement(String),

    #[error("Element not interactable: {0}")]
    NotInteractable(String),

    #[error("Timeout waiting for {condition} after {waited:?}")]
    Timeout { condition: String, waited: Duration },

    #[error("Unexpected page: {0}")]
    UnexpectedPage(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),
}

/// Fieldless classification of a [`ScraperError`], used by retry conditions
/// and configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Browser,
    NoSuchElement,
    StaleElement,
    NotInteractable,
    Timeout,
    UnexpectedPage,
    Extraction,
    Config,
    Io,
}

impl ScraperError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScraperError::Browser(_) => ErrorKind::Browser,
            ScraperError::NoSuchElement(_) => ErrorKind::NoSuchElement,
            ScraperError::StaleElement(_) => ErrorKind::StaleElement,
            ScraperError::NotInteractable(_) => ErrorKind::NotInteractable,
            ScraperError::Timeout { .. } => ErrorKind::Timeout,
            ScraperError::UnexpectedPage(_) => ErrorKind::UnexpectedPage,
            ScraperError::Extraction(_) => ErrorKind::Extraction,
            ScraperError::Config(_) | ScraperError::Url(_) | ScraperError::Json(_) => {
                ErrorKind::Config
            }
            ScraperError::Io(_) | ScraperError::Csv(_) => ErrorKind::Io,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ScraperError::Timeout { .. })
    }
}

pub type ScraperResult<T> = Result<T, ScraperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            ScraperError::StaleElement("x".into()).kind(),
            ErrorKind::StaleElement
        );
        assert_eq!(
            ScraperError::Timeout {
                condition: "x".into(),
                waited: Duration::from_secs(1)
            }
            .kind(),
            ErrorKind::Timeout
        );
        let url_err = url::Url::parse("not a url").unwrap_err();
        assert_eq!(ScraperError::from(url_err).kind(), ErrorKind::Config);
    }

    #[test]
    fn test_timeout_message_names_condition() {
        let err = ScraperError::Timeout {
            condition: "element #PageLinkNext".into(),
            waited: Duration::from_millis(250),
        };
        assert!(err.is_timeout());
        assert_eq!(
            err.to_string(),
            "Timeout waiting for element #PageLinkNext after 250ms"
        );
    }
}
