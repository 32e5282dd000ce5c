use crate::{ScraperResult, SpeechRecord};
use url::Url;

/// Records found on one result page, plus the number of hits that could not
/// be turned into a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    pub records: Vec<SpeechRecord>,
    pub skipped: usize,
}

pub trait Parser: Send + Sync {
    fn parse(&self, html: &str, base_url: &Url) -> ScraperResult<ParseOutcome>;
}
