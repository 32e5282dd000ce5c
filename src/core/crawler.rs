use crate::browser::{Driver, SearchSession};
use crate::config::SearchProfile;
use crate::parser::{Parser, ResultListParser};
use crate::records::RecordSet;
use crate::stats::StatsTracker;
use log::{debug, error, info};
use tokio::time::sleep;

use super::{ScraperError, ScraperResult};

/// What a run produced. `error` is set when the run stopped early; the
/// records gathered until then are kept.
#[derive(Debug)]
pub struct CrawlOutcome {
    pub records: RecordSet,
    pub pages: usize,
    pub error: Option<ScraperError>,
}

impl CrawlOutcome {
    /// Process exit status for the run: 0 when every page was crawled, 1
    /// when it stopped on an error and only partial records were gathered.
    pub fn exit_code(&self) -> u8 {
        if self.error.is_some() {
            1
        } else {
            0
        }
    }
}

pub struct Crawler<P: Parser = ResultListParser> {
    profile: SearchProfile,
    parser: P,
    stats: StatsTracker,
}

impl Crawler {
    pub fn new(profile: SearchProfile) -> ScraperResult<Self> {
        let parser = ResultListParser::new(&profile.selectors)?;
        Ok(Self::with_parser(profile, parser))
    }
}

impl<P: Parser> Crawler<P> {
    pub fn with_parser(profile: SearchProfile, parser: P) -> Self {
        info!("Initializing crawler for group '{}'", profile.name);
        Self {
            profile,
            parser,
            stats: StatsTracker::new(),
        }
    }

    pub fn stats(&self) -> &StatsTracker {
        &self.stats
    }

    pub async fn run<D: Driver>(&self, driver: &D) -> CrawlOutcome {
        let mut records = RecordSet::new();
        let mut pages = 0;

        let result = self.crawl(driver, &mut records, &mut pages).await;
        self.stats.finish();

        let error = match result {
            Ok(()) => None,
            Err(e) => {
                error!("Crawl stopped after {} pages: {}", pages, e);
                Some(e)
            }
        };

        info!(
            "Group '{}' finished: {} records from {} pages",
            self.profile.name,
            records.len(),
            pages
        );
        CrawlOutcome {
            records,
            pages,
            error,
        }
    }

    async fn crawl<D: Driver>(
        &self,
        driver: &D,
        records: &mut RecordSet,
        pages: &mut usize,
    ) -> ScraperResult<()> {
        let session = SearchSession::new(driver, &self.profile, &self.stats);
        session.init_page().await?;

        loop {
            let (html, base_url) = session.results_html().await?;
            let outcome = self.parser.parse(&html, &base_url)?;
            let found = outcome.records.len();
            let duplicates = records.extend(outcome.records);
            *pages += 1;
            self.stats.record_page(found, duplicates, outcome.skipped);
            info!(
                "Gathered talks: {} (page {}, {} new, {} duplicates)",
                records.len(),
                pages,
                found - duplicates,
                duplicates
            );

            if let Some(max_pages) = self.profile.pagination.max_pages {
                if *pages >= max_pages {
                    info!("Reached page limit {}", max_pages);
                    return Ok(());
                }
            }

            if !session.next_page().await? {
                return Ok(());
            }
            debug!(
                "Waiting {:?} for page {} to settle",
                self.profile.pagination.settle_delay,
                *pages + 1
            );
            sleep(self.profile.pagination.settle_delay).await;
        }
    }
}
