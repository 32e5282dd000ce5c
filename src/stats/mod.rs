use chrono::{DateTime, Utc};
use log::info;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct ScrapingStats {
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub pages_scraped: usize,
    pub records_scraped: usize,
    pub duplicates_dropped: usize,
    pub skipped_items: usize,
    pub clicks: usize,
    pub retry_count: usize,
    pub retry_reasons: HashMap<String, usize>,
    pub wait_timeouts: usize,
}

#[derive(Debug, Clone)]
pub struct StatsTracker {
    stats: Arc<RwLock<ScrapingStats>>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self {
            stats: Arc::new(RwLock::new(ScrapingStats {
                start_time: Utc::now(),
                end_time: None,
                pages_scraped: 0,
                records_scraped: 0,
                duplicates_dropped: 0,
                skipped_items: 0,
                clicks: 0,
                retry_count: 0,
                retry_reasons: HashMap::new(),
                wait_timeouts: 0,
            })),
        }
    }

    pub fn record_page(&self, records: usize, duplicates: usize, skipped: usize) {
        let mut stats = self.stats.write();
        stats.pages_scraped += 1;
        stats.records_scraped += records;
        stats.duplicates_dropped += duplicates;
        stats.skipped_items += skipped;
    }

    pub fn record_click(&self) {
        self.stats.write().clicks += 1;
    }

    pub fn record_retry(&self, category: String) {
        let mut stats = self.stats.write();
        stats.retry_count += 1;
        *stats.retry_reasons.entry(category).or_insert(0) += 1;
    }

    pub fn record_timeout(&self) {
        self.stats.write().wait_timeouts += 1;
    }

    pub fn finish(&self) {
        self.stats.write().end_time = Some(Utc::now());
    }

    pub fn get_stats(&self) -> ScrapingStats {
        self.stats.read().clone()
    }

    pub fn log_summary(&self) {
        let stats = self.stats.read();
        let duration = stats
            .end_time
            .unwrap_or_else(Utc::now)
            .signed_duration_since(stats.start_time);

        info!("Scraping statistics:");
        info!("  Duration: {} seconds", duration.num_seconds());
        info!("  Pages scraped: {}", stats.pages_scraped);
        info!("  Records scraped: {}", stats.records_scraped);
        info!("  Duplicates dropped: {}", stats.duplicates_dropped);
        info!("  Items skipped: {}", stats.skipped_items);
        info!("  Clicks: {}", stats.clicks);
        info!("  Retry count: {}", stats.retry_count);
        info!("  Wait timeouts: {}", stats.wait_timeouts);

        for (reason, count) in &stats.retry_reasons {
            info!("  Retries for {}: {}", reason, count);
        }
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_are_shared_between_clones() {
        let tracker = StatsTracker::new();
        let clone = tracker.clone();

        clone.record_page(10, 2, 1);
        clone.record_page(5, 0, 0);
        tracker.record_retry("StaleElement".to_string());
        tracker.record_retry("StaleElement".to_string());
        tracker.record_timeout();
        tracker.record_click();
        tracker.finish();

        let stats = tracker.get_stats();
        assert_eq!(stats.pages_scraped, 2);
        assert_eq!(stats.records_scraped, 15);
        assert_eq!(stats.duplicates_dropped, 2);
        assert_eq!(stats.skipped_items, 1);
        assert_eq!(stats.clicks, 1);
        assert_eq!(stats.retry_count, 2);
        assert_eq!(stats.retry_reasons.get("StaleElement"), Some(&2));
        assert_eq!(stats.wait_timeouts, 1);
        assert!(stats.end_time.is_some());
    }
}
