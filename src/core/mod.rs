mod crawler;
mod errors;
pub mod retry;
mod wait;

pub use crawler::{CrawlOutcome, Crawler};
pub use errors::{ErrorKind, ScraperError, ScraperResult};
pub use wait::{wait_for, WaitOptions};
