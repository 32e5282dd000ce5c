pub mod browser;
pub mod cli;
pub mod config;
pub mod core;
pub mod parser;
pub mod records;
pub mod stats;
pub mod storage;

pub use crate::core::{CrawlOutcome, Crawler};
pub use crate::core::{ErrorKind, ScraperError, ScraperResult};
pub use browser::{ChromiumDriver, Driver, MockDriver};
pub use config::{ProfileRegistry, SearchProfile};
pub use parser::Parser;
pub use records::{RecordSet, SpeechRecord};
pub use stats::StatsTracker;
pub use storage::{CsvStorage, OutputTarget};
