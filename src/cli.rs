use crate::browser::ChromiumOptions;
use crate::config::DEFAULT_GROUP;
use crate::storage::OutputTarget;
use clap::{ArgAction, Parser};
use log::LevelFilter;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Exit status for configuration and startup failures.
pub const EXIT_STARTUP_FAILURE: u8 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "vaskiscraper",
    version,
    about = "Scrape parliamentary speech search results into CSV"
)]
pub struct Cli {
    /// Configuration group to run
    #[arg(short, long, default_value = DEFAULT_GROUP)]
    pub group: String,

    /// CSV destination; `-` writes to stdout
    #[arg(short, long, default_value = "test_runs/puheet.csv")]
    pub output: OutputTarget,

    /// JSON file with extra configuration groups
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the available groups and exit
    #[arg(long)]
    pub list_groups: bool,

    /// Stop after this many result pages
    #[arg(long, value_name = "N")]
    pub max_pages: Option<NonZeroUsize>,

    /// Show the browser window
    #[arg(long)]
    pub headful: bool,

    /// Chromium executable to launch
    #[arg(long, value_name = "PATH")]
    pub chrome: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    pub fn chromium_options(&self) -> ChromiumOptions {
        ChromiumOptions {
            headless: !self.headful,
            executable: self.chrome.clone(),
        }
    }
}
