use anyhow::Context;
use clap::Parser;
use log::{error, info, warn};
use std::num::NonZeroUsize;
use std::process::ExitCode;
use vaskiscraper::cli::{Cli, EXIT_STARTUP_FAILURE};
use vaskiscraper::{ChromiumDriver, Crawler, CsvStorage, ProfileRegistry};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::builder()
        .filter_level(cli.log_level())
        .filter_module("selectors", log::LevelFilter::Warn)
        .filter_module("html5ever", log::LevelFilter::Error)
        .filter_module("chromiumoxide", log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(EXIT_STARTUP_FAILURE)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut registry = ProfileRegistry::builtin();
    if let Some(path) = &cli.config {
        registry = registry
            .load_file(path)
            .with_context(|| format!("loading groups from {}", path.display()))?;
    }

    if cli.list_groups {
        for name in registry.names() {
            println!("{}", name);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let profile = registry
        .get(&cli.group)?
        .with_max_pages(cli.max_pages.map(NonZeroUsize::get));
    let crawler = Crawler::new(profile)?;

    let driver = ChromiumDriver::launch(&cli.chromium_options())
        .await
        .context("launching Chromium")?;
    let outcome = crawler.run(&driver).await;
    if let Err(e) = driver.close().await {
        warn!("Browser shutdown failed: {}", e);
    }

    let storage = CsvStorage::new(cli.output);
    let written = storage
        .write(outcome.records.iter())
        .with_context(|| format!("writing records to {}", storage.target()))?;
    info!("Wrote {} records to {}", written, storage.target());

    crawler.stats().log_summary();

    Ok(ExitCode::from(outcome.exit_code()))
}
