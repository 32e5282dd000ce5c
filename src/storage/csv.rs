use super::OutputTarget;
use crate::{ScraperResult, SpeechRecord};
use log::debug;
use std::fs::{self, File};
use std::io::{self, Write};

/// Writes records as CSV with the fixed `title,date,link,speaker,intro`
/// header.
#[derive(Debug, Clone)]
pub struct CsvStorage {
    target: OutputTarget,
}

impl CsvStorage {
    pub fn new(target: OutputTarget) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &OutputTarget {
        &self.target
    }

    /// Returns the number of rows written, header excluded.
    pub fn write<'a, I>(&self, records: I) -> ScraperResult<usize>
    where
        I: IntoIterator<Item = &'a SpeechRecord>,
    {
        match &self.target {
            OutputTarget::Stdout => write_csv(io::stdout().lock(), records),
            OutputTarget::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                debug!("Writing CSV to {}", path.display());
                write_csv(File::create(path)?, records)
            }
        }
    }
}

pub fn write_csv<'a, W, I>(writer: W, records: I) -> ScraperResult<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a SpeechRecord>,
{
    let mut csv = ::csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(SpeechRecord::COLUMNS)?;

    let mut rows = 0;
    for record in records {
        csv.serialize(record)?;
        rows += 1;
    }
    csv.flush()?;
    Ok(rows)
}
