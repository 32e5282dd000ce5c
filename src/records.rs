//! Scraped speech records and the deduplicating collection they are
//! gathered into.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One search hit. Field order is the CSV column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpeechRecord {
    pub title: String,
    pub date: String,
    pub link: String,
    pub speaker: String,
    pub intro: String,
}

impl SpeechRecord {
    pub const COLUMNS: [&'static str; 5] = ["title", "date", "link", "speaker", "intro"];
}

/// Records in first-seen order. A record is a duplicate only when every
/// field matches; one agenda-item link holds many speeches.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: Vec<SpeechRecord>,
    seen: HashSet<SpeechRecord>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the record was already present.
    pub fn insert(&mut self, record: SpeechRecord) -> bool {
        if self.seen.insert(record.clone()) {
            self.records.push(record);
            true
        } else {
            false
        }
    }

    /// Adds every record, returning how many were duplicates.
    pub fn extend<I: IntoIterator<Item = SpeechRecord>>(&mut self, records: I) -> usize {
        let mut duplicates = 0;
        for record in records {
            if !self.insert(record) {
                duplicates += 1;
            }
        }
        duplicates
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpeechRecord> {
        self.records.iter()
    }
}
