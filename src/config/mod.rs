mod builtin;
pub(crate) mod duration_ms;
pub mod profile;

pub use builtin::{speeches, DEFAULT_GROUP};
pub use profile::{
    PageButton, PaginationConfig, ResultSelectors, RetrySettings, SearchProfile, VASKI_SEARCH_URL,
};

use crate::{ScraperError, ScraperResult};
use log::debug;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ProfileFile {
    groups: BTreeMap<String, SearchProfile>,
}

/// Named configuration groups: the built-in speech searches plus whatever a
/// profile file adds.
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    groups: BTreeMap<String, SearchProfile>,
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ProfileRegistry {
    pub fn builtin() -> Self {
        let groups = builtin::LISTED_YEARS
            .map(speeches)
            .map(|profile| (profile.name.clone(), profile))
            .collect();
        Self { groups }
    }

    /// Adds the groups of a JSON profile file, replacing built-ins of the
    /// same name.
    pub fn load_file<P: AsRef<Path>>(mut self, path: P) -> ScraperResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        self.merge_json(&content)?;
        debug!("Loaded profile file {}", path.display());
        Ok(self)
    }

    pub fn merge_json(&mut self, content: &str) -> ScraperResult<()> {
        let file: ProfileFile = serde_json::from_str(content)?;
        for (name, mut profile) in file.groups {
            if profile.buttons.is_empty() {
                return Err(ScraperError::Config(format!(
                    "group '{}' has no buttons to click",
                    name
                )));
            }
            profile.name = name.clone();
            self.groups.insert(name, profile);
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> ScraperResult<SearchProfile> {
        if let Some(profile) = self.groups.get(name) {
            return Ok(profile.clone());
        }
        builtin::speech_year(name).map(speeches).ok_or_else(|| {
            ScraperError::Config(format!(
                "unknown group '{}' (available: {}, or {}<year>)",
                name,
                self.names().join(", "),
                builtin::SPEECH_GROUP_PREFIX
            ))
        })
    }

    pub fn names(&self) -> Vec<&str> {
        self.groups.keys().map(String::as_str).collect()
    }
}
