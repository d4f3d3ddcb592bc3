use std::{collections::HashSet, fs, path::PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::{report::FraudCriteria, tally::TOTAL};

const DEFAULT_INDEXER_URL: &str = "https://mainnet-idx.algonode.cloud";
const DEFAULT_APPLICATION_ID: u64 = 1_272_433_669;
const DEFAULT_PAGE_SIZE: u32 = 1000;
const DEFAULT_OUTPUT: &str = "./bab-votes.json";
const DEFAULT_CANDIDATES: [&str; 5] = ["CompX", "TameQuest", "Janus", "Aurally", "DAOWakanda"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base url of the indexer REST API.
    pub indexer_url: Url,
    /// Voting application whose calls are scanned.
    pub application_id: u64,
    /// Number of application calls requested per page.
    pub page_size: u32,
    /// Candidate names, positional: the n-th name owns the n-th byte of the
    /// choice vector.
    pub candidates: Vec<String>,
    /// Tally file resumed from at startup and overwritten at the end.
    pub output: PathBuf,
    pub report: FraudCriteria,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            indexer_url: default_indexer_url(),
            application_id: DEFAULT_APPLICATION_ID,
            page_size: DEFAULT_PAGE_SIZE,
            candidates: DEFAULT_CANDIDATES.map(String::from).to_vec(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            report: FraudCriteria::default(),
        }
    }
}

fn default_indexer_url() -> Url {
    Url::parse(DEFAULT_INDEXER_URL).expect("default indexer url is valid")
}

impl Settings {
    pub fn load_from_file(file_path: &PathBuf) -> Result<Self, ConfigError> {
        let config_content = fs::read_to_string(file_path)?;
        let settings: Self = serde_yaml::from_str(&config_content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be positive".into()));
        }
        if self.candidates.is_empty() {
            return Err(ConfigError::Invalid("no candidates configured".into()));
        }
        let mut seen = HashSet::new();
        for candidate in &self.candidates {
            if candidate == TOTAL {
                return Err(ConfigError::Invalid(format!(
                    "`{TOTAL}` is reserved and cannot name a candidate"
                )));
            }
            if !seen.insert(candidate) {
                return Err(ConfigError::Invalid(format!(
                    "candidate `{candidate}` is listed twice"
                )));
            }
        }
        Ok(())
    }

    /// Number of trailing bytes of the choice argument that carry votes.
    #[must_use]
    pub fn choice_width(&self) -> usize {
        self.candidates.len()
    }
}
