use std::{
    collections::HashMap,
    fs::{self, File},
    io::{BufReader, BufWriter, Write as _},
    path::Path,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{enricher::AccountMetadata, tally::Tally};

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk layout of the tally file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub votes: HashMap<String, Vec<String>>,
    pub accounts: HashMap<String, AccountMetadata>,
}

/// Everything a run accumulates: the tally and the metadata of each voter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VotingData {
    pub tally: Tally,
    pub accounts: HashMap<String, AccountMetadata>,
}

impl VotingData {
    #[must_use]
    pub fn new(candidates: Vec<String>) -> Self {
        Self {
            tally: Tally::new(candidates),
            accounts: HashMap::new(),
        }
    }

    #[must_use]
    pub fn from_snapshot(snapshot: Snapshot, candidates: Vec<String>) -> Self {
        Self {
            tally: Tally::from_groups(candidates, snapshot.votes),
            accounts: snapshot.accounts,
        }
    }

    #[must_use]
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            votes: self.tally.to_groups(),
            accounts: self.accounts.clone(),
        }
    }

    pub fn load(path: &Path, candidates: Vec<String>) -> Result<Self, PersistenceError> {
        let reader = BufReader::new(File::open(path)?);
        let snapshot: Snapshot = serde_json::from_reader(reader)?;
        Ok(Self::from_snapshot(snapshot, candidates))
    }

    /// Resume from `path`, starting empty if the file is missing or cannot be
    /// parsed.
    #[must_use]
    pub fn load_or_default(path: &Path, candidates: Vec<String>) -> Self {
        match Self::load(path, candidates.clone()) {
            Ok(data) => {
                tracing::info!(
                    path = %path.display(),
                    voters = data.tally.total().len(),
                    "Resumed voting data"
                );
                data
            }
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    %error,
                    "Starting without prior voting data"
                );
                Self::new(candidates)
            }
        }
    }

    /// Overwrite `path` with the full snapshot.
    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, &self.to_snapshot())?;
        writer.flush()?;
        Ok(())
    }
}

/// Read a tally file without touching the candidate layout.
pub fn read_snapshot(path: &Path) -> Result<Snapshot, PersistenceError> {
    let content = fs::read(path)?;
    Ok(serde_json::from_slice(&content)?)
}
