pub mod collect;
pub mod report;

use clap::Subcommand;

use crate::{config::Settings, indexer::DynError};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan the voting application and update the tally file (default).
    Collect(collect::Collect),
    /// Print a fraud breakdown of the tally file as JSON.
    Report(report::Report),
}

impl Default for Command {
    fn default() -> Self {
        Self::Collect(collect::Collect::default())
    }
}

impl Command {
    pub fn run(self, settings: Settings) -> Result<(), DynError> {
        match self {
            Self::Collect(cmd) => cmd.run(settings),
            Self::Report(cmd) => cmd.run(settings),
        }
    }
}
