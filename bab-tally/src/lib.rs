pub mod cmds;
pub mod collector;
pub mod config;
pub mod enricher;
pub mod extractor;
pub mod indexer;
pub mod persistence;
pub mod report;
pub mod tally;
#[cfg(test)]
mod testing;

use std::path::PathBuf;

use clap::Parser;

use crate::{cmds::Command, config::Settings, indexer::DynError};

/// Rebuilds the Build-a-Bull vote tally from an Algorand indexer.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// YAML settings file. Built-in defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> Result<(), DynError> {
        let settings = match &self.config {
            Some(path) => Settings::load_from_file(path)?,
            None => Settings::default(),
        };
        self.command.unwrap_or_default().run(settings)
    }
}
