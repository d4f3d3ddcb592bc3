use std::path::PathBuf;

use clap::Args;

use crate::{
    config::Settings,
    indexer::DynError,
    persistence::read_snapshot,
    report::{FraudCriteria, analyze},
};

#[derive(Args, Debug, Default)]
pub struct Report {
    /// Tally file to analyze.
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    /// Accounts younger than this many days are flagged.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub min_active_days: Option<u64>,
    /// Accounts that received fewer transactions before voting are flagged.
    #[arg(long)]
    pub min_transactions: Option<u64>,
    /// Accounts whose funder funded more than this many other voters are
    /// flagged.
    #[arg(long)]
    pub funded_by_limit: Option<u64>,
}

impl Report {
    pub fn run(self, settings: Settings) -> Result<(), DynError> {
        let criteria = self.criteria(settings.report.clone());
        let input = self.input.unwrap_or(settings.output);
        let snapshot = read_snapshot(&input)?;

        let report = analyze(&snapshot, &settings.candidates, &criteria);
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }

    fn criteria(&self, mut criteria: FraudCriteria) -> FraudCriteria {
        if let Some(days) = self.min_active_days {
            criteria.min_active_days = days;
        }
        if let Some(transactions) = self.min_transactions {
            criteria.min_transactions = transactions;
        }
        if let Some(limit) = self.funded_by_limit {
            criteria.funded_by_limit = limit;
        }
        criteria
    }
}
