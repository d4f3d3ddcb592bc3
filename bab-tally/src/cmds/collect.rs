use std::path::PathBuf;

use clap::Args;
use indexer_http_client::IndexerHttpClient;
use tracing::info;
use url::Url;

use crate::{
    collector::{CollectSummary, Collector},
    config::Settings,
    indexer::{DynError, Indexer},
    persistence::VotingData,
};

#[derive(Args, Debug, Default)]
pub struct Collect {
    /// Tally file to resume from and overwrite.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Base url of the indexer REST API.
    #[arg(long)]
    pub indexer_url: Option<Url>,
}

impl Collect {
    pub fn run(self, mut settings: Settings) -> Result<(), DynError> {
        if let Some(output) = self.output {
            settings.output = output;
        }
        if let Some(indexer_url) = self.indexer_url {
            settings.indexer_url = indexer_url;
        }
        settings.validate()?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let client = IndexerHttpClient::new(settings.indexer_url.clone());
        runtime.block_on(collect(&client, &settings))?;
        Ok(())
    }
}

/// Resume from the tally file, fold in every unseen voter, then overwrite it.
async fn collect<I: Indexer>(indexer: &I, settings: &Settings) -> Result<CollectSummary, DynError> {
    let mut data = VotingData::load_or_default(&settings.output, settings.candidates.clone());

    let summary = Collector::new(indexer, settings).run(&mut data).await?;
    data.save(&settings.output)?;

    info!(
        pages = summary.pages,
        vote_transactions = summary.vote_transactions,
        new_voters = summary.new_voters,
        voters = data.tally.total().len(),
        path = %settings.output.display(),
        "Saved voting data"
    );
    Ok(summary)
}
