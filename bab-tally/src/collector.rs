use thiserror::Error;
use tracing::info;

use crate::{
    config::Settings,
    enricher::{EnrichError, enrich},
    extractor::{ExtractError, VoteRecord, extract_page},
    indexer::Indexer,
    persistence::VotingData,
};

#[derive(Debug, Error)]
pub enum CollectError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Enrich(#[from] EnrichError),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CollectSummary {
    pub pages: usize,
    pub vote_transactions: usize,
    pub new_voters: usize,
}

/// Walks every page of vote calls and folds unseen voters into
/// [`VotingData`].
pub struct Collector<'a, I> {
    indexer: &'a I,
    settings: &'a Settings,
}

impl<'a, I: Indexer> Collector<'a, I> {
    #[must_use]
    pub const fn new(indexer: &'a I, settings: &'a Settings) -> Self {
        Self { indexer, settings }
    }

    /// Scan from the first page until the indexer stops returning a cursor.
    /// Lookups are strictly sequential.
    pub async fn run(&self, data: &mut VotingData) -> Result<CollectSummary, CollectError> {
        let mut summary = CollectSummary::default();
        let mut cursor: Option<String> = None;
        loop {
            let page = extract_page(self.indexer, self.settings, cursor.as_deref()).await?;
            summary.pages += 1;
            summary.vote_transactions += page.votes.len();

            for (position, vote) in page.votes {
                if self
                    .record_vote(vote, position, page.transaction_count, data)
                    .await?
                {
                    summary.new_voters += 1;
                }
            }

            match page.next_token {
                Some(next_token) => {
                    info!(%next_token, "Fetching next page");
                    cursor = Some(next_token);
                }
                None => break,
            }
        }
        Ok(summary)
    }

    /// Enrich and tally `vote` unless its voter was already processed.
    /// Returns whether the voter was new.
    async fn record_vote(
        &self,
        vote: VoteRecord,
        position: usize,
        page_len: usize,
        data: &mut VotingData,
    ) -> Result<bool, EnrichError> {
        if data.tally.contains(&vote.voter) {
            return Ok(false);
        }
        let metadata = enrich(self.indexer, &vote.voter, vote.vote_round).await?;
        info!(
            "TX [{}/{page_len}] {} {:?} {metadata:?}",
            position + 1,
            vote.voter,
            vote.choices
        );
        data.accounts.insert(vote.voter.clone(), metadata);
        Ok(data.tally.record(&vote.voter, &vote.choices))
    }
}
