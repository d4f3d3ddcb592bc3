use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::indexer::{DynError, Indexer};

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("Failed to look up account {address}: {source}")]
    Indexer {
        address: String,
        #[source]
        source: DynError,
    },

    #[error("Account {address} received no transactions up to round {vote_round}")]
    NoPriorTransactions { address: String, vote_round: u64 },
}

/// History of a voter at the time of its vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMetadata {
    /// Sender of the first transaction the voter received.
    pub first_transaction_from: String,
    pub created_at_timestamp: u64,
    /// Size of the first page of transactions the voter received up to and
    /// including the vote round.
    pub received_transactions_before_vote: u64,
}

/// Look up the funding history and creation time of `address`.
///
/// Issues three sequential lookups: the received transactions up to
/// `vote_round`, the account creation round, then the timestamp of that
/// round. An account that received nothing before voting is an error.
pub async fn enrich<I: Indexer>(
    indexer: &I,
    address: &str,
    vote_round: u64,
) -> Result<AccountMetadata, EnrichError> {
    let indexer_error = |source| EnrichError::Indexer {
        address: address.to_owned(),
        source,
    };

    let received = indexer
        .received_transactions(address, vote_round)
        .await
        .map_err(indexer_error)?;
    let Some(first) = received.first() else {
        return Err(EnrichError::NoPriorTransactions {
            address: address.to_owned(),
            vote_round,
        });
    };

    let created_at_round = indexer
        .account_created_at_round(address)
        .await
        .map_err(indexer_error)?;
    let created_at_timestamp = indexer
        .block_timestamp(created_at_round)
        .await
        .map_err(indexer_error)?;

    Ok(AccountMetadata {
        first_transaction_from: first.sender.clone(),
        created_at_timestamp,
        received_transactions_before_vote: received.len() as u64,
    })
}
