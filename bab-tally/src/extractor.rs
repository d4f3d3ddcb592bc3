use base64::{Engine as _, engine::general_purpose::STANDARD};
use indexer_http_client::Transaction;
use thiserror::Error;

use crate::{
    config::Settings,
    indexer::{DynError, Indexer},
};

/// Argument count of a vote call. Calls with any other count are ignored.
pub const VOTE_ARGS_LEN: usize = 6;
/// Position of the argument whose trailing bytes hold the choice vector.
pub const CHOICES_ARG_INDEX: usize = 3;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to fetch application calls: {0}")]
    Indexer(#[source] DynError),

    #[error("Vote from {voter} has no confirmed round")]
    MissingConfirmedRound { voter: String },

    #[error("Vote from {voter} carries an undecodable choice argument: {source}")]
    Choices {
        voter: String,
        #[source]
        source: base64::DecodeError,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteRecord {
    pub voter: String,
    pub vote_round: u64,
    /// One byte per candidate, in candidate order.
    pub choices: Vec<u8>,
}

/// Votes found in one page of application calls.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractedPage {
    /// Votes paired with their zero-based position in the page.
    pub votes: Vec<(usize, VoteRecord)>,
    pub transaction_count: usize,
    pub next_token: Option<String>,
}

/// Decode a base64 argument and keep its last `width` bytes.
pub fn decode_choices(argument: &str, width: usize) -> Result<Vec<u8>, base64::DecodeError> {
    let bytes = STANDARD.decode(argument)?;
    Ok(bytes[bytes.len().saturating_sub(width)..].to_vec())
}

/// Interpret `transaction` as a vote, or `None` if it is not a vote call.
pub fn vote_from_transaction(
    transaction: &Transaction,
    width: usize,
) -> Result<Option<VoteRecord>, ExtractError> {
    let Some(call) = &transaction.application_transaction else {
        return Ok(None);
    };
    if call.application_args.len() != VOTE_ARGS_LEN {
        return Ok(None);
    }
    let voter = transaction.sender.clone();
    let Some(vote_round) = transaction.confirmed_round else {
        return Err(ExtractError::MissingConfirmedRound { voter });
    };
    let choices = match decode_choices(&call.application_args[CHOICES_ARG_INDEX], width) {
        Ok(choices) => choices,
        Err(source) => return Err(ExtractError::Choices { voter, source }),
    };
    Ok(Some(VoteRecord {
        voter,
        vote_round,
        choices,
    }))
}

/// Fetch one page of application calls for the configured application and
/// pick out the votes.
pub async fn extract_page<I: Indexer>(
    indexer: &I,
    settings: &Settings,
    cursor: Option<&str>,
) -> Result<ExtractedPage, ExtractError> {
    let page = indexer
        .application_calls(settings.application_id, settings.page_size, cursor)
        .await
        .map_err(ExtractError::Indexer)?;

    let width = settings.choice_width();
    let mut votes = Vec::new();
    for (position, transaction) in page.transactions.iter().enumerate() {
        if let Some(vote) = vote_from_transaction(transaction, width)? {
            votes.push((position, vote));
        }
    }

    Ok(ExtractedPage {
        votes,
        transaction_count: page.transactions.len(),
        next_token: page.next_token,
    })
}
