use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use indexer_http_client::{ApplicationTransaction, Transaction, TransactionsPage};

use crate::indexer::{DynError, Indexer};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    BlockTimestamp(u64),
    AccountCreatedAtRound(String),
    ReceivedTransactions(String, u64),
    ApplicationCalls(Option<String>),
}

/// Indexer serving canned pages and accounts, recording every lookup.
#[derive(Debug, Default)]
pub struct MemoryIndexer {
    pages: HashMap<Option<String>, TransactionsPage>,
    received: HashMap<String, Vec<Transaction>>,
    created_at_rounds: HashMap<String, u64>,
    timestamps: HashMap<u64, u64>,
    calls: Mutex<Vec<Call>>,
}

impl MemoryIndexer {
    /// Serve `transactions` for the page requested with `cursor`.
    pub fn with_page(
        mut self,
        cursor: Option<&str>,
        transactions: Vec<Transaction>,
        next_token: Option<&str>,
    ) -> Self {
        self.pages.insert(
            cursor.map(ToOwned::to_owned),
            TransactionsPage {
                transactions,
                next_token: next_token.map(ToOwned::to_owned),
            },
        );
        self
    }

    /// Register an account funded by `funder` that received `received`
    /// transactions and was created at `round`, produced at `timestamp`.
    pub fn with_account(
        mut self,
        address: &str,
        funder: &str,
        received: usize,
        round: u64,
        timestamp: u64,
    ) -> Self {
        let transactions = (0..received)
            .map(|_| Transaction {
                sender: funder.to_owned(),
                confirmed_round: Some(round),
                application_transaction: None,
            })
            .collect();
        self.received.insert(address.to_owned(), transactions);
        self.created_at_rounds.insert(address.to_owned(), round);
        self.timestamps.insert(round, timestamp);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Indexer for MemoryIndexer {
    async fn block_timestamp(&self, round: u64) -> Result<u64, DynError> {
        self.record(Call::BlockTimestamp(round));
        self.timestamps
            .get(&round)
            .copied()
            .ok_or_else(|| format!("no block at round {round}").into())
    }

    async fn account_created_at_round(&self, address: &str) -> Result<u64, DynError> {
        self.record(Call::AccountCreatedAtRound(address.to_owned()));
        self.created_at_rounds
            .get(address)
            .copied()
            .ok_or_else(|| format!("no account {address}").into())
    }

    async fn received_transactions(
        &self,
        address: &str,
        max_round: u64,
    ) -> Result<Vec<Transaction>, DynError> {
        self.record(Call::ReceivedTransactions(address.to_owned(), max_round));
        self.received
            .get(address)
            .cloned()
            .ok_or_else(|| format!("no account {address}").into())
    }

    async fn application_calls(
        &self,
        _application_id: u64,
        _limit: u32,
        next: Option<&str>,
    ) -> Result<TransactionsPage, DynError> {
        let cursor = next.map(ToOwned::to_owned);
        self.record(Call::ApplicationCalls(cursor.clone()));
        Ok(self.pages.get(&cursor).cloned().unwrap_or_default())
    }
}

/// Arguments of a vote call: six entries, the fourth ending in `choices`.
pub fn vote_args(choices: [u8; 5]) -> Vec<String> {
    let mut choice_argument = vec![0, 5];
    choice_argument.extend(choices);
    vec![
        "xA/9qg==".into(),
        "AAA=".into(),
        "AAAAAAAAAAA=".into(),
        STANDARD.encode(choice_argument),
        "AAA=".into(),
        "AQ==".into(),
    ]
}

pub fn vote_transaction(voter: &str, round: u64, choices: [u8; 5]) -> Transaction {
    Transaction {
        sender: voter.to_owned(),
        confirmed_round: Some(round),
        application_transaction: Some(ApplicationTransaction {
            application_id: Some(1_272_433_669),
            application_args: vote_args(choices),
        }),
    }
}
