pub mod paths;
pub mod types;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
pub use url::Url;

pub use crate::types::{
    Account, AccountResponse, ApplicationTransaction, Block, Transaction, TransactionsPage,
};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Indexer responded with {status} for {url}")]
    Status { status: StatusCode, url: Url },

    #[error("Failed to deserialize response from {url}: {source}")]
    Deserialize {
        url: Url,
        #[source]
        source: serde_path_to_error::Error<serde_json::Error>,
    },
}

/// Read-only client for the `/v2` REST API of an Algorand indexer.
#[derive(Clone, Debug)]
pub struct IndexerHttpClient {
    client: Client,
    base_url: Url,
}

impl IndexerHttpClient {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Get the block produced at `round`.
    pub async fn block(&self, round: u64) -> Result<Block, Error> {
        let url = self.endpoint(&format!("{}/{round}", paths::BLOCKS))?;
        self.get(url).await
    }

    /// Get the account state of `address`, including closed and deleted
    /// entities.
    pub async fn account(&self, address: &str) -> Result<Account, Error> {
        let mut url = self.endpoint(&format!("{}/{address}", paths::ACCOUNTS))?;
        url.query_pairs_mut().append_pair("include-all", "true");
        self.get::<AccountResponse>(url)
            .await
            .map(|response| response.account)
    }

    /// First page of transactions received by `address` up to and including
    /// `max_round`.
    pub async fn received_transactions(
        &self,
        address: &str,
        max_round: u64,
    ) -> Result<TransactionsPage, Error> {
        let mut url = self.endpoint(paths::TRANSACTIONS)?;
        url.query_pairs_mut()
            .append_pair("address", address)
            .append_pair("address-role", "receiver")
            .append_pair("max-round", &max_round.to_string());
        self.get(url).await
    }

    /// One page of application-call transactions targeting `application_id`.
    pub async fn application_calls(
        &self,
        application_id: u64,
        limit: u32,
        next: Option<&str>,
    ) -> Result<TransactionsPage, Error> {
        let mut url = self.endpoint(paths::TRANSACTIONS)?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("application-id", &application_id.to_string())
                .append_pair("tx-type", "appl")
                .append_pair("limit", &limit.to_string());
            if let Some(next) = next {
                query.append_pair("next", next);
            }
        }
        self.get(url).await
    }

    pub async fn get<Resp: DeserializeOwned>(&self, url: Url) -> Result<Resp, Error> {
        tracing::debug!(%url, "GET");
        let response = self.client.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(Error::Status {
                status: response.status(),
                url,
            });
        }
        deserialize_response(url, response).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }
}

async fn deserialize_response<Resp: DeserializeOwned>(
    url: Url,
    response: Response,
) -> Result<Resp, Error> {
    let body = response.text().await?;
    let mut json_deserializer = serde_json::Deserializer::from_str(&body);
    serde_path_to_error::deserialize(&mut json_deserializer)
        .map_err(|source| Error::Deserialize { url, source })
}
