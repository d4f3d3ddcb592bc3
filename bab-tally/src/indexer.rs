use async_trait::async_trait;
use indexer_http_client::{IndexerHttpClient, Transaction, TransactionsPage};

pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The indexer lookups the collection pipeline depends on.
#[async_trait]
pub trait Indexer: Sync {
    async fn block_timestamp(&self, round: u64) -> Result<u64, DynError>;

    async fn account_created_at_round(&self, address: &str) -> Result<u64, DynError>;

    /// Transactions received by `address` up to `max_round`, in indexer order.
    async fn received_transactions(
        &self,
        address: &str,
        max_round: u64,
    ) -> Result<Vec<Transaction>, DynError>;

    async fn application_calls(
        &self,
        application_id: u64,
        limit: u32,
        next: Option<&str>,
    ) -> Result<TransactionsPage, DynError>;
}

#[async_trait]
impl Indexer for IndexerHttpClient {
    async fn block_timestamp(&self, round: u64) -> Result<u64, DynError> {
        Ok(self.block(round).await?.timestamp)
    }

    async fn account_created_at_round(&self, address: &str) -> Result<u64, DynError> {
        Ok(self.account(address).await?.created_at_round)
    }

    async fn received_transactions(
        &self,
        address: &str,
        max_round: u64,
    ) -> Result<Vec<Transaction>, DynError> {
        Ok(Self::received_transactions(self, address, max_round)
            .await?
            .transactions)
    }

    async fn application_calls(
        &self,
        application_id: u64,
        limit: u32,
        next: Option<&str>,
    ) -> Result<TransactionsPage, DynError> {
        Ok(Self::application_calls(self, application_id, limit, next).await?)
    }
}
