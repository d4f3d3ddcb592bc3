pub const BLOCKS: &str = "/v2/blocks";
pub const ACCOUNTS: &str = "/v2/accounts";
pub const TRANSACTIONS: &str = "/v2/transactions";
