//! Read-side views over a ledger, valued at current prices.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tradeledger_core::{AccountId, Amount, Symbol};

/// One holding valued at the oracle's current price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: Symbol,
    pub quantity: u64,
    pub price: Amount,
    pub market_value: Amount,
}

/// Point-in-time summary of an account (profit/loss statement).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStatement {
    pub account_id: AccountId,
    pub owner: String,
    pub as_of: DateTime<Utc>,
    pub cash_balance: Amount,
    pub net_deposits: Amount,
    pub positions: Vec<Position>,
    pub portfolio_value: Amount,
    pub profit_loss: Amount,
    pub transaction_count: usize,
}
