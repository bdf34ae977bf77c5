//! Trading account module (event-sourced).
//!
//! One account holds cash and whole-share positions, trades against a
//! pluggable price oracle, and keeps an append-only transaction history.
//! The aggregate itself is pure; `Ledger` adds pricing and logging, and
//! `SharedLedger` serializes access across threads.

pub mod account;
pub mod config;
pub mod ledger;
pub mod oracle;
pub mod record;
pub mod report;
pub mod shared;

pub use account::{
    AccountCommand, AccountEvent, AccountOpened, BuyShares, DepositFunds, FundsDeposited,
    FundsWithdrawn, OpenAccount, SellShares, SharesBought, SharesSold, TradingAccount,
    WithdrawFunds,
};
pub use config::{LedgerConfig, ProfitBaseline, UnknownSymbolPolicy};
pub use ledger::Ledger;
pub use oracle::{PriceOracle, StaticPriceTable};
pub use record::{TransactionKind, TransactionRecord};
pub use report::{AccountStatement, Position};
pub use shared::{SharedLedger, SharedLedgerError};
