//! The account ledger: one `TradingAccount` plus the price oracle it trades against.
//!
//! `Ledger` is the entry point callers use. It resolves prices, stamps ids and
//! times onto commands, runs them through the aggregate, and logs the outcome.
//! All validation happens before any state changes, so a failed call leaves
//! balance, holdings and history exactly as they were.

use std::collections::BTreeMap;

use chrono::Utc;

use tradeledger_core::{AccountId, Amount, DomainError, DomainResult, Symbol, TransactionId};
use tradeledger_events::execute;

use crate::account::{
    AccountCommand, BuyShares, DepositFunds, OpenAccount, SellShares, TradingAccount,
    WithdrawFunds,
};
use crate::config::{LedgerConfig, ProfitBaseline, UnknownSymbolPolicy};
use crate::oracle::{PriceOracle, StaticPriceTable};
use crate::record::TransactionRecord;
use crate::report::{AccountStatement, Position};

#[derive(Debug, Clone)]
pub struct Ledger<O = StaticPriceTable> {
    account: TradingAccount,
    oracle: O,
    config: LedgerConfig,
}

impl<O: PriceOracle> Ledger<O> {
    /// Opens an account with the default configuration.
    ///
    /// The initial deposit is not checked for positivity.
    pub fn open(owner: impl Into<String>, initial_deposit: Amount, oracle: O) -> DomainResult<Self> {
        Self::open_with_config(owner, initial_deposit, oracle, LedgerConfig::default())
    }

    pub fn open_with_config(
        owner: impl Into<String>,
        initial_deposit: Amount,
        oracle: O,
        config: LedgerConfig,
    ) -> DomainResult<Self> {
        let account_id = AccountId::new();
        let mut account = TradingAccount::empty(account_id);

        execute(
            &mut account,
            &AccountCommand::OpenAccount(OpenAccount {
                account_id,
                owner: owner.into(),
                initial_deposit,
                occurred_at: Utc::now(),
            }),
        )?;

        if initial_deposit.is_negative() {
            tracing::warn!(%account_id, %initial_deposit, "account opened with a negative balance");
        }
        tracing::info!(
            %account_id,
            owner = account.owner(),
            %initial_deposit,
            unknown_symbols = %config.unknown_symbols,
            profit_baseline = %config.profit_baseline,
            "account opened"
        );

        Ok(Self {
            account,
            oracle,
            config,
        })
    }

    pub fn id(&self) -> AccountId {
        self.account.id_typed()
    }

    pub fn owner(&self) -> &str {
        self.account.owner()
    }

    pub fn cash_balance(&self) -> Amount {
        self.account.cash_balance()
    }

    pub fn net_deposits(&self) -> Amount {
        self.account.net_deposits()
    }

    pub fn config(&self) -> LedgerConfig {
        self.config
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Mutable access to the oracle, e.g. to move a price in a `StaticPriceTable`.
    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    pub fn deposit(&mut self, amount: Amount) -> DomainResult<&TransactionRecord> {
        let command = AccountCommand::DepositFunds(DepositFunds {
            account_id: self.id(),
            transaction_id: TransactionId::new(),
            amount,
            occurred_at: Utc::now(),
        });
        self.dispatch("deposit", command)
    }

    pub fn withdraw(&mut self, amount: Amount) -> DomainResult<&TransactionRecord> {
        let command = AccountCommand::WithdrawFunds(WithdrawFunds {
            account_id: self.id(),
            transaction_id: TransactionId::new(),
            amount,
            occurred_at: Utc::now(),
        });
        self.dispatch("withdraw", command)
    }

    /// Buys at the oracle's current price. No partial fills.
    pub fn buy_shares(
        &mut self,
        symbol: impl AsRef<str>,
        quantity: u64,
    ) -> DomainResult<&TransactionRecord> {
        let command = self
            .buy_command(symbol.as_ref(), quantity)
            .map_err(|err| self.rejected("buy", err))?;
        self.dispatch("buy", command)
    }

    /// Sells at the oracle's current price. Holdings are checked before the
    /// price is looked up, so selling shares that are not owned always fails
    /// with `InsufficientShares`.
    pub fn sell_shares(
        &mut self,
        symbol: impl AsRef<str>,
        quantity: u64,
    ) -> DomainResult<&TransactionRecord> {
        let command = self
            .sell_command(symbol.as_ref(), quantity)
            .map_err(|err| self.rejected("sell", err))?;
        self.dispatch("sell", command)
    }

    /// Holdings valued at current prices, in symbol order.
    ///
    /// Symbols the oracle no longer quotes are valued at zero.
    pub fn positions(&self) -> DomainResult<Vec<Position>> {
        self.account
            .holdings()
            .iter()
            .map(|(symbol, &quantity)| -> DomainResult<Position> {
                let price = self.oracle.price(symbol);
                Ok(Position {
                    symbol: symbol.clone(),
                    quantity,
                    price,
                    market_value: price.checked_mul_qty(quantity)?,
                })
            })
            .collect()
    }

    /// Cash plus every holding at its current price.
    pub fn portfolio_value(&self) -> DomainResult<Amount> {
        self.positions()?
            .iter()
            .try_fold(self.cash_balance(), |total, p| total.checked_add(p.market_value))
    }

    pub fn profit_loss(&self) -> DomainResult<Amount> {
        let value = self.portfolio_value()?;
        match self.config.profit_baseline {
            ProfitBaseline::NetDeposits => value.checked_sub(self.net_deposits()),
            ProfitBaseline::Reference => {
                let initial_investment = self.portfolio_value()?;
                value.checked_sub(initial_investment)
            }
        }
    }

    /// Snapshot of symbol → quantity. Changing it does not touch the ledger.
    pub fn holdings(&self) -> BTreeMap<Symbol, u64> {
        self.account.holdings().clone()
    }

    pub fn transaction_history(&self) -> &[TransactionRecord] {
        self.account.history()
    }

    pub fn statement(&self) -> DomainResult<AccountStatement> {
        let positions = self.positions()?;
        Ok(AccountStatement {
            account_id: self.id(),
            owner: self.owner().to_string(),
            as_of: Utc::now(),
            cash_balance: self.cash_balance(),
            net_deposits: self.net_deposits(),
            portfolio_value: self.portfolio_value()?,
            profit_loss: self.profit_loss()?,
            transaction_count: self.transaction_history().len(),
            positions,
        })
    }

    fn buy_command(&self, symbol: &str, quantity: u64) -> DomainResult<AccountCommand> {
        let symbol = Symbol::parse(symbol)?;
        let price = self.resolve_price(&symbol)?;
        Ok(AccountCommand::BuyShares(BuyShares {
            account_id: self.id(),
            transaction_id: TransactionId::new(),
            symbol,
            quantity,
            price,
            occurred_at: Utc::now(),
        }))
    }

    fn sell_command(&self, symbol: &str, quantity: u64) -> DomainResult<AccountCommand> {
        let symbol = Symbol::parse(symbol)?;
        self.account.ensure_can_sell(&symbol, quantity)?;
        let price = self.resolve_price(&symbol)?;
        Ok(AccountCommand::SellShares(SellShares {
            account_id: self.id(),
            transaction_id: TransactionId::new(),
            symbol,
            quantity,
            price,
            occurred_at: Utc::now(),
        }))
    }

    fn resolve_price(&self, symbol: &Symbol) -> DomainResult<Amount> {
        if let Some(price) = self.oracle.quote(symbol) {
            tracing::debug!(%symbol, %price, "price resolved");
            return Ok(price);
        }
        match self.config.unknown_symbols {
            UnknownSymbolPolicy::Reject => Err(DomainError::UnknownSymbol(symbol.clone())),
            UnknownSymbolPolicy::ZeroPrice => {
                tracing::warn!(%symbol, "no quote for symbol; trading at zero");
                Ok(Amount::ZERO)
            }
        }
    }

    fn dispatch(
        &mut self,
        operation: &'static str,
        command: AccountCommand,
    ) -> DomainResult<&TransactionRecord> {
        if let Err(err) = execute(&mut self.account, &command) {
            return Err(self.rejected(operation, err));
        }

        let record = self
            .account
            .history()
            .last()
            .ok_or_else(|| DomainError::invariant("accepted command left no transaction record"))?;
        tracing::info!(
            account_id = %self.account.id_typed(),
            operation,
            kind = record.kind.label(),
            sequence = record.sequence,
            transaction = %record,
            cash_balance = %self.account.cash_balance(),
            "transaction recorded"
        );
        Ok(record)
    }

    fn rejected(&self, operation: &'static str, err: DomainError) -> DomainError {
        tracing::warn!(
            account_id = %self.account.id_typed(),
            operation,
            error = %err,
            "operation rejected"
        );
        err
    }
}
