use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tradeledger_core::{
    AccountId, Aggregate, AggregateRoot, Amount, DomainError, DomainResult, Symbol, TransactionId,
};
use tradeledger_events::Event;

use crate::record::{TransactionKind, TransactionRecord};

/// Aggregate root: TradingAccount.
///
/// Holds cash, share holdings and the transaction history of one owner.
/// `holdings` never contains a zero quantity; a position that is sold down to
/// nothing is removed in the same `apply`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradingAccount {
    id: AccountId,
    owner: String,
    cash_balance: Amount,
    net_deposits: Amount,
    holdings: BTreeMap<Symbol, u64>,
    history: Vec<TransactionRecord>,
    version: u64,
    opened: bool,
}

impl TradingAccount {
    /// Create an empty, not-yet-opened aggregate instance.
    pub fn empty(id: AccountId) -> Self {
        Self {
            id,
            owner: String::new(),
            cash_balance: Amount::ZERO,
            net_deposits: Amount::ZERO,
            holdings: BTreeMap::new(),
            history: Vec::new(),
            version: 0,
            opened: false,
        }
    }

    pub fn id_typed(&self) -> AccountId {
        self.id
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn cash_balance(&self) -> Amount {
        self.cash_balance
    }

    /// Initial deposit plus deposits minus withdrawals.
    pub fn net_deposits(&self) -> Amount {
        self.net_deposits
    }

    pub fn holdings(&self) -> &BTreeMap<Symbol, u64> {
        &self.holdings
    }

    pub fn quantity_of(&self, symbol: &Symbol) -> u64 {
        self.holdings.get(symbol).copied().unwrap_or(0)
    }

    pub fn history(&self) -> &[TransactionRecord] {
        &self.history
    }

    pub fn is_open(&self) -> bool {
        self.opened
    }

    /// Checks a sale against current holdings without needing a price.
    pub fn ensure_can_sell(&self, symbol: &Symbol, quantity: u64) -> DomainResult<()> {
        ensure_quantity(quantity)?;
        let owned = self.quantity_of(symbol);
        if owned < quantity {
            return Err(DomainError::InsufficientShares {
                symbol: symbol.clone(),
                requested: quantity,
                owned,
            });
        }
        Ok(())
    }
}

impl AggregateRoot for TradingAccount {
    type Id = AccountId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: OpenAccount.
///
/// `initial_deposit` is taken as-is, without a positivity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAccount {
    pub account_id: AccountId,
    pub owner: String,
    pub initial_deposit: Amount,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DepositFunds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositFunds {
    pub account_id: AccountId,
    pub transaction_id: TransactionId,
    pub amount: Amount,
    pub occurred_at: DateTime<Utc>,
}

/// Command: WithdrawFunds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawFunds {
    pub account_id: AccountId,
    pub transaction_id: TransactionId,
    pub amount: Amount,
    pub occurred_at: DateTime<Utc>,
}

/// Command: BuyShares (price already quoted by the caller).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyShares {
    pub account_id: AccountId,
    pub transaction_id: TransactionId,
    pub symbol: Symbol,
    pub quantity: u64,
    pub price: Amount,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SellShares (price already quoted by the caller).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellShares {
    pub account_id: AccountId,
    pub transaction_id: TransactionId,
    pub symbol: Symbol,
    pub quantity: u64,
    pub price: Amount,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountCommand {
    OpenAccount(OpenAccount),
    DepositFunds(DepositFunds),
    WithdrawFunds(WithdrawFunds),
    BuyShares(BuyShares),
    SellShares(SellShares),
}

/// Event: AccountOpened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountOpened {
    pub account_id: AccountId,
    pub owner: String,
    pub initial_deposit: Amount,
    pub occurred_at: DateTime<Utc>,
}

/// Event: FundsDeposited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundsDeposited {
    pub account_id: AccountId,
    pub transaction_id: TransactionId,
    pub amount: Amount,
    pub occurred_at: DateTime<Utc>,
}

/// Event: FundsWithdrawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundsWithdrawn {
    pub account_id: AccountId,
    pub transaction_id: TransactionId,
    pub amount: Amount,
    pub occurred_at: DateTime<Utc>,
}

/// Event: SharesBought.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharesBought {
    pub account_id: AccountId,
    pub transaction_id: TransactionId,
    pub symbol: Symbol,
    pub quantity: u64,
    pub price: Amount,
    /// `price * quantity`, debited from cash.
    pub cost: Amount,
    pub occurred_at: DateTime<Utc>,
}

/// Event: SharesSold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharesSold {
    pub account_id: AccountId,
    pub transaction_id: TransactionId,
    pub symbol: Symbol,
    pub quantity: u64,
    pub price: Amount,
    /// `price * quantity`, credited to cash.
    pub proceeds: Amount,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountEvent {
    AccountOpened(AccountOpened),
    FundsDeposited(FundsDeposited),
    FundsWithdrawn(FundsWithdrawn),
    SharesBought(SharesBought),
    SharesSold(SharesSold),
}

impl Event for AccountEvent {
    fn event_type(&self) -> &'static str {
        match self {
            AccountEvent::AccountOpened(_) => "account.opened",
            AccountEvent::FundsDeposited(_) => "account.funds_deposited",
            AccountEvent::FundsWithdrawn(_) => "account.funds_withdrawn",
            AccountEvent::SharesBought(_) => "account.shares_bought",
            AccountEvent::SharesSold(_) => "account.shares_sold",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            AccountEvent::AccountOpened(e) => e.occurred_at,
            AccountEvent::FundsDeposited(e) => e.occurred_at,
            AccountEvent::FundsWithdrawn(e) => e.occurred_at,
            AccountEvent::SharesBought(e) => e.occurred_at,
            AccountEvent::SharesSold(e) => e.occurred_at,
        }
    }
}

impl Aggregate for TradingAccount {
    type Command = AccountCommand;
    type Event = AccountEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            AccountEvent::AccountOpened(e) => {
                self.id = e.account_id;
                self.owner = e.owner.clone();
                self.cash_balance = e.initial_deposit;
                self.net_deposits = e.initial_deposit;
                self.opened = true;
            }
            AccountEvent::FundsDeposited(e) => {
                self.cash_balance = self.cash_balance + e.amount;
                self.net_deposits = self.net_deposits + e.amount;
                self.record(
                    e.transaction_id,
                    e.occurred_at,
                    TransactionKind::Deposit { amount: e.amount },
                );
            }
            AccountEvent::FundsWithdrawn(e) => {
                self.cash_balance = self.cash_balance - e.amount;
                self.net_deposits = self.net_deposits - e.amount;
                self.record(
                    e.transaction_id,
                    e.occurred_at,
                    TransactionKind::Withdrawal { amount: e.amount },
                );
            }
            AccountEvent::SharesBought(e) => {
                self.cash_balance = self.cash_balance - e.cost;
                *self.holdings.entry(e.symbol.clone()).or_insert(0) += e.quantity;
                self.record(
                    e.transaction_id,
                    e.occurred_at,
                    TransactionKind::Buy {
                        symbol: e.symbol.clone(),
                        quantity: e.quantity,
                        price: e.price,
                    },
                );
            }
            AccountEvent::SharesSold(e) => {
                self.cash_balance = self.cash_balance + e.proceeds;
                let remaining = self.quantity_of(&e.symbol).saturating_sub(e.quantity);
                if remaining == 0 {
                    self.holdings.remove(&e.symbol);
                } else {
                    self.holdings.insert(e.symbol.clone(), remaining);
                }
                self.record(
                    e.transaction_id,
                    e.occurred_at,
                    TransactionKind::Sell {
                        symbol: e.symbol.clone(),
                        quantity: e.quantity,
                        price: e.price,
                    },
                );
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            AccountCommand::OpenAccount(cmd) => self.handle_open(cmd),
            AccountCommand::DepositFunds(cmd) => self.handle_deposit(cmd),
            AccountCommand::WithdrawFunds(cmd) => self.handle_withdraw(cmd),
            AccountCommand::BuyShares(cmd) => self.handle_buy(cmd),
            AccountCommand::SellShares(cmd) => self.handle_sell(cmd),
        }
    }
}

fn ensure_quantity(quantity: u64) -> DomainResult<()> {
    if quantity == 0 {
        return Err(DomainError::invalid_quantity("quantity must be at least 1"));
    }
    Ok(())
}

fn ensure_price(price: Amount) -> DomainResult<()> {
    if price.is_negative() {
        return Err(DomainError::invalid_amount(format!(
            "price cannot be negative (got {price})"
        )));
    }
    Ok(())
}

impl TradingAccount {
    fn record(&mut self, id: TransactionId, occurred_at: DateTime<Utc>, kind: TransactionKind) {
        let sequence = self.history.len() as u64 + 1;
        self.history.push(TransactionRecord {
            id,
            sequence,
            occurred_at,
            kind,
        });
    }

    fn ensure_open(&self, account_id: AccountId) -> DomainResult<()> {
        if !self.opened {
            return Err(DomainError::not_found());
        }
        if self.id != account_id {
            return Err(DomainError::invariant("account_id mismatch"));
        }
        Ok(())
    }

    fn handle_open(&self, cmd: &OpenAccount) -> DomainResult<Vec<AccountEvent>> {
        if self.opened {
            return Err(DomainError::conflict("account already opened"));
        }
        let owner = cmd.owner.trim();
        if owner.is_empty() {
            return Err(DomainError::validation("owner cannot be empty"));
        }

        Ok(vec![AccountEvent::AccountOpened(AccountOpened {
            account_id: cmd.account_id,
            owner: owner.to_string(),
            initial_deposit: cmd.initial_deposit,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_deposit(&self, cmd: &DepositFunds) -> DomainResult<Vec<AccountEvent>> {
        self.ensure_open(cmd.account_id)?;

        if !cmd.amount.is_positive() {
            return Err(DomainError::invalid_amount(format!(
                "deposit must be positive (got {})",
                cmd.amount
            )));
        }
        self.cash_balance.checked_add(cmd.amount)?;
        self.net_deposits.checked_add(cmd.amount)?;

        Ok(vec![AccountEvent::FundsDeposited(FundsDeposited {
            account_id: cmd.account_id,
            transaction_id: cmd.transaction_id,
            amount: cmd.amount,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_withdraw(&self, cmd: &WithdrawFunds) -> DomainResult<Vec<AccountEvent>> {
        self.ensure_open(cmd.account_id)?;

        if !cmd.amount.is_positive() {
            return Err(DomainError::invalid_amount(format!(
                "withdrawal must be positive (got {})",
                cmd.amount
            )));
        }
        if cmd.amount > self.cash_balance {
            return Err(DomainError::InsufficientFunds {
                requested: cmd.amount,
                available: self.cash_balance,
            });
        }
        self.net_deposits.checked_sub(cmd.amount)?;

        Ok(vec![AccountEvent::FundsWithdrawn(FundsWithdrawn {
            account_id: cmd.account_id,
            transaction_id: cmd.transaction_id,
            amount: cmd.amount,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_buy(&self, cmd: &BuyShares) -> DomainResult<Vec<AccountEvent>> {
        self.ensure_open(cmd.account_id)?;
        ensure_quantity(cmd.quantity)?;
        ensure_price(cmd.price)?;

        let cost = cmd.price.checked_mul_qty(cmd.quantity)?;
        if cost > self.cash_balance {
            return Err(DomainError::InsufficientFunds {
                requested: cost,
                available: self.cash_balance,
            });
        }
        self.quantity_of(&cmd.symbol)
            .checked_add(cmd.quantity)
            .ok_or_else(|| DomainError::overflow(format!("holding of {}", cmd.symbol)))?;

        Ok(vec![AccountEvent::SharesBought(SharesBought {
            account_id: cmd.account_id,
            transaction_id: cmd.transaction_id,
            symbol: cmd.symbol.clone(),
            quantity: cmd.quantity,
            price: cmd.price,
            cost,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_sell(&self, cmd: &SellShares) -> DomainResult<Vec<AccountEvent>> {
        self.ensure_open(cmd.account_id)?;
        self.ensure_can_sell(&cmd.symbol, cmd.quantity)?;
        ensure_price(cmd.price)?;

        let proceeds = cmd.price.checked_mul_qty(cmd.quantity)?;
        self.cash_balance.checked_add(proceeds)?;

        Ok(vec![AccountEvent::SharesSold(SharesSold {
            account_id: cmd.account_id,
            transaction_id: cmd.transaction_id,
            symbol: cmd.symbol.clone(),
            quantity: cmd.quantity,
            price: cmd.price,
            proceeds,
            occurred_at: cmd.occurred_at,
        })])
    }
}
