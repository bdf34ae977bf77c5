//! Serialized access to one ledger from many threads.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use tradeledger_core::{Amount, DomainError, Symbol};

use crate::ledger::Ledger;
use crate::oracle::{PriceOracle, StaticPriceTable};
use crate::record::TransactionRecord;
use crate::report::AccountStatement;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedLedgerError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A thread panicked while holding the ledger lock.
    #[error("ledger lock poisoned")]
    Poisoned,
}

/// Cloneable handle to a single `Ledger` behind a mutex.
///
/// Every call holds the lock for the whole operation, so a buy, sell or
/// withdrawal never observes another one half-way through.
#[derive(Debug)]
pub struct SharedLedger<O = StaticPriceTable> {
    inner: Arc<Mutex<Ledger<O>>>,
}

impl<O> Clone for SharedLedger<O> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<O: PriceOracle> SharedLedger<O> {
    pub fn new(ledger: Ledger<O>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    /// Runs `f` with exclusive access to the ledger.
    pub fn with<R>(
        &self,
        f: impl FnOnce(&mut Ledger<O>) -> Result<R, DomainError>,
    ) -> Result<R, SharedLedgerError> {
        let mut ledger = self.inner.lock().map_err(|_| SharedLedgerError::Poisoned)?;
        Ok(f(&mut ledger)?)
    }

    pub fn deposit(&self, amount: Amount) -> Result<TransactionRecord, SharedLedgerError> {
        self.with(|ledger| ledger.deposit(amount).cloned())
    }

    pub fn withdraw(&self, amount: Amount) -> Result<TransactionRecord, SharedLedgerError> {
        self.with(|ledger| ledger.withdraw(amount).cloned())
    }

    pub fn buy_shares(
        &self,
        symbol: &str,
        quantity: u64,
    ) -> Result<TransactionRecord, SharedLedgerError> {
        self.with(|ledger| ledger.buy_shares(symbol, quantity).cloned())
    }

    pub fn sell_shares(
        &self,
        symbol: &str,
        quantity: u64,
    ) -> Result<TransactionRecord, SharedLedgerError> {
        self.with(|ledger| ledger.sell_shares(symbol, quantity).cloned())
    }

    pub fn cash_balance(&self) -> Result<Amount, SharedLedgerError> {
        self.with(|ledger| Ok(ledger.cash_balance()))
    }

    pub fn portfolio_value(&self) -> Result<Amount, SharedLedgerError> {
        self.with(|ledger| ledger.portfolio_value())
    }

    pub fn profit_loss(&self) -> Result<Amount, SharedLedgerError> {
        self.with(|ledger| ledger.profit_loss())
    }

    pub fn holdings(&self) -> Result<BTreeMap<Symbol, u64>, SharedLedgerError> {
        self.with(|ledger| Ok(ledger.holdings()))
    }

    pub fn transaction_history(&self) -> Result<Vec<TransactionRecord>, SharedLedgerError> {
        self.with(|ledger| Ok(ledger.transaction_history().to_vec()))
    }

    pub fn statement(&self) -> Result<AccountStatement, SharedLedgerError> {
        self.with(|ledger| ledger.statement())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn shared(initial: i64) -> SharedLedger {
        let ledger = Ledger::open("Desk", Amount::from(initial), StaticPriceTable::reference())
            .unwrap();
        SharedLedger::new(ledger)
    }

    #[test]
    fn concurrent_buys_never_overdraw() {
        // 10 threads race for 20 AAPL purchases; 1500 only funds 10 of them.
        let desk = shared(1500);

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let desk = desk.clone();
                thread::spawn(move || {
                    (0..2)
                        .filter(|_| desk.buy_shares("AAPL", 1).is_ok())
                        .count()
                })
            })
            .collect();
        let filled: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        assert_eq!(filled, 10);
        assert_eq!(desk.cash_balance().unwrap(), Amount::ZERO);
        let holdings = desk.holdings().unwrap();
        assert_eq!(holdings.values().copied().sum::<u64>(), 10);
        assert_eq!(desk.transaction_history().unwrap().len(), 10);
    }

    #[test]
    fn concurrent_withdrawals_respect_the_balance() {
        let desk = shared(1000);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let desk = desk.clone();
                thread::spawn(move || desk.withdraw(Amount::from(300)))
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let accepted = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(accepted, 3);
        assert!(results.iter().filter_map(|r| r.as_ref().err()).all(|e| matches!(
            e,
            SharedLedgerError::Domain(DomainError::InsufficientFunds { .. })
        )));
        assert_eq!(desk.cash_balance().unwrap(), Amount::from(100));
    }

    #[test]
    fn domain_errors_pass_through() {
        let desk = shared(100);
        let err = desk.sell_shares("TSLA", 1).unwrap_err();
        assert!(matches!(
            err,
            SharedLedgerError::Domain(DomainError::InsufficientShares { .. })
        ));
    }

    #[test]
    fn poisoned_lock_is_reported() {
        let desk = shared(100);
        let poisoner = desk.clone();
        let _ = thread::spawn(move || {
            let _ = poisoner.with(|_| -> Result<(), DomainError> { panic!("boom") });
        })
        .join();

        assert_eq!(desk.cash_balance().unwrap_err(), SharedLedgerError::Poisoned);
    }
}
