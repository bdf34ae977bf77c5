//! Price lookup capability.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use tradeledger_core::{Amount, DomainError, DomainResult, Symbol};

/// Source of current share prices, keyed by symbol.
///
/// Lookups are synchronous and side-effect free. A live feed can sit behind
/// this trait as long as it answers from a local snapshot.
pub trait PriceOracle {
    /// Current price, or `None` when the symbol is not known to the oracle.
    fn quote(&self, symbol: &Symbol) -> Option<Amount>;

    /// Current price with unknown symbols priced at zero.
    fn price(&self, symbol: &Symbol) -> Amount {
        self.quote(symbol).unwrap_or(Amount::ZERO)
    }
}

impl<T: PriceOracle + ?Sized> PriceOracle for &T {
    fn quote(&self, symbol: &Symbol) -> Option<Amount> {
        (**self).quote(symbol)
    }
}

impl<T: PriceOracle + ?Sized> PriceOracle for Arc<T> {
    fn quote(&self, symbol: &Symbol) -> Option<Amount> {
        (**self).quote(symbol)
    }
}

impl<T: PriceOracle + ?Sized> PriceOracle for Box<T> {
    fn quote(&self, symbol: &Symbol) -> Option<Amount> {
        (**self).quote(symbol)
    }
}

/// Fixed symbol → price table.
///
/// `StaticPriceTable::reference()` (also the `Default`) quotes
/// AAPL 150, TSLA 700 and GOOGL 2800. Prices are never negative; that
/// includes tables read through serde, which go through [`insert`](Self::insert).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<Symbol, Amount>",
    into = "BTreeMap<Symbol, Amount>"
)]
pub struct StaticPriceTable {
    prices: BTreeMap<Symbol, Amount>,
}

impl StaticPriceTable {
    /// An empty table; every symbol is unknown.
    pub fn new() -> Self {
        Self {
            prices: BTreeMap::new(),
        }
    }

    pub fn reference() -> Self {
        let prices = [("AAPL", 150), ("TSLA", 700), ("GOOGL", 2800)]
            .into_iter()
            .filter_map(|(raw, price)| Symbol::parse(raw).ok().map(|s| (s, Amount::from(price))))
            .collect();
        Self { prices }
    }

    /// Sets the price of `symbol`, returning the previous one.
    pub fn insert(&mut self, symbol: Symbol, price: Amount) -> DomainResult<Option<Amount>> {
        if price.is_negative() {
            return Err(DomainError::invalid_amount(format!(
                "price of {symbol} cannot be negative (got {price})"
            )));
        }
        Ok(self.prices.insert(symbol, price))
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_price(mut self, symbol: Symbol, price: Amount) -> DomainResult<Self> {
        self.insert(symbol, price)?;
        Ok(self)
    }

    pub fn remove(&mut self, symbol: &Symbol) -> Option<Amount> {
        self.prices.remove(symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, Amount)> {
        self.prices.iter().map(|(s, p)| (s, *p))
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl TryFrom<BTreeMap<Symbol, Amount>> for StaticPriceTable {
    type Error = DomainError;

    fn try_from(prices: BTreeMap<Symbol, Amount>) -> Result<Self, Self::Error> {
        prices
            .into_iter()
            .try_fold(Self::new(), |table, (symbol, price)| table.with_price(symbol, price))
    }
}

impl From<StaticPriceTable> for BTreeMap<Symbol, Amount> {
    fn from(table: StaticPriceTable) -> Self {
        table.prices
    }
}

impl Default for StaticPriceTable {
    fn default() -> Self {
        Self::reference()
    }
}

impl PriceOracle for StaticPriceTable {
    fn quote(&self, symbol: &Symbol) -> Option<Amount> {
        self.prices.get(symbol).copied()
    }
}
