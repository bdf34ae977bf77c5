//! Transaction history records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tradeledger_core::{Amount, Symbol, TransactionId};

/// What a completed transaction did.
///
/// Buy and sell records carry the price at execution time. It is never
/// re-quoted afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransactionKind {
    Deposit {
        amount: Amount,
    },
    Withdrawal {
        amount: Amount,
    },
    Buy {
        symbol: Symbol,
        quantity: u64,
        price: Amount,
    },
    Sell {
        symbol: Symbol,
        quantity: u64,
        price: Amount,
    },
}

impl TransactionKind {
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Deposit { .. } => "deposit",
            TransactionKind::Withdrawal { .. } => "withdrawal",
            TransactionKind::Buy { .. } => "buy",
            TransactionKind::Sell { .. } => "sell",
        }
    }

    pub fn symbol(&self) -> Option<&Symbol> {
        match self {
            TransactionKind::Buy { symbol, .. } | TransactionKind::Sell { symbol, .. } => {
                Some(symbol)
            }
            TransactionKind::Deposit { .. } | TransactionKind::Withdrawal { .. } => None,
        }
    }

    /// Signed effect on the cash balance.
    pub fn cash_delta(&self) -> Amount {
        match self {
            TransactionKind::Deposit { amount } => *amount,
            TransactionKind::Withdrawal { amount } => Amount::ZERO - *amount,
            TransactionKind::Buy {
                quantity, price, ..
            } => Amount::ZERO - notional(*price, *quantity),
            TransactionKind::Sell {
                quantity, price, ..
            } => notional(*price, *quantity),
        }
    }
}

fn notional(price: Amount, quantity: u64) -> Amount {
    Amount::new(price.value() * Decimal::from(quantity))
}

impl core::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TransactionKind::Deposit { amount } => write!(f, "Deposited: {amount}"),
            TransactionKind::Withdrawal { amount } => write!(f, "Withdrew: {amount}"),
            TransactionKind::Buy {
                symbol,
                quantity,
                price,
            } => write!(f, "Bought {quantity} of {symbol} at {price} each"),
            TransactionKind::Sell {
                symbol,
                quantity,
                price,
            } => write!(f, "Sold {quantity} of {symbol} at {price} each"),
        }
    }
}

/// One completed mutating operation, in append order.
///
/// `sequence` starts at 1 and has no gaps: rejected operations never produce
/// a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: TransactionId,
    pub sequence: u64,
    pub occurred_at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: TransactionKind,
}

impl core::fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.kind, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn aapl() -> Symbol {
        Symbol::parse("AAPL").unwrap()
    }

    #[test]
    fn records_render_as_readable_lines() {
        let deposit = TransactionKind::Deposit {
            amount: Amount::new(dec!(500.0)),
        };
        let buy = TransactionKind::Buy {
            symbol: aapl(),
            quantity: 2,
            price: Amount::new(dec!(150.0)),
        };
        let sell = TransactionKind::Sell {
            symbol: Symbol::parse("TSLA").unwrap(),
            quantity: 1,
            price: Amount::from(700),
        };

        assert_eq!(deposit.to_string(), "Deposited: 500");
        assert_eq!(buy.to_string(), "Bought 2 of AAPL at 150 each");
        assert_eq!(sell.to_string(), "Sold 1 of TSLA at 700 each");
    }

    #[test]
    fn cash_delta_is_signed_by_direction() {
        let buy = TransactionKind::Buy {
            symbol: aapl(),
            quantity: 3,
            price: Amount::new(dec!(1.5)),
        };
        let withdrawal = TransactionKind::Withdrawal {
            amount: Amount::from(20),
        };

        assert_eq!(buy.cash_delta(), Amount::new(dec!(-4.5)));
        assert_eq!(withdrawal.cash_delta(), Amount::from(-20));
        assert_eq!(buy.symbol(), Some(&aapl()));
        assert_eq!(withdrawal.symbol(), None);
    }

    #[test]
    fn serialized_record_is_tagged_by_kind() {
        let record = TransactionRecord {
            id: TransactionId::new(),
            sequence: 1,
            occurred_at: Utc::now(),
            kind: TransactionKind::Withdrawal {
                amount: Amount::from(200),
            },
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "withdrawal");
        assert_eq!(json["sequence"], 1);
        assert_eq!(json["amount"], "200");
        assert_eq!(json["kind"], record.kind.label());
    }
}
