//! Domain error model.

use thiserror::Error;

use crate::money::Amount;
use crate::symbol::Symbol;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// One variant per failure cause so callers (the console, a service boundary)
/// can branch on the kind instead of matching message text. Every variant is
/// deterministic: retrying the same request against the same state fails the
/// same way.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A cash amount was zero, negative, or otherwise unusable.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// A withdrawal or purchase needs more cash than the account holds.
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: Amount, available: Amount },

    /// A sale asks for more shares than the account owns.
    #[error("insufficient shares of {symbol}: requested {requested}, owned {owned}")]
    InsufficientShares {
        symbol: Symbol,
        requested: u64,
        owned: u64,
    },

    /// The price oracle has no quote for the symbol.
    #[error("unknown symbol: {0}")]
    UnknownSymbol(Symbol),

    /// A share quantity was zero.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Ticker text failed to parse.
    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),

    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Decimal arithmetic left the representable range.
    #[error("arithmetic overflow: {0}")]
    Overflow(String),

    /// The command targets an aggregate that was never created.
    #[error("not found")]
    NotFound,

    /// The command conflicts with the aggregate's lifecycle (e.g. double open).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::InvalidAmount(msg.into())
    }

    pub fn invalid_quantity(msg: impl Into<String>) -> Self {
        Self::InvalidQuantity(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn overflow(msg: impl Into<String>) -> Self {
        Self::Overflow(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
