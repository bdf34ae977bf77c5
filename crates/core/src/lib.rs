//! `tradeledger-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! aggregate traits, the domain error model, identifiers, and the money and
//! ticker value objects shared by the account ledger.

pub mod aggregate;
pub mod error;
pub mod id;
pub mod money;
pub mod symbol;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use error::{DomainError, DomainResult};
pub use id::{AccountId, TransactionId};
pub use money::Amount;
pub use symbol::Symbol;
pub use value_object::ValueObject;
