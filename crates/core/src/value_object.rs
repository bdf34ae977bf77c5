//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity: two instances with the same attributes are
/// interchangeable. `Amount` and `Symbol` are the value objects of this
/// domain; a `TradingAccount` is not (it has an `AccountId`).
///
/// Implementors are immutable. To "modify" one, build a new value.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
