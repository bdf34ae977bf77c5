//! Line-oriented front end for a single trading account.
//!
//! Owns no ledger rules: it parses a command, calls the ledger, and renders
//! the result or the error as text.

pub mod request;
pub mod session;

pub use request::{ParseError, Request, USAGE};
pub use session::{Reply, Session};
