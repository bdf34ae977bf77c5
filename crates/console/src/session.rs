//! A console session: one ledger, text in, text out.

use core::fmt;
use std::collections::BTreeMap;

use tradeledger_account::{Ledger, LedgerConfig, StaticPriceTable};
use tradeledger_core::{Amount, DomainError, DomainResult, Symbol};

use crate::request::{ParseError, Request, USAGE};

/// Outcome of one console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Ok(String),
    Error { code: &'static str, message: String },
    Quit,
}

impl Reply {
    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error { .. })
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ok(text) => f.write_str(text),
            Reply::Error { message, .. } => f.write_str(message),
            Reply::Quit => f.write_str("Goodbye."),
        }
    }
}

pub struct Session {
    ledger: Ledger<StaticPriceTable>,
}

impl Session {
    pub const OWNER_ENV: &'static str = "TRADELEDGER_OWNER";
    pub const INITIAL_DEPOSIT_ENV: &'static str = "TRADELEDGER_INITIAL_DEPOSIT";

    pub fn new(ledger: Ledger<StaticPriceTable>) -> Self {
        Self { ledger }
    }

    pub fn from_env() -> DomainResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Opens a session against the reference price table.
    ///
    /// Owner defaults to `Trader` and the initial deposit to `1000.0`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DomainResult<Self> {
        let owner = lookup(Self::OWNER_ENV).unwrap_or_else(|| "Trader".to_string());
        let initial_deposit = match lookup(Self::INITIAL_DEPOSIT_ENV) {
            None => default_initial_deposit(),
            Some(raw) => raw.parse::<Amount>().unwrap_or_else(|err: DomainError| {
                tracing::warn!(
                    key = Self::INITIAL_DEPOSIT_ENV,
                    value = %raw,
                    error = %err,
                    "ignoring invalid initial deposit; using 1000.0"
                );
                default_initial_deposit()
            }),
        };

        let ledger = Ledger::open_with_config(
            owner,
            initial_deposit,
            StaticPriceTable::reference(),
            LedgerConfig::from_lookup(lookup),
        )?;
        Ok(Self::new(ledger))
    }

    pub fn ledger(&self) -> &Ledger<StaticPriceTable> {
        &self.ledger
    }

    pub fn handle_line(&mut self, line: &str) -> Reply {
        match line.parse::<Request>() {
            Ok(request) => self.handle(request),
            Err(err) => parse_error_reply(err),
        }
    }

    pub fn handle(&mut self, request: Request) -> Reply {
        match self.respond(request) {
            Ok(reply) => reply,
            Err(err) => domain_error_reply(err),
        }
    }

    fn respond(&mut self, request: Request) -> DomainResult<Reply> {
        let text = match request {
            Request::Deposit(amount) => {
                self.ledger.deposit(amount)?;
                format!(
                    "Successfully deposited ${amount:.2}. Current balance: ${:.2}",
                    self.ledger.cash_balance()
                )
            }
            Request::Withdraw(amount) => {
                self.ledger.withdraw(amount)?;
                format!(
                    "Successfully withdrew ${amount:.2}. Current balance: ${:.2}",
                    self.ledger.cash_balance()
                )
            }
            Request::Buy { symbol, quantity } => {
                let symbol = traded_symbol(self.ledger.buy_shares(&symbol, quantity)?.kind.symbol());
                format!(
                    "Successfully bought {quantity} of {symbol}. Current Portfolio: {}",
                    render_holdings(&self.ledger.holdings())
                )
            }
            Request::Sell { symbol, quantity } => {
                let symbol = traded_symbol(self.ledger.sell_shares(&symbol, quantity)?.kind.symbol());
                format!(
                    "Successfully sold {quantity} of {symbol}. Current Portfolio: {}",
                    render_holdings(&self.ledger.holdings())
                )
            }
            Request::Value => {
                format!("Total Portfolio Value: ${:.2}", self.ledger.portfolio_value()?)
            }
            Request::ProfitLoss => format!("Profit/Loss: ${:.2}", self.ledger.profit_loss()?),
            Request::Holdings => render_holdings(&self.ledger.holdings()),
            Request::History => self.render_history(),
            Request::Statement => {
                let statement = self.ledger.statement()?;
                serde_json::to_string_pretty(&statement)
                    .map_err(|e| DomainError::invariant(format!("statement not serializable: {e}")))?
            }
            Request::Prices => self
                .ledger
                .oracle()
                .iter()
                .map(|(symbol, price)| format!("{symbol}: ${price:.2}"))
                .collect::<Vec<_>>()
                .join("\n"),
            Request::Help => USAGE.to_string(),
            Request::Quit => return Ok(Reply::Quit),
        };
        Ok(Reply::Ok(text))
    }

    fn render_history(&self) -> String {
        let history = self.ledger.transaction_history();
        if history.is_empty() {
            return "No transactions yet.".to_string();
        }
        history
            .iter()
            .map(|record| format!("{}. {record}", record.sequence))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn default_initial_deposit() -> Amount {
    Amount::from(1000)
}

fn traded_symbol(symbol: Option<&Symbol>) -> String {
    symbol.map(ToString::to_string).unwrap_or_default()
}

/// `{AAPL: 2, TSLA: 1}`; `{}` when nothing is held.
fn render_holdings(holdings: &BTreeMap<Symbol, u64>) -> String {
    let entries = holdings
        .iter()
        .map(|(symbol, quantity)| format!("{symbol}: {quantity}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{entries}}}")
}

fn domain_error_code(err: &DomainError) -> &'static str {
    match err {
        DomainError::InvalidAmount(_) => "invalid_amount",
        DomainError::InsufficientFunds { .. } => "insufficient_funds",
        DomainError::InsufficientShares { .. } => "insufficient_shares",
        DomainError::UnknownSymbol(_) => "unknown_symbol",
        DomainError::InvalidQuantity(_) => "invalid_quantity",
        DomainError::InvalidSymbol(_) => "invalid_symbol",
        DomainError::Validation(_) => "validation_error",
        DomainError::InvariantViolation(_) => "invariant_violation",
        DomainError::InvalidId(_) => "invalid_id",
        DomainError::Overflow(_) => "overflow",
        DomainError::NotFound => "not_found",
        DomainError::Conflict(_) => "conflict",
    }
}

fn domain_error_reply(err: DomainError) -> Reply {
    Reply::Error {
        code: domain_error_code(&err),
        message: err.to_string(),
    }
}

fn parse_error_reply(err: ParseError) -> Reply {
    Reply::Error {
        code: "parse_error",
        message: format!("{err} (type `help` for commands)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn session() -> Session {
        Session::from_lookup(|_| None).unwrap()
    }

    fn ok(reply: Reply) -> String {
        match reply {
            Reply::Ok(text) => text,
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn defaults_to_a_trader_with_one_thousand() {
        let session = session();
        assert_eq!(session.ledger().owner(), "Trader");
        assert_eq!(session.ledger().cash_balance(), Amount::from(1000));
    }

    #[test]
    fn environment_overrides_owner_deposit_and_policy() {
        let env: HashMap<&str, &str> = HashMap::from([
            (Session::OWNER_ENV, "Ada"),
            (Session::INITIAL_DEPOSIT_ENV, "250.5"),
            (LedgerConfig::UNKNOWN_SYMBOLS_ENV, "zero-price"),
        ]);
        let mut session =
            Session::from_lookup(|key| env.get(key).map(|v| v.to_string())).unwrap();

        assert_eq!(session.ledger().owner(), "Ada");
        assert_eq!(
            ok(session.handle_line("value")),
            "Total Portfolio Value: $250.50"
        );
        assert_eq!(
            ok(session.handle_line("buy free 3")),
            "Successfully bought 3 of FREE. Current Portfolio: {FREE: 3}"
        );
    }

    #[test]
    fn unparseable_initial_deposit_falls_back() {
        let session = Session::from_lookup(|key| {
            (key == Session::INITIAL_DEPOSIT_ENV).then(|| "a lot".to_string())
        })
        .unwrap();
        assert_eq!(session.ledger().cash_balance(), Amount::from(1000));
    }

    #[test]
    fn cash_messages_show_two_decimals() {
        let mut session = session();
        assert_eq!(
            ok(session.handle_line("deposit 100")),
            "Successfully deposited $100.00. Current balance: $1100.00"
        );
        assert_eq!(
            ok(session.handle_line("withdraw 0.5")),
            "Successfully withdrew $0.50. Current balance: $1099.50"
        );
    }

    #[test]
    fn trades_echo_the_portfolio() {
        let mut session = session();
        assert_eq!(
            ok(session.handle_line("buy aapl 2")),
            "Successfully bought 2 of AAPL. Current Portfolio: {AAPL: 2}"
        );
        assert_eq!(
            ok(session.handle_line("sell AAPL 2")),
            "Successfully sold 2 of AAPL. Current Portfolio: {}"
        );
        assert_eq!(ok(session.handle_line("holdings")), "{}");
    }

    #[test]
    fn reports_value_and_profit_loss() {
        let mut session = session();
        session.handle_line("buy TSLA 1");
        assert_eq!(
            ok(session.handle_line("value")),
            "Total Portfolio Value: $1000.00"
        );
        assert_eq!(ok(session.handle_line("pnl")), "Profit/Loss: $0.00");
    }

    #[test]
    fn history_is_numbered() {
        let mut session = session();
        assert_eq!(ok(session.handle_line("history")), "No transactions yet.");

        session.handle_line("deposit 500");
        session.handle_line("buy AAPL 2");
        assert_eq!(
            ok(session.handle_line("history")),
            "1. Deposited: 500\n2. Bought 2 of AAPL at 150 each"
        );
    }

    #[test]
    fn domain_errors_carry_a_code() {
        let mut session = session();
        let reply = session.handle_line("buy AAPL 10");
        assert!(reply.is_error());
        assert!(matches!(
            reply,
            Reply::Error {
                code: "insufficient_funds",
                ..
            }
        ));
        assert_eq!(
            reply.to_string(),
            "insufficient funds: requested 1500, available 1000"
        );

        let reply = session.handle_line("sell TSLA 1");
        assert!(matches!(
            reply,
            Reply::Error {
                code: "insufficient_shares",
                ..
            }
        ));

        let reply = session.handle_line("buy MSFT 1");
        assert!(matches!(
            reply,
            Reply::Error {
                code: "unknown_symbol",
                ..
            }
        ));
    }

    #[test]
    fn parse_errors_point_at_help() {
        let mut session = session();
        let reply = session.handle_line("buy AAPL two");
        assert!(matches!(
            reply,
            Reply::Error {
                code: "parse_error",
                ..
            }
        ));
        assert!(reply.to_string().ends_with("(type `help` for commands)"));
    }

    #[test]
    fn statement_is_json() {
        let mut session = session();
        session.handle_line("buy GOOGL 0");
        let text = ok(session.handle_line("statement"));
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["owner"], "Trader");
        assert_eq!(json["transaction_count"], 0);
    }

    #[test]
    fn prices_and_quit() {
        let mut session = session();
        assert_eq!(
            ok(session.handle_line("prices")),
            "AAPL: $150.00\nGOOGL: $2800.00\nTSLA: $700.00"
        );
        assert_eq!(session.handle_line("quit"), Reply::Quit);
    }
}
