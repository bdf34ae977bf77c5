//! Parsing of console input lines.

use core::str::FromStr;

use thiserror::Error;

use tradeledger_core::Amount;

/// One console command.
///
/// Symbols stay as raw text; the ledger normalizes and validates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Deposit(Amount),
    Withdraw(Amount),
    Buy { symbol: String, quantity: u64 },
    Sell { symbol: String, quantity: u64 },
    Value,
    ProfitLoss,
    Holdings,
    History,
    Statement,
    Prices,
    Help,
    Quit,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("{command}: missing <{argument}>")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("{command}: unexpected argument '{extra}'")]
    UnexpectedArgument { command: &'static str, extra: String },

    #[error("invalid {argument} '{value}': {reason}")]
    InvalidArgument {
        argument: &'static str,
        value: String,
        reason: String,
    },
}

pub const USAGE: &str = "\
commands:
  deposit <amount>        add cash
  withdraw <amount>       remove cash
  buy <symbol> <qty>      buy shares at the current price
  sell <symbol> <qty>     sell shares at the current price
  value                   total portfolio value
  pnl                     profit/loss
  holdings                current holdings
  history                 transaction history
  statement               full statement as JSON
  prices                  quoted symbols
  help                    this text
  quit                    leave";

impl FromStr for Request {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = words.next().ok_or(ParseError::Empty)?.to_ascii_lowercase();

        let request = match command.as_str() {
            "deposit" => Request::Deposit(amount(&mut words, "deposit")?),
            "withdraw" => Request::Withdraw(amount(&mut words, "withdraw")?),
            "buy" => {
                let symbol = required(&mut words, "buy", "symbol")?.to_string();
                let quantity = quantity(&mut words, "buy")?;
                Request::Buy { symbol, quantity }
            }
            "sell" => {
                let symbol = required(&mut words, "sell", "symbol")?.to_string();
                let quantity = quantity(&mut words, "sell")?;
                Request::Sell { symbol, quantity }
            }
            "value" | "portfolio" => Request::Value,
            "pnl" | "profit" => Request::ProfitLoss,
            "holdings" => Request::Holdings,
            "history" => Request::History,
            "statement" => Request::Statement,
            "prices" => Request::Prices,
            "help" | "?" => Request::Help,
            "quit" | "exit" => Request::Quit,
            _ => return Err(ParseError::UnknownCommand(command)),
        };

        match words.next() {
            Some(extra) => Err(ParseError::UnexpectedArgument {
                command: request.name(),
                extra: extra.to_string(),
            }),
            None => Ok(request),
        }
    }
}

impl Request {
    pub fn name(&self) -> &'static str {
        match self {
            Request::Deposit(_) => "deposit",
            Request::Withdraw(_) => "withdraw",
            Request::Buy { .. } => "buy",
            Request::Sell { .. } => "sell",
            Request::Value => "value",
            Request::ProfitLoss => "pnl",
            Request::Holdings => "holdings",
            Request::History => "history",
            Request::Statement => "statement",
            Request::Prices => "prices",
            Request::Help => "help",
            Request::Quit => "quit",
        }
    }
}

fn required<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, ParseError> {
    words
        .next()
        .ok_or(ParseError::MissingArgument { command, argument })
}

fn amount<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
) -> Result<Amount, ParseError> {
    let raw = required(words, command, "amount")?;
    raw.trim_start_matches('$')
        .parse()
        .map_err(|err: tradeledger_core::DomainError| ParseError::InvalidArgument {
            argument: "amount",
            value: raw.to_string(),
            reason: err.to_string(),
        })
}

fn quantity<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
) -> Result<u64, ParseError> {
    let raw = required(words, command, "qty")?;
    raw.parse().map_err(|err: core::num::ParseIntError| ParseError::InvalidArgument {
        argument: "qty",
        value: raw.to_string(),
        reason: err.to_string(),
    })
}
