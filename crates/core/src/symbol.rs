//! Ticker symbols.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Ticker symbol of a tradable stock (e.g. `AAPL`).
///
/// Parsing trims surrounding whitespace and upper-cases, so `" aapl "` and
/// `"AAPL"` name the same holding. Allowed characters are ASCII letters,
/// digits, `.` and `-` (`BRK.B`, `RDS-A`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl ValueObject for Symbol {}

impl Symbol {
    pub const MAX_LEN: usize = 12;

    pub fn parse(raw: &str) -> DomainResult<Self> {
        let normalized = raw.trim().to_ascii_uppercase();

        if normalized.is_empty() {
            return Err(DomainError::InvalidSymbol("symbol cannot be empty".to_string()));
        }
        if normalized.len() > Self::MAX_LEN {
            return Err(DomainError::InvalidSymbol(format!(
                "'{normalized}' is longer than {} characters",
                Self::MAX_LEN
            )));
        }
        if let Some(bad) = normalized
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '.' || *c == '-'))
        {
            return Err(DomainError::InvalidSymbol(format!(
                "'{normalized}' contains '{bad}'"
            )));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Symbol {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Symbol {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

impl core::fmt::Display for Symbol {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        assert_eq!(Symbol::parse("  aapl ").unwrap().as_str(), "AAPL");
        assert_eq!(Symbol::parse("brk.b").unwrap().as_str(), "BRK.B");
    }

    #[test]
    fn parse_rejects_blank_and_punctuation() {
        assert!(matches!(Symbol::parse("   "), Err(DomainError::InvalidSymbol(_))));
        assert!(matches!(Symbol::parse("AA PL"), Err(DomainError::InvalidSymbol(_))));
        assert!(matches!(Symbol::parse("$AAPL"), Err(DomainError::InvalidSymbol(_))));
        assert!(matches!(
            Symbol::parse("ABCDEFGHIJKLM"),
            Err(DomainError::InvalidSymbol(_))
        ));
    }

    #[test]
    fn deserialize_goes_through_validation() {
        let ok: Symbol = serde_json::from_str("\"tsla\"").unwrap();
        assert_eq!(ok.as_str(), "TSLA");
        assert!(serde_json::from_str::<Symbol>("\"\"").is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: parsing is idempotent on its own output.
        #[test]
        fn reparsing_a_symbol_is_stable(raw in "[a-zA-Z0-9.-]{1,12}") {
            let once = Symbol::parse(&raw).unwrap();
            let twice = Symbol::parse(once.as_str()).unwrap();
            prop_assert_eq!(once, twice);
        }
    }
}
