//! Ledger behavior switches.
//!
//! Defaults are the strict settings. The alternatives reproduce the lenient
//! reference simulator: free trades in unknown symbols and a profit figure
//! pinned to zero.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use tradeledger_core::DomainError;

/// What a buy or sell does when the oracle has no quote for the symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownSymbolPolicy {
    /// Fail with `DomainError::UnknownSymbol`.
    #[default]
    Reject,
    /// Trade at price zero (purchases of unknown symbols are free).
    ZeroPrice,
}

/// Baseline that profit/loss is measured against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfitBaseline {
    /// Portfolio value minus net deposits (initial + deposits - withdrawals).
    #[default]
    NetDeposits,
    /// Portfolio value minus itself, recomputed at call time. Always zero.
    Reference,
}

impl FromStr for UnknownSymbolPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "zero-price" | "zero_price" => Ok(Self::ZeroPrice),
            other => Err(DomainError::validation(format!(
                "unknown symbol policy '{other}' (expected reject or zero-price)"
            ))),
        }
    }
}

impl core::fmt::Display for UnknownSymbolPolicy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Reject => "reject",
            Self::ZeroPrice => "zero-price",
        })
    }
}

impl FromStr for ProfitBaseline {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "net-deposits" | "net_deposits" => Ok(Self::NetDeposits),
            "reference" => Ok(Self::Reference),
            other => Err(DomainError::validation(format!(
                "profit baseline '{other}' (expected net-deposits or reference)"
            ))),
        }
    }
}

impl core::fmt::Display for ProfitBaseline {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::NetDeposits => "net-deposits",
            Self::Reference => "reference",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub unknown_symbols: UnknownSymbolPolicy,
    pub profit_baseline: ProfitBaseline,
}

impl LedgerConfig {
    pub const UNKNOWN_SYMBOLS_ENV: &'static str = "TRADELEDGER_UNKNOWN_SYMBOLS";
    pub const PROFIT_BASELINE_ENV: &'static str = "TRADELEDGER_PROFIT_BASELINE";

    /// Reads the process environment. Unset variables keep their defaults;
    /// unparseable ones are logged and also fall back.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let unknown_symbols = Self::UNKNOWN_SYMBOLS_ENV;
        let profit_baseline = Self::PROFIT_BASELINE_ENV;
        Self {
            unknown_symbols: parse_or_default(unknown_symbols, lookup(unknown_symbols)),
            profit_baseline: parse_or_default(profit_baseline, lookup(profit_baseline)),
        }
    }
}

fn parse_or_default<T>(key: &str, raw: Option<String>) -> T
where
    T: FromStr<Err = DomainError> + Default + core::fmt::Display,
{
    let Some(raw) = raw else {
        return T::default();
    };
    raw.parse().unwrap_or_else(|err: DomainError| {
        let fallback = T::default();
        tracing::warn!(%key, value = %raw, error = %err, %fallback, "ignoring invalid setting");
        fallback
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_reject_unknown_symbols_and_use_net_deposits() {
        let config = LedgerConfig::from_lookup(lookup(&[]));
        assert_eq!(config, LedgerConfig::default());
        assert_eq!(config.unknown_symbols, UnknownSymbolPolicy::Reject);
        assert_eq!(config.profit_baseline, ProfitBaseline::NetDeposits);
    }

    #[test]
    fn environment_values_are_parsed() {
        let config = LedgerConfig::from_lookup(lookup(&[
            (LedgerConfig::UNKNOWN_SYMBOLS_ENV, "Zero-Price"),
            (LedgerConfig::PROFIT_BASELINE_ENV, "reference"),
        ]));
        assert_eq!(config.unknown_symbols, UnknownSymbolPolicy::ZeroPrice);
        assert_eq!(config.profit_baseline, ProfitBaseline::Reference);
    }

    #[test]
    fn garbage_falls_back_to_defaults() {
        let config = LedgerConfig::from_lookup(lookup(&[
            (LedgerConfig::UNKNOWN_SYMBOLS_ENV, "maybe"),
            (LedgerConfig::PROFIT_BASELINE_ENV, ""),
        ]));
        assert_eq!(config, LedgerConfig::default());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for policy in [UnknownSymbolPolicy::Reject, UnknownSymbolPolicy::ZeroPrice] {
            assert_eq!(policy.to_string().parse::<UnknownSymbolPolicy>().unwrap(), policy);
        }
        for baseline in [ProfitBaseline::NetDeposits, ProfitBaseline::Reference] {
            assert_eq!(baseline.to_string().parse::<ProfitBaseline>().unwrap(), baseline);
        }
    }

    #[test]
    fn deserializes_partial_kebab_case_config() {
        let config: LedgerConfig =
            serde_json::from_str(r#"{ "unknown_symbols": "zero-price" }"#).unwrap();
        assert_eq!(config.unknown_symbols, UnknownSymbolPolicy::ZeroPrice);
        assert_eq!(config.profit_baseline, ProfitBaseline::NetDeposits);
    }
}
