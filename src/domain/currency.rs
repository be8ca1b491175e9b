//! Currency codes supported by the ledger.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// Japanese Yen
    JPY,
    /// United States Dollar
    USD,
    /// Euro
    EUR,
}

impl Currency {
    /// Returns the ISO 4217 code for this currency.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::JPY => "JPY",
            Self::USD => "USD",
            Self::EUR => "EUR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Error produced when a currency code is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported currency: {0}")]
pub struct CurrencyParseError(pub String);

impl FromStr for Currency {
    type Err = CurrencyParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "JPY" => Ok(Self::JPY),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            other => Err(CurrencyParseError(other.to_string())),
        }
    }
}
