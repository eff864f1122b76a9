//! Small closed enumerations used throughout the trade request/result model.

use std::fmt;
use std::str::FromStr;

/// The two option instrument shapes the engine supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionType {
    /// Fixed-duration option: closes at `open_date + duration`.
    Sprint,
    /// Fixed wall-clock expiry option: closes at a calendar-aligned `expiry_time`.
    Classic,
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Sprint => write!(f, "SPRINT"),
            OptionType::Classic => write!(f, "CLASSIC"),
        }
    }
}

/// Error returned when parsing an [`OptionType`] from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionTypeParseError(pub String);

impl fmt::Display for OptionTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid option type: {}", self.0)
    }
}

impl std::error::Error for OptionTypeParseError {}

impl FromStr for OptionType {
    type Err = OptionTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SPRINT" => Ok(OptionType::Sprint),
            "CLASSIC" => Ok(OptionType::Classic),
            other => Err(OptionTypeParseError(other.to_string())),
        }
    }
}

/// Order direction for a trade request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderDirection {
    /// Wins if the close price is above the open price.
    Buy,
    /// Wins if the close price is below the open price.
    Sell,
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderDirection::Buy => write!(f, "BUY"),
            OrderDirection::Sell => write!(f, "SELL"),
        }
    }
}

/// The account type a request targets, or that a snapshot describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccountType {
    /// Demo / paper account.
    Demo,
    /// Real-money account.
    Real,
    /// Resolved from the capability provider at admission time.
    #[default]
    Unknown,
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountType::Demo => write!(f, "DEMO"),
            AccountType::Real => write!(f, "REAL"),
            AccountType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// The settlement currency of a request, result or snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CurrencyType {
    /// US Dollar.
    Usd,
    /// Euro.
    Eur,
    /// British Pound.
    Gbp,
    /// Resolved from the capability provider at admission time.
    #[default]
    Unknown,
}

impl fmt::Display for CurrencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurrencyType::Usd => write!(f, "USD"),
            CurrencyType::Eur => write!(f, "EUR"),
            CurrencyType::Gbp => write!(f, "GBP"),
            CurrencyType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}
