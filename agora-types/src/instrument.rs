//! Tradable instruments.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AgoraError;

/// A spot currency pair such as `BTC/USDT`.
///
/// Codes are stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CurrencyPair {
    /// Base currency code (what is bought or sold).
    pub base: String,
    /// Counter currency code (what the price is quoted in).
    pub counter: String,
}

impl CurrencyPair {
    /// Build a pair from two currency codes.
    pub fn new(base: impl AsRef<str>, counter: impl AsRef<str>) -> Self {
        Self {
            base: base.as_ref().trim().to_ascii_uppercase(),
            counter: counter.as_ref().trim().to_ascii_uppercase(),
        }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.counter)
    }
}

fn non_empty_code<'a>(code: Option<&'a str>, input: &str) -> Result<&'a str, AgoraError> {
    match code.map(str::trim) {
        Some(c) if !c.is_empty() => Ok(c),
        _ => Err(AgoraError::invalid_arg(format!("malformed instrument '{input}'"))),
    }
}

impl FromStr for CurrencyPair {
    type Err = AgoraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('/');
        let base = non_empty_code(parts.next(), s)?;
        let counter = non_empty_code(parts.next(), s)?;
        if parts.next().is_some() {
            return Err(AgoraError::invalid_arg(format!(
                "expected BASE/COUNTER, got '{s}'"
            )));
        }
        Ok(Self::new(base, counter))
    }
}

/// A futures contract on a currency pair, e.g. `BTC/USDT/PERP`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FuturesContract {
    /// Underlying pair.
    pub pair: CurrencyPair,
    /// Delivery designation: `PERP` for perpetual swaps, or a delivery date code.
    pub prompt: String,
}

impl FuturesContract {
    /// Build a contract from a pair and a prompt.
    pub fn new(pair: CurrencyPair, prompt: impl AsRef<str>) -> Self {
        Self {
            pair,
            prompt: prompt.as_ref().trim().to_ascii_uppercase(),
        }
    }

    /// Perpetual contract on `pair`.
    #[must_use]
    pub fn perpetual(pair: CurrencyPair) -> Self {
        Self::new(pair, "PERP")
    }

    /// Whether this is a perpetual swap.
    #[must_use]
    pub fn is_perpetual(&self) -> bool {
        self.prompt == "PERP"
    }
}

impl fmt::Display for FuturesContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.pair, self.prompt)
    }
}

impl FromStr for FuturesContract {
    type Err = AgoraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (pair, prompt) = s.rsplit_once('/').ok_or_else(|| {
            AgoraError::invalid_arg(format!("expected BASE/COUNTER/PROMPT, got '{s}'"))
        })?;
        let prompt = non_empty_code(Some(prompt), s)?;
        Ok(Self::new(pair.parse()?, prompt))
    }
}

/// Anything an exchange lets you trade or stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Instrument {
    /// Spot currency pair.
    Spot(CurrencyPair),
    /// Futures contract.
    Future(FuturesContract),
}

impl Instrument {
    /// The underlying currency pair.
    #[must_use]
    pub const fn pair(&self) -> &CurrencyPair {
        match self {
            Self::Spot(p) => p,
            Self::Future(c) => &c.pair,
        }
    }

    /// Returns the spot pair when this is a spot instrument.
    #[must_use]
    pub const fn as_spot(&self) -> Option<&CurrencyPair> {
        match self {
            Self::Spot(p) => Some(p),
            Self::Future(_) => None,
        }
    }

    /// Returns the contract when this is a futures instrument.
    #[must_use]
    pub const fn as_future(&self) -> Option<&FuturesContract> {
        match self {
            Self::Future(c) => Some(c),
            Self::Spot(_) => None,
        }
    }
}

impl From<CurrencyPair> for Instrument {
    fn from(p: CurrencyPair) -> Self {
        Self::Spot(p)
    }
}

impl From<FuturesContract> for Instrument {
    fn from(c: FuturesContract) -> Self {
        Self::Future(c)
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spot(p) => p.fmt(f),
            Self::Future(c) => c.fmt(f),
        }
    }
}

impl FromStr for Instrument {
    type Err = AgoraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.matches('/').count() {
            1 => Ok(Self::Spot(s.parse()?)),
            2 => Ok(Self::Future(s.parse()?)),
            _ => Err(AgoraError::invalid_arg(format!("malformed instrument '{s}'"))),
        }
    }
}
