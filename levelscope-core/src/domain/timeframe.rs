//! Bar timeframe and the scoring weights tied to it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ParseError;

/// Timeframe a bar series was sampled at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "1H")]
    H1,
    #[serde(rename = "2H")]
    H2,
    #[serde(rename = "4H")]
    H4,
    #[serde(rename = "1D")]
    D1,
    #[serde(rename = "1W")]
    W1,
    #[serde(rename = "1M")]
    Mn1,
    #[serde(rename = "3M")]
    Q1,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::M5 => "5m",
            Timeframe::M15 => "15m",
            Timeframe::H1 => "1H",
            Timeframe::H2 => "2H",
            Timeframe::H4 => "4H",
            Timeframe::D1 => "1D",
            Timeframe::W1 => "1W",
            Timeframe::Mn1 => "1M",
            Timeframe::Q1 => "3M",
        }
    }

    /// Points a level earns for the timeframe it was found on (5..=20).
    pub fn confidence_weight(&self) -> f64 {
        match self {
            Timeframe::D1 => 10.0,
            Timeframe::W1 => 15.0,
            Timeframe::Mn1 | Timeframe::Q1 => 20.0,
            _ => 5.0,
        }
    }

    /// Days since the last touch for a level to count as recent.
    pub fn recency_window_days(&self) -> i64 {
        match self {
            Timeframe::D1 => 90,
            _ => 365,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "1M" is a month, "1m" would be a minute; only the month is supported.
        match s.trim() {
            "1M" | "1mo" | "1MO" | "monthly" | "Monthly" => return Ok(Timeframe::Mn1),
            "3M" | "3mo" | "3MO" | "quarterly" | "Quarterly" => return Ok(Timeframe::Q1),
            _ => {}
        }
        match s.trim().to_ascii_lowercase().as_str() {
            "5m" => Ok(Timeframe::M5),
            "15m" => Ok(Timeframe::M15),
            "1h" | "60m" => Ok(Timeframe::H1),
            "2h" => Ok(Timeframe::H2),
            "4h" => Ok(Timeframe::H4),
            "1d" | "d" | "daily" => Ok(Timeframe::D1),
            "1w" | "1wk" | "w" | "weekly" => Ok(Timeframe::W1),
            _ => Err(ParseError::new("timeframe", s)),
        }
    }
}
