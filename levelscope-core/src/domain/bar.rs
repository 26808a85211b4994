//! Bar: the fundamental market data unit.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OHLCV bar for a single symbol and timeframe.
///
/// Bars are produced by the external data collaborator, ascending by
/// timestamp with no duplicates. The engine only ever reads them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Returns true if any OHLC field is NaN (void bar).
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }

    /// Basic OHLC sanity check: high >= low, high >= open, high >= close, etc.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.low > 0.0
    }

    /// Absolute candle body size.
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Full high-low range.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    pub fn body_top(&self) -> f64 {
        self.open.max(self.close)
    }

    pub fn body_bottom(&self) -> f64 {
        self.open.min(self.close)
    }

    pub fn upper_wick(&self) -> f64 {
        self.high - self.body_top()
    }

    pub fn lower_wick(&self) -> f64 {
        self.body_bottom() - self.low
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}

/// Structural problems with a bar series handed to the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BarError {
    #[error("bar series is empty")]
    Empty,

    #[error("timestamps not strictly increasing at bar {index}: {previous} then {current}")]
    NotAscending {
        index: usize,
        previous: NaiveDateTime,
        current: NaiveDateTime,
    },

    #[error("bar {index} has a non-positive or missing price")]
    InvalidPrice { index: usize },

    #[error("bar {index} violates OHLC ordering (high {high}, low {low})")]
    Inconsistent { index: usize, high: f64, low: f64 },
}

/// Check the series invariants: strictly increasing timestamps, all prices > 0,
/// and coherent OHLC ordering on every bar.
pub fn validate_bars(bars: &[Bar]) -> Result<(), BarError> {
    if bars.is_empty() {
        return Err(BarError::Empty);
    }

    for (index, bar) in bars.iter().enumerate() {
        if bar.is_void() || bar.open <= 0.0 || bar.close <= 0.0 || bar.low <= 0.0 {
            return Err(BarError::InvalidPrice { index });
        }
        if !bar.is_sane() {
            return Err(BarError::Inconsistent {
                index,
                high: bar.high,
                low: bar.low,
            });
        }
        if index > 0 {
            let previous = bars[index - 1].timestamp;
            if bar.timestamp <= previous {
                return Err(BarError::NotAscending {
                    index,
                    previous,
                    current: bar.timestamp,
                });
            }
        }
    }

    Ok(())
}

/// Parse a timestamp in any of the layouts the data collaborator emits:
/// `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS[.f]`, or RFC 3339.
///
/// Returns `None` for anything else; callers treat that as "unknown".
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for layout in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, layout) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Serde adapter for optional timestamps that must never fail deserialization.
///
/// Unparsable strings become `None`, so recency scoring simply skips them.
pub mod lenient_timestamp {
    use super::parse_timestamp;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_some(&ts.format("%Y-%m-%dT%H:%M:%S").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
        Ok(match raw {
            Some(serde_json::Value::String(s)) => parse_timestamp(&s),
            _ => None,
        })
    }
}
