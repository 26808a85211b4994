//! Dashboard summary helpers.

use serde::{Deserialize, Serialize};

use crate::domain::EmaBias;

/// Nearest support/resistance for the summary line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryLevels {
    pub nearest_support: Option<f64>,
    pub nearest_resistance: Option<f64>,
}

/// Pick the nearest levels around `cmp`, preferring the primary timeframe and
/// falling back to higher-timeframe prices when a side has nothing usable.
pub fn resolve_summary_levels(cmp: f64, primary: &[f64], higher_tf: &[f64]) -> SummaryLevels {
    let below = |prices: &[f64]| {
        prices
            .iter()
            .copied()
            .filter(|p| *p < cmp)
            .fold(None, |acc: Option<f64>, p| Some(acc.map_or(p, |a| a.max(p))))
    };
    let above = |prices: &[f64]| {
        prices
            .iter()
            .copied()
            .filter(|p| *p > cmp)
            .fold(None, |acc: Option<f64>, p| Some(acc.map_or(p, |a| a.min(p))))
    };

    SummaryLevels {
        nearest_support: below(primary).or_else(|| below(higher_tf)),
        nearest_resistance: above(primary).or_else(|| above(higher_tf)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalAction {
    Buy,
    Sell,
    Hold,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeSignal {
    pub action: SignalAction,
    pub reason: String,
}

/// BUY on a bullish EMA bias with reward at least 1.5× risk, SELL on caution,
/// otherwise HOLD.
pub fn trade_signal(ema_bias: EmaBias, risk_reward: Option<f64>) -> TradeSignal {
    let (action, reason) = match ema_bias {
        EmaBias::Bullish if risk_reward.is_some_and(|rr| rr >= 1.5) => {
            (SignalAction::Buy, "Bullish bias with favorable risk/reward")
        }
        EmaBias::Caution => (SignalAction::Sell, "Momentum is weak"),
        _ => (SignalAction::Hold, "Wait for better structure or confirmation"),
    };
    TradeSignal {
        action,
        reason: reason.to_string(),
    }
}
