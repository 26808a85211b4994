//! Engine configuration.
//!
//! Every threshold the engine uses lives here with its default. The config is
//! passed explicitly into each call; nothing is read from global state. Missing
//! TOML sections or keys fall back to the defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::GradeScale;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Feature library periods and bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub atr_period: usize,
    pub rsi_period: usize,
    pub adx_period: usize,
    pub ema_fast: usize,
    pub ema_slow: usize,
    /// Fractional dead-band around EMA for the EMA bias.
    pub ema_bias_band: f64,
    pub volume_period: usize,
    /// Bars examined by structure bias.
    pub structure_lookback: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            atr_period: 14,
            rsi_period: 14,
            adx_period: 14,
            ema_fast: 20,
            ema_slow: 50,
            ema_bias_band: 0.002,
            volume_period: 20,
            structure_lookback: 60,
        }
    }
}

/// Swing-cluster reaction levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactionConfig {
    pub swing_window: usize,
    pub cluster_factor: f64,
    /// Levels kept per side.
    pub max_levels: usize,
    /// Bars averaged for the market volume baseline.
    pub market_volume_period: usize,
}

impl Default for ReactionConfig {
    fn default() -> Self {
        Self {
            swing_window: 2,
            cluster_factor: 0.5,
            max_levels: 4,
            market_volume_period: 50,
        }
    }
}

/// Structural demand/supply zones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuralConfig {
    /// Newest bars analysed.
    pub window: usize,
    pub atr_period: usize,
    /// Bars before the impulse averaged for its volume test.
    pub volume_lookback: usize,
    pub impulse_body_atr: f64,
    pub impulse_volume_mult: f64,
    /// Largest adverse wick as a fraction of the impulse range.
    pub max_wick_ratio: f64,
    pub base_body_atr: f64,
    /// Overlap fraction of the narrower zone above which zones merge.
    pub merge_overlap: f64,
    /// Touch count at which a zone is considered exhausted.
    pub max_touches: usize,
    /// Age in bars beyond which strength is halved.
    pub decay_age: usize,
}

impl Default for StructuralConfig {
    fn default() -> Self {
        Self {
            window: 200,
            atr_period: 14,
            volume_lookback: 20,
            impulse_body_atr: 1.5,
            impulse_volume_mult: 1.5,
            max_wick_ratio: 0.2,
            base_body_atr: 0.6,
            merge_overlap: 0.5,
            max_touches: 3,
            decay_age: 150,
        }
    }
}

/// Pivot consolidation levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwingLevelConfig {
    pub pivot_window: usize,
    /// Fractional distance from the running cluster mean that still merges.
    pub merge_pct: f64,
    pub max_levels: usize,
}

impl Default for SwingLevelConfig {
    fn default() -> Self {
        Self {
            pivot_window: 3,
            merge_pct: 0.01,
            max_levels: 3,
        }
    }
}

/// Regime thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeConfig {
    pub min_bars: usize,
    pub strong_adx: f64,
    pub weak_adx: f64,
}

impl Default for RegimeConfig {
    fn default() -> Self {
        Self {
            min_bars: 50,
            strong_adx: 25.0,
            weak_adx: 18.0,
        }
    }
}

/// Strategy scoring guards and geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub grade_scale: GradeScale,
    /// 20-bar average volume below this caps confidence.
    pub liquidity_floor: f64,
    pub liquidity_cap: u8,
    pub liquidity_period: usize,
    /// Confidence ceiling for swing setups with no resistance overhead.
    pub blue_sky_cap: u8,
    /// Max distance above the nearest support that counts as a pullback.
    pub pullback_pct: f64,
    /// Max distance from a level that counts as a retest.
    pub retest_pct: f64,
    pub level_stop_atr: f64,
    pub zone_stop_atr: f64,
    /// Stop distance below CMP when there is no support.
    pub fallback_stop_pct: f64,
    /// Target distance above CMP when there is no resistance.
    pub fallback_target_pct: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            grade_scale: GradeScale::Standard,
            liquidity_floor: 200_000.0,
            liquidity_cap: 55,
            liquidity_period: 20,
            blue_sky_cap: 60,
            pullback_pct: 0.015,
            retest_pct: 0.005,
            level_stop_atr: 0.5,
            zone_stop_atr: 0.3,
            fallback_stop_pct: 0.02,
            fallback_target_pct: 0.05,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub indicators: IndicatorConfig,
    pub reaction: ReactionConfig,
    pub structural: StructuralConfig,
    pub swing_levels: SwingLevelConfig,
    pub regime: RegimeConfig,
    pub scoring: ScoringConfig,
}

impl EngineConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values no analysis can run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let periods = [
            ("indicators.atr_period", self.indicators.atr_period),
            ("indicators.rsi_period", self.indicators.rsi_period),
            ("indicators.adx_period", self.indicators.adx_period),
            ("indicators.ema_fast", self.indicators.ema_fast),
            ("indicators.ema_slow", self.indicators.ema_slow),
            ("indicators.volume_period", self.indicators.volume_period),
            ("reaction.swing_window", self.reaction.swing_window),
            ("reaction.max_levels", self.reaction.max_levels),
            ("reaction.market_volume_period", self.reaction.market_volume_period),
            ("structural.window", self.structural.window),
            ("structural.atr_period", self.structural.atr_period),
            ("structural.volume_lookback", self.structural.volume_lookback),
            ("structural.max_touches", self.structural.max_touches),
            ("swing_levels.pivot_window", self.swing_levels.pivot_window),
            ("swing_levels.max_levels", self.swing_levels.max_levels),
            ("scoring.liquidity_period", self.scoring.liquidity_period),
        ];
        for (field, value) in periods {
            if value == 0 {
                return Err(invalid(field, "must be at least 1"));
            }
        }

        let factors = [
            ("reaction.cluster_factor", self.reaction.cluster_factor),
            ("structural.impulse_body_atr", self.structural.impulse_body_atr),
            ("structural.impulse_volume_mult", self.structural.impulse_volume_mult),
            ("structural.base_body_atr", self.structural.base_body_atr),
            ("swing_levels.merge_pct", self.swing_levels.merge_pct),
        ];
        for (field, value) in factors {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, &format!("must be positive, got {value}")));
            }
        }

        let fractions = [
            ("indicators.ema_bias_band", self.indicators.ema_bias_band),
            ("structural.max_wick_ratio", self.structural.max_wick_ratio),
            ("structural.merge_overlap", self.structural.merge_overlap),
            ("scoring.pullback_pct", self.scoring.pullback_pct),
            ("scoring.retest_pct", self.scoring.retest_pct),
            ("scoring.fallback_stop_pct", self.scoring.fallback_stop_pct),
            ("scoring.fallback_target_pct", self.scoring.fallback_target_pct),
        ];
        for (field, value) in fractions {
            if !(0.0..1.0).contains(&value) {
                return Err(invalid(field, &format!("must be in [0, 1), got {value}")));
            }
        }

        // The base reaches three bars back from the impulse.
        if self.structural.volume_lookback < 3 {
            return Err(invalid("structural.volume_lookback", "must be at least 3"));
        }
        if self.regime.weak_adx > self.regime.strong_adx {
            return Err(invalid(
                "regime.weak_adx",
                "must not exceed regime.strong_adx",
            ));
        }
        if self.scoring.liquidity_cap > 100 || self.scoring.blue_sky_cap > 100 {
            return Err(invalid("scoring", "confidence caps must be at most 100"));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
