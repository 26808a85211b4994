//! Breakout quality classification.
//!
//! [`BreakoutClassifier`] is the seam: a deterministic [`HeuristicBreakout`]
//! always exists, and [`ModelBlendedBreakout`] layers an injected
//! [`BreakoutModel`] on top when one is available.

use serde::{Deserialize, Serialize};

use super::features::FeatureSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BreakoutQuality {
    LikelyGenuine,
    LikelyFake,
    Unclear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceBucket {
    High,
    Medium,
    Low,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakoutAssessment {
    pub quality: BreakoutQuality,
    pub confidence: ConfidenceBucket,
    pub reason: String,
}

pub trait BreakoutClassifier: Send + Sync {
    fn name(&self) -> &str;
    fn classify(&self, features: &FeatureSet) -> BreakoutAssessment;
}

/// A trained binary classifier: class 1 is a genuine breakout.
pub trait BreakoutModel: Send + Sync {
    /// Predicted class and its probability for
    /// `[vol_ratio, atr_expansion, dist_from_ema]`.
    fn predict(&self, input: &[f64; 3]) -> (u8, f64);
}

/// Volume and range-expansion rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicBreakout;

impl BreakoutClassifier for HeuristicBreakout {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn classify(&self, f: &FeatureSet) -> BreakoutAssessment {
        if f.vol_ratio < 1.0 {
            BreakoutAssessment {
                quality: BreakoutQuality::LikelyFake,
                confidence: ConfidenceBucket::Low,
                reason: format!(
                    "Volume is {:.2}x average, too weak to sustain a breakout.",
                    f.vol_ratio
                ),
            }
        } else if f.vol_ratio > 2.0 && f.atr_expansion > 1.5 {
            BreakoutAssessment {
                quality: BreakoutQuality::LikelyGenuine,
                confidence: ConfidenceBucket::High,
                reason: format!(
                    "Volume {:.2}x average with range {:.2}x ATR.",
                    f.vol_ratio, f.atr_expansion
                ),
            }
        } else {
            BreakoutAssessment {
                quality: BreakoutQuality::Unclear,
                confidence: ConfidenceBucket::Neutral,
                reason: "Insufficient data to classify breakout.".to_string(),
            }
        }
    }
}

/// Heuristic verdict, overridden by a confident model that disagrees.
pub struct ModelBlendedBreakout {
    model: Box<dyn BreakoutModel>,
    heuristic: HeuristicBreakout,
}

impl ModelBlendedBreakout {
    /// Probability the model must exceed before it may override.
    pub const OVERRIDE_PROBABILITY: f64 = 0.6;
    const HIGH_PROBABILITY: f64 = 0.8;

    pub fn new(model: Box<dyn BreakoutModel>) -> Self {
        Self {
            model,
            heuristic: HeuristicBreakout,
        }
    }
}

impl BreakoutClassifier for ModelBlendedBreakout {
    fn name(&self) -> &str {
        "model_blended"
    }

    fn classify(&self, f: &FeatureSet) -> BreakoutAssessment {
        let base = self.heuristic.classify(f);
        let (class, prob) = self.model.predict(&f.model_input());
        if prob.is_nan() || prob <= Self::OVERRIDE_PROBABILITY {
            return base;
        }

        let quality = if class == 1 {
            BreakoutQuality::LikelyGenuine
        } else {
            BreakoutQuality::LikelyFake
        };
        if quality == base.quality {
            return base;
        }

        tracing::debug!(class, prob, "model overrides heuristic breakout verdict");
        let label = match quality {
            BreakoutQuality::LikelyGenuine => "genuine",
            _ => "fake",
        };
        BreakoutAssessment {
            quality,
            confidence: if prob > Self::HIGH_PROBABILITY {
                ConfidenceBucket::High
            } else {
                ConfidenceBucket::Medium
            },
            reason: format!(
                "Model reads this breakout as likely {label} with {:.0}% confidence.",
                prob * 100.0
            ),
        }
    }
}

/// Model-blended when a model is available, heuristic otherwise.
pub fn select_breakout_classifier(
    model: Option<Box<dyn BreakoutModel>>,
) -> Box<dyn BreakoutClassifier> {
    match model {
        Some(model) => Box::new(ModelBlendedBreakout::new(model)),
        None => Box::new(HeuristicBreakout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedModel(u8, f64);

    impl BreakoutModel for FixedModel {
        fn predict(&self, _input: &[f64; 3]) -> (u8, f64) {
            (self.0, self.1)
        }
    }

    fn features(vol_ratio: f64, atr_expansion: f64) -> FeatureSet {
        FeatureSet {
            vol_ratio,
            atr_expansion,
            dist_from_ema: 1.0,
            rsi: 55.0,
            adx: 22.0,
        }
    }

    #[test]
    fn heuristic_rules() {
        let h = HeuristicBreakout;
        assert_eq!(h.classify(&features(0.8, 3.0)).quality, BreakoutQuality::LikelyFake);
        let genuine = h.classify(&features(2.5, 1.8));
        assert_eq!(genuine.quality, BreakoutQuality::LikelyGenuine);
        assert_eq!(genuine.confidence, ConfidenceBucket::High);
        assert_eq!(h.classify(&features(1.5, 1.8)).quality, BreakoutQuality::Unclear);
    }

    #[test]
    fn confident_model_overrides() {
        let c = select_breakout_classifier(Some(Box::new(FixedModel(1, 0.9))));
        assert_eq!(c.name(), "model_blended");
        let out = c.classify(&features(0.5, 1.0));
        assert_eq!(out.quality, BreakoutQuality::LikelyGenuine);
        assert_eq!(out.confidence, ConfidenceBucket::High);

        let c = ModelBlendedBreakout::new(Box::new(FixedModel(0, 0.7)));
        let out = c.classify(&features(2.5, 1.8));
        assert_eq!(out.quality, BreakoutQuality::LikelyFake);
        assert_eq!(out.confidence, ConfidenceBucket::Medium);
    }

    #[test]
    fn unsure_or_agreeing_model_keeps_heuristic() {
        let c = ModelBlendedBreakout::new(Box::new(FixedModel(1, 0.55)));
        assert_eq!(c.classify(&features(0.5, 1.0)).quality, BreakoutQuality::LikelyFake);

        let c = ModelBlendedBreakout::new(Box::new(FixedModel(1, 0.95)));
        let out = c.classify(&features(2.5, 1.8));
        assert_eq!(out.confidence, ConfidenceBucket::High);
        assert!(out.reason.starts_with("Volume"));
    }

    #[test]
    fn heuristic_when_no_model() {
        assert_eq!(select_breakout_classifier(None).name(), "heuristic");
    }
}
