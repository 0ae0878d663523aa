mod factors;

pub use factors::{
    FactorAnswer, HormonalChanges, MentalHealth, PhysicalHealth, Rating, RatingScale,
    RiskFactor, RiskFactorResponses, StressLevel,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::{RiskThresholds, RiskWeights, ScoringConfig};
use super::epds::MAX_EPDS_SCORE;
use super::error::InvalidInput;

/// Four-band interpretation of the combined EPDS + lifestyle total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Mild,
    Moderate,
    High,
}

impl RiskTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Mild => "Mild",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }

    pub const fn guidance(self) -> &'static str {
        match self {
            Self::Low => "Low risk for postpartum depression.",
            Self::Mild => "Mild risk for postpartum depression. Consider consulting a physician.",
            Self::Moderate => {
                "Moderate risk for postpartum depression. Professional support is advised."
            }
            Self::High => {
                "High risk for postpartum depression. Seek immediate medical attention."
            }
        }
    }
}

/// One factor's share of the weighted sum, kept for audit and display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorContribution {
    pub factor: RiskFactor,
    pub sub_score: u8,
    pub weight: f64,
    pub weighted: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalRiskResult {
    pub epds_score: u8,
    pub weighted_sum: f64,
    pub total: f64,
    pub tier: RiskTier,
    pub components: Vec<FactorContribution>,
}

/// Stateless aggregator combining an EPDS score with weighted factor sub-scores.
#[derive(Debug, Clone, Default)]
pub struct RiskAggregator {
    weights: RiskWeights,
    thresholds: RiskThresholds,
}

impl RiskAggregator {
    pub fn new(weights: RiskWeights, thresholds: RiskThresholds) -> Self {
        Self {
            weights,
            thresholds,
        }
    }

    pub fn from_config(config: &ScoringConfig) -> Self {
        Self::new(config.weights.clone(), config.risk)
    }

    /// Weighted factor sum rounded to hundredths. Weights are published in hundredths, so
    /// the rounding removes float noise before the sum meets an integer tier bound.
    pub fn weighted_sum(&self, factors: &RiskFactorResponses) -> f64 {
        weighted_total(&self.contributions(factors))
    }

    pub fn evaluate(
        &self,
        epds_score: u8,
        factors: &RiskFactorResponses,
    ) -> Result<TotalRiskResult, InvalidInput> {
        if epds_score > MAX_EPDS_SCORE {
            return Err(InvalidInput::EpdsScoreOutOfRange(i64::from(epds_score)));
        }

        let components = self.contributions(factors);
        let weighted_sum = weighted_total(&components);
        let total = round_hundredths(f64::from(epds_score) + weighted_sum);
        let tier = self.thresholds.classify(total);

        debug!(
            epds_score,
            weighted_sum,
            total,
            tier = tier.label(),
            "total risk evaluated"
        );

        Ok(TotalRiskResult {
            epds_score,
            weighted_sum,
            total,
            tier,
            components,
        })
    }

    fn contributions(&self, factors: &RiskFactorResponses) -> Vec<FactorContribution> {
        factors
            .sub_scores()
            .into_iter()
            .map(|(factor, sub_score)| {
                let weight = self.weights.weight(factor);
                FactorContribution {
                    factor,
                    sub_score,
                    weight,
                    weighted: weight * f64::from(sub_score),
                }
            })
            .collect()
    }
}

fn weighted_total(components: &[FactorContribution]) -> f64 {
    round_hundredths(components.iter().map(|component| component.weighted).sum())
}

fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
