use serde::{Deserialize, Serialize};

use super::epds::EpdsTier;
use super::risk::{RiskFactor, RiskTier};

/// Weight, EPDS-tier and total-tier tables handed to the evaluators at construction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub epds: EpdsThresholds,
    pub weights: RiskWeights,
    pub risk: RiskThresholds,
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        self.epds.validate()?;
        self.weights.validate()?;
        self.risk.validate()
    }
}

/// Per-factor multipliers applied to sub-scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RiskWeights {
    pub mental_health: f64,
    pub stress: f64,
    pub social_support: f64,
    pub physical_health: f64,
    pub nutrition: f64,
    pub sleep_quality: f64,
    pub economic_stress: f64,
    pub hormonal_changes: f64,
}

impl RiskWeights {
    pub fn weight(&self, factor: RiskFactor) -> f64 {
        match factor {
            RiskFactor::MentalHealth => self.mental_health,
            RiskFactor::Stress => self.stress,
            RiskFactor::SocialSupport => self.social_support,
            RiskFactor::PhysicalHealth => self.physical_health,
            RiskFactor::Nutrition => self.nutrition,
            RiskFactor::SleepQuality => self.sleep_quality,
            RiskFactor::EconomicStress => self.economic_stress,
            RiskFactor::HormonalChanges => self.hormonal_changes,
        }
    }

    pub fn total(&self) -> f64 {
        RiskFactor::ALL
            .iter()
            .map(|factor| self.weight(*factor))
            .sum()
    }

    fn validate(&self) -> Result<(), ScoringConfigError> {
        for factor in RiskFactor::ALL {
            let weight = self.weight(factor);
            if !weight.is_finite() || weight < 0.0 {
                return Err(ScoringConfigError::InvalidWeight { factor, weight });
            }
        }
        Ok(())
    }
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            mental_health: 0.25,
            stress: 0.15,
            social_support: 0.20,
            physical_health: 0.10,
            nutrition: 0.10,
            sleep_quality: 0.10,
            economic_stress: 0.05,
            hormonal_changes: 0.05,
        }
    }
}

/// Inclusive upper bounds of the Low and Possible EPDS tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EpdsThresholds {
    pub low_max: u8,
    pub possible_max: u8,
}

impl EpdsThresholds {
    pub fn classify(&self, score: u8) -> EpdsTier {
        if score <= self.low_max {
            EpdsTier::Low
        } else if score <= self.possible_max {
            EpdsTier::Possible
        } else {
            EpdsTier::High
        }
    }

    fn validate(&self) -> Result<(), ScoringConfigError> {
        if self.low_max < self.possible_max {
            Ok(())
        } else {
            Err(ScoringConfigError::UnorderedThresholds { table: "epds" })
        }
    }
}

impl Default for EpdsThresholds {
    fn default() -> Self {
        Self {
            low_max: 9,
            possible_max: 12,
        }
    }
}

/// Inclusive upper bounds of the Low, Mild and Moderate total-risk tiers.
///
/// Totals are fractional, so a total between two published integer bands (say 6.5) falls
/// into the next band up rather than through the gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RiskThresholds {
    pub low_max: f64,
    pub mild_max: f64,
    pub moderate_max: f64,
}

impl RiskThresholds {
    pub fn classify(&self, total: f64) -> RiskTier {
        if total <= self.low_max {
            RiskTier::Low
        } else if total <= self.mild_max {
            RiskTier::Mild
        } else if total <= self.moderate_max {
            RiskTier::Moderate
        } else {
            RiskTier::High
        }
    }

    fn validate(&self) -> Result<(), ScoringConfigError> {
        let bounds = [self.low_max, self.mild_max, self.moderate_max];
        let finite = bounds.iter().all(|bound| bound.is_finite());
        if finite && bounds.windows(2).all(|pair| pair[0] < pair[1]) {
            Ok(())
        } else {
            Err(ScoringConfigError::UnorderedThresholds { table: "risk" })
        }
    }
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            low_max: 6.0,
            mild_max: 13.0,
            moderate_max: 19.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringConfigError {
    #[error("weight for {factor} must be a finite, non-negative number (found {weight})")]
    InvalidWeight { factor: RiskFactor, weight: f64 },
    #[error("{table} tier bounds must be strictly increasing")]
    UnorderedThresholds { table: &'static str },
}
