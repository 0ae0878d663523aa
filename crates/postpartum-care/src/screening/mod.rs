//! EPDS screening and weighted postpartum risk scoring.
//!
//! Everything here is a pure function of its arguments plus the immutable
//! [`ScoringConfig`] captured at construction, so a single [`ScreeningEngine`] can be shared
//! across request handlers without locking.

mod config;
pub mod epds;
mod error;
pub mod risk;
pub mod router;

#[cfg(test)]
mod tests;

pub use config::{EpdsThresholds, RiskThresholds, RiskWeights, ScoringConfig, ScoringConfigError};
pub use epds::{
    answers_from_raw, EpdsEvaluator, EpdsQuestion, EpdsResult, EpdsTier, ScoringDirection,
    EPDS_QUESTIONS, MAX_EPDS_SCORE,
};
pub use error::InvalidInput;
pub use risk::{
    FactorAnswer, FactorContribution, HormonalChanges, MentalHealth, PhysicalHealth, Rating,
    RiskAggregator, RiskFactor, RiskFactorResponses, RiskTier, StressLevel, TotalRiskResult,
};
pub use router::screening_router;

/// Both evaluators built from one scoring configuration.
#[derive(Debug, Clone, Default)]
pub struct ScreeningEngine {
    epds: EpdsEvaluator,
    risk: RiskAggregator,
}

impl ScreeningEngine {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            epds: EpdsEvaluator::new(config.epds),
            risk: RiskAggregator::from_config(config),
        }
    }

    pub fn epds(&self) -> &EpdsEvaluator {
        &self.epds
    }

    pub fn risk(&self) -> &RiskAggregator {
        &self.risk
    }

    pub fn evaluate_epds(&self, answers: &[u8]) -> Result<EpdsResult, InvalidInput> {
        self.epds.evaluate(answers)
    }

    pub fn evaluate_total_risk(
        &self,
        epds_score: u8,
        factors: &RiskFactorResponses,
    ) -> Result<TotalRiskResult, InvalidInput> {
        self.risk.evaluate(epds_score, factors)
    }
}

/// Score ten EPDS answers with the standard tier table.
pub fn evaluate_epds(answers: &[u8]) -> Result<EpdsResult, InvalidInput> {
    EpdsEvaluator::default().evaluate(answers)
}

/// Combine an EPDS score with factor responses using the standard weights and tiers.
pub fn evaluate_total_risk(
    epds_score: u8,
    factors: &RiskFactorResponses,
) -> Result<TotalRiskResult, InvalidInput> {
    RiskAggregator::default().evaluate(epds_score, factors)
}
