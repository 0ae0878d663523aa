use std::collections::BTreeMap;

use clap::Args;
use postpartum_care::config::AppConfig;
use postpartum_care::error::AppError;
use postpartum_care::screening::{
    answers_from_raw, FactorAnswer, RiskFactor, RiskFactorResponses, ScreeningEngine,
    TotalRiskResult,
};

#[derive(Args, Debug)]
pub(crate) struct EpdsArgs {
    /// Ten option indices (0-3) in questionnaire order, comma separated
    #[arg(long, value_delimiter = ',', required = true)]
    pub(crate) answers: Vec<i64>,
}

#[derive(Args, Debug)]
pub(crate) struct RiskArgs {
    /// EPDS score (0-30) from a completed questionnaire
    #[arg(long)]
    pub(crate) epds_score: i64,
    /// "Feeling good", "Some struggles" or "Need support"
    #[arg(long)]
    pub(crate) mental_health: String,
    /// "Low stress", "Moderate stress" or "High stress"
    #[arg(long)]
    pub(crate) stress: String,
    /// Social support rating, 1 (none) to 5 (strong)
    #[arg(long)]
    pub(crate) social_support: i64,
    /// "Feeling healthy", "Some concerns" or "Need to see a doctor"
    #[arg(long)]
    pub(crate) physical_health: String,
    /// Nutrition rating, 1 (poor) to 5 (good)
    #[arg(long)]
    pub(crate) nutrition: i64,
    /// Sleep quality rating, 1 (poor) to 5 (good)
    #[arg(long)]
    pub(crate) sleep_quality: i64,
    /// Financial strain rating, 1 (none) to 5 (severe)
    #[arg(long)]
    pub(crate) economic_stress: i64,
    /// "Yes" or "No"
    #[arg(long)]
    pub(crate) hormonal_changes: String,
}

impl RiskArgs {
    fn answers(&self) -> BTreeMap<String, FactorAnswer> {
        let label = |value: &String| FactorAnswer::Label(value.clone());
        [
            (RiskFactor::MentalHealth, label(&self.mental_health)),
            (RiskFactor::Stress, label(&self.stress)),
            (RiskFactor::SocialSupport, FactorAnswer::Rating(self.social_support)),
            (RiskFactor::PhysicalHealth, label(&self.physical_health)),
            (RiskFactor::Nutrition, FactorAnswer::Rating(self.nutrition)),
            (RiskFactor::SleepQuality, FactorAnswer::Rating(self.sleep_quality)),
            (RiskFactor::EconomicStress, FactorAnswer::Rating(self.economic_stress)),
            (RiskFactor::HormonalChanges, label(&self.hormonal_changes)),
        ]
        .into_iter()
        .map(|(factor, answer)| (factor.key().to_string(), answer))
        .collect()
    }
}

pub(crate) fn configured_engine() -> Result<ScreeningEngine, AppError> {
    let config = AppConfig::load()?;
    Ok(ScreeningEngine::new(&config.scoring))
}

pub(crate) fn run_epds(args: EpdsArgs) -> Result<(), AppError> {
    let engine = configured_engine()?;
    let answers = answers_from_raw(&args.answers)?;
    let result = engine.evaluate_epds(&answers)?;

    println!("EPDS score: {}/30", result.score);
    println!("Tier: {}", result.tier.label());
    println!("{}", result.tier.guidance());
    Ok(())
}

pub(crate) fn run_risk(args: RiskArgs) -> Result<(), AppError> {
    let engine = configured_engine()?;
    let result = score_risk(&engine, &args)?;
    render_risk(&result);
    Ok(())
}

fn score_risk(engine: &ScreeningEngine, args: &RiskArgs) -> Result<TotalRiskResult, AppError> {
    let epds = engine.epds().classify(args.epds_score)?;
    let factors = RiskFactorResponses::from_answers(&args.answers())?;
    Ok(engine.evaluate_total_risk(epds.score, &factors)?)
}

pub(crate) fn render_risk(result: &TotalRiskResult) {
    println!("Factor breakdown");
    for component in &result.components {
        println!(
            "  - {:<17} sub-score {:>2} x {:.2} = {:.2}",
            component.factor.key(),
            component.sub_score,
            component.weight,
            component.weighted
        );
    }
    println!("Weighted factors: {:.2}", result.weighted_sum);
    println!("EPDS score: {}", result.epds_score);
    println!("Total risk: {:.2} ({})", result.total, result.tier.label());
    println!("{}", result.tier.guidance());
}

#[cfg(test)]
mod tests {
    use super::*;
    use postpartum_care::screening::RiskTier;

    fn args(epds_score: i64) -> RiskArgs {
        RiskArgs {
            epds_score,
            mental_health: "Feeling good".to_string(),
            stress: "low stress".to_string(),
            social_support: 5,
            physical_health: "Feeling healthy".to_string(),
            nutrition: 5,
            sleep_quality: 5,
            economic_stress: 1,
            hormonal_changes: "No".to_string(),
        }
    }

    #[test]
    fn risk_arguments_are_scored_like_the_api() {
        let result = score_risk(&ScreeningEngine::default(), &args(5)).expect("valid arguments");

        assert!((result.total - 7.55).abs() < 1e-9);
        assert_eq!(result.tier, RiskTier::Mild);
    }

    #[test]
    fn out_of_range_epds_scores_are_rejected() {
        match score_risk(&ScreeningEngine::default(), &args(31)) {
            Err(AppError::Screening(_)) => {}
            other => panic!("expected screening error, got {other:?}"),
        }
    }
}
