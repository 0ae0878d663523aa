use super::common::*;
use crate::screening::{
    evaluate_total_risk, FactorAnswer, HormonalChanges, InvalidInput, MentalHealth,
    PhysicalHealth, Rating, RiskAggregator, RiskFactor, RiskFactorResponses, RiskThresholds,
    RiskTier, RiskWeights, ScoringConfig, ScreeningEngine, StressLevel,
};

const FACTOR_COMBINATIONS: usize = 3 * 3 * 3 * 2 * 5 * 5 * 5 * 5;

/// Decodes `index` as a mixed-radix number, one digit per factor.
fn factor_combination(index: usize) -> RiskFactorResponses {
    let mut rest = index;
    let mut pick = |radix: usize| {
        let digit = rest % radix;
        rest /= radix;
        digit
    };
    let mut next_rating = || rating(Rating::MIN + pick(5) as u8);

    RiskFactorResponses {
        social_support: next_rating(),
        nutrition: next_rating(),
        sleep_quality: next_rating(),
        economic_stress: next_rating(),
        mental_health: MentalHealth::ALL[pick(MentalHealth::ALL.len())],
        stress: StressLevel::ALL[pick(StressLevel::ALL.len())],
        physical_health: PhysicalHealth::ALL[pick(PhysicalHealth::ALL.len())],
        hormonal_changes: HormonalChanges::ALL[pick(HormonalChanges::ALL.len())],
    }
}

/// Total in integer hundredths under the default weights.
fn exact_total(epds_score: u8, factors: &RiskFactorResponses) -> u32 {
    let weights = RiskWeights::default();
    let weighted: u32 = RiskFactor::ALL
        .iter()
        .map(|factor| {
            let weight = (weights.weight(*factor) * 100.0).round() as u32;
            weight * u32::from(factors.sub_score(*factor))
        })
        .sum();
    u32::from(epds_score) * 100 + weighted
}

fn exact_tier(total: u32) -> RiskTier {
    match total {
        0..=600 => RiskTier::Low,
        601..=1300 => RiskTier::Mild,
        1301..=1900 => RiskTier::Moderate,
        _ => RiskTier::High,
    }
}

#[test]
fn calm_profile_with_low_epds_is_mild() {
    let result = evaluate_total_risk(5, &calm_factors()).expect("valid factors");

    let sub_scores: Vec<u8> = result
        .components
        .iter()
        .map(|component| component.sub_score)
        .collect();
    assert_eq!(sub_scores, vec![3, 3, 2, 3, 2, 2, 2, 3]);
    assert!((result.weighted_sum - 2.55).abs() < EPSILON);
    assert!((result.total - 7.55).abs() < EPSILON);
    assert_eq!(result.epds_score, 5);
    assert_eq!(result.tier, RiskTier::Mild);
}

#[test]
fn weighted_sum_is_the_dot_product_of_weights_and_sub_scores() {
    let weights = RiskWeights::default();
    let factors = strained_factors();

    let expected: f64 = RiskFactor::ALL
        .iter()
        .map(|factor| weights.weight(*factor) * f64::from(factors.sub_score(*factor)))
        .sum();
    let result = evaluate_total_risk(0, &factors).expect("valid factors");

    assert!((result.weighted_sum - expected).abs() < EPSILON);
    assert!((result.weighted_sum - 10.0).abs() < EPSILON);
}

#[test]
fn needing_support_adds_exactly_one_point_seventy_five() {
    let baseline = evaluate_total_risk(0, &calm_factors()).expect("valid");
    let mut factors = calm_factors();
    factors.mental_health = MentalHealth::NeedSupport;
    let changed = evaluate_total_risk(0, &factors).expect("valid");

    assert!((changed.weighted_sum - baseline.weighted_sum - 1.75).abs() < EPSILON);
}

#[test]
fn rating_directions_match_each_factor() {
    let mut factors = calm_factors();
    factors.social_support = rating(1);
    factors.economic_stress = rating(5);

    assert_eq!(factors.sub_score(RiskFactor::SocialSupport), 10);
    assert_eq!(factors.sub_score(RiskFactor::EconomicStress), 10);
    assert_eq!(calm_factors().sub_score(RiskFactor::EconomicStress), 2);
}

#[test]
fn total_tiers_follow_thresholds() {
    let aggregator = RiskAggregator::default();
    let calm = calm_factors();

    assert_eq!(aggregator.evaluate(0, &calm).expect("valid").tier, RiskTier::Low);
    assert_eq!(aggregator.evaluate(5, &calm).expect("valid").tier, RiskTier::Mild);
    assert_eq!(aggregator.evaluate(12, &calm).expect("valid").tier, RiskTier::Moderate);
    assert_eq!(aggregator.evaluate(17, &calm).expect("valid").tier, RiskTier::High);
}

#[test]
fn totals_on_a_tier_bound_stay_in_the_lower_tier() {
    let aggregator = RiskAggregator::default();
    let mut factors = calm_factors();
    factors.mental_health = MentalHealth::NeedSupport;
    factors.physical_health = PhysicalHealth::NeedDoctor;
    assert!((aggregator.weighted_sum(&factors) - 5.0).abs() < EPSILON);

    for (epds_score, total, tier) in [
        (1, 6.0, RiskTier::Low),
        (8, 13.0, RiskTier::Mild),
        (14, 19.0, RiskTier::Moderate),
        (15, 20.0, RiskTier::High),
    ] {
        let result = aggregator.evaluate(epds_score, &factors).expect("valid");
        assert!((result.total - total).abs() < EPSILON);
        assert_eq!(result.tier, tier, "EPDS {epds_score}");
    }
}

#[test]
fn every_answer_set_matches_exact_hundredths_arithmetic() {
    let aggregator = RiskAggregator::default();
    let mut bounds_reached = [false; 3];

    for index in 0..FACTOR_COMBINATIONS {
        let factors = factor_combination(index);
        for epds_score in 0..=30 {
            let expected = exact_total(epds_score, &factors);
            let result = aggregator.evaluate(epds_score, &factors).expect("valid");

            assert!(
                (result.total - f64::from(expected) / 100.0).abs() < EPSILON,
                "EPDS {epds_score} with {factors:?}"
            );
            assert_eq!(
                result.tier,
                exact_tier(expected),
                "EPDS {epds_score} with {factors:?} totals {}",
                result.total
            );
            if let Some(slot) = [600, 1300, 1900].iter().position(|bound| *bound == expected) {
                bounds_reached[slot] = true;
            }
        }
    }

    assert_eq!(bounds_reached, [true; 3]);
}

#[test]
fn alternate_weights_can_be_injected() {
    let weights = RiskWeights {
        mental_health: 1.0,
        stress: 0.0,
        social_support: 0.0,
        physical_health: 0.0,
        nutrition: 0.0,
        sleep_quality: 0.0,
        economic_stress: 0.0,
        hormonal_changes: 0.0,
    };
    let aggregator = RiskAggregator::new(weights, RiskThresholds::default());

    let result = aggregator.evaluate(0, &strained_factors()).expect("valid");

    assert!((result.weighted_sum - 10.0).abs() < EPSILON);
    assert_eq!(result.tier, RiskTier::Mild);
}

#[test]
fn engine_uses_the_supplied_config() {
    let config = ScoringConfig {
        risk: RiskThresholds {
            low_max: 1.0,
            mild_max: 2.0,
            moderate_max: 3.0,
        },
        ..ScoringConfig::default()
    };
    let engine = ScreeningEngine::new(&config);

    let result = engine
        .evaluate_total_risk(0, &calm_factors())
        .expect("valid");
    assert_eq!(result.tier, RiskTier::Moderate);
}

#[test]
fn epds_score_above_thirty_is_rejected() {
    assert_eq!(
        evaluate_total_risk(31, &calm_factors()),
        Err(InvalidInput::EpdsScoreOutOfRange(31))
    );
}

#[test]
fn keyed_answers_build_typed_responses() {
    let responses = RiskFactorResponses::from_answers(&calm_answers()).expect("valid answers");

    assert_eq!(responses, calm_factors());
    assert_eq!(responses.to_answers(), calm_answers());
}

#[test]
fn label_matching_ignores_case_and_padding() {
    let mut answers = calm_answers();
    answers.insert(
        "stress".to_string(),
        FactorAnswer::Label("  high STRESS ".to_string()),
    );
    answers.insert("nutrition".to_string(), FactorAnswer::Label("2".to_string()));

    let responses = RiskFactorResponses::from_answers(&answers).expect("valid answers");
    assert_eq!(responses.sub_score(RiskFactor::Stress), 10);
    assert_eq!(responses.sub_score(RiskFactor::Nutrition), 8);
}

#[test]
fn social_support_of_six_is_rejected() {
    let mut answers = calm_answers();
    answers.insert("social_support".to_string(), FactorAnswer::Rating(6));

    assert_eq!(
        RiskFactorResponses::from_answers(&answers),
        Err(InvalidInput::RatingOutOfRange {
            factor: RiskFactor::SocialSupport,
            rating: 6
        })
    );
}

#[test]
fn missing_factor_is_rejected() {
    let mut answers = calm_answers();
    answers.remove("hormonal_changes");

    assert_eq!(
        RiskFactorResponses::from_answers(&answers),
        Err(InvalidInput::MissingFactor(RiskFactor::HormonalChanges))
    );
}

#[test]
fn factor_answered_twice_under_padded_keys_is_rejected() {
    let mut answers = calm_answers();
    answers.insert(" stress".to_string(), FactorAnswer::Label("High stress".to_string()));

    assert_eq!(
        RiskFactorResponses::from_answers(&answers),
        Err(InvalidInput::DuplicateFactor(RiskFactor::Stress))
    );
}

#[test]
fn unscored_fields_are_not_accepted_as_factors() {
    let mut answers = calm_answers();
    answers.insert("sleep_hours".to_string(), FactorAnswer::Rating(7));

    assert_eq!(
        RiskFactorResponses::from_answers(&answers),
        Err(InvalidInput::UnknownFactor("sleep_hours".to_string()))
    );
}

#[test]
fn unrecognized_label_and_wrong_kind_are_rejected() {
    let mut answers = calm_answers();
    answers.insert(
        "physical_health".to_string(),
        FactorAnswer::Label("Fine".to_string()),
    );
    assert!(matches!(
        RiskFactorResponses::from_answers(&answers),
        Err(InvalidInput::UnrecognizedLabel {
            factor: RiskFactor::PhysicalHealth,
            ..
        })
    ));

    let mut answers = calm_answers();
    answers.insert("mental_health".to_string(), FactorAnswer::Rating(2));
    assert!(matches!(
        RiskFactorResponses::from_answers(&answers),
        Err(InvalidInput::WrongAnswerKind {
            factor: RiskFactor::MentalHealth,
            ..
        })
    ));
}

#[test]
fn typed_responses_deserialize_from_labels() {
    let json = serde_json::json!({
        "mental_health": "Some struggles",
        "stress": "Moderate stress",
        "social_support": 3,
        "physical_health": "Some concerns",
        "nutrition": 4,
        "sleep_quality": 2,
        "economic_stress": 3,
        "hormonal_changes": "Yes"
    });

    let responses: RiskFactorResponses = serde_json::from_value(json).expect("deserializes");
    assert_eq!(responses.sub_score(RiskFactor::MentalHealth), 6);
    assert_eq!(responses.sub_score(RiskFactor::SleepQuality), 8);

    let bad: Result<RiskFactorResponses, _> = serde_json::from_value(serde_json::json!({
        "mental_health": "Some struggles",
        "stress": "Moderate stress",
        "social_support": 0,
        "physical_health": "Some concerns",
        "nutrition": 4,
        "sleep_quality": 2,
        "economic_stress": 3,
        "hormonal_changes": "Yes"
    }));
    assert!(bad.is_err());
}
