use std::collections::BTreeMap;

use axum::response::Response;
use serde_json::Value;

use crate::screening::{
    FactorAnswer, HormonalChanges, MentalHealth, PhysicalHealth, Rating, RiskFactorResponses,
    StressLevel,
};

pub(super) const EPSILON: f64 = 1e-9;

pub(super) fn rating(value: u8) -> Rating {
    Rating::new(value).expect("rating within 1..=5")
}

/// The lowest-risk answer for every factor.
pub(super) fn calm_factors() -> RiskFactorResponses {
    RiskFactorResponses {
        mental_health: MentalHealth::FeelingGood,
        stress: StressLevel::Low,
        social_support: rating(5),
        physical_health: PhysicalHealth::Healthy,
        nutrition: rating(5),
        sleep_quality: rating(5),
        economic_stress: rating(1),
        hormonal_changes: HormonalChanges::No,
    }
}

pub(super) fn strained_factors() -> RiskFactorResponses {
    RiskFactorResponses {
        mental_health: MentalHealth::NeedSupport,
        stress: StressLevel::High,
        social_support: rating(1),
        physical_health: PhysicalHealth::NeedDoctor,
        nutrition: rating(1),
        sleep_quality: rating(1),
        economic_stress: rating(5),
        hormonal_changes: HormonalChanges::Yes,
    }
}

pub(super) fn calm_answers() -> BTreeMap<String, FactorAnswer> {
    let label = |value: &str| FactorAnswer::Label(value.to_string());
    BTreeMap::from([
        ("mental_health".to_string(), label("Feeling good")),
        ("stress".to_string(), label("Low stress")),
        ("social_support".to_string(), FactorAnswer::Rating(5)),
        ("physical_health".to_string(), label("Feeling healthy")),
        ("nutrition".to_string(), FactorAnswer::Rating(5)),
        ("sleep_quality".to_string(), FactorAnswer::Rating(5)),
        ("economic_stress".to_string(), FactorAnswer::Rating(1)),
        ("hormonal_changes".to_string(), label("No")),
    ])
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
