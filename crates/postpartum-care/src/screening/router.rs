use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use super::epds::{answers_from_raw, EpdsQuestion, EpdsResult, EPDS_QUESTIONS};
use super::error::InvalidInput;
use super::risk::{FactorAnswer, RiskFactorResponses, TotalRiskResult};
use super::ScreeningEngine;

/// Router exposing the stateless scoring operations.
pub fn screening_router(engine: Arc<ScreeningEngine>) -> Router {
    Router::new()
        .route(
            "/api/v1/screening/epds/questionnaire",
            get(questionnaire_handler),
        )
        .route("/api/v1/screening/epds", post(epds_handler))
        .route("/api/v1/screening/risk", post(risk_handler))
        .with_state(engine)
}

/// Either option indices or the displayed option labels, one per question.
#[derive(Debug, Deserialize, Serialize)]
pub struct EpdsRequest {
    #[serde(default)]
    pub answers: Option<Vec<i64>>,
    #[serde(default)]
    pub labels: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct EpdsResponse {
    #[serde(flatten)]
    pub result: EpdsResult,
    pub guidance: &'static str,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RiskRequest {
    pub epds_score: i64,
    pub factors: BTreeMap<String, FactorAnswer>,
}

#[derive(Debug, Serialize)]
pub struct RiskResponse {
    #[serde(flatten)]
    pub result: TotalRiskResult,
    pub guidance: &'static str,
}

pub(crate) async fn questionnaire_handler() -> Json<&'static [EpdsQuestion]> {
    Json(&EPDS_QUESTIONS[..])
}

pub(crate) async fn epds_handler(
    State(engine): State<Arc<ScreeningEngine>>,
    Json(request): Json<EpdsRequest>,
) -> Response {
    let outcome = match (request.answers, request.labels) {
        (Some(answers), None) => {
            answers_from_raw(&answers).and_then(|answers| engine.evaluate_epds(&answers))
        }
        (None, Some(labels)) => engine.epds().evaluate_labels(&labels),
        _ => {
            let payload = json!({
                "error": "provide exactly one of `answers` or `labels`",
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
    };

    match outcome {
        Ok(result) => {
            let body = EpdsResponse {
                result,
                guidance: result.tier.guidance(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(error) => invalid_input_response(error),
    }
}

pub(crate) async fn risk_handler(
    State(engine): State<Arc<ScreeningEngine>>,
    Json(request): Json<RiskRequest>,
) -> Response {
    let outcome = engine
        .epds()
        .classify(request.epds_score)
        .and_then(|epds| {
            let factors = RiskFactorResponses::from_answers(&request.factors)?;
            engine.evaluate_total_risk(epds.score, &factors)
        });

    match outcome {
        Ok(result) => {
            let guidance = result.tier.guidance();
            (StatusCode::OK, Json(RiskResponse { result, guidance })).into_response()
        }
        Err(error) => invalid_input_response(error),
    }
}

pub(crate) fn invalid_input_response(error: InvalidInput) -> Response {
    warn!(%error, "screening input rejected");
    let payload = json!({
        "error": error.to_string(),
    });
    (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
}
