use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use serde_json::json;
use tracing::warn;

use super::domain::{
    DailyLogSubmission, EpdsSubmission, NewMessage, ProfileUpdate, Registration, UserId,
};
use super::repository::JournalRepository;
use super::service::{JournalService, JournalServiceError};
use crate::screening::TotalRiskResult;

/// Router builder exposing account, check-in, screening history and messaging endpoints.
pub fn journal_router<R>(service: Arc<JournalService<R>>) -> Router
where
    R: JournalRepository + 'static,
{
    Router::new()
        .route("/api/v1/users", post(register_handler::<R>))
        .route(
            "/api/v1/users/:user_id",
            get(profile_handler::<R>).put(update_profile_handler::<R>),
        )
        .route(
            "/api/v1/users/:user_id/daily-logs",
            get(list_logs_handler::<R>).post(record_log_handler::<R>),
        )
        .route(
            "/api/v1/users/:user_id/daily-logs/import",
            post(import_logs_handler::<R>),
        )
        .route(
            "/api/v1/users/:user_id/daily-logs/export",
            get(export_logs_handler::<R>),
        )
        .route(
            "/api/v1/users/:user_id/epds",
            get(epds_history_handler::<R>).post(record_epds_handler::<R>),
        )
        .route("/api/v1/users/:user_id/risk", get(current_risk_handler::<R>))
        .route("/api/v1/users/:user_id/summary", get(summary_handler::<R>))
        .route("/api/v1/users/:user_id/trend", get(trend_handler::<R>))
        .route(
            "/api/v1/users/:user_id/messages",
            get(list_messages_handler::<R>),
        )
        .route("/api/v1/messages", post(send_message_handler::<R>))
        .with_state(service)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn respond<T: Serialize>(status: StatusCode, outcome: Result<T, JournalServiceError>) -> Response {
    match outcome {
        Ok(body) => (status, Json(body)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) fn error_response(error: JournalServiceError) -> Response {
    let status = error.status_code();
    if status.is_server_error() {
        warn!(%error, "journal request failed");
    }
    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}

pub(crate) async fn register_handler<R>(
    State(service): State<Arc<JournalService<R>>>,
    Json(registration): Json<Registration>,
) -> Response
where
    R: JournalRepository + 'static,
{
    respond(StatusCode::CREATED, service.register(registration))
}

pub(crate) async fn profile_handler<R>(
    State(service): State<Arc<JournalService<R>>>,
    Path(user_id): Path<u64>,
) -> Response
where
    R: JournalRepository + 'static,
{
    respond(StatusCode::OK, service.profile(UserId(user_id)))
}

pub(crate) async fn update_profile_handler<R>(
    State(service): State<Arc<JournalService<R>>>,
    Path(user_id): Path<u64>,
    Json(update): Json<ProfileUpdate>,
) -> Response
where
    R: JournalRepository + 'static,
{
    respond(StatusCode::OK, service.update_profile(UserId(user_id), update))
}

pub(crate) async fn record_log_handler<R>(
    State(service): State<Arc<JournalService<R>>>,
    Path(user_id): Path<u64>,
    Json(submission): Json<DailyLogSubmission>,
) -> Response
where
    R: JournalRepository + 'static,
{
    respond(
        StatusCode::CREATED,
        service.record_daily_log(UserId(user_id), submission, today()),
    )
}

pub(crate) async fn list_logs_handler<R>(
    State(service): State<Arc<JournalService<R>>>,
    Path(user_id): Path<u64>,
) -> Response
where
    R: JournalRepository + 'static,
{
    respond(StatusCode::OK, service.daily_logs(UserId(user_id)))
}

pub(crate) async fn import_logs_handler<R>(
    State(service): State<Arc<JournalService<R>>>,
    Path(user_id): Path<u64>,
    body: String,
) -> Response
where
    R: JournalRepository + 'static,
{
    let outcome = service
        .import_daily_logs(UserId(user_id), body.as_bytes())
        .map(|logs| json!({ "imported": logs.len(), "logs": logs }));
    respond(StatusCode::CREATED, outcome)
}

pub(crate) async fn export_logs_handler<R>(
    State(service): State<Arc<JournalService<R>>>,
    Path(user_id): Path<u64>,
) -> Response
where
    R: JournalRepository + 'static,
{
    let mut buffer = Vec::new();
    match service.export_daily_logs(UserId(user_id), &mut buffer) {
        Ok(_) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
            buffer,
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn record_epds_handler<R>(
    State(service): State<Arc<JournalService<R>>>,
    Path(user_id): Path<u64>,
    Json(submission): Json<EpdsSubmission>,
) -> Response
where
    R: JournalRepository + 'static,
{
    respond(
        StatusCode::CREATED,
        service.record_epds(UserId(user_id), submission, today()),
    )
}

pub(crate) async fn epds_history_handler<R>(
    State(service): State<Arc<JournalService<R>>>,
    Path(user_id): Path<u64>,
) -> Response
where
    R: JournalRepository + 'static,
{
    respond(StatusCode::OK, service.epds_history(UserId(user_id)))
}

#[derive(Debug, Serialize)]
struct CurrentRiskView {
    #[serde(flatten)]
    result: TotalRiskResult,
    guidance: &'static str,
}

pub(crate) async fn current_risk_handler<R>(
    State(service): State<Arc<JournalService<R>>>,
    Path(user_id): Path<u64>,
) -> Response
where
    R: JournalRepository + 'static,
{
    let outcome = service
        .current_risk(UserId(user_id))
        .map(|result| CurrentRiskView {
            guidance: result.tier.guidance(),
            result,
        });
    respond(StatusCode::OK, outcome)
}

pub(crate) async fn summary_handler<R>(
    State(service): State<Arc<JournalService<R>>>,
    Path(user_id): Path<u64>,
) -> Response
where
    R: JournalRepository + 'static,
{
    respond(
        StatusCode::OK,
        service.patient_summary(UserId(user_id), today()),
    )
}

pub(crate) async fn trend_handler<R>(
    State(service): State<Arc<JournalService<R>>>,
    Path(user_id): Path<u64>,
) -> Response
where
    R: JournalRepository + 'static,
{
    respond(StatusCode::OK, service.trend(UserId(user_id)))
}

pub(crate) async fn send_message_handler<R>(
    State(service): State<Arc<JournalService<R>>>,
    Json(message): Json<NewMessage>,
) -> Response
where
    R: JournalRepository + 'static,
{
    respond(StatusCode::CREATED, service.send_message(message))
}

pub(crate) async fn list_messages_handler<R>(
    State(service): State<Arc<JournalService<R>>>,
    Path(user_id): Path<u64>,
) -> Response
where
    R: JournalRepository + 'static,
{
    respond(StatusCode::OK, service.messages(UserId(user_id)))
}
