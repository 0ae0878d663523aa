use std::collections::BTreeMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::journal::domain::{
    DailyLog, DailyLogSubmission, EpdsRecord, Message, Registration, UserId, UserProfile,
};
use crate::journal::repository::{JournalRepository, RepositoryError};
use crate::journal::{InMemoryJournalRepository, JournalService};
use crate::screening::{FactorAnswer, ScreeningEngine};

pub(super) const EPSILON: f64 = 1e-9;

pub(super) fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).expect("valid date")
}

pub(super) fn today() -> NaiveDate {
    date(9, 10)
}

pub(super) fn build_service() -> (
    Arc<InMemoryJournalRepository>,
    JournalService<InMemoryJournalRepository>,
) {
    let repository = Arc::new(InMemoryJournalRepository::default());
    let service = JournalService::new(repository.clone(), Arc::new(ScreeningEngine::default()));
    (repository, service)
}

pub(super) fn registration(username: &str) -> Registration {
    Registration {
        username: username.to_string(),
        email: format!("{username}@example.org"),
        is_physician: false,
        weeks_postpartum: Some(6),
        delivery_date: Some(date(7, 30)),
    }
}

pub(super) fn physician(username: &str) -> Registration {
    Registration {
        is_physician: true,
        weeks_postpartum: None,
        delivery_date: None,
        ..registration(username)
    }
}

#[allow(clippy::too_many_arguments)]
fn answers(
    mental_health: &str,
    stress: &str,
    social_support: i64,
    physical_health: &str,
    nutrition: i64,
    sleep_quality: i64,
    economic_stress: i64,
    hormonal_changes: &str,
) -> BTreeMap<String, FactorAnswer> {
    let label = |value: &str| FactorAnswer::Label(value.to_string());
    BTreeMap::from([
        ("mental_health".to_string(), label(mental_health)),
        ("stress".to_string(), label(stress)),
        ("social_support".to_string(), FactorAnswer::Rating(social_support)),
        ("physical_health".to_string(), label(physical_health)),
        ("nutrition".to_string(), FactorAnswer::Rating(nutrition)),
        ("sleep_quality".to_string(), FactorAnswer::Rating(sleep_quality)),
        ("economic_stress".to_string(), FactorAnswer::Rating(economic_stress)),
        ("hormonal_changes".to_string(), label(hormonal_changes)),
    ])
}

/// Weighted sum 2.55.
pub(super) fn calm_answers() -> BTreeMap<String, FactorAnswer> {
    answers("Feeling good", "Low stress", 5, "Feeling healthy", 5, 5, 1, "No")
}

/// Weighted sum 10.0.
pub(super) fn strained_answers() -> BTreeMap<String, FactorAnswer> {
    answers(
        "Need support",
        "High stress",
        1,
        "Need to see a doctor",
        1,
        1,
        5,
        "Yes",
    )
}

pub(super) fn check_in(
    day: Option<NaiveDate>,
    factors: BTreeMap<String, FactorAnswer>,
    sleep_hours: Option<f32>,
) -> DailyLogSubmission {
    DailyLogSubmission {
        date: day,
        factors,
        sleep_hours,
        notes: None,
    }
}

/// Every call fails as if the backing store were down.
pub(super) struct UnavailableRepository;

fn unavailable<T>() -> Result<T, RepositoryError> {
    Err(RepositoryError::Unavailable("store offline".to_string()))
}

impl JournalRepository for UnavailableRepository {
    fn insert_user(&self, _profile: UserProfile) -> Result<UserProfile, RepositoryError> {
        unavailable()
    }

    fn update_user(&self, _profile: UserProfile) -> Result<(), RepositoryError> {
        unavailable()
    }

    fn fetch_user(&self, _id: UserId) -> Result<Option<UserProfile>, RepositoryError> {
        unavailable()
    }

    fn insert_log(&self, _log: DailyLog) -> Result<DailyLog, RepositoryError> {
        unavailable()
    }

    fn insert_logs(&self, _logs: Vec<DailyLog>) -> Result<Vec<DailyLog>, RepositoryError> {
        unavailable()
    }

    fn logs_for(&self, _user: UserId) -> Result<Vec<DailyLog>, RepositoryError> {
        unavailable()
    }

    fn insert_epds(&self, _record: EpdsRecord) -> Result<EpdsRecord, RepositoryError> {
        unavailable()
    }

    fn epds_for(&self, _user: UserId) -> Result<Vec<EpdsRecord>, RepositoryError> {
        unavailable()
    }

    fn insert_message(&self, _message: Message) -> Result<Message, RepositoryError> {
        unavailable()
    }

    fn messages_for(&self, _user: UserId) -> Result<Vec<Message>, RepositoryError> {
        unavailable()
    }
}

pub(super) fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serialize")))
        .expect("request builds")
}

pub(super) fn get_request(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request builds")
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = read_body(response).await;
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn assert_error_status(response: Response, expected: StatusCode) -> Value {
    assert_eq!(response.status(), expected);
    let body = read_json_body(response).await;
    assert!(body["error"].is_string(), "error payload missing: {body}");
    body
}
