use std::io::{Read, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use super::csv_io::{parse_logs, write_logs, LogImportError};
use super::domain::{
    normalize_notes, valid_sleep_hours, DailyLog, DailyLogSubmission, EpdsRecord, EpdsRecordId,
    EpdsSubmission, LogId, Message, MessageId, NewMessage, ProfileUpdate, Registration, UserId,
    UserProfile,
};
use super::repository::{JournalRepository, RepositoryError};
use super::summary::{self, PatientSummary, TrendPoint};
use crate::screening::{
    answers_from_raw, InvalidInput, RiskFactorResponses, ScreeningEngine, TotalRiskResult,
};

/// Longest accepted direct message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 4000;

/// Service composing the repository with the screening engine.
pub struct JournalService<R> {
    repository: Arc<R>,
    engine: Arc<ScreeningEngine>,
    user_sequence: AtomicU64,
    log_sequence: AtomicU64,
    epds_sequence: AtomicU64,
    message_sequence: AtomicU64,
}

impl<R> JournalService<R>
where
    R: JournalRepository + 'static,
{
    pub fn new(repository: Arc<R>, engine: Arc<ScreeningEngine>) -> Self {
        Self {
            repository,
            engine,
            user_sequence: AtomicU64::new(1),
            log_sequence: AtomicU64::new(1),
            epds_sequence: AtomicU64::new(1),
            message_sequence: AtomicU64::new(1),
        }
    }

    pub fn engine(&self) -> &ScreeningEngine {
        &self.engine
    }

    /// Register a new account. Username and email must be unique.
    pub fn register(&self, registration: Registration) -> Result<UserProfile, JournalServiceError> {
        let username = registration.username.trim().to_string();
        if username.is_empty() {
            return Err(JournalServiceError::InvalidSubmission(
                "username must not be empty".to_string(),
            ));
        }
        let email = validated_email(&registration.email)?;

        let profile = UserProfile {
            id: UserId(self.user_sequence.fetch_add(1, Ordering::Relaxed)),
            username,
            email,
            is_physician: registration.is_physician,
            weeks_postpartum: registration.weeks_postpartum,
            delivery_date: registration.delivery_date,
        };

        let stored = self.repository.insert_user(profile)?;
        info!(user = %stored.id, physician = stored.is_physician, "user registered");
        Ok(stored)
    }

    pub fn profile(&self, user: UserId) -> Result<UserProfile, JournalServiceError> {
        self.repository
            .fetch_user(user)?
            .ok_or(JournalServiceError::UnknownUser(user))
    }

    pub fn update_profile(
        &self,
        user: UserId,
        update: ProfileUpdate,
    ) -> Result<UserProfile, JournalServiceError> {
        let mut profile = self.profile(user)?;

        if let Some(email) = update.email {
            profile.email = validated_email(&email)?;
        }
        if let Some(weeks) = update.weeks_postpartum {
            profile.weeks_postpartum = Some(weeks);
        }
        if let Some(date) = update.delivery_date {
            profile.delivery_date = Some(date);
        }

        self.repository.update_user(profile.clone())?;
        Ok(profile)
    }

    /// Validate and store a check-in. `today` stands in for a missing date.
    pub fn record_daily_log(
        &self,
        user: UserId,
        submission: DailyLogSubmission,
        today: NaiveDate,
    ) -> Result<DailyLog, JournalServiceError> {
        self.profile(user)?;

        let factors = RiskFactorResponses::from_answers(&submission.factors)?;
        if let Some(hours) = submission.sleep_hours {
            if !valid_sleep_hours(hours) {
                return Err(JournalServiceError::InvalidSubmission(format!(
                    "sleep hours {hours} outside 0..=24"
                )));
            }
        }

        let log = DailyLog {
            id: LogId(self.log_sequence.fetch_add(1, Ordering::Relaxed)),
            user_id: user,
            date: submission.date.unwrap_or(today),
            factors,
            sleep_hours: submission.sleep_hours,
            notes: normalize_notes(submission.notes),
        };

        let stored = self.repository.insert_log(log)?;
        debug!(user = %user, date = %stored.date, "daily log recorded");
        Ok(stored)
    }

    pub fn daily_logs(&self, user: UserId) -> Result<Vec<DailyLog>, JournalServiceError> {
        self.profile(user)?;
        Ok(self.repository.logs_for(user)?)
    }

    /// Backfill check-ins from CSV. The whole file is validated before anything is stored,
    /// and dates that already have a log are rejected.
    pub fn import_daily_logs<Rd: Read>(
        &self,
        user: UserId,
        reader: Rd,
    ) -> Result<Vec<DailyLog>, JournalServiceError> {
        self.profile(user)?;
        let imported = parse_logs(reader)?;

        let logs = imported
            .into_iter()
            .map(|row| DailyLog {
                id: LogId(self.log_sequence.fetch_add(1, Ordering::Relaxed)),
                user_id: user,
                date: row.date,
                factors: row.factors,
                sleep_hours: row.sleep_hours,
                notes: row.notes,
            })
            .collect();
        let stored = self.repository.insert_logs(logs)?;

        info!(user = %user, imported = stored.len(), "daily logs imported");
        Ok(stored)
    }

    pub fn export_daily_logs<W: Write>(
        &self,
        user: UserId,
        writer: W,
    ) -> Result<usize, JournalServiceError> {
        let logs = self.daily_logs(user)?;
        write_logs(writer, &logs).map_err(JournalServiceError::Export)?;
        Ok(logs.len())
    }

    /// Record a screening from ten answers or from an externally computed score.
    pub fn record_epds(
        &self,
        user: UserId,
        submission: EpdsSubmission,
        today: NaiveDate,
    ) -> Result<EpdsRecord, JournalServiceError> {
        self.profile(user)?;

        let result = match (submission.answers, submission.score) {
            (Some(answers), None) => {
                let answers = answers_from_raw(&answers)?;
                self.engine.evaluate_epds(&answers)?
            }
            (None, Some(score)) => self.engine.epds().classify(score)?,
            _ => {
                return Err(JournalServiceError::InvalidSubmission(
                    "provide exactly one of `answers` or `score`".to_string(),
                ))
            }
        };

        let record = EpdsRecord {
            id: EpdsRecordId(self.epds_sequence.fetch_add(1, Ordering::Relaxed)),
            user_id: user,
            date: submission.date.unwrap_or(today),
            score: result.score,
            tier: result.tier,
        };

        let stored = self.repository.insert_epds(record)?;
        info!(
            user = %user,
            score = stored.score,
            tier = stored.tier.label(),
            "epds screening recorded"
        );
        Ok(stored)
    }

    pub fn epds_history(&self, user: UserId) -> Result<Vec<EpdsRecord>, JournalServiceError> {
        self.profile(user)?;
        Ok(self.repository.epds_for(user)?)
    }

    /// Latest EPDS screening combined with the latest check-in.
    pub fn current_risk(&self, user: UserId) -> Result<TotalRiskResult, JournalServiceError> {
        let epds = self
            .epds_history(user)?
            .into_iter()
            .last()
            .ok_or(JournalServiceError::NotEnoughData(
                "no EPDS screening recorded",
            ))?;
        let log = self
            .daily_logs(user)?
            .into_iter()
            .last()
            .ok_or(JournalServiceError::NotEnoughData("no daily log recorded"))?;

        Ok(self.engine.evaluate_total_risk(epds.score, &log.factors)?)
    }

    pub fn patient_summary(
        &self,
        user: UserId,
        today: NaiveDate,
    ) -> Result<PatientSummary, JournalServiceError> {
        let profile = self.profile(user)?;
        let logs = self.repository.logs_for(user)?;
        let epds = self.repository.epds_for(user)?;
        Ok(summary::patient_summary(&profile, &logs, &epds, today))
    }

    pub fn trend(&self, user: UserId) -> Result<Vec<TrendPoint>, JournalServiceError> {
        self.profile(user)?;
        let logs = self.repository.logs_for(user)?;
        let epds = self.repository.epds_for(user)?;
        Ok(summary::trend(&logs, &epds, self.engine.risk()))
    }

    pub fn send_message(&self, message: NewMessage) -> Result<Message, JournalServiceError> {
        self.profile(message.sender_id)?;
        self.profile(message.receiver_id)?;

        let content = message.content.trim();
        if content.is_empty() {
            return Err(JournalServiceError::InvalidSubmission(
                "message content must not be empty".to_string(),
            ));
        }
        if content.chars().count() > MAX_MESSAGE_CHARS {
            return Err(JournalServiceError::InvalidSubmission(format!(
                "message exceeds {MAX_MESSAGE_CHARS} characters"
            )));
        }

        let stored = self.repository.insert_message(Message {
            id: MessageId(self.message_sequence.fetch_add(1, Ordering::Relaxed)),
            sender_id: message.sender_id,
            receiver_id: message.receiver_id,
            content: content.to_string(),
            sent_at: Utc::now(),
        })?;
        debug!(from = %stored.sender_id, to = %stored.receiver_id, "message stored");
        Ok(stored)
    }

    pub fn messages(&self, user: UserId) -> Result<Vec<Message>, JournalServiceError> {
        self.profile(user)?;
        Ok(self.repository.messages_for(user)?)
    }
}

fn validated_email(raw: &str) -> Result<String, JournalServiceError> {
    let email = raw.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => {
            Ok(email.to_string())
        }
        _ => Err(JournalServiceError::InvalidSubmission(format!(
            "'{email}' is not a valid email address"
        ))),
    }
}

/// Error raised by the journal service.
#[derive(Debug, thiserror::Error)]
pub enum JournalServiceError {
    #[error(transparent)]
    Screening(#[from] InvalidInput),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Import(#[from] LogImportError),
    #[error("failed to export daily logs: {0}")]
    Export(csv::Error),
    #[error("user {0} not found")]
    UnknownUser(UserId),
    #[error("invalid submission: {0}")]
    InvalidSubmission(String),
    #[error("not enough data: {0}")]
    NotEnoughData(&'static str),
}

impl JournalServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            JournalServiceError::Screening(_)
            | JournalServiceError::Import(_)
            | JournalServiceError::InvalidSubmission(_) => StatusCode::UNPROCESSABLE_ENTITY,
            JournalServiceError::UnknownUser(_)
            | JournalServiceError::NotEnoughData(_)
            | JournalServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            JournalServiceError::Repository(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
            JournalServiceError::Repository(RepositoryError::Unavailable(_))
            | JournalServiceError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
