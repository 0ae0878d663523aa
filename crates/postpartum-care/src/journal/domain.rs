use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::screening::{EpdsTier, FactorAnswer, RiskFactorResponses};

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "-{:06}"), self.0)
            }
        }
    };
}

identifier!(
    /// Identifier of a registered mother or physician.
    UserId,
    "user"
);
identifier!(LogId, "log");
identifier!(EpdsRecordId, "epds");
identifier!(MessageId, "msg");

/// Stored account profile. Credentials are not modelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub is_physician: bool,
    pub weeks_postpartum: Option<u16>,
    pub delivery_date: Option<NaiveDate>,
}

impl UserProfile {
    /// Whole days since delivery, or `None` when unknown or in the future.
    pub fn days_since_delivery(&self, today: NaiveDate) -> Option<i64> {
        self.delivery_date
            .map(|delivered| (today - delivered).num_days())
            .filter(|days| *days >= 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub is_physician: bool,
    #[serde(default)]
    pub weeks_postpartum: Option<u16>,
    #[serde(default)]
    pub delivery_date: Option<NaiveDate>,
}

/// Partial profile update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub weeks_postpartum: Option<u16>,
    #[serde(default)]
    pub delivery_date: Option<NaiveDate>,
}

/// A day's check-in: the scored factor responses plus unscored context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    pub id: LogId,
    pub user_id: UserId,
    pub date: NaiveDate,
    pub factors: RiskFactorResponses,
    pub sleep_hours: Option<f32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLogSubmission {
    /// Defaults to the day the submission is received.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub factors: BTreeMap<String, FactorAnswer>,
    #[serde(default)]
    pub sleep_hours: Option<f32>,
    #[serde(default)]
    pub notes: Option<String>,
}

pub const MAX_SLEEP_HOURS: f32 = 24.0;

pub(crate) fn valid_sleep_hours(hours: f32) -> bool {
    hours.is_finite() && (0.0..=MAX_SLEEP_HOURS).contains(&hours)
}

pub(crate) fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|notes| notes.trim().to_string())
        .filter(|notes| !notes.is_empty())
}

/// A dated EPDS screening result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpdsRecord {
    pub id: EpdsRecordId,
    pub user_id: UserId,
    pub date: NaiveDate,
    pub score: u8,
    pub tier: EpdsTier,
}

/// Either the ten questionnaire answers or a score computed elsewhere, never both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpdsSubmission {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub answers: Option<Vec<i64>>,
    #[serde(default)]
    pub score: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub content: String,
}
