use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::domain::{DailyLog, EpdsRecord, UserId, UserProfile};
use crate::screening::{EpdsTier, RiskAggregator, RiskFactor};

/// Trailing window, in days and including `today`, used by the physician summary.
pub const SUMMARY_WINDOW_DAYS: i64 = 7;

/// Physician-facing snapshot of a patient's recent check-ins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub user_id: UserId,
    pub username: String,
    pub weeks_postpartum: Option<u16>,
    pub days_since_delivery: Option<i64>,
    pub latest_epds_score: Option<u8>,
    pub latest_epds_tier: Option<EpdsTier>,
    pub latest_epds_date: Option<NaiveDate>,
    pub average_sleep_hours: Option<f64>,
    pub average_sleep_quality: Option<f64>,
    pub average_stress_sub_score: Option<f64>,
    pub logs_considered: usize,
}

/// One charted day: every factor's sub-score and that day's weighted sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub sub_scores: Vec<(RiskFactor, u8)>,
    pub weighted_sum: f64,
    pub sleep_hours: Option<f32>,
    pub epds_score: Option<u8>,
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    (count > 0).then(|| sum / count as f64)
}

pub(crate) fn patient_summary(
    profile: &UserProfile,
    logs: &[DailyLog],
    epds: &[EpdsRecord],
    today: NaiveDate,
) -> PatientSummary {
    let window_start = today - Duration::days(SUMMARY_WINDOW_DAYS - 1);
    let recent: Vec<&DailyLog> = logs
        .iter()
        .filter(|log| log.date >= window_start && log.date <= today)
        .collect();
    let latest = epds.iter().max_by_key(|record| (record.date, record.id));

    PatientSummary {
        user_id: profile.id,
        username: profile.username.clone(),
        weeks_postpartum: profile.weeks_postpartum,
        days_since_delivery: profile.days_since_delivery(today),
        latest_epds_score: latest.map(|record| record.score),
        latest_epds_tier: latest.map(|record| record.tier),
        latest_epds_date: latest.map(|record| record.date),
        average_sleep_hours: mean(
            recent
                .iter()
                .filter_map(|log| log.sleep_hours.map(f64::from)),
        ),
        average_sleep_quality: mean(
            recent
                .iter()
                .map(|log| f64::from(log.factors.sleep_quality.value())),
        ),
        average_stress_sub_score: mean(
            recent
                .iter()
                .map(|log| f64::from(log.factors.sub_score(RiskFactor::Stress))),
        ),
        logs_considered: recent.len(),
    }
}

/// EPDS scores are attached to the log of the same date when one was recorded.
pub(crate) fn trend(
    logs: &[DailyLog],
    epds: &[EpdsRecord],
    risk: &RiskAggregator,
) -> Vec<TrendPoint> {
    logs.iter()
        .map(|log| {
            let sub_scores = log.factors.sub_scores().to_vec();
            let weighted_sum = risk.weighted_sum(&log.factors);
            let epds_score = epds
                .iter()
                .filter(|record| record.date == log.date)
                .max_by_key(|record| record.id)
                .map(|record| record.score);

            TrendPoint {
                date: log.date,
                sub_scores,
                weighted_sum,
                sleep_hours: log.sleep_hours,
                epds_score,
            }
        })
        .collect()
}
