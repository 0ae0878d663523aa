use std::collections::BTreeMap;
use std::io::{Read, Write};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::domain::{normalize_notes, valid_sleep_hours, DailyLog};
use crate::screening::{FactorAnswer, InvalidInput, RiskFactor, RiskFactorResponses};

/// A check-in parsed from a spreadsheet row, not yet assigned to a user.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ImportedLog {
    pub(crate) date: NaiveDate,
    pub(crate) factors: RiskFactorResponses,
    pub(crate) sleep_hours: Option<f32>,
    pub(crate) notes: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum LogImportError {
    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: '{value}' is not a YYYY-MM-DD date")]
    Date { row: usize, value: String },
    #[error("row {row}: {source}")]
    Factor {
        row: usize,
        #[source]
        source: InvalidInput,
    },
    #[error("row {row}: sleep hours '{value}' is not a number in 0..=24")]
    SleepHours { row: usize, value: String },
    #[error("row {row}: date {date} appears more than once")]
    DuplicateDate { row: usize, date: NaiveDate },
}

/// Column layout shared by import and export.
#[derive(Debug, Serialize, Deserialize)]
struct LogRow {
    date: String,
    mental_health: String,
    stress: String,
    social_support: String,
    physical_health: String,
    nutrition: String,
    sleep_quality: String,
    economic_stress: String,
    hormonal_changes: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    sleep_hours: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    notes: Option<String>,
}

impl LogRow {
    fn answers(&self) -> BTreeMap<String, FactorAnswer> {
        let cell = |value: &String| FactorAnswer::Label(value.clone());
        [
            (RiskFactor::MentalHealth, cell(&self.mental_health)),
            (RiskFactor::Stress, cell(&self.stress)),
            (RiskFactor::SocialSupport, cell(&self.social_support)),
            (RiskFactor::PhysicalHealth, cell(&self.physical_health)),
            (RiskFactor::Nutrition, cell(&self.nutrition)),
            (RiskFactor::SleepQuality, cell(&self.sleep_quality)),
            (RiskFactor::EconomicStress, cell(&self.economic_stress)),
            (RiskFactor::HormonalChanges, cell(&self.hormonal_changes)),
        ]
        .into_iter()
        .map(|(factor, answer)| (factor.key().to_string(), answer))
        .collect()
    }

    fn from_log(log: &DailyLog) -> Self {
        let factors = &log.factors;
        Self {
            date: log.date.format("%Y-%m-%d").to_string(),
            mental_health: factors.mental_health.label().to_string(),
            stress: factors.stress.label().to_string(),
            social_support: factors.social_support.value().to_string(),
            physical_health: factors.physical_health.label().to_string(),
            nutrition: factors.nutrition.value().to_string(),
            sleep_quality: factors.sleep_quality.value().to_string(),
            economic_stress: factors.economic_stress.value().to_string(),
            hormonal_changes: factors.hormonal_changes.label().to_string(),
            sleep_hours: log.sleep_hours.map(|hours| hours.to_string()),
            notes: log.notes.clone(),
        }
    }
}

/// Parse a header-first CSV of check-ins. Rows are numbered from 1, excluding the header.
pub(crate) fn parse_logs<R: Read>(reader: R) -> Result<Vec<ImportedLog>, LogImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut logs: Vec<ImportedLog> = Vec::new();

    for (index, record) in csv_reader.deserialize::<LogRow>().enumerate() {
        let row_number = index + 1;
        let row = record?;

        let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d").map_err(|_| {
            LogImportError::Date {
                row: row_number,
                value: row.date.clone(),
            }
        })?;
        if logs.iter().any(|log| log.date == date) {
            return Err(LogImportError::DuplicateDate {
                row: row_number,
                date,
            });
        }

        let factors = RiskFactorResponses::from_answers(&row.answers()).map_err(|source| {
            LogImportError::Factor {
                row: row_number,
                source,
            }
        })?;

        let sleep_hours = match row.sleep_hours.as_deref() {
            None => None,
            Some(raw) => match raw.parse::<f32>() {
                Ok(value) if valid_sleep_hours(value) => Some(value),
                _ => {
                    return Err(LogImportError::SleepHours {
                        row: row_number,
                        value: raw.to_string(),
                    })
                }
            },
        };

        logs.push(ImportedLog {
            date,
            factors,
            sleep_hours,
            notes: normalize_notes(row.notes),
        });
    }

    Ok(logs)
}

pub(crate) fn write_logs<W: Write>(writer: W, logs: &[DailyLog]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for log in logs {
        csv_writer.serialize(LogRow::from_log(log))?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::domain::{LogId, UserId};
    use crate::screening::RiskFactor;

    const HEADER: &str = "date,mental_health,stress,social_support,physical_health,nutrition,sleep_quality,economic_stress,hormonal_changes,sleep_hours,notes\n";

    #[test]
    fn parses_rows_with_optional_columns() {
        let csv = format!(
            "{HEADER}2025-09-01,Feeling good,Low stress,5,Feeling healthy,4,3,2,No,7.5,walked outside\n\
             2025-09-02,Need support,High stress,1,Some concerns,2,1,5,Yes,,\n"
        );

        let logs = parse_logs(csv.as_bytes()).expect("csv parses");

        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].sleep_hours, Some(7.5));
        assert_eq!(logs[0].notes.as_deref(), Some("walked outside"));
        assert_eq!(logs[1].sleep_hours, None);
        assert_eq!(logs[1].notes, None);
        assert_eq!(logs[1].factors.sub_score(RiskFactor::SocialSupport), 10);
    }

    #[test]
    fn reports_the_row_of_an_invalid_rating() {
        let csv = format!(
            "{HEADER}2025-09-01,Feeling good,Low stress,5,Feeling healthy,4,3,2,No,7,\n\
             2025-09-02,Feeling good,Low stress,6,Feeling healthy,4,3,2,No,7,\n"
        );

        match parse_logs(csv.as_bytes()) {
            Err(LogImportError::Factor { row, source }) => {
                assert_eq!(row, 2);
                assert_eq!(
                    source,
                    InvalidInput::RatingOutOfRange {
                        factor: RiskFactor::SocialSupport,
                        rating: 6
                    }
                );
            }
            other => panic!("expected factor error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_dates_and_sleep_hours() {
        let bad_date = format!(
            "{HEADER}09/01/2025,Feeling good,Low stress,5,Feeling healthy,4,3,2,No,7,\n"
        );
        assert!(matches!(
            parse_logs(bad_date.as_bytes()),
            Err(LogImportError::Date { row: 1, .. })
        ));

        let bad_sleep = format!(
            "{HEADER}2025-09-01,Feeling good,Low stress,5,Feeling healthy,4,3,2,No,30,\n"
        );
        assert!(matches!(
            parse_logs(bad_sleep.as_bytes()),
            Err(LogImportError::SleepHours { row: 1, .. })
        ));
    }

    #[test]
    fn unreadable_sleep_hours_report_the_cell_text() {
        let csv = format!(
            "{HEADER}2025-09-01,Feeling good,Low stress,5,Feeling healthy,4,3,2,No,about six,\n"
        );

        let error = parse_logs(csv.as_bytes()).expect_err("sleep cell is not a number");
        assert_eq!(
            error.to_string(),
            "row 1: sleep hours 'about six' is not a number in 0..=24"
        );
    }

    #[test]
    fn rejects_repeated_dates() {
        let csv = format!(
            "{HEADER}2025-09-01,Feeling good,Low stress,5,Feeling healthy,4,3,2,No,7,\n\
             2025-09-01,Feeling good,Low stress,5,Feeling healthy,4,3,2,No,7,\n"
        );

        assert!(matches!(
            parse_logs(csv.as_bytes()),
            Err(LogImportError::DuplicateDate { row: 2, .. })
        ));
    }

    #[test]
    fn exported_rows_can_be_imported_again() {
        let csv = format!(
            "{HEADER}2025-09-03,Some struggles,Moderate stress,3,Some concerns,3,2,4,Yes,6,\"tired, but ok\"\n"
        );
        let imported = parse_logs(csv.as_bytes()).expect("csv parses");
        let log = DailyLog {
            id: LogId(1),
            user_id: UserId(1),
            date: imported[0].date,
            factors: imported[0].factors,
            sleep_hours: imported[0].sleep_hours,
            notes: imported[0].notes.clone(),
        };

        let mut buffer = Vec::new();
        write_logs(&mut buffer, &[log]).expect("export succeeds");
        let reimported = parse_logs(buffer.as_slice()).expect("export parses");

        assert_eq!(reimported, imported);
    }
}
