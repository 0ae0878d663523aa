use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use super::domain::{DailyLog, EpdsRecord, Message, UserId, UserProfile};
use super::repository::{JournalRepository, RepositoryError};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, UserProfile>,
    logs: Vec<DailyLog>,
    epds: Vec<EpdsRecord>,
    messages: Vec<Message>,
}

/// Process-local repository; contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryJournalRepository {
    tables: Mutex<Tables>,
}

impl InMemoryJournalRepository {
    fn tables(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("journal store lock poisoned".to_string()))
    }
}

impl JournalRepository for InMemoryJournalRepository {
    fn insert_user(&self, profile: UserProfile) -> Result<UserProfile, RepositoryError> {
        let mut tables = self.tables()?;
        let duplicate = tables.users.values().find(|existing| {
            existing.id == profile.id
                || existing.username.eq_ignore_ascii_case(&profile.username)
                || existing.email.eq_ignore_ascii_case(&profile.email)
        });
        if let Some(existing) = duplicate {
            let field = if existing.id == profile.id {
                "user id"
            } else if existing.username.eq_ignore_ascii_case(&profile.username) {
                "username"
            } else {
                "email"
            };
            return Err(RepositoryError::Conflict(format!("{field} already registered")));
        }
        tables.users.insert(profile.id, profile.clone());
        Ok(profile)
    }

    fn update_user(&self, profile: UserProfile) -> Result<(), RepositoryError> {
        let mut tables = self.tables()?;
        if !tables.users.contains_key(&profile.id) {
            return Err(RepositoryError::NotFound);
        }
        let email_taken = tables.users.values().any(|existing| {
            existing.id != profile.id && existing.email.eq_ignore_ascii_case(&profile.email)
        });
        if email_taken {
            return Err(RepositoryError::Conflict(
                "email already registered".to_string(),
            ));
        }
        tables.users.insert(profile.id, profile);
        Ok(())
    }

    fn fetch_user(&self, id: UserId) -> Result<Option<UserProfile>, RepositoryError> {
        Ok(self.tables()?.users.get(&id).cloned())
    }

    fn insert_log(&self, log: DailyLog) -> Result<DailyLog, RepositoryError> {
        let mut tables = self.tables()?;
        ensure_free_date(&tables.logs, &log)?;
        tables.logs.push(log.clone());
        Ok(log)
    }

    fn insert_logs(&self, logs: Vec<DailyLog>) -> Result<Vec<DailyLog>, RepositoryError> {
        let mut tables = self.tables()?;
        for (position, log) in logs.iter().enumerate() {
            ensure_free_date(&tables.logs, log)?;
            ensure_free_date(&logs[..position], log)?;
        }
        tables.logs.extend(logs.iter().cloned());
        Ok(logs)
    }

    fn logs_for(&self, user: UserId) -> Result<Vec<DailyLog>, RepositoryError> {
        let mut logs: Vec<DailyLog> = self
            .tables()?
            .logs
            .iter()
            .filter(|log| log.user_id == user)
            .cloned()
            .collect();
        logs.sort_by_key(|log| log.date);
        Ok(logs)
    }

    fn insert_epds(&self, record: EpdsRecord) -> Result<EpdsRecord, RepositoryError> {
        self.tables()?.epds.push(record);
        Ok(record)
    }

    fn epds_for(&self, user: UserId) -> Result<Vec<EpdsRecord>, RepositoryError> {
        let mut records: Vec<EpdsRecord> = self
            .tables()?
            .epds
            .iter()
            .filter(|record| record.user_id == user)
            .copied()
            .collect();
        records.sort_by_key(|record| (record.date, record.id));
        Ok(records)
    }

    fn insert_message(&self, message: Message) -> Result<Message, RepositoryError> {
        self.tables()?.messages.push(message.clone());
        Ok(message)
    }

    fn messages_for(&self, user: UserId) -> Result<Vec<Message>, RepositoryError> {
        let mut messages: Vec<Message> = self
            .tables()?
            .messages
            .iter()
            .filter(|message| message.sender_id == user || message.receiver_id == user)
            .cloned()
            .collect();
        messages.sort_by_key(|message| (message.sent_at, message.id));
        Ok(messages)
    }
}

fn ensure_free_date(stored: &[DailyLog], log: &DailyLog) -> Result<(), RepositoryError> {
    if stored
        .iter()
        .any(|existing| existing.user_id == log.user_id && existing.date == log.date)
    {
        return Err(RepositoryError::Conflict(format!(
            "daily log for {} already recorded",
            log.date
        )));
    }
    Ok(())
}
