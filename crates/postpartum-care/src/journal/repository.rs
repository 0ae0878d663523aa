use super::domain::{DailyLog, EpdsRecord, Message, UserId, UserProfile};

/// Storage abstraction so the journal service can be exercised in isolation.
///
/// Listing methods return records in chronological order.
pub trait JournalRepository: Send + Sync {
    fn insert_user(&self, profile: UserProfile) -> Result<UserProfile, RepositoryError>;
    fn update_user(&self, profile: UserProfile) -> Result<(), RepositoryError>;
    fn fetch_user(&self, id: UserId) -> Result<Option<UserProfile>, RepositoryError>;

    fn insert_log(&self, log: DailyLog) -> Result<DailyLog, RepositoryError>;
    /// Stores every log or none of them.
    fn insert_logs(&self, logs: Vec<DailyLog>) -> Result<Vec<DailyLog>, RepositoryError>;
    fn logs_for(&self, user: UserId) -> Result<Vec<DailyLog>, RepositoryError>;

    fn insert_epds(&self, record: EpdsRecord) -> Result<EpdsRecord, RepositoryError>;
    fn epds_for(&self, user: UserId) -> Result<Vec<EpdsRecord>, RepositoryError>;

    fn insert_message(&self, message: Message) -> Result<Message, RepositoryError>;
    fn messages_for(&self, user: UserId) -> Result<Vec<Message>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists: {0}")]
    Conflict(String),
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
