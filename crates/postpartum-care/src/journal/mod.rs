//! Accounts, daily check-ins, EPDS history, physician summaries and direct messages.
//!
//! Storage sits behind [`JournalRepository`]; [`InMemoryJournalRepository`] is the bundled
//! implementation. All scoring is delegated to the shared [`crate::screening::ScreeningEngine`].

pub mod csv_io;
pub mod domain;
pub mod memory;
pub mod repository;
pub mod router;
pub mod service;
pub mod summary;

#[cfg(test)]
mod tests;

pub use csv_io::LogImportError;
pub use domain::{
    DailyLog, DailyLogSubmission, EpdsRecord, EpdsRecordId, EpdsSubmission, LogId, Message,
    MessageId, NewMessage, ProfileUpdate, Registration, UserId, UserProfile, MAX_SLEEP_HOURS,
};
pub use memory::InMemoryJournalRepository;
pub use repository::{JournalRepository, RepositoryError};
pub use router::journal_router;
pub use service::{JournalService, JournalServiceError, MAX_MESSAGE_CHARS};
pub use summary::{PatientSummary, TrendPoint, SUMMARY_WINDOW_DAYS};
