use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use postpartum_care::journal::{InMemoryJournalRepository, JournalService};
use postpartum_care::screening::ScreeningEngine;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) type InMemoryJournalService = JournalService<InMemoryJournalRepository>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Journal service over a fresh in-memory store, sharing `engine` with the stateless routes.
pub(crate) fn in_memory_journal(engine: Arc<ScreeningEngine>) -> Arc<InMemoryJournalService> {
    Arc::new(JournalService::new(
        Arc::new(InMemoryJournalRepository::default()),
        engine,
    ))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
