//! Postpartum health tracking backend.
//!
//! [`screening`] holds the scoring core: the Edinburgh Postnatal Depression Scale evaluator and
//! the weighted lifestyle-factor risk aggregator. [`journal`] layers daily check-ins, EPDS
//! history, patient summaries and direct messages on top of it behind a repository trait.

pub mod config;
pub mod error;
pub mod journal;
pub mod screening;
pub mod telemetry;
