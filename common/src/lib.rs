//! Shared data model and configuration for the site audit.
//!
//! * **[`record`]**: input site records and the four monitored [`record::Slot`]s.
//! * **[`report`]**: audited records and the closed status vocabulary.
//! * **[`config`]**: credentials, timeouts, commands and concurrency limits.

pub mod config;
pub mod record;
pub mod report;
