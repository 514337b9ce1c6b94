//! Client event log and its reporter.

pub mod logger;
pub mod reporter;
