//! CLI command handlers

pub mod achievement;
pub mod aura;
pub mod bounty;
pub mod cipher;
pub mod content;
pub mod vote;

use chrono::{DateTime, Utc};

pub(crate) fn format_time(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}
