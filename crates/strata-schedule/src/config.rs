//! Compiler configuration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strata_core::Result;

/// Start date used when a deck has no START keyword: 1 January 1983.
const DEFAULT_START: (i32, u32, u32) = (1983, 1, 1);

/// Configuration for schedule compilation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// First time point when the deck has no START keyword.
    pub default_start_date: NaiveDate,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        let (year, month, day) = DEFAULT_START;
        Self {
            default_start_date: NaiveDate::from_ymd_opt(year, month, day)
                .unwrap_or(NaiveDate::MIN),
        }
    }
}

impl ScheduleConfig {
    /// Set the start date used for decks without START.
    pub fn with_default_start_date(mut self, date: NaiveDate) -> Self {
        self.default_start_date = date;
        self
    }

    /// Load a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
