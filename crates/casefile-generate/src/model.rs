use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::GenerationError;
use crate::generators::HistoryWindow;

/// Default first day of the history window.
pub const HISTORY_START: NaiveDate = match NaiveDate::from_ymd_opt(2023, 1, 1) {
    Some(date) => date,
    None => panic!("invalid history start"),
};

/// Default end of the history window, exclusive.
pub const HISTORY_END: NaiveDate = match NaiveDate::from_ymd_opt(2025, 3, 31) {
    Some(date) => date,
    None => panic!("invalid history end"),
};

/// Options for the generation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Directory the four CSV files are written to.
    pub out_dir: PathBuf,
    /// Seed of the single RNG threaded through every generator.
    pub seed: u64,
    /// Rows in `police_records.csv`, canonical case included.
    pub police_records: usize,
    /// Rows in `witness_reports.csv`, scripted testimonies included.
    pub witness_reports: usize,
    /// Rows in `stage_access.csv`, scripted timeline included.
    pub access_events: usize,
    /// Number of badge ids filler events are drawn from.
    pub staff_pool_size: usize,
    /// Chance that a filler access event lands on the day of the murder.
    pub canonical_day_probability: f64,
    /// First day random dates may fall on.
    pub history_start: NaiveDate,
    /// Day after the last one random dates may fall on.
    pub history_end: NaiveDate,
    /// Also write `generation_report.json` next to the tables.
    pub write_report: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            seed: 42,
            police_records: 100,
            witness_reports: 150,
            access_events: 200,
            staff_pool_size: 20,
            canonical_day_probability: 0.2,
            history_start: HISTORY_START,
            history_end: HISTORY_END,
            write_report: false,
        }
    }
}

impl GenerateOptions {
    /// Reject settings no generator could honor.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if !(0.0..=1.0).contains(&self.canonical_day_probability) {
            return Err(GenerationError::InvalidOptions(format!(
                "canonical_day_probability must be within [0, 1], got {}",
                self.canonical_day_probability
            )));
        }
        if self.staff_pool_size < 2 {
            return Err(GenerationError::InvalidOptions(format!(
                "staff_pool_size must be at least 2, got {}",
                self.staff_pool_size
            )));
        }
        self.history_window()?;
        Ok(())
    }

    pub fn history_window(&self) -> Result<HistoryWindow, GenerationError> {
        HistoryWindow::new(self.history_start, self.history_end)
    }
}

/// Summary of a generated table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReport {
    pub table: String,
    pub path: PathBuf,
    pub rows_requested: u64,
    pub rows_generated: u64,
    pub fixture_rows: u64,
    pub filler_rows: u64,
    pub bytes_written: u64,
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub seed: u64,
    pub tables: Vec<TableReport>,
    pub bytes_written: u64,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(run_id: String, seed: u64) -> Self {
        Self {
            run_id,
            seed,
            tables: Vec::new(),
            bytes_written: 0,
            duration_ms: 0,
        }
    }

    pub fn record_table(&mut self, table: TableReport) {
        self.bytes_written = self.bytes_written.saturating_add(table.bytes_written);
        self.tables.push(table);
    }

    pub fn table(&self, name: &str) -> Option<&TableReport> {
        self.tables.iter().find(|table| table.table == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_run() {
        let options = GenerateOptions::default();
        assert_eq!(options.seed, 42);
        assert_eq!(
            (
                options.police_records,
                options.witness_reports,
                options.access_events
            ),
            (100, 150, 200)
        );
        assert!(options.validate().is_ok());
    }

    #[test]
    fn default_history_window_spans_2023_to_march_2025() {
        let options = GenerateOptions::default();
        assert_eq!(options.history_start.to_string(), "2023-01-01");
        assert_eq!(options.history_end.to_string(), "2025-03-31");

        let window = options.history_window().expect("window");
        assert_eq!(window.start(), HISTORY_START);
        assert_eq!(window.end(), HISTORY_END);
    }

    #[test]
    fn rejects_probability_out_of_range() {
        let options = GenerateOptions {
            canonical_day_probability: 1.5,
            ..GenerateOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(GenerationError::InvalidOptions(_))
        ));
    }

    #[test]
    fn rejects_inverted_history_window() {
        let options = GenerateOptions {
            history_start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
            history_end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            ..GenerateOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(GenerationError::InvalidOptions(_))
        ));
    }
}
