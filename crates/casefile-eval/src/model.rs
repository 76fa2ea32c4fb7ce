use serde::{Deserialize, Serialize};

use casefile_core::Solution;

/// Options for the verification engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifyOptions {
    /// Turn any violation into an error.
    pub strict: bool,
    /// Write `verification_report.json` next to the tables.
    pub write_report: bool,
}

/// Rows found in one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCount {
    pub table: String,
    pub rows: u64,
}

/// Outcome of verifying a dataset directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub tables: Vec<TableCount>,
    pub violations: Vec<String>,
    /// Answer recovered from the tables, when the principals could be identified.
    pub solution: Option<Solution>,
}

impl VerificationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn rows(&self, table: &str) -> Option<u64> {
        self.tables
            .iter()
            .find(|count| count.table == table)
            .map(|count| count.rows)
    }
}
