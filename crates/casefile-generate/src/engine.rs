use std::path::{Path, PathBuf};
use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use casefile_core::{Dataset, Solution, distinct_member_ids, validate_dataset};

use crate::errors::GenerationError;
use crate::generators::access::{self, AccessLogSettings};
use crate::generators::{Generated, incidents, staff, testimony};
use crate::model::{GenerateOptions, GenerationReport, TableReport};
use crate::output::csv::{CsvRecord, write_table_csv};

/// File name of the optional JSON report.
pub const REPORT_FILE: &str = "generation_report.json";

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub out_dir: PathBuf,
    pub dataset: Dataset,
    pub solution: Solution,
    pub report: GenerationReport,
}

/// Entry point for generating the case file.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Build all four tables in memory without touching the filesystem.
    pub fn build(&self) -> Result<BuiltTables, GenerationError> {
        self.options.validate()?;
        let window = self.options.history_window()?;
        let mut rng = ChaCha8Rng::seed_from_u64(self.options.seed);

        let incidents = incidents::generate(&mut rng, self.options.police_records, &window)?;
        let case_ids: Vec<String> = incidents
            .rows
            .iter()
            .map(|incident| incident.case_id.clone())
            .collect();

        let testimonies = testimony::generate(&mut rng, &case_ids, self.options.witness_reports)?;

        let pool = staff::generate_pool(&mut rng, self.options.staff_pool_size)?;
        let settings = AccessLogSettings {
            canonical_day_probability: self.options.canonical_day_probability,
            window,
        };
        let access_events =
            access::generate(&mut rng, &pool, self.options.access_events, &settings)?;

        let employee_ids = distinct_member_ids(&access_events.rows);
        if employee_ids.len() < pool.len() {
            info!(
                pool = pool.len(),
                seen = employee_ids.len(),
                "some badge ids never appear in the access log"
            );
        }
        let staff = staff::generate(&mut rng, &employee_ids, &pool)?;

        Ok(BuiltTables {
            incidents,
            testimonies,
            access_events,
            staff,
        })
    }

    /// Generate, validate and write the four tables.
    pub fn run(&self) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let out_dir = self.options.out_dir.clone();

        info!(
            run_id = %run_id,
            seed = self.options.seed,
            out_dir = %out_dir.display(),
            "generation started"
        );

        let built = self.build()?;
        let dataset = built.dataset();
        if let Err(err) = validate_dataset(&dataset) {
            warn!(run_id = %run_id, error = %err, "generated case file failed validation");
            return Err(err.into());
        }
        let solution = dataset.solution()?;

        std::fs::create_dir_all(&out_dir)?;
        let mut report = GenerationReport::new(run_id.clone(), self.options.seed);

        report.record_table(write_table(
            &out_dir,
            incidents::TABLE,
            self.options.police_records,
            &built.incidents,
        )?);
        report.record_table(write_table(
            &out_dir,
            testimony::TABLE,
            self.options.witness_reports,
            &built.testimonies,
        )?);
        report.record_table(write_table(
            &out_dir,
            access::TABLE,
            self.options.access_events,
            &built.access_events,
        )?);
        report.record_table(write_table(
            &out_dir,
            staff::TABLE,
            built.staff.len(),
            &built.staff,
        )?);

        report.duration_ms = start.elapsed().as_millis() as u64;
        if self.options.write_report {
            let report_path = out_dir.join(REPORT_FILE);
            std::fs::write(&report_path, serde_json::to_vec_pretty(&report)?)?;
            info!(path = %report_path.display(), "report written");
        }

        info!(
            run_id = %run_id,
            tables = report.tables.len(),
            duration_ms = report.duration_ms,
            bytes_written = report.bytes_written,
            "generation completed"
        );

        Ok(GenerationResult {
            out_dir,
            dataset,
            solution,
            report,
        })
    }
}

/// The four tables of one run, before they are written.
#[derive(Debug, Clone)]
pub struct BuiltTables {
    pub incidents: Generated<casefile_core::Incident>,
    pub testimonies: Generated<casefile_core::Testimony>,
    pub access_events: Generated<casefile_core::AccessEvent>,
    pub staff: Generated<casefile_core::StaffRecord>,
}

impl BuiltTables {
    pub fn dataset(&self) -> Dataset {
        Dataset {
            incidents: self.incidents.rows.clone(),
            testimonies: self.testimonies.rows.clone(),
            access_events: self.access_events.rows.clone(),
            staff: self.staff.rows.clone(),
        }
    }
}

/// Path of a table's CSV file inside `out_dir`.
pub fn table_path(out_dir: &Path, table: &str) -> PathBuf {
    out_dir.join(format!("{table}.csv"))
}

fn write_table<T: CsvRecord>(
    out_dir: &Path,
    table: &str,
    rows_requested: usize,
    generated: &Generated<T>,
) -> Result<TableReport, GenerationError> {
    let table_start = Instant::now();
    let path = table_path(out_dir, table);
    let bytes_written = write_table_csv(&path, &generated.rows)?;

    info!(
        table = %table,
        rows_generated = generated.len(),
        fixture_rows = generated.fixtures().len(),
        bytes_written,
        duration_ms = table_start.elapsed().as_millis() as u64,
        "table generated"
    );

    Ok(TableReport {
        table: table.to_string(),
        path,
        rows_requested: rows_requested as u64,
        rows_generated: generated.len() as u64,
        fixture_rows: generated.fixtures().len() as u64,
        filler_rows: generated.filler().len() as u64,
        bytes_written,
    })
}
