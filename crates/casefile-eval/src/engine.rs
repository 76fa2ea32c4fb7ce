use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{info, warn};

use casefile_core::{
    AccessEvent, DATE_FORMAT, Dataset, Incident, Involvement, StaffRecord, TIMESTAMP_FORMAT,
    Testimony, check_dataset, distinct_member_ids, timeline_matches,
};

use crate::errors::EvalError;
use crate::model::{TableCount, VerificationReport, VerifyOptions};

pub const POLICE_RECORDS: &str = "police_records";
pub const WITNESS_REPORTS: &str = "witness_reports";
pub const STAGE_ACCESS: &str = "stage_access";
pub const STAFF_DATABASE: &str = "staff_database";

/// File name of the optional JSON report.
pub const REPORT_FILE: &str = "verification_report.json";

/// Verify a generated case file directory.
#[derive(Debug, Clone, Default)]
pub struct VerificationEngine {
    options: VerifyOptions,
}

impl VerificationEngine {
    pub fn new(options: VerifyOptions) -> Self {
        Self { options }
    }

    pub fn run(&self, dataset_dir: &Path) -> Result<VerificationReport, EvalError> {
        let start = Instant::now();
        info!(dir = %dataset_dir.display(), "verification started");

        let mut dataset = load_dataset(dataset_dir)?;
        let tables = vec![
            count(POLICE_RECORDS, dataset.incidents.len()),
            count(WITNESS_REPORTS, dataset.testimonies.len()),
            count(STAGE_ACCESS, dataset.access_events.len()),
            count(STAFF_DATABASE, dataset.staff.len()),
        ];

        let mut violations = Vec::new();
        for involvement in [Involvement::Murderer, Involvement::Victim] {
            match identify(&dataset.access_events, involvement) {
                Ok(member_id) => tag_staff(&mut dataset.staff, &member_id, involvement),
                Err(problem) => violations.push(problem),
            }
        }
        violations.extend(check_dataset(&dataset));
        violations.dedup();

        let solution = dataset.solution().ok();
        let report = VerificationReport {
            tables,
            violations,
            solution,
        };

        for violation in &report.violations {
            warn!(violation = %violation, "case file violation");
        }
        info!(
            violations = report.violations.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "verification finished"
        );

        if self.options.write_report {
            let report_path = dataset_dir.join(REPORT_FILE);
            std::fs::write(&report_path, serde_json::to_vec_pretty(&report)?)?;
            info!(path = %report_path.display(), "report written");
        }

        if self.options.strict && !report.is_valid() {
            return Err(EvalError::Violations(report.violations.len() as u64));
        }
        Ok(report)
    }
}

fn count(table: &str, rows: usize) -> TableCount {
    TableCount {
        table: table.to_string(),
        rows: rows as u64,
    }
}

/// Badge id whose swipes contain the whole scripted timeline of `involvement`.
fn identify(events: &[AccessEvent], involvement: Involvement) -> Result<String, String> {
    let candidates: Vec<String> = distinct_member_ids(events)
        .into_iter()
        .filter(|member_id| timeline_matches(events, member_id, involvement))
        .collect();
    match candidates.as_slice() {
        [member_id] => Ok(member_id.clone()),
        [] => Err(format!(
            "no badge id carries the scripted movements of the {involvement}"
        )),
        many => Err(format!(
            "{} badge ids carry the scripted movements of the {involvement}",
            many.len()
        )),
    }
}

fn tag_staff(staff: &mut [StaffRecord], member_id: &str, involvement: Involvement) {
    for record in staff.iter_mut() {
        if record.employee_id == member_id {
            record.involvement = involvement;
        }
    }
}

/// Load all four tables from `dir`.
pub fn load_dataset(dir: &Path) -> Result<Dataset, EvalError> {
    Ok(Dataset {
        incidents: load_table(dir, POLICE_RECORDS, &INCIDENT_COLUMNS, parse_incident)?,
        testimonies: load_table(dir, WITNESS_REPORTS, &TESTIMONY_COLUMNS, parse_testimony)?,
        access_events: load_table(dir, STAGE_ACCESS, &ACCESS_COLUMNS, parse_access_event)?,
        staff: load_table(dir, STAFF_DATABASE, &STAFF_COLUMNS, parse_staff)?,
    })
}

const INCIDENT_COLUMNS: [&str; 5] = ["case_id", "squad", "date", "location", "type"];
const TESTIMONY_COLUMNS: [&str; 3] = ["case_id", "witness_name", "testimony"];
const ACCESS_COLUMNS: [&str; 4] = ["date", "location", "member_id", "direction"];
const STAFF_COLUMNS: [&str; 3] = ["employee_id", "employee_name", "employee_role"];

/// One CSV record with its columns resolved by header name.
struct Row<'a> {
    table: &'a str,
    line: u64,
    record: &'a csv::StringRecord,
    positions: &'a HashMap<&'static str, usize>,
}

impl Row<'_> {
    fn field(&self, column: &str) -> Result<&str, EvalError> {
        self.positions
            .get(column)
            .and_then(|index| self.record.get(*index))
            .ok_or_else(|| {
                EvalError::InvalidDataset(format!(
                    "{} line {}: missing field '{}'",
                    self.table, self.line, column
                ))
            })
    }

    fn parse<T>(&self, column: &str) -> Result<T, EvalError>
    where
        T: std::str::FromStr<Err = casefile_core::Error>,
    {
        self.field(column)?.parse::<T>().map_err(|err| {
            EvalError::InvalidDataset(format!("{} line {}: {}", self.table, self.line, err))
        })
    }

    fn invalid(&self, column: &str, value: &str) -> EvalError {
        EvalError::InvalidDataset(format!(
            "{} line {}: invalid {} '{}'",
            self.table, self.line, column, value
        ))
    }
}

fn load_table<T>(
    dir: &Path,
    table: &str,
    columns: &[&'static str],
    parse: fn(&Row<'_>) -> Result<T, EvalError>,
) -> Result<Vec<T>, EvalError> {
    let path = dir.join(format!("{table}.csv"));
    if !path.exists() {
        return Err(EvalError::InvalidDataset(format!(
            "dataset file not found: {}",
            path.display()
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(&path)?;
    let headers = reader.headers()?.clone();

    let mut positions = HashMap::new();
    let mut missing = Vec::new();
    for column in columns {
        match headers.iter().position(|header| header == *column) {
            Some(index) => {
                positions.insert(*column, index);
            }
            None => missing.push(*column),
        }
    }
    if !missing.is_empty() {
        return Err(EvalError::InvalidDataset(format!(
            "{table}: missing columns: {}",
            missing.join(", ")
        )));
    }

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let row = Row {
            table,
            line: index as u64 + 2,
            record: &record,
            positions: &positions,
        };
        rows.push(parse(&row)?);
    }
    Ok(rows)
}

fn parse_incident(row: &Row<'_>) -> Result<Incident, EvalError> {
    let date = row.field("date")?;
    Ok(Incident {
        case_id: row.field("case_id")?.to_string(),
        squad: row.parse("squad")?,
        date: NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|_| row.invalid("date", date))?,
        location: row.parse("location")?,
        incident_type: row.parse("type")?,
    })
}

fn parse_testimony(row: &Row<'_>) -> Result<Testimony, EvalError> {
    Ok(Testimony {
        case_id: row.field("case_id")?.to_string(),
        witness_name: row.field("witness_name")?.to_string(),
        testimony: row.field("testimony")?.to_string(),
    })
}

fn parse_access_event(row: &Row<'_>) -> Result<AccessEvent, EvalError> {
    let timestamp = row.field("date")?;
    Ok(AccessEvent {
        timestamp: NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
            .map_err(|_| row.invalid("date", timestamp))?,
        location: row.parse("location")?,
        member_id: row.field("member_id")?.to_string(),
        direction: row.parse("direction")?,
    })
}

fn parse_staff(row: &Row<'_>) -> Result<StaffRecord, EvalError> {
    Ok(StaffRecord {
        employee_id: row.field("employee_id")?.to_string(),
        employee_name: row.field("employee_name")?.to_string(),
        employee_role: row.parse("employee_role")?,
        involvement: Involvement::Bystander,
    })
}

#[cfg(test)]
mod tests {
    use casefile_core::TIMELINE;

    use super::*;

    #[test]
    fn identifies_the_single_matching_badge() {
        let events: Vec<AccessEvent> = TIMELINE
            .iter()
            .map(|entry| match entry.involvement {
                Involvement::Murderer => entry.event_for("MURDER01"),
                _ => entry.event_for("VICTIM01"),
            })
            .collect();
        assert_eq!(
            identify(&events, Involvement::Murderer),
            Ok("MURDER01".to_string())
        );
        assert_eq!(
            identify(&events, Involvement::Victim),
            Ok("VICTIM01".to_string())
        );
    }

    #[test]
    fn two_badges_with_the_same_movements_are_reported() {
        let events: Vec<AccessEvent> = TIMELINE
            .iter()
            .filter(|entry| entry.involvement == Involvement::Victim)
            .flat_map(|entry| [entry.event_for("VICTIM01"), entry.event_for("VICTIM02")])
            .collect();
        assert_eq!(
            identify(&events, Involvement::Victim),
            Err("2 badge ids carry the scripted movements of the victim".to_string())
        );
    }

    #[test]
    fn missing_timeline_is_reported() {
        let events = vec![TIMELINE[0].event_for("MURDER01")];
        assert_eq!(
            identify(&events, Involvement::Murderer),
            Err("no badge id carries the scripted movements of the murderer".to_string())
        );
    }
}
