use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use casefile_core::{
    AccessEvent, Category, DATE_FORMAT, Incident, StaffRecord, TIMESTAMP_FORMAT, Testimony,
};

/// A row that knows its table's header and how to flatten itself.
pub trait CsvRecord {
    const HEADER: &'static [&'static str];

    fn to_record(&self) -> Vec<String>;
}

impl CsvRecord for Incident {
    const HEADER: &'static [&'static str] = &["case_id", "squad", "date", "location", "type"];

    fn to_record(&self) -> Vec<String> {
        vec![
            self.case_id.clone(),
            self.squad.label().to_string(),
            self.date.format(DATE_FORMAT).to_string(),
            self.location.label().to_string(),
            self.incident_type.label().to_string(),
        ]
    }
}

impl CsvRecord for Testimony {
    const HEADER: &'static [&'static str] = &["case_id", "witness_name", "testimony"];

    fn to_record(&self) -> Vec<String> {
        vec![
            self.case_id.clone(),
            self.witness_name.clone(),
            self.testimony.clone(),
        ]
    }
}

impl CsvRecord for AccessEvent {
    const HEADER: &'static [&'static str] = &["date", "location", "member_id", "direction"];

    fn to_record(&self) -> Vec<String> {
        vec![
            self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            self.location.label().to_string(),
            self.member_id.clone(),
            self.direction.label().to_string(),
        ]
    }
}

impl CsvRecord for StaffRecord {
    const HEADER: &'static [&'static str] = &["employee_id", "employee_name", "employee_role"];

    fn to_record(&self) -> Vec<String> {
        vec![
            self.employee_id.clone(),
            self.employee_name.clone(),
            self.employee_role.label().to_string(),
        ]
    }
}

/// Write a table as CSV with a header row, returning the bytes written.
pub fn write_table_csv<T: CsvRecord>(path: &Path, rows: &[T]) -> Result<u64, csv::Error> {
    let writer = BufWriter::new(File::create(path).map_err(csv::Error::from)?);
    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(counting);

    writer.write_record(T::HEADER)?;
    for row in rows {
        writer.write_record(row.to_record())?;
    }

    writer.flush()?;
    let counting = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(counting.bytes_written())
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
