use std::path::{Path, PathBuf};

use casefile_generate::GenerateOptions;

use crate::CliError;

/// Values given on the command line; each one wins over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub out_dir: Option<PathBuf>,
    pub seed: Option<u64>,
    pub police_records: Option<usize>,
    pub witness_reports: Option<usize>,
    pub access_events: Option<usize>,
    pub staff_pool_size: Option<usize>,
    pub write_report: bool,
}

/// Read generation options from a TOML file; absent keys keep their defaults.
pub fn load_options(path: Option<&Path>) -> Result<GenerateOptions, CliError> {
    let Some(path) = path else {
        return Ok(GenerateOptions::default());
    };
    let content = std::fs::read_to_string(path)?;
    parse_options(&content)
}

pub fn parse_options(content: &str) -> Result<GenerateOptions, CliError> {
    Ok(toml::from_str(content)?)
}

pub fn apply_overrides(mut options: GenerateOptions, overrides: Overrides) -> GenerateOptions {
    if let Some(out_dir) = overrides.out_dir {
        options.out_dir = out_dir;
    }
    if let Some(seed) = overrides.seed {
        options.seed = seed;
    }
    if let Some(rows) = overrides.police_records {
        options.police_records = rows;
    }
    if let Some(rows) = overrides.witness_reports {
        options.witness_reports = rows;
    }
    if let Some(rows) = overrides.access_events {
        options.access_events = rows;
    }
    if let Some(size) = overrides.staff_pool_size {
        options.staff_pool_size = size;
    }
    options.write_report |= overrides.write_report;
    options
}
