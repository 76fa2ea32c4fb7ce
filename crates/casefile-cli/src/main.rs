mod config;
mod logging;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use casefile_eval::{EvalError, VerificationEngine, VerificationReport, VerifyOptions};
use casefile_generate::{GenerationEngine, GenerationError, GenerationResult};
use clap::{Args, Parser, Subcommand};
use config::{Overrides, apply_overrides, load_options};
use logging::init_logging;
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("verification error: {0}")]
    Eval(#[from] EvalError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("logging error: {0}")]
    Logging(String),
}

#[derive(Parser, Debug)]
#[command(name = "casefile", version, about = "Aurora Theater case file generator")]
struct Cli {
    /// Append JSON logs to this file.
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the four case file tables.
    Generate(GenerateArgs),
    /// Check a generated directory against the puzzle invariants.
    Verify(VerifyArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// TOML file with generation options.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Directory the CSV files are written to.
    #[arg(long)]
    out_dir: Option<PathBuf>,
    /// Seed of the random generator.
    #[arg(long)]
    seed: Option<u64>,
    /// Rows in police_records.csv.
    #[arg(long)]
    police_records: Option<usize>,
    /// Rows in witness_reports.csv (at least 5).
    #[arg(long)]
    witness_reports: Option<usize>,
    /// Rows in stage_access.csv (at least 11).
    #[arg(long)]
    access_events: Option<usize>,
    /// Number of badge ids in the staff pool.
    #[arg(long)]
    staff_pool: Option<usize>,
    /// Also write generation_report.json.
    #[arg(long, default_value_t = false)]
    report: bool,
}

#[derive(Args, Debug)]
struct VerifyArgs {
    /// Directory holding the four CSV files.
    #[arg(long, default_value = ".")]
    dir: PathBuf,
    /// Exit with an error on any violation.
    #[arg(long, default_value_t = false)]
    strict: bool,
    /// Print the report as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Also write verification_report.json into the directory.
    #[arg(long, default_value_t = false)]
    report: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(cli.log_file.as_deref()) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    let (outcome, context) = match cli.command {
        Command::Generate(args) => (run_generate(args), "error generating datasets"),
        Command::Verify(args) => (run_verify(args), "error verifying datasets"),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "{context}");
            eprintln!("{context}: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let GenerateArgs {
        config,
        out_dir,
        seed,
        police_records,
        witness_reports,
        access_events,
        staff_pool,
        report,
    } = args;

    let options = apply_overrides(
        load_options(config.as_deref())?,
        Overrides {
            out_dir,
            seed,
            police_records,
            witness_reports,
            access_events,
            staff_pool_size: staff_pool,
            write_report: report,
        },
    );

    println!("Starting data generation...");
    let result = GenerationEngine::new(options).run()?;
    println!("Datasets generated successfully!");
    print_solution(&result);
    print_listing(&result.out_dir)?;
    Ok(())
}

fn print_solution(result: &GenerationResult) {
    let solution = &result.solution;
    println!(
        "Case: {} ({})",
        solution.case_id,
        solution.case_date.format("%Y-%m-%d")
    );
    println!(
        "Murderer: {} ({})",
        solution.murderer.employee_name, solution.murderer.employee_role
    );
    println!(
        "Victim: {} ({})",
        solution.victim.employee_name, solution.victim.employee_role
    );
}

fn print_listing(dir: &Path) -> Result<(), CliError> {
    let dir = std::fs::canonicalize(dir)?;
    let mut files = std::fs::read_dir(&dir)?
        .map(|entry| entry.map(|entry| entry.file_name().to_string_lossy().into_owned()))
        .collect::<Result<Vec<_>, _>>()?;
    files.sort();
    println!("Output directory: {}", dir.display());
    println!("Files in output directory: {}", files.join(", "));
    Ok(())
}

fn run_verify(args: VerifyArgs) -> Result<(), CliError> {
    let engine = VerificationEngine::new(VerifyOptions {
        strict: false,
        write_report: args.report,
    });
    let report = engine.run(&args.dir)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    if args.strict && !report.is_valid() {
        return Err(EvalError::Violations(report.violations.len() as u64).into());
    }
    Ok(())
}

fn print_report(report: &VerificationReport) {
    for table in &report.tables {
        println!("{}: {} row(s)", table.table, table.rows);
    }
    if report.is_valid() {
        println!("No violations found.");
    } else {
        println!("{} violation(s):", report.violations.len());
        for violation in &report.violations {
            println!("  - {violation}");
        }
    }
    if let Some(solution) = &report.solution {
        println!(
            "Murderer: {} ({}), victim: {} ({})",
            solution.murderer.employee_name,
            solution.murderer.employee_role,
            solution.victim.employee_name,
            solution.victim.employee_role
        );
    }
}
