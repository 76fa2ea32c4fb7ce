use std::fs;
use std::path::PathBuf;

use casefile_eval::{EvalError, REPORT_FILE, VerificationEngine, VerificationReport, VerifyOptions};
use casefile_generate::{GenerateOptions, GenerationEngine, GenerationResult};

fn generate_into(label: &str) -> GenerationResult {
    let out_dir = temp_out_dir(label);
    GenerationEngine::new(GenerateOptions {
        out_dir,
        ..GenerateOptions::default()
    })
    .run()
    .expect("run generation")
}

#[test]
fn fresh_case_file_verifies_clean() {
    let generated = generate_into("clean");
    let report = VerificationEngine::default()
        .run(&generated.out_dir)
        .expect("verify");

    assert!(report.is_valid(), "violations: {:?}", report.violations);
    assert_eq!(report.rows("police_records"), Some(100));
    assert_eq!(report.rows("witness_reports"), Some(150));
    assert_eq!(report.rows("stage_access"), Some(200));
    assert_eq!(
        report.rows("staff_database"),
        Some(generated.dataset.staff.len() as u64)
    );
    assert_eq!(report.solution, Some(generated.solution));
}

#[test]
fn wrong_murderer_role_is_reported() {
    let generated = generate_into("role");
    let murderer_id = generated.solution.murderer.employee_id.clone();
    let path = generated.out_dir.join("staff_database.csv");
    let contents = fs::read_to_string(&path).expect("read staff");
    let tampered: Vec<String> = contents
        .lines()
        .map(|line| {
            if line.starts_with(&murderer_id) {
                line.replace("Lighting Technician", "Usher")
            } else {
                line.to_string()
            }
        })
        .collect();
    fs::write(&path, tampered.join("\n") + "\n").expect("write staff");

    let report = VerificationEngine::default()
        .run(&generated.out_dir)
        .expect("verify");
    assert_eq!(
        report.violations,
        vec![format!("murderer {murderer_id} has role Usher")]
    );

    let strict = VerificationEngine::new(VerifyOptions {
        strict: true,
        write_report: true,
    });
    assert!(matches!(
        strict.run(&generated.out_dir),
        Err(EvalError::Violations(1))
    ));

    let written = fs::read(generated.out_dir.join(REPORT_FILE)).expect("read report");
    let written: VerificationReport = serde_json::from_slice(&written).expect("parse report");
    assert_eq!(written.violations, report.violations);
    assert_eq!(written.rows("stage_access"), Some(200));
}

#[test]
fn clean_run_writes_report_on_request() {
    let generated = generate_into("report");
    let engine = VerificationEngine::new(VerifyOptions {
        strict: true,
        write_report: true,
    });
    let report = engine.run(&generated.out_dir).expect("verify");

    let written = fs::read(generated.out_dir.join(REPORT_FILE)).expect("read report");
    let written: VerificationReport = serde_json::from_slice(&written).expect("parse report");
    assert!(written.is_valid());
    assert_eq!(written.solution, report.solution);
}

#[test]
fn report_is_not_written_by_default() {
    let generated = generate_into("no_report");
    VerificationEngine::default()
        .run(&generated.out_dir)
        .expect("verify");
    assert!(!generated.out_dir.join(REPORT_FILE).exists());
}

#[test]
fn victim_leaving_the_dressing_room_is_reported() {
    let generated = generate_into("victim");
    let victim_id = generated.solution.victim.employee_id.clone();
    let path = generated.out_dir.join("stage_access.csv");
    let mut contents = fs::read_to_string(&path).expect("read access");
    contents.push_str(&format!(
        "2025-03-15 23:10:00,dressing room,{victim_id},leaving\n"
    ));
    fs::write(&path, contents).expect("write access");

    let report = VerificationEngine::default()
        .run(&generated.out_dir)
        .expect("verify");
    assert!(
        report
            .violations
            .contains(&format!("victim {victim_id} leaves after the final dressing room entry"))
    );
}

#[test]
fn missing_table_is_an_error() {
    let generated = generate_into("missing");
    fs::remove_file(generated.out_dir.join("witness_reports.csv")).expect("remove witness");

    let err = VerificationEngine::default()
        .run(&generated.out_dir)
        .unwrap_err();
    assert!(matches!(
        err,
        EvalError::InvalidDataset(message) if message.contains("witness_reports.csv")
    ));
}

#[test]
fn missing_column_is_an_error() {
    let generated = generate_into("column");
    let path = generated.out_dir.join("staff_database.csv");
    let contents = fs::read_to_string(&path).expect("read staff");
    let renamed = contents.replacen(
        "employee_id,employee_name,employee_role",
        "employee_id,employee_name,role",
        1,
    );
    fs::write(&path, renamed).expect("write staff");

    let err = VerificationEngine::default()
        .run(&generated.out_dir)
        .unwrap_err();
    let expected = "staff_database: missing columns: employee_role";
    assert!(matches!(err, EvalError::InvalidDataset(message) if message == expected));
}

#[test]
fn unknown_category_is_an_error() {
    let generated = generate_into("category");
    let path = generated.out_dir.join("police_records.csv");
    let contents = fs::read_to_string(&path).expect("read police");
    fs::write(&path, contents.replacen("homicide", "parking", 1)).expect("write police");

    let err = VerificationEngine::default()
        .run(&generated.out_dir)
        .unwrap_err();
    let expected = "police_records line 2: invalid dataset: unknown squad 'parking'";
    assert!(matches!(err, EvalError::InvalidDataset(message) if message == expected));
}

fn temp_out_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("casefile_eval_{label}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp out dir");
    dir
}
