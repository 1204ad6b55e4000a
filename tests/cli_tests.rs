use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn reportgen_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("reportgen"))
}

const EXPENSES: &str = r#"{
  "type": "expenses",
  "data": [
    {"date": "2024-03-01", "category": "Travel", "vendor": "Skyways", "amount": 900, "vat": 45, "total": 945},
    {"date": "2024-03-04", "category": "Meals", "vendor": "Cafe, \"Blue\"", "amount": 60.5, "vat": 3.03, "total": 63.53}
  ],
  "metadata": {"organizationName": "Acme Trading LLC", "currency": "AED"}
}"#;

fn write_report(dir: &Path) -> PathBuf {
    let path = dir.join("expenses.json");
    fs::write(&path, EXPENSES).unwrap();
    path
}

fn config_arg(dir: &TempDir) -> String {
    dir.path().join("reportgen-config").to_str().unwrap().to_string()
}

#[test]
fn test_help() {
    reportgen_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Render accounting reports"));
}

#[test]
fn test_version() {
    reportgen_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("reportgen"));
}

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("reportgen-config");

    reportgen_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized reportgen config"));

    let content = fs::read_to_string(config_path.join("config.toml")).unwrap();
    assert!(content.contains("[layout]"));
    assert!(content.contains("[csv]"));
}

#[test]
fn test_init_fails_if_exists() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_arg(&temp_dir);

    reportgen_cmd().args(["-C", &config, "init"]).assert().success();

    reportgen_cmd()
        .args(["-C", &config, "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_render_csv() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_report(temp_dir.path());
    let output = temp_dir.path().join("out.csv");

    reportgen_cmd()
        .args(["-C", &config_arg(&temp_dir), "render"])
        .arg(&input)
        .args(["--format", "csv", "-o"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Rendered"));

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("Expense Report\nAcme Trading LLC\n"));
    assert!(text.contains("\"Cafe, \"\"Blue\"\"\""));
    assert!(text.contains("AED 960.50"));
}

#[test]
fn test_render_defaults_to_pdf_next_to_input() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_report(temp_dir.path());

    reportgen_cmd()
        .args(["-C", &config_arg(&temp_dir), "render"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 page(s)"));

    let pdf = fs::read(temp_dir.path().join("expenses.pdf")).unwrap();
    assert!(pdf.starts_with(b"%PDF"));
}

#[test]
fn test_render_xlsx_lists_sheets() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_report(temp_dir.path());
    let output = temp_dir.path().join("expenses.xlsx");

    reportgen_cmd()
        .args(["-C", &config_arg(&temp_dir), "render"])
        .arg(&input)
        .args(["-f", "xlsx", "-o"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Summary"))
        .stdout(predicate::str::contains("Category Summary"));

    assert!(fs::read(&output).unwrap().starts_with(b"PK"));
}

#[test]
fn test_render_from_stdin() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("stdin.csv");

    let mut cmd = assert_cmd::Command::from_std(reportgen_cmd());
    cmd.args(["-C", &config_arg(&temp_dir), "render", "-", "-f", "csv", "-o"])
        .arg(&output)
        .write_stdin(EXPENSES)
        .assert()
        .success();

    assert!(fs::read_to_string(&output).unwrap().contains("SUMMARY"));
}

#[test]
fn test_render_unknown_format() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_report(temp_dir.path());

    reportgen_cmd()
        .args(["-C", &config_arg(&temp_dir), "render"])
        .arg(&input)
        .args(["-f", "docx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("docx"));
}

#[test]
fn test_render_invalid_json() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("broken.json");
    fs::write(&input, "{\"type\": ").unwrap();

    reportgen_cmd()
        .args(["-C", &config_arg(&temp_dir), "render"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_render_rejects_malformed_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("reportgen-config");
    fs::create_dir_all(&config_path).unwrap();
    fs::write(config_path.join("config.toml"), "[layout\nrow_height = ").unwrap();
    let input = write_report(temp_dir.path());

    reportgen_cmd()
        .args(["-C", config_path.to_str().unwrap(), "render"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn test_unknown_type_warns() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("forecast.json");
    fs::write(&input, r#"{"type": "cash_forecast", "data": {"openingBalance": 10}}"#).unwrap();

    reportgen_cmd()
        .args(["-C", &config_arg(&temp_dir), "render"])
        .arg(&input)
        .args(["-f", "csv"])
        .assert()
        .success()
        .stderr(predicate::str::contains("warning: no renderer for report type 'cash_forecast'"));
}

#[test]
fn test_preview() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_report(temp_dir.path());

    reportgen_cmd()
        .args(["-C", &config_arg(&temp_dir), "preview"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Expense Report"))
        .stdout(predicate::str::contains("Grand Total"))
        .stdout(predicate::str::contains("AED 1,008.53"))
        .stdout(predicate::str::contains("(spreadsheet only)"));
}

#[test]
fn test_columns() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_report(temp_dir.path());

    reportgen_cmd()
        .args(["-C", &config_arg(&temp_dir), "columns"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("KEY"))
        .stdout(predicate::str::contains("vendor"))
        .stdout(predicate::str::contains("currency"));
}

#[test]
fn test_types() {
    reportgen_cmd()
        .arg("types")
        .assert()
        .success()
        .stdout(predicate::str::contains("trial_balance"))
        .stdout(predicate::str::contains("Expense Report"));
}
