//! End-to-end tests of the `halox` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Small tables keep the pipeline runs short.
const SMALL_RUN: &str = r#"
[pipeline]
redshift = 1.0
thinness = 20
cosmology_thinness = 200
"#;

fn halox(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("halox").unwrap();
    cmd.env_remove("HALOX_CONFIG")
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", home);
    cmd
}

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("run.toml");
    fs::write(&path, content).unwrap();
    path
}

fn json_rows(output: &[u8]) -> Vec<serde_json::Value> {
    serde_json::from_slice::<serde_json::Value>(output)
        .unwrap()
        .as_array()
        .unwrap()
        .clone()
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    halox(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("cosmology"))
        .stdout(predicate::str::contains("power"))
        .stdout(predicate::str::contains("correlation"))
        .stdout(predicate::str::contains("occupation"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_config_default_is_valid_toml() {
    let dir = TempDir::new().unwrap();
    let output = halox(dir.path()).args(["config", "default"]).output().unwrap();
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).unwrap();
    assert!(text.contains("[cosmology]"));
    assert!(text.contains("[pipeline]"));
    assert!(text.contains("model = \"harikane16\""));

    // Feeding it back in is accepted.
    let path = write_config(&dir, &text);
    halox(dir.path())
        .arg("--config")
        .arg(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sigma8 = 0.8"));
}

#[test]
fn test_occupation_csv() {
    let dir = TempDir::new().unwrap();
    let output = halox(dir.path())
        .args(["--format", "csv", "occupation", "--min", "1e10", "--max", "1e14", "--points", "3"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "mass,central,satellite,total");
    assert_eq!(lines.len(), 4);
}

#[test]
fn test_occupation_rejects_bad_range() {
    let dir = TempDir::new().unwrap();
    halox(dir.path())
        .args(["occupation", "--min", "1e14", "--max", "1e10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid range"));
}

#[test]
fn test_background_json() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, SMALL_RUN);
    let output = halox(dir.path())
        .arg("--config")
        .arg(&path)
        .args(["--format", "json", "cosmology", "background", "--redshifts", "0,1"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows = json_rows(&output.stdout);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["z"], 0.0);
    assert_eq!(rows[0]["comoving_distance"], 0.0);
    let distance = rows[1]["comoving_distance"].as_f64().unwrap();
    assert!(distance > 1000.0 && distance < 10000.0);
}

#[test]
fn test_background_rejects_negative_redshift() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, SMALL_RUN);
    halox(dir.path())
        .arg("--config")
        .arg(&path)
        .args(["cosmology", "background", "--redshifts=-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("outside the tabulated range"));
}

#[test]
fn test_power_components_csv() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, SMALL_RUN);
    let output = halox(dir.path())
        .arg("--config")
        .arg(&path)
        .args(["--format", "csv", "power", "-C", "1h", "-C", "2h"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "component,k,power");
    assert_eq!(lines.len(), 1 + 2 * 20);
    assert!(lines[1].starts_with("1h,"));
    assert!(lines[21].starts_with("2h,"));
}

#[test]
fn test_angular_correlation_json() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, SMALL_RUN);
    let output = halox(dir.path())
        .arg("--config")
        .arg(&path)
        .args(["--format", "json", "correlation", "angular", "--points", "5"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows = json_rows(&output.stdout);
    assert_eq!(rows.len(), 5);
    assert!(rows.iter().all(|r| r["component"] == "total" && r["value"].is_f64()));
}

#[test]
fn test_seed_spectrum_from_file() {
    let dir = TempDir::new().unwrap();
    let mut table = String::from("# k P(k)\n");
    for i in 0..200 {
        let k = 1e-4 * 10f64.powf(8.0 * f64::from(i) / 199.0);
        let pk = k / (1.0 + (k / 0.02).powi(2)).powi(2);
        table.push_str(&format!("{k:e} {pk:e}\n"));
    }
    fs::write(dir.path().join("pk.dat"), table).unwrap();
    let path = write_config(&dir, &format!("{SMALL_RUN}power_spectrum = \"pk.dat\"\n"));

    halox(dir.path())
        .arg("--config")
        .arg(&path)
        .args(["--format", "minimal", "power", "--stats"])
        .assert()
        .success();
}

#[test]
fn test_invalid_config_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[occupation]\nmodel = \"zheng07\"\n");
    halox(dir.path())
        .arg("--config")
        .arg(&path)
        .args(["occupation"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"))
        .stderr(predicate::str::contains("run.toml"));
}

#[test]
fn test_missing_spectrum_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, &format!("{SMALL_RUN}power_spectrum = \"missing.dat\"\n"));
    halox(dir.path())
        .arg("--config")
        .arg(&path)
        .args(["power"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.dat"));
}

#[test]
fn test_coarse_cosmology_tables_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[pipeline]\ncosmology_thinness = 20\n");
    halox(dir.path())
        .arg("--config")
        .arg(&path)
        .args(["cosmology", "background", "--redshifts", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("increase the thinness"));
}
