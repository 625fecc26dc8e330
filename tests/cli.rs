#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn cli() -> Command {
    Command::cargo_bin("roulement-cli").unwrap()
}

#[test]
fn bidding_prints_json_records() {
    cli()
        .args(["bidding", "2025", "2", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""lineNumber":1"#))
        .stdout(predicate::str::contains("2025-02-05").not());
}

#[test]
fn bidding_with_missing_arguments_fails() {
    cli()
        .args(["bidding", "2025"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            r#"{"error":"Missing arguments: year month totalLines"}"#,
        ));
}

#[test]
fn bidding_with_non_numeric_year_fails() {
    cli()
        .args(["bidding", "twenty", "2", "1"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(r#""error""#));
}

#[test]
fn generate_publish_list_and_check() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("store");
    let out = dir.path().join("out");
    let generate = |cmd: &mut Command| {
        cmd.args(["generate", "--year", "2025", "--month", "10", "--employees", "50"])
            .args(["--seed", "4", "--publish"])
            .arg("--out")
            .arg(&out)
            .arg("--store")
            .arg(&store);
    };

    let mut first = cli();
    generate(&mut first);
    first
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""success":true"#))
        .stdout(predicate::str::contains("directory degraded"));
    assert!(out.join("roster_2025_10.csv").exists());
    assert!(store.join("2025-10.json").exists());

    let mut again = cli();
    generate(&mut again);
    again
        .assert()
        .code(1)
        .stdout(predicate::str::contains("roster already exists"));

    cli()
        .arg("list")
        .arg("--store")
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""count":1"#));

    // 50 employés : effectif sous le seuil de 100 chaque jour
    cli()
        .args(["check", "--year", "2025", "--month", "10"])
        .arg("--store")
        .arg(&store)
        .assert()
        .code(2);
}

#[test]
fn generate_rejects_invalid_month() {
    let dir = tempdir().unwrap();
    cli()
        .args(["generate", "--year", "2025", "--month", "13"])
        .arg("--out")
        .arg(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("invalid month"));
}

#[test]
fn generate_with_non_numeric_year_prints_json_error() {
    cli()
        .args(["generate", "--year", "abc", "--month", "2"])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with(r#"{"error":"#))
        .stdout(predicate::str::contains("--year"));
}

#[test]
fn check_with_unknown_flag_is_not_a_warning_exit() {
    cli()
        .args(["check", "--year", "2025", "--month", "10", "--bogus"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(r#""error""#));
}

#[test]
fn help_is_still_printed_as_text() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"));
}

#[test]
fn check_reuses_the_options_used_at_generation() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("store");
    let config = dir.path().join("options.json");
    std::fs::write(
        &config,
        r#"{"standby_breaks_runs":true,"coverage_alert_threshold":0}"#,
    )
    .unwrap();

    cli()
        .args(["generate", "--year", "2025", "--month", "10", "--employees", "50"])
        .args(["--seed", "4", "--publish"])
        .arg("--config")
        .arg(&config)
        .arg("--out")
        .arg(dir.path().join("out"))
        .arg("--store")
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""shortfalls":0"#));

    // Même verdict sans repasser --config.
    cli()
        .args(["check", "--year", "2025", "--month", "10"])
        .arg("--store")
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""shortfalls":[]"#));

    // Un fichier explicite reste prioritaire.
    let strict = dir.path().join("strict.json");
    std::fs::write(&strict, r#"{"coverage_alert_threshold":100}"#).unwrap();
    cli()
        .args(["check", "--year", "2025", "--month", "10"])
        .arg("--config")
        .arg(&strict)
        .arg("--store")
        .arg(&store)
        .assert()
        .code(2);
}

#[test]
fn failed_report_rolls_back_the_publication() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("store");
    let out = dir.path().join("out");
    std::fs::create_dir_all(out.join("violations_2025_10.csv")).unwrap();

    cli()
        .args(["generate", "--year", "2025", "--month", "10", "--employees", "50"])
        .args(["--seed", "4", "--publish"])
        .arg("--out")
        .arg(&out)
        .arg("--store")
        .arg(&store)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("rendering roster report"));

    assert!(!store.join("2025-10.json").exists());
    assert!(!out.join("roster_2025_10.csv").exists());
    cli()
        .arg("list")
        .arg("--store")
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""count":0"#));
}
