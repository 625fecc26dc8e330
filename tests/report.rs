#![forbid(unsafe_code)]
use chrono::NaiveDate;
use roulement::report::{EmployeeTotals, TOTAL_COLUMNS};
use roulement::{
    column_label, synthesize_directory, Assignment, CsvReportRenderer, Month, ReportRenderer,
    RosterEngine, RosterOptions, RosterReport,
};
use std::fs;
use tempfile::tempdir;

fn sample_roster() -> roulement::GeneratedRoster {
    let engine = RosterEngine::new(RosterOptions {
        vacation_seed: Some(21),
        ..RosterOptions::default()
    })
    .unwrap();
    let employees = synthesize_directory(40, &engine.options().fallback_departments);
    engine.generate(&employees, Month::new(2025, 10).unwrap()).unwrap()
}

#[test]
fn date_columns_use_weekday_day_month_year_labels() {
    let date = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
    assert_eq!(column_label(date), "Day_Wed, 1-Oct-25");
    let date = NaiveDate::from_ymd_opt(2025, 2, 28).unwrap();
    assert_eq!(column_label(date), "Day_Fri, 28-Feb-25");
}

#[test]
fn totals_split_plain_and_standby_days() {
    let row: Vec<Assignment> = "A A STANDBY_A B STANDBY_C C OFF VACATION"
        .split_whitespace()
        .map(|s| s.parse().unwrap())
        .collect();
    let t = EmployeeTotals::from_row(&row);

    assert_eq!(t.a_shifts, 2);
    assert_eq!(t.b_shifts, 1);
    assert_eq!(t.c_shifts, 1);
    assert_eq!(t.standby_a, 1);
    assert_eq!(t.standby_c, 1);
    assert_eq!(t.total_standby, 2);
    assert_eq!(t.total_work_days, 6);
    assert_eq!(t.days_off, 1);
    assert_eq!(t.vacation_days, 1);
}

#[test]
fn csv_renderer_writes_all_tables() {
    let roster = sample_roster();
    let dir = tempdir().unwrap();
    let report = RosterReport::build(&roster);

    let path = CsvReportRenderer::new(dir.path()).render(&report).unwrap();
    assert_eq!(path, dir.path().join("roster_2025_10.csv"));

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let header: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(header.len(), 4 + 31 + TOTAL_COLUMNS.len());
    assert_eq!(header[0], "Employee_ID");
    assert_eq!(header[4], "Day_Wed, 1-Oct-25");
    assert_eq!(header.last().map(String::as_str), Some("Vacation_Days"));

    let records: Vec<csv::StringRecord> = rdr.records().map(Result::unwrap).collect();
    assert_eq!(records.len(), 40);
    assert_eq!(&records[0][0], "EMP0001");
    for rec in &records {
        let days: usize = rec[4 + 31 + 3].parse().unwrap();
        let off: usize = rec[4 + 31 + 4].parse().unwrap();
        let vacation: usize = rec[4 + 31 + 9].parse().unwrap();
        assert_eq!(days + off + vacation, 31);
    }

    for kind in ["coverage", "violations", "run_stats"] {
        assert!(dir.path().join(format!("{kind}_2025_10.csv")).exists());
    }
    let coverage = fs::read_to_string(dir.path().join("coverage_2025_10.csv")).unwrap();
    assert_eq!(coverage.lines().count(), 32);
}

#[test]
fn unwritable_target_fails_without_output() {
    let roster = sample_roster();
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "x").unwrap();

    let err = CsvReportRenderer::new(&blocker)
        .render(&RosterReport::build(&roster))
        .unwrap_err();
    assert!(format!("{err:#}").contains("creating output directory"));
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "x");
}

#[test]
fn failed_companion_table_leaves_no_partial_output() {
    let roster = sample_roster();
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("violations_2025_10.csv")).unwrap();

    let err = CsvReportRenderer::new(dir.path())
        .render(&RosterReport::build(&roster))
        .unwrap_err();
    assert!(format!("{err:#}").contains("violations_2025_10.csv"));

    // Aucun fichier renommé, aucun temporaire laissé derrière.
    let mut entries: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    entries.sort();
    assert_eq!(entries, ["violations_2025_10.csv"]);
}

#[test]
fn rerender_keeps_previous_tables_when_a_write_fails() {
    let roster = sample_roster();
    let dir = tempdir().unwrap();
    let roster_path = dir.path().join("roster_2025_10.csv");
    fs::write(&roster_path, "previous").unwrap();
    fs::create_dir(dir.path().join("run_stats_2025_10.csv")).unwrap();

    assert!(CsvReportRenderer::new(dir.path())
        .render(&RosterReport::build(&roster))
        .is_err());
    assert_eq!(fs::read_to_string(&roster_path).unwrap(), "previous");
    assert!(!dir.path().join("coverage_2025_10.csv").exists());
}
