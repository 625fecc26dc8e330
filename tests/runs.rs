#![forbid(unsafe_code)]
use chrono::NaiveDate;
use roulement::engine::{analyze_runs, work_blocks};
use roulement::{
    synthesize_directory, Assignment, Month, RosterEngine, RosterOptions, Schedule,
    StandbyRunPolicy,
};

fn parse_row(s: &str) -> Vec<Assignment> {
    s.split_whitespace().map(|c| c.parse().unwrap()).collect()
}

fn dates(n: usize) -> Vec<NaiveDate> {
    NaiveDate::from_ymd_opt(2025, 10, 1)
        .unwrap()
        .iter_days()
        .take(n)
        .collect()
}

#[test]
fn five_days_pass_six_days_violate() {
    let rows = vec![
        parse_row("A A A A A OFF OFF B B B"),
        parse_row("C C C C C C OFF OFF A A"),
    ];
    let schedule = Schedule::from_rows(dates(10), rows).unwrap();
    let employees = synthesize_directory(2, &["Operations".to_string()]);

    let analysis = analyze_runs(&employees, &schedule, 5, StandbyRunPolicy::Continues);
    assert_eq!(analysis.violations.len(), 1);
    let v = &analysis.violations[0];
    assert_eq!(v.employee, 1);
    assert_eq!(v.employee_id.as_str(), "EMP0002");
    assert_eq!(v.block.length, 6);
    assert_eq!(v.block.label, "C");
    assert_eq!(v.max_allowed, 5);

    let stats = &analysis.stats[0];
    assert_eq!(stats.block_count, 2);
    assert_eq!(stats.max_run, 5);
    assert!((stats.mean_run - 4.0).abs() < f64::EPSILON);
}

#[test]
fn standby_day_policy_changes_run_length() {
    let row = parse_row("A A STANDBY_A A A A OFF");
    let d = dates(7);

    let continued = work_blocks(&d, &row, StandbyRunPolicy::Continues);
    assert_eq!(continued.len(), 1);
    assert_eq!(continued[0].length, 6);

    let broken = work_blocks(&d, &row, StandbyRunPolicy::Breaks);
    let lengths: Vec<usize> = broken.iter().map(|b| b.length).collect();
    assert_eq!(lengths, vec![2, 3]);
}

#[test]
fn vacation_and_off_end_runs_and_empty_rows_have_zero_stats() {
    let rows = vec![
        parse_row("B B VACATION B OFF"),
        parse_row("VACATION VACATION VACATION VACATION VACATION"),
    ];
    let schedule = Schedule::from_rows(dates(5), rows).unwrap();
    let employees = synthesize_directory(2, &["Operations".to_string()]);

    let analysis = analyze_runs(&employees, &schedule, 5, StandbyRunPolicy::Breaks);
    assert_eq!(analysis.blocks[0].len(), 2);
    assert!(analysis.blocks[1].is_empty());
    assert_eq!(analysis.stats[1].block_count, 0);
    assert_eq!(analysis.stats[1].max_run, 0);
    assert_eq!(analysis.stats[1].mean_run, 0.0);
}

#[test]
fn generated_rosters_stay_within_the_limit() {
    let employees = synthesize_directory(300, &RosterOptions::default().fallback_departments);
    for standby_breaks_runs in [false, true] {
        let engine = RosterEngine::new(RosterOptions {
            vacation_seed: Some(1),
            standby_breaks_runs,
            ..RosterOptions::default()
        })
        .unwrap();
        let roster = engine.generate(&employees, Month::new(2025, 10).unwrap()).unwrap();
        assert!(roster.runs.violations.is_empty());
        assert_eq!(roster.runs.stats.len(), 300);
        assert!(roster.runs.stats.iter().all(|s| s.max_run <= 5));
    }
}
