#![forbid(unsafe_code)]
use roulement::engine::{base_cycle, shift_pattern, shift_set};
use roulement::{Assignment, Duty, Employee, EmployeeId, RosterEngine, RosterOptions, Shift};

fn render(pattern: &[Assignment]) -> String {
    pattern
        .iter()
        .map(|a| match a.duty() {
            Duty::Work(s) => s.letter(),
            Duty::Off => '-',
            Duty::Vacation => 'V',
        })
        .collect()
}

#[test]
fn first_employee_three_shift_month() {
    let pattern = shift_pattern(0, shift_set(false), 5, 31);
    insta::assert_snapshot!(render(&pattern), @"AAAAA--BBBBB--CCCCC--AAAAA--BBB");

    // période de 21 jours : les dates 22..=26 repassent en A
    for day in 21..26 {
        assert_eq!(pattern[day], Assignment::work(Shift::A));
    }
}

#[test]
fn cycle_is_rotated_by_employee_index() {
    assert_eq!(base_cycle(1, shift_set(false), 5).len(), 21);

    let pattern = shift_pattern(1, shift_set(false), 5, 28);
    assert!(pattern[..4].iter().all(|a| *a == Assignment::work(Shift::B)));
    assert_eq!(pattern[4], Assignment::OFF);
    assert_eq!(pattern[5], Assignment::OFF);
    assert_eq!(pattern[6], Assignment::work(Shift::C));

    // même poste de départ et même décalage modulo 21
    assert_eq!(shift_pattern(22, shift_set(false), 5, 31), shift_pattern(1, shift_set(false), 5, 31));
}

#[test]
fn special_departments_rotate_on_two_shifts() {
    let opts = RosterOptions::default();
    let engine = RosterEngine::new(opts).unwrap();
    let supervisor = Employee::new(EmployeeId::new("S1"), "Sup", "Supervisors", "Staff");

    let pattern = engine.pattern_for(3, &supervisor, 31);
    assert_eq!(pattern.len(), 31);
    assert!(pattern.iter().all(|a| a.shift() != Some(Shift::C)));
    assert_eq!(base_cycle(3, shift_set(true), 5).len(), 14);
    // cycle de 14 jours
    assert_eq!(pattern[..14], pattern[14..28]);
}

#[test]
fn pattern_ignores_name_and_run_order() {
    let engine = RosterEngine::default();
    let a = Employee::new(EmployeeId::new("X1"), "Alice", "Operations", "Staff");
    let b = Employee::new(EmployeeId::new("Y9"), "Bob", "Operations", "Senior");

    let later = engine.pattern_for(17, &b, 30);
    let first = engine.pattern_for(17, &a, 30);
    assert_eq!(first, later);
    assert_eq!(first, engine.pattern_for(17, &a, 30));
}
