use super::types::{CoverageRecord, CoverageShortfall};
use crate::model::{Duty, Schedule, Shift};

/// Effectifs par date et par catégorie. Lecture seule.
pub fn daily_coverage(schedule: &Schedule) -> Vec<CoverageRecord> {
    schedule
        .dates()
        .iter()
        .enumerate()
        .map(|(day, date)| {
            let mut rec = CoverageRecord {
                date: *date,
                a: 0,
                b: 0,
                c: 0,
                off: 0,
                vacation: 0,
                standby_a: 0,
                standby_b: 0,
                standby_c: 0,
            };
            for row in schedule.rows() {
                let cell = row[day];
                let slot = match (cell.duty(), cell.is_standby()) {
                    (Duty::Work(Shift::A), false) => &mut rec.a,
                    (Duty::Work(Shift::B), false) => &mut rec.b,
                    (Duty::Work(Shift::C), false) => &mut rec.c,
                    (Duty::Work(Shift::A), true) => &mut rec.standby_a,
                    (Duty::Work(Shift::B), true) => &mut rec.standby_b,
                    (Duty::Work(Shift::C), true) => &mut rec.standby_c,
                    (Duty::Off, _) => &mut rec.off,
                    (Duty::Vacation, _) => &mut rec.vacation,
                };
                *slot += 1;
            }
            rec
        })
        .collect()
}

/// Dates dont l'effectif A+B+C (hors astreinte) est sous `threshold`.
pub fn coverage_shortfalls(records: &[CoverageRecord], threshold: usize) -> Vec<CoverageShortfall> {
    records
        .iter()
        .filter(|r| r.working() < threshold)
        .map(|r| CoverageShortfall {
            date: r.date,
            working: r.working(),
            threshold,
        })
        .collect()
}
