use super::EngineError;
use crate::model::{Assignment, Employee, Schedule};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// Planning assemblé et employés remplis par défaut (OFF tout le mois).
#[derive(Debug, Clone)]
pub struct Assembly {
    pub schedule: Schedule,
    pub fallback_employees: Vec<usize>,
}

/// Fusionne congés et roulements en un planning complet.
///
/// Un employé sans congé ni roulement reçoit OFF sur tout le mois et est
/// remonté dans `fallback_employees` : c'est une incohérence en amont.
pub fn assemble_schedule(
    employees: &[Employee],
    dates: &[NaiveDate],
    vacation: &BTreeSet<usize>,
    patterns: &BTreeMap<usize, Vec<Assignment>>,
) -> Result<Assembly, EngineError> {
    let mut rows = Vec::with_capacity(employees.len());
    let mut fallback_employees = Vec::new();

    for (idx, employee) in employees.iter().enumerate() {
        if vacation.contains(&idx) {
            rows.push(vec![Assignment::VACATION; dates.len()]);
            continue;
        }
        match patterns.get(&idx) {
            Some(pattern) if pattern.len() == dates.len() => rows.push(pattern.clone()),
            Some(pattern) => {
                return Err(EngineError::PatternLength {
                    employee: idx,
                    expected: dates.len(),
                    got: pattern.len(),
                })
            }
            None => {
                warn!(
                    employee = idx,
                    id = employee.id.as_str(),
                    "no schedule entry for employee, filling month with OFF"
                );
                fallback_employees.push(idx);
                rows.push(vec![Assignment::OFF; dates.len()]);
            }
        }
    }

    let schedule = Schedule::from_rows(dates.to_vec(), rows).map_err(anyhow::Error::msg)?;
    Ok(Assembly {
        schedule,
        fallback_employees,
    })
}
