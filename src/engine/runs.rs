use super::types::{RunAnalysis, RunStats, RunViolation, StandbyRunPolicy, WorkBlock};
use crate::model::{Assignment, Employee, Schedule, Shift};
use chrono::NaiveDate;

fn run_shift(cell: Assignment, policy: StandbyRunPolicy) -> Option<Shift> {
    match policy {
        StandbyRunPolicy::Continues => cell.shift(),
        StandbyRunPolicy::Breaks => cell.plain_shift(),
    }
}

struct OpenBlock {
    start: usize,
    letters: Vec<Shift>,
}

impl OpenBlock {
    fn close(self, dates: &[NaiveDate], end: usize) -> WorkBlock {
        let label = self
            .letters
            .iter()
            .map(Shift::to_string)
            .collect::<Vec<_>>()
            .join("-");
        WorkBlock {
            start: dates[self.start],
            end: dates[end],
            length: end - self.start + 1,
            label,
        }
    }
}

/// Découpe une ligne en séries de jours travaillés.
///
/// Un changement de poste au sein d'une série ne la coupe pas, il donne un
/// libellé composite (`A-B`). Une série ouverte en fin de mois est close au
/// dernier jour.
pub fn work_blocks(
    dates: &[NaiveDate],
    row: &[Assignment],
    policy: StandbyRunPolicy,
) -> Vec<WorkBlock> {
    let mut blocks = Vec::new();
    let mut open: Option<OpenBlock> = None;

    for (day, cell) in row.iter().enumerate().take(dates.len()) {
        match (run_shift(*cell, policy), open.as_mut()) {
            (Some(shift), Some(block)) => {
                if block.letters.last() != Some(&shift) {
                    block.letters.push(shift);
                }
            }
            (Some(shift), None) => {
                open = Some(OpenBlock {
                    start: day,
                    letters: vec![shift],
                });
            }
            (None, _) => {
                if let Some(block) = open.take() {
                    blocks.push(block.close(dates, day - 1));
                }
            }
        }
    }
    if let Some(block) = open {
        let last = row.len().min(dates.len()) - 1;
        blocks.push(block.close(dates, last));
    }
    blocks
}

/// Séries, violations (`length > max_run`) et statistiques par employé.
pub fn analyze_runs(
    employees: &[Employee],
    schedule: &Schedule,
    max_run: usize,
    policy: StandbyRunPolicy,
) -> RunAnalysis {
    let mut analysis = RunAnalysis::default();

    for (idx, (employee, row)) in employees.iter().zip(schedule.rows()).enumerate() {
        let blocks = work_blocks(schedule.dates(), row, policy);

        for block in blocks.iter().filter(|b| b.length > max_run) {
            analysis.violations.push(RunViolation {
                employee: idx,
                employee_id: employee.id.clone(),
                block: block.clone(),
                max_allowed: max_run,
            });
        }

        let total: usize = blocks.iter().map(|b| b.length).sum();
        let max = blocks.iter().map(|b| b.length).max().unwrap_or(0);
        let mean_run = if blocks.is_empty() {
            0.0
        } else {
            total as f64 / blocks.len() as f64
        };
        analysis.stats.push(RunStats {
            employee: idx,
            employee_id: employee.id.clone(),
            block_count: blocks.len(),
            max_run: max,
            mean_run,
        });
        analysis.blocks.push(blocks);
    }

    analysis
}
