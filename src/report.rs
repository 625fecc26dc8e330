//! Mise en forme du planning pour diffusion : une ligne par employé, une
//! colonne par date, totaux, puis tables de couverture et de séries.

use crate::calendar::column_label;
use crate::engine::GeneratedRoster;
use crate::model::{Assignment, Duty, Employee, Shift};
use crate::storage::write_all_atomic;
use anyhow::Context;
use csv::WriterBuilder;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const IDENTITY_COLUMNS: [&str; 4] = ["Employee_ID", "Name", "Department", "Position"];
pub const TOTAL_COLUMNS: [&str; 10] = [
    "A_Shifts",
    "B_Shifts",
    "C_Shifts",
    "Total_Work_Days",
    "Days_Off",
    "Standby_A",
    "Standby_B",
    "Standby_C",
    "Total_Standby",
    "Vacation_Days",
];

/// Totaux mensuels d'un employé.
///
/// `a_shifts`..`c_shifts` ne comptent que les postes sans astreinte ;
/// `total_work_days` compte tous les jours travaillés, astreinte comprise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EmployeeTotals {
    #[serde(rename = "A_Shifts")]
    pub a_shifts: usize,
    #[serde(rename = "B_Shifts")]
    pub b_shifts: usize,
    #[serde(rename = "C_Shifts")]
    pub c_shifts: usize,
    #[serde(rename = "Total_Work_Days")]
    pub total_work_days: usize,
    #[serde(rename = "Days_Off")]
    pub days_off: usize,
    #[serde(rename = "Standby_A")]
    pub standby_a: usize,
    #[serde(rename = "Standby_B")]
    pub standby_b: usize,
    #[serde(rename = "Standby_C")]
    pub standby_c: usize,
    #[serde(rename = "Total_Standby")]
    pub total_standby: usize,
    #[serde(rename = "Vacation_Days")]
    pub vacation_days: usize,
}

impl EmployeeTotals {
    pub fn from_row(row: &[Assignment]) -> Self {
        let mut t = Self::default();
        for cell in row {
            match (cell.duty(), cell.is_standby()) {
                (Duty::Work(shift), standby) => {
                    t.total_work_days += 1;
                    let slot = match (shift, standby) {
                        (Shift::A, false) => &mut t.a_shifts,
                        (Shift::B, false) => &mut t.b_shifts,
                        (Shift::C, false) => &mut t.c_shifts,
                        (Shift::A, true) => &mut t.standby_a,
                        (Shift::B, true) => &mut t.standby_b,
                        (Shift::C, true) => &mut t.standby_c,
                    };
                    *slot += 1;
                    if standby {
                        t.total_standby += 1;
                    }
                }
                (Duty::Off, _) => t.days_off += 1,
                (Duty::Vacation, _) => t.vacation_days += 1,
            }
        }
        t
    }

    fn values(&self) -> [usize; 10] {
        [
            self.a_shifts,
            self.b_shifts,
            self.c_shifts,
            self.total_work_days,
            self.days_off,
            self.standby_a,
            self.standby_b,
            self.standby_c,
            self.total_standby,
            self.vacation_days,
        ]
    }
}

#[derive(Debug, Clone)]
pub struct RosterRow {
    pub employee: Employee,
    pub cells: Vec<Assignment>,
    pub totals: EmployeeTotals,
}

/// Jeu de lignes transmis au rendu.
#[derive(Debug, Clone)]
pub struct RosterReport<'a> {
    pub roster: &'a GeneratedRoster,
    pub date_columns: Vec<String>,
    pub rows: Vec<RosterRow>,
}

impl<'a> RosterReport<'a> {
    pub fn build(roster: &'a GeneratedRoster) -> Self {
        let date_columns = roster
            .schedule
            .dates()
            .iter()
            .copied()
            .map(column_label)
            .collect();
        let rows = roster
            .employees
            .iter()
            .zip(roster.schedule.rows())
            .map(|(employee, row)| RosterRow {
                employee: employee.clone(),
                cells: row.to_vec(),
                totals: EmployeeTotals::from_row(row),
            })
            .collect();
        Self {
            roster,
            date_columns,
            rows,
        }
    }

    pub fn header(&self) -> Vec<String> {
        IDENTITY_COLUMNS
            .iter()
            .map(|s| s.to_string())
            .chain(self.date_columns.iter().cloned())
            .chain(TOTAL_COLUMNS.iter().map(|s| s.to_string()))
            .collect()
    }
}

/// Rendu d'un rapport vers un support (CSV, tableur, ...).
pub trait ReportRenderer {
    /// Renvoie l'emplacement du planning produit.
    fn render(&self, report: &RosterReport<'_>) -> anyhow::Result<PathBuf>;
}

/// Rendu CSV : planning, couverture, violations et statistiques de séries,
/// chacun écrit de manière atomique dans `out_dir`.
#[derive(Debug, Clone)]
pub struct CsvReportRenderer {
    out_dir: PathBuf,
}

impl CsvReportRenderer {
    pub fn new<P: AsRef<Path>>(out_dir: P) -> Self {
        Self {
            out_dir: out_dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, kind: &str, report: &RosterReport<'_>) -> PathBuf {
        let month = report.roster.month;
        self.out_dir
            .join(format!("{kind}_{:04}_{:02}.csv", month.year(), month.month()))
    }
}

impl ReportRenderer for CsvReportRenderer {
    fn render(&self, report: &RosterReport<'_>) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("creating output directory {}", self.out_dir.display()))?;

        let roster_path = self.path_for("roster", report);
        // Les quatre tables sont construites et écrites avant tout renommage.
        let files = vec![
            (roster_path.clone(), roster_csv(report)?),
            (self.path_for("coverage", report), coverage_csv(report.roster)?),
            (self.path_for("violations", report), violations_csv(report.roster)?),
            (self.path_for("run_stats", report), run_stats_csv(report.roster)?),
        ];
        write_all_atomic(&files)?;
        Ok(roster_path)
    }
}

pub fn roster_csv(report: &RosterReport<'_>) -> anyhow::Result<Vec<u8>> {
    let mut w = WriterBuilder::new().from_writer(Vec::new());
    w.write_record(report.header())?;
    let mut buf = itoa::Buffer::new();
    for row in &report.rows {
        let mut record: Vec<String> = vec![
            row.employee.id.as_str().to_string(),
            row.employee.name.clone(),
            row.employee.department.clone(),
            row.employee.position.clone(),
        ];
        record.extend(row.cells.iter().map(Assignment::to_string));
        record.extend(row.totals.values().iter().map(|v| buf.format(*v).to_string()));
        w.write_record(&record)?;
    }
    w.into_inner()
        .map_err(|e| anyhow::anyhow!("flushing roster csv: {}", e.error()))
}

pub fn coverage_csv(roster: &GeneratedRoster) -> anyhow::Result<Vec<u8>> {
    let mut w = WriterBuilder::new().from_writer(Vec::new());
    w.write_record([
        "Date",
        "A",
        "B",
        "C",
        "OFF",
        "VACATION",
        "STANDBY_A",
        "STANDBY_B",
        "STANDBY_C",
        "Working",
        "Below_Threshold",
    ])?;
    let mut buf = itoa::Buffer::new();
    for rec in &roster.coverage {
        let below = roster.shortfalls.iter().any(|s| s.date == rec.date);
        let mut record = vec![rec.date.to_string()];
        for v in [
            rec.a,
            rec.b,
            rec.c,
            rec.off,
            rec.vacation,
            rec.standby_a,
            rec.standby_b,
            rec.standby_c,
            rec.working(),
        ] {
            record.push(buf.format(v).to_string());
        }
        record.push(if below { "yes" } else { "no" }.to_string());
        w.write_record(&record)?;
    }
    w.into_inner()
        .map_err(|e| anyhow::anyhow!("flushing coverage csv: {}", e.error()))
}

pub fn violations_csv(roster: &GeneratedRoster) -> anyhow::Result<Vec<u8>> {
    let mut w = WriterBuilder::new().from_writer(Vec::new());
    w.write_record(["Employee_ID", "Start", "End", "Length", "Shift", "Max_Allowed"])?;
    let mut buf = itoa::Buffer::new();
    for v in &roster.runs.violations {
        let start = v.block.start.to_string();
        let end = v.block.end.to_string();
        let length = buf.format(v.block.length).to_string();
        let max = buf.format(v.max_allowed).to_string();
        w.write_record([
            v.employee_id.as_str(),
            start.as_str(),
            end.as_str(),
            length.as_str(),
            v.block.label.as_str(),
            max.as_str(),
        ])?;
    }
    w.into_inner()
        .map_err(|e| anyhow::anyhow!("flushing violations csv: {}", e.error()))
}

pub fn run_stats_csv(roster: &GeneratedRoster) -> anyhow::Result<Vec<u8>> {
    let mut w = WriterBuilder::new().from_writer(Vec::new());
    w.write_record(["Employee_ID", "Blocks", "Max_Run", "Mean_Run"])?;
    let mut buf = itoa::Buffer::new();
    for s in &roster.runs.stats {
        let blocks = buf.format(s.block_count).to_string();
        let max = buf.format(s.max_run).to_string();
        let mean = format!("{:.2}", s.mean_run);
        w.write_record([
            s.employee_id.as_str(),
            blocks.as_str(),
            max.as_str(),
            mean.as_str(),
        ])?;
    }
    w.into_inner()
        .map_err(|e| anyhow::anyhow!("flushing run stats csv: {}", e.error()))
}
