mod assemble;
mod coverage;
mod pattern;
mod runs;
mod standby;
mod types;
mod vacation;

pub use assemble::{assemble_schedule, Assembly};
pub use coverage::{coverage_shortfalls, daily_coverage};
pub use pattern::{base_cycle, shift_pattern, shift_set, REST_DAYS_PER_BLOCK};
pub use runs::{analyze_runs, work_blocks};
pub use standby::{allocate_standby, StandbyOptions, StandbyOutcome};
pub use types::{
    CoverageRecord, CoverageShortfall, EngineError, RunAnalysis, RunStats, RunViolation,
    StandbyDuty, StandbyLedger, StandbyRunPolicy, WorkBlock,
};
pub use vacation::{select_vacation, vacation_count};

use crate::calendar::Month;
use crate::config::RosterOptions;
use crate::model::{Assignment, Employee, Schedule};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

/// Planning d'un mois et toutes ses données dérivées.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedRoster {
    pub month: Month,
    pub employees: Vec<Employee>,
    pub schedule: Schedule,
    pub vacation: BTreeSet<usize>,
    pub standby: StandbyLedger,
    pub relaxed_standby: usize,
    /// Places d'astreinte restées vides faute de candidats.
    #[serde(default)]
    pub unfilled_standby: usize,
    pub coverage: Vec<CoverageRecord>,
    pub shortfalls: Vec<CoverageShortfall>,
    pub runs: RunAnalysis,
    pub warnings: Vec<String>,
}

/// Moteur de génération : encapsule les options d'un calcul.
#[derive(Debug, Clone, Default)]
pub struct RosterEngine {
    opts: RosterOptions,
}

impl RosterEngine {
    pub fn new(opts: RosterOptions) -> Result<Self, EngineError> {
        opts.validate()?;
        Ok(Self { opts })
    }

    pub fn options(&self) -> &RosterOptions {
        &self.opts
    }

    /// Roulement d'un employé selon son département.
    pub fn pattern_for(&self, index: usize, employee: &Employee, days: usize) -> Vec<Assignment> {
        let shifts = shift_set(self.opts.is_special_department(&employee.department));
        shift_pattern(index, shifts, self.opts.max_consecutive_work_days, days)
    }

    /// Génère le mois ; le tirage des congés utilise `vacation_seed` si présent.
    pub fn generate(&self, employees: &[Employee], month: Month) -> Result<GeneratedRoster, EngineError> {
        match self.opts.vacation_seed {
            Some(seed) => self.generate_with_rng(employees, month, &mut StdRng::seed_from_u64(seed)),
            None => self.generate_with_rng(employees, month, &mut rand::rng()),
        }
    }

    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        employees: &[Employee],
        month: Month,
        rng: &mut R,
    ) -> Result<GeneratedRoster, EngineError> {
        let dates = month.dates();
        let vacation = select_vacation(employees.len(), self.opts.vacation_fraction, rng);
        info!(
            %month,
            total = employees.len(),
            vacation = vacation.len(),
            available = employees.len() - vacation.len(),
            "generating roster"
        );

        let patterns: BTreeMap<usize, Vec<Assignment>> = employees
            .iter()
            .enumerate()
            .filter(|(idx, _)| !vacation.contains(idx))
            .map(|(idx, e)| (idx, self.pattern_for(idx, e, dates.len())))
            .collect();
        self.finish(employees, month, vacation, &patterns)
    }

    /// Assemble, pose les astreintes puis calcule couverture et séries.
    pub fn finish(
        &self,
        employees: &[Employee],
        month: Month,
        vacation: BTreeSet<usize>,
        patterns: &BTreeMap<usize, Vec<Assignment>>,
    ) -> Result<GeneratedRoster, EngineError> {
        let dates = month.dates();
        let mut warnings = Vec::new();

        let Assembly {
            mut schedule,
            fallback_employees,
        } = assemble_schedule(employees, &dates, &vacation, patterns)?;
        for idx in &fallback_employees {
            warnings.push(format!(
                "employee {} had no schedule entry and was set OFF for the month",
                employees[*idx].id.as_str()
            ));
        }

        let available: Vec<usize> = (0..employees.len())
            .filter(|idx| !vacation.contains(idx))
            .collect();
        let outcome = allocate_standby(
            &mut schedule,
            &available,
            StandbyOptions {
                per_shift: self.opts.standby_per_shift,
                cap: self.opts.standby_cap,
            },
        );
        if outcome.relaxed > 0 {
            warnings.push(format!(
                "{} standby duties assigned beyond the per-employee cap of {}",
                outcome.relaxed, self.opts.standby_cap
            ));
        }
        if outcome.unfilled > 0 {
            warn!(slots = outcome.unfilled, "standby slots left unfilled");
            warnings.push(format!(
                "{} standby slots left unfilled: not enough candidates on the shift",
                outcome.unfilled
            ));
        }

        let coverage = daily_coverage(&schedule);
        let shortfalls = coverage_shortfalls(&coverage, self.opts.coverage_alert_threshold);
        if !shortfalls.is_empty() {
            warn!(
                days = shortfalls.len(),
                threshold = self.opts.coverage_alert_threshold,
                "working headcount below threshold"
            );
        }

        let runs = analyze_runs(
            employees,
            &schedule,
            self.opts.max_consecutive_work_days,
            StandbyRunPolicy::from_flag(self.opts.standby_breaks_runs),
        );
        if !runs.violations.is_empty() {
            warn!(count = runs.violations.len(), "consecutive work day violations");
        }

        Ok(GeneratedRoster {
            month,
            employees: employees.to_vec(),
            schedule,
            vacation,
            standby: outcome.ledger,
            relaxed_standby: outcome.relaxed,
            unfilled_standby: outcome.unfilled,
            coverage,
            shortfalls,
            runs,
            warnings,
        })
    }
}

impl GeneratedRoster {
    /// Recalcule couverture, alertes et séries depuis le planning stocké.
    pub fn reanalyze(&mut self, opts: &RosterOptions) {
        self.coverage = daily_coverage(&self.schedule);
        self.shortfalls = coverage_shortfalls(&self.coverage, opts.coverage_alert_threshold);
        self.runs = analyze_runs(
            &self.employees,
            &self.schedule,
            opts.max_consecutive_work_days,
            StandbyRunPolicy::from_flag(opts.standby_breaks_runs),
        );
    }
}
