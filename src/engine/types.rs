use crate::model::{EmployeeId, Shift};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
    #[error("pattern for employee {employee} has {got} entries, expected {expected}")]
    PatternLength {
        employee: usize,
        expected: usize,
        got: usize,
    },
    #[error("invalid options: {0}")]
    InvalidOptions(#[from] crate::config::ConfigError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Une astreinte posée : date, poste, et si elle vient de la passe de complément.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandbyDuty {
    pub date: NaiveDate,
    pub shift: Shift,
    pub relaxed: bool,
}

/// Astreintes par index d'employé.
pub type StandbyLedger = BTreeMap<usize, Vec<StandbyDuty>>;

/// Effectifs d'une date par catégorie d'affectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageRecord {
    pub date: NaiveDate,
    pub a: usize,
    pub b: usize,
    pub c: usize,
    pub off: usize,
    pub vacation: usize,
    pub standby_a: usize,
    pub standby_b: usize,
    pub standby_c: usize,
}

impl CoverageRecord {
    /// Effectif au poste, hors jours marqués d'astreinte.
    pub fn working(&self) -> usize {
        self.a + self.b + self.c
    }

    pub fn standby(&self) -> usize {
        self.standby_a + self.standby_b + self.standby_c
    }

    pub fn total(&self) -> usize {
        self.working() + self.standby() + self.off + self.vacation
    }
}

/// Date dont l'effectif au poste passe sous le seuil d'alerte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageShortfall {
    pub date: NaiveDate,
    pub working: usize,
    pub threshold: usize,
}

/// Série maximale de jours travaillés.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkBlock {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub length: usize,
    /// `A`, ou composite `A-B` si le poste change au cours de la série.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunViolation {
    pub employee: usize,
    pub employee_id: EmployeeId,
    pub block: WorkBlock,
    pub max_allowed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub employee: usize,
    pub employee_id: EmployeeId,
    pub block_count: usize,
    pub max_run: usize,
    pub mean_run: f64,
}

/// Sortie complète de l'analyse des séries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunAnalysis {
    pub blocks: Vec<Vec<WorkBlock>>,
    pub violations: Vec<RunViolation>,
    pub stats: Vec<RunStats>,
}

/// Traitement d'un jour d'astreinte par l'analyse des séries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StandbyRunPolicy {
    /// L'employé a travaillé : la série continue.
    #[default]
    Continues,
    /// Le jour d'astreinte clôt la série.
    Breaks,
}

impl StandbyRunPolicy {
    pub fn from_flag(standby_breaks_runs: bool) -> Self {
        if standby_breaks_runs {
            Self::Breaks
        } else {
            Self::Continues
        }
    }
}
