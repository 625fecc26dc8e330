use crate::directory::ColumnMapping;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Part d'employés partant en congé pour le mois complet.
pub const DEFAULT_VACATION_FRACTION: f64 = 0.10;
/// Longueur des blocs de travail du cycle et seuil de violation.
pub const DEFAULT_MAX_CONSECUTIVE_WORK_DAYS: usize = 5;
pub const DEFAULT_STANDBY_PER_SHIFT: usize = 12;
pub const DEFAULT_STANDBY_CAP: usize = 3;
pub const DEFAULT_COVERAGE_ALERT_THRESHOLD: usize = 100;

/// Options de génération. Tous les champs ont une valeur par défaut, un
/// fichier JSON partiel suffit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterOptions {
    pub total_employees: usize,
    pub vacation_fraction: f64,
    pub max_consecutive_work_days: usize,
    /// Astreintes visées par date et par poste.
    pub standby_per_shift: usize,
    /// Plafond mensuel d'astreintes par employé (hors passe de complément).
    pub standby_cap: usize,
    /// Départements en roulement 2 postes (A/B).
    pub special_departments: Vec<String>,
    /// En dessous de cet effectif A+B+C, la date est signalée.
    pub coverage_alert_threshold: usize,
    /// Si vrai, un jour d'astreinte coupe la série de jours travaillés.
    pub standby_breaks_runs: bool,
    /// Graine du tirage des congés ; `None` = tirage non reproductible.
    pub vacation_seed: Option<u64>,
    /// Départements distribués en round-robin par l'annuaire de secours.
    pub fallback_departments: Vec<String>,
    pub columns: ColumnMapping,
}

impl Default for RosterOptions {
    fn default() -> Self {
        Self {
            total_employees: 100,
            vacation_fraction: DEFAULT_VACATION_FRACTION,
            max_consecutive_work_days: DEFAULT_MAX_CONSECUTIVE_WORK_DAYS,
            standby_per_shift: DEFAULT_STANDBY_PER_SHIFT,
            standby_cap: DEFAULT_STANDBY_CAP,
            special_departments: vec!["Station Staff".into(), "Supervisors".into()],
            coverage_alert_threshold: DEFAULT_COVERAGE_ALERT_THRESHOLD,
            standby_breaks_runs: false,
            vacation_seed: None,
            fallback_departments: vec![
                "Operations".into(),
                "Station Staff".into(),
                "Supervisors".into(),
                "Maintenance".into(),
            ],
            columns: ColumnMapping::default(),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("vacation_fraction must be within [0, 1], got {0}")]
    VacationFraction(f64),
    #[error("max_consecutive_work_days must be > 0")]
    MaxConsecutiveWorkDays,
    #[error("fallback_departments cannot be empty")]
    NoFallbackDepartment,
}

impl RosterOptions {
    /// Charge un fichier JSON puis valide les valeurs.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let opts: RosterOptions = serde_json::from_slice(&data)
            .with_context(|| format!("parsing config {}", path.display()))?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.vacation_fraction) {
            return Err(ConfigError::VacationFraction(self.vacation_fraction));
        }
        if self.max_consecutive_work_days == 0 {
            return Err(ConfigError::MaxConsecutiveWorkDays);
        }
        if self.fallback_departments.is_empty() {
            return Err(ConfigError::NoFallbackDepartment);
        }
        Ok(())
    }

    pub fn is_special_department(&self, department: &str) -> bool {
        self.special_departments.iter().any(|d| d == department)
    }
}
