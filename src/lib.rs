#![forbid(unsafe_code)]
//! Roulement — génération de plannings mensuels en roulement (postes A/B/C),
//! congés au mois, astreintes plafonnées, sans base de données.
//!
//! - Roulements déterministes décalés par employé.
//! - Tirage des congés avec graine optionnelle.
//! - Astreintes équitables, passe de complément explicite.
//! - Couverture journalière et contrôle des séries de jours travaillés.

pub mod bidding;
pub mod calendar;
pub mod config;
pub mod directory;
pub mod engine;
pub mod model;
pub mod report;
pub mod storage;

pub use bidding::{bidding_feed, BiddingError, BiddingLine, BiddingRequest};
pub use calendar::{column_label, Month};
pub use config::{ConfigError, RosterOptions};
pub use directory::{load_directory, synthesize_directory, ColumnMapping, DirectoryLoad};
pub use engine::{EngineError, GeneratedRoster, RosterEngine, StandbyRunPolicy};
pub use model::{Assignment, Duty, Employee, EmployeeId, Schedule, Shift};
pub use report::{CsvReportRenderer, ReportRenderer, RosterReport};
pub use storage::{JsonRosterStore, PublishedRoster, RosterPeriod, Storage};
