//! Flux "bidding" : liste plate des postes travaillés par ligne de roulement,
//! destinée à l'outil de choix des lignes.

use crate::calendar::Month;
use crate::config::DEFAULT_MAX_CONSECUTIVE_WORK_DAYS;
use crate::engine::{shift_pattern, shift_set, EngineError};
use crate::model::Shift;
use serde::Serialize;
use thiserror::Error;

pub const BIDDING_DEPARTMENT: &str = "General";

#[derive(Error, Debug)]
pub enum BiddingError {
    #[error("Missing arguments: year month totalLines")]
    MissingArguments,
    #[error("invalid literal for {field}: '{value}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Paramètres positionnels : année, mois, nombre de lignes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BiddingRequest {
    pub year: i32,
    pub month: u32,
    pub total_lines: usize,
}

impl BiddingRequest {
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, BiddingError> {
        let [year, month, total_lines, ..] = args else {
            return Err(BiddingError::MissingArguments);
        };
        Ok(Self {
            year: parse_field("year", year.as_ref())?,
            month: parse_field("month", month.as_ref())?,
            total_lines: parse_field("totalLines", total_lines.as_ref())?,
        })
    }
}

fn parse_field<T: std::str::FromStr>(field: &'static str, raw: &str) -> Result<T, BiddingError> {
    raw.trim().parse().map_err(|_| BiddingError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BiddingLine {
    pub line_number: usize,
    /// ISO-8601 à minuit : `2025-02-01T00:00:00`.
    pub date: String,
    pub shift: Shift,
    pub department: String,
}

/// Postes A/B/C des lignes `1..=total_lines` ; repos, congés et astreintes
/// n'apparaissent pas. Le numéro de ligne sert d'index de roulement.
pub fn bidding_feed(req: BiddingRequest) -> Result<Vec<BiddingLine>, BiddingError> {
    let month = Month::new(req.year, req.month)?;
    let dates = month.dates();
    let shifts = shift_set(false);

    let mut out = Vec::new();
    for line_number in 1..=req.total_lines {
        let pattern = shift_pattern(line_number, shifts, DEFAULT_MAX_CONSECUTIVE_WORK_DAYS, dates.len());
        for (date, cell) in dates.iter().zip(pattern) {
            if let Some(shift) = cell.plain_shift() {
                out.push(BiddingLine {
                    line_number,
                    date: date.format("%Y-%m-%dT00:00:00").to_string(),
                    shift,
                    department: BIDDING_DEPARTMENT.to_string(),
                });
            }
        }
    }
    Ok(out)
}

/// Objet d'erreur à champ unique renvoyé au consommateur.
pub fn error_json(err: &dyn std::fmt::Display) -> serde_json::Value {
    serde_json::json!({ "error": err.to_string() })
}
