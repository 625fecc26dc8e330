use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifiant fort pour Employee (`EMP0001`, matricule importé, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EmployeeId(String);

impl EmployeeId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    /// Identifiant de substitution déterministe : `EMP0001` pour `n = 1`.
    pub fn placeholder(n: usize) -> Self {
        Self(format!("EMP{n:04}"))
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Employé tel que fourni par l'annuaire. Immuable pendant un calcul.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub department: String,
    pub position: String,
}

impl Employee {
    pub fn new<N: Into<String>, D: Into<String>, P: Into<String>>(
        id: EmployeeId,
        name: N,
        department: D,
        position: P,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            department: department.into(),
            position: position.into(),
        }
    }
}

/// Poste de travail : A (matin), B (soir), C (nuit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Shift {
    A,
    B,
    C,
}

impl Shift {
    pub const ALL: [Shift; 3] = [Shift::A, Shift::B, Shift::C];

    pub fn letter(self) -> char {
        match self {
            Shift::A => 'A',
            Shift::B => 'B',
            Shift::C => 'C',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'A' => Some(Shift::A),
            'B' => Some(Shift::B),
            'C' => Some(Shift::C),
            _ => None,
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Nature de la journée, indépendamment de l'astreinte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Duty {
    Work(Shift),
    Off,
    Vacation,
}

/// Affectation d'un employé pour une date.
///
/// L'astreinte est un drapeau posé sur un jour travaillé : le poste de base
/// reste connu après le marquage (`STANDBY_A` = poste A + astreinte).
/// Invariant : `standby` n'est vrai que pour `Duty::Work`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Assignment {
    duty: Duty,
    standby: bool,
}

impl Assignment {
    pub const OFF: Assignment = Assignment {
        duty: Duty::Off,
        standby: false,
    };
    pub const VACATION: Assignment = Assignment {
        duty: Duty::Vacation,
        standby: false,
    };

    pub fn work(shift: Shift) -> Self {
        Self {
            duty: Duty::Work(shift),
            standby: false,
        }
    }

    /// Astreinte sur le poste `shift`.
    pub fn standby_on(shift: Shift) -> Self {
        Self {
            duty: Duty::Work(shift),
            standby: true,
        }
    }

    pub fn duty(self) -> Duty {
        self.duty
    }

    pub fn is_standby(self) -> bool {
        self.standby
    }

    /// Poste travaillé ce jour-là, astreinte comprise.
    pub fn shift(self) -> Option<Shift> {
        match self.duty {
            Duty::Work(s) => Some(s),
            _ => None,
        }
    }

    /// Poste "pur" : travaillé et non marqué d'astreinte.
    pub fn plain_shift(self) -> Option<Shift> {
        if self.standby {
            None
        } else {
            self.shift()
        }
    }

    /// Marque l'astreinte ; `None` si la journée n'est pas travaillée ou déjà marquée.
    pub fn with_standby(self) -> Option<Self> {
        match self.duty {
            Duty::Work(_) if !self.standby => Some(Self {
                duty: self.duty,
                standby: true,
            }),
            _ => None,
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.duty, self.standby) {
            (Duty::Work(s), false) => write!(f, "{s}"),
            (Duty::Work(s), true) => write!(f, "STANDBY_{s}"),
            (Duty::Off, _) => f.write_str("OFF"),
            (Duty::Vacation, _) => f.write_str("VACATION"),
        }
    }
}

impl FromStr for Assignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_shift = |raw: &str| {
            let mut chars = raw.chars();
            match (chars.next().and_then(Shift::from_letter), chars.next()) {
                (Some(shift), None) => Some(shift),
                _ => None,
            }
        };
        match s {
            "OFF" => Ok(Assignment::OFF),
            "VACATION" => Ok(Assignment::VACATION),
            other => {
                if let Some(rest) = other.strip_prefix("STANDBY_") {
                    parse_shift(rest)
                        .map(Assignment::standby_on)
                        .ok_or_else(|| format!("unknown assignment: {other}"))
                } else {
                    parse_shift(other)
                        .map(Assignment::work)
                        .ok_or_else(|| format!("unknown assignment: {other}"))
                }
            }
        }
    }
}

impl From<Assignment> for String {
    fn from(a: Assignment) -> Self {
        a.to_string()
    }
}

impl TryFrom<String> for Assignment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Planning complet : une ligne par employé (ordre de l'annuaire), une
/// colonne par date du mois. Aucune case n'est jamais absente.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSchedule")]
pub struct Schedule {
    dates: Vec<NaiveDate>,
    rows: Vec<Vec<Assignment>>,
}

#[derive(Deserialize)]
struct RawSchedule {
    dates: Vec<NaiveDate>,
    rows: Vec<Vec<Assignment>>,
}

impl TryFrom<RawSchedule> for Schedule {
    type Error = String;

    fn try_from(raw: RawSchedule) -> Result<Self, Self::Error> {
        Schedule::from_rows(raw.dates, raw.rows)
    }
}

impl Schedule {
    /// Construit un planning en vérifiant que chaque ligne couvre toutes les dates.
    pub fn from_rows(dates: Vec<NaiveDate>, rows: Vec<Vec<Assignment>>) -> Result<Self, String> {
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != dates.len()) {
            return Err(format!(
                "schedule row {idx} has {} entries, expected {}",
                row.len(),
                dates.len()
            ));
        }
        Ok(Self { dates, rows })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn employee_count(&self) -> usize {
        self.rows.len()
    }

    /// Ligne d'un employé ; `None` hors de l'annuaire.
    pub fn row(&self, employee: usize) -> Option<&[Assignment]> {
        self.rows.get(employee).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Assignment]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn get(&self, employee: usize, day: usize) -> Option<Assignment> {
        self.rows.get(employee).and_then(|r| r.get(day)).copied()
    }

    /// Pose l'astreinte sur (employé, jour). Renvoie le poste marqué, ou `None`
    /// si la case n'est pas un poste travaillé libre.
    pub(crate) fn mark_standby(&mut self, employee: usize, day: usize) -> Option<Shift> {
        let cell = self.rows.get_mut(employee)?.get_mut(day)?;
        let marked = cell.with_standby()?;
        *cell = marked;
        marked.shift()
    }
}
