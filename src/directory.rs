//! Annuaire des employés : import CSV tolérant aux en-têtes variés et
//! annuaire de secours synthétique.
//!
//! La correspondance des colonnes est résolue une seule fois, sur l'en-tête ;
//! le moteur ne voit que des `Employee`.

use crate::config::RosterOptions;
use crate::model::{Employee, EmployeeId};
use anyhow::{bail, Context};
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

pub const DEFAULT_DEPARTMENT: &str = "General";
pub const DEFAULT_POSITION: &str = "Staff";

/// Synonymes acceptés pour chaque champ, par ordre de préférence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub id: Vec<String>,
    pub name: Vec<String>,
    pub department: Vec<String>,
    pub position: Vec<String>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        let v = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            id: v(&["employee_id", "employeeid", "emp_id", "staff_id", "id", "matricule"]),
            name: v(&["name", "employee_name", "full_name", "nom"]),
            department: v(&["department", "dept", "department_name", "section", "service"]),
            position: v(&["position", "job_title", "title", "role", "poste"]),
        }
    }
}

/// Index des colonnes retenues dans un fichier donné.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub id: Option<usize>,
    pub name: usize,
    pub department: Option<usize>,
    pub position: Option<usize>,
}

fn normalize_header(raw: &str) -> String {
    raw.trim()
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

fn find_column(headers: &[String], synonyms: &[String]) -> Option<usize> {
    synonyms.iter().find_map(|syn| {
        let syn = normalize_header(syn);
        headers.iter().position(|h| *h == syn)
    })
}

impl ColumnMapping {
    /// Résout l'en-tête ; seule la colonne du nom est obligatoire.
    pub fn resolve(&self, header: &StringRecord) -> anyhow::Result<ResolvedColumns> {
        let headers: Vec<String> = header.iter().map(normalize_header).collect();
        let name = find_column(&headers, &self.name)
            .with_context(|| format!("no name column among {:?}", header))?;
        Ok(ResolvedColumns {
            id: find_column(&headers, &self.id),
            name,
            department: find_column(&headers, &self.department),
            position: find_column(&headers, &self.position),
        })
    }
}

/// Résultat du chargement : `degraded` signale l'usage de l'annuaire de secours.
#[derive(Debug, Clone)]
pub struct DirectoryLoad {
    pub employees: Vec<Employee>,
    pub degraded: bool,
    pub reason: Option<String>,
}

/// Import CSV strict : les `count` premières lignes exploitables.
pub fn import_employees_csv<P: AsRef<Path>>(
    path: P,
    count: usize,
    mapping: &ColumnMapping,
) -> anyhow::Result<Vec<Employee>> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let cols = mapping.resolve(rdr.headers()?)?;

    let mut out = Vec::new();
    for rec in rdr.records() {
        if out.len() >= count {
            break;
        }
        let rec = rec.with_context(|| format!("reading {}", path.display()))?;
        let field = |idx: Option<usize>| idx.and_then(|i| rec.get(i)).filter(|s| !s.is_empty());

        let Some(name) = field(Some(cols.name)) else {
            continue;
        };
        let id = field(cols.id)
            .map(EmployeeId::new)
            .unwrap_or_else(|| EmployeeId::placeholder(out.len() + 1));
        out.push(Employee::new(
            id,
            name,
            field(cols.department).unwrap_or(DEFAULT_DEPARTMENT),
            field(cols.position).unwrap_or(DEFAULT_POSITION),
        ));
    }
    if out.is_empty() {
        bail!("no employee rows in {}", path.display());
    }
    Ok(out)
}

/// Annuaire de secours : `EMP0001..`, départements en round-robin,
/// un poste `Senior` tous les dix employés.
pub fn synthesize_directory(count: usize, departments: &[String]) -> Vec<Employee> {
    (1..=count)
        .map(|n| {
            let department = if departments.is_empty() {
                DEFAULT_DEPARTMENT
            } else {
                departments[(n - 1) % departments.len()].as_str()
            };
            let position = if n % 10 == 0 { "Senior" } else { DEFAULT_POSITION };
            Employee::new(
                EmployeeId::placeholder(n),
                format!("Employee {n}"),
                department,
                position,
            )
        })
        .collect()
}

/// Charge l'annuaire ; tout échec d'import bascule sur l'annuaire synthétique.
pub fn load_directory(source: Option<&Path>, opts: &RosterOptions) -> DirectoryLoad {
    let count = opts.total_employees;
    let attempt = match source {
        Some(path) => import_employees_csv(path, count, &opts.columns),
        None => Err(anyhow::anyhow!("no directory source provided")),
    };
    match attempt {
        Ok(employees) => {
            info!(count = employees.len(), "employee directory loaded");
            DirectoryLoad {
                employees,
                degraded: false,
                reason: None,
            }
        }
        Err(err) => {
            let reason = format!("{err:#}");
            warn!(%reason, count, "directory unavailable, using synthesized employees");
            DirectoryLoad {
                employees: synthesize_directory(count, &opts.fallback_departments),
                degraded: true,
                reason: Some(reason),
            }
        }
    }
}
