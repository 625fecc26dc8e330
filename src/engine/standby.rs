use super::types::{StandbyDuty, StandbyLedger};
use crate::model::{Schedule, Shift};
use tracing::{debug, warn};

/// Paramètres de répartition des astreintes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandbyOptions {
    /// Astreintes visées par date et par poste.
    pub per_shift: usize,
    /// Plafond mensuel par employé, hors passe de complément.
    pub cap: usize,
}

/// Bilan de la répartition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StandbyOutcome {
    pub ledger: StandbyLedger,
    /// Astreintes posées au-delà du plafond pour tenir l'objectif.
    pub relaxed: usize,
    /// Créneaux (date, poste) restés sous l'objectif faute de candidats.
    pub unfilled: usize,
}

impl StandbyOutcome {
    pub fn count_for(&self, employee: usize) -> usize {
        self.ledger.get(&employee).map_or(0, Vec::len)
    }
}

/// Pose les astreintes sur les jours travaillés, date par date puis poste par poste.
///
/// Les candidats d'un créneau sont les employés disponibles tenant ce poste
/// ce jour-là, triés par nombre d'astreintes déjà reçues (tri stable : à
/// égalité l'ordre de l'annuaire départage). Une première passe respecte
/// `cap` ; si l'objectif n'est pas atteint, une passe de complément pioche
/// dans les candidats restants sans plafond.
pub fn allocate_standby(
    schedule: &mut Schedule,
    available: &[usize],
    opts: StandbyOptions,
) -> StandbyOutcome {
    let mut counts = vec![0usize; schedule.employee_count()];
    let mut outcome = StandbyOutcome::default();
    let dates = schedule.dates().to_vec();

    for (day, date) in dates.iter().enumerate() {
        for shift in Shift::ALL {
            let mut candidates: Vec<usize> = available
                .iter()
                .copied()
                .filter(|&emp| {
                    schedule
                        .get(emp, day)
                        .and_then(|a| a.plain_shift())
                        .is_some_and(|s| s == shift)
                })
                .collect();
            candidates.sort_by_key(|&emp| counts[emp]);

            let mut picked = Vec::with_capacity(opts.per_shift);
            for &emp in &candidates {
                if picked.len() >= opts.per_shift {
                    break;
                }
                if counts[emp] < opts.cap {
                    picked.push((emp, false));
                }
            }

            if picked.len() < opts.per_shift {
                let missing = opts.per_shift - picked.len();
                let extra: Vec<usize> = candidates
                    .iter()
                    .copied()
                    .filter(|emp| !picked.iter().any(|(p, _)| p == emp))
                    .take(missing)
                    .collect();
                if !extra.is_empty() {
                    warn!(
                        %date,
                        %shift,
                        count = extra.len(),
                        cap = opts.cap,
                        "standby target not met under cap, assigning beyond cap"
                    );
                }
                outcome.relaxed += extra.len();
                picked.extend(extra.into_iter().map(|emp| (emp, true)));
            }

            if picked.len() < opts.per_shift {
                debug!(%date, %shift, assigned = picked.len(), "standby target not reachable");
                outcome.unfilled += 1;
            }

            for (emp, relaxed) in picked {
                if schedule.mark_standby(emp, day).is_some() {
                    counts[emp] += 1;
                    outcome.ledger.entry(emp).or_default().push(StandbyDuty {
                        date: *date,
                        shift,
                        relaxed,
                    });
                }
            }
        }
    }

    outcome
}
