use crate::model::{Assignment, Shift};

/// Jours de repos après chaque bloc de travail du cycle.
pub const REST_DAYS_PER_BLOCK: usize = 2;

const THREE_SHIFTS: &[Shift] = &[Shift::A, Shift::B, Shift::C];
const TWO_SHIFTS: &[Shift] = &[Shift::A, Shift::B];

/// Postes tenus : A/B pour les départements spéciaux, A/B/C sinon.
pub fn shift_set(special: bool) -> &'static [Shift] {
    if special {
        TWO_SHIFTS
    } else {
        THREE_SHIFTS
    }
}

/// Cycle de base : pour chaque poste, `work_days` jours puis deux repos,
/// en partant du poste `employee % |shifts|`.
pub fn base_cycle(employee: usize, shifts: &[Shift], work_days: usize) -> Vec<Assignment> {
    let mut cycle = Vec::with_capacity(shifts.len() * (work_days + REST_DAYS_PER_BLOCK));
    for slot in 0..shifts.len() {
        let shift = shifts[(employee + slot) % shifts.len()];
        cycle.extend(std::iter::repeat(Assignment::work(shift)).take(work_days));
        cycle.extend(std::iter::repeat(Assignment::OFF).take(REST_DAYS_PER_BLOCK));
    }
    cycle
}

/// Roulement d'un employé sur `days` jours.
///
/// Fonction pure de (index, jeu de postes, longueur du mois) : le cycle de
/// base est décalé de `employee % longueur` pour étaler les débuts de cycle.
pub fn shift_pattern(
    employee: usize,
    shifts: &[Shift],
    work_days: usize,
    days: usize,
) -> Vec<Assignment> {
    let mut cycle = base_cycle(employee, shifts, work_days);
    if cycle.is_empty() {
        return vec![Assignment::OFF; days];
    }
    let offset = employee % cycle.len();
    cycle.rotate_left(offset);
    cycle.iter().copied().cycle().take(days).collect()
}
