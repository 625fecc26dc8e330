use rand::seq::index;
use rand::Rng;
use std::collections::BTreeSet;

/// `floor(total * fraction)`, borné à `total`.
pub fn vacation_count(total: usize, fraction: f64) -> usize {
    if fraction.is_nan() || fraction <= 0.0 {
        return 0;
    }
    // 0.29 * 100 = 28.999999999999996
    let raw = (total as f64 * fraction + 1e-9).floor() as usize;
    raw.min(total)
}

/// Tire sans remise les employés en congé pour le mois.
///
/// Le générateur est fourni par l'appelant : `StdRng::seed_from_u64` pour un
/// tirage reproductible, `rand::rng()` sinon.
pub fn select_vacation<R: Rng + ?Sized>(total: usize, fraction: f64, rng: &mut R) -> BTreeSet<usize> {
    let count = vacation_count(total, fraction);
    index::sample(rng, total, count).into_iter().collect()
}
