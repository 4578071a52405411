use chrono::Datelike;
use lotoscope_model::{PredictionError, Result};
use rand::Rng;
use rand::distr::weighted::WeightedIndex;
use rand::prelude::Distribution;
use rand::rngs::StdRng;

/// Génère un seed déterministe basé sur la date du jour (YYYYMMDD).
pub fn date_seed() -> u64 {
    let today = chrono::Local::now().date_naive();
    let y = today.year() as u64;
    let m = today.month() as u64;
    let d = today.day() as u64;
    y * 10_000 + m * 100 + d
}

/// Tire `k` valeurs uniques d'un univers pondéré, sans remise : à chaque
/// étape la probabilité d'une valeur est proportionnelle à son poids
/// restant, puis elle est retirée de l'urne.
///
/// Une masse restante nulle bascule en tirage uniforme sur les valeurs
/// restantes ; ce n'est jamais une erreur. `k` plus grand que l'univers ou
/// un poids négatif en est une.
pub fn sample_weighted(entries: &[(u8, f64)], k: usize, rng: &mut StdRng) -> Result<Vec<u8>> {
    if k > entries.len() {
        return Err(PredictionError::InvalidParameter(format!(
            "k={} pour un univers de {} valeurs",
            k,
            entries.len()
        )));
    }
    if entries.iter().any(|(_, w)| w.is_nan() || *w < 0.0) {
        return Err(PredictionError::InvalidParameter(
            "poids négatif ou NaN".into(),
        ));
    }

    let mut available: Vec<(u8, f64)> = entries.to_vec();
    let mut selected = Vec::with_capacity(k);

    for _ in 0..k {
        let weights: Vec<f64> = available.iter().map(|(_, w)| *w).collect();
        let idx = match WeightedIndex::new(&weights) {
            Ok(dist) => dist.sample(rng),
            // masse nulle : repli uniforme
            Err(_) => rng.random_range(0..available.len()),
        };
        let (value, _) = available.remove(idx);
        selected.push(value);
    }

    Ok(selected)
}

/// Variante indexée par le domaine : `weights[i]` est le poids du numéro
/// `i + 1`.
pub fn sample_without_replacement(weights: &[f64], k: usize, rng: &mut StdRng) -> Result<Vec<u8>> {
    let entries: Vec<(u8, f64)> = weights
        .iter()
        .enumerate()
        .map(|(i, &w)| ((i + 1) as u8, w))
        .collect();
    sample_weighted(&entries, k, rng)
}
