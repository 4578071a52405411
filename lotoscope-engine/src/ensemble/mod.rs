//! Couche de fusion d'ensemble : combine les sorties de plusieurs
//! stratégies en grilles hybrides, puis borne la réutilisation des numéros
//! et des stratégies à la sélection.

pub mod diversity;
pub mod parallel;

use lotoscope_model::{Combination, GameRules, Pool, PredictionError, Result};
use rand::Rng;
use rand::rngs::StdRng;

use crate::stats::DistributionStats;

pub use diversity::{DEFAULT_NUMBER_CAP, DEFAULT_STRATEGY_CAP, select_diverse};
pub use parallel::generate_all;

/// Lot de combinaisons produit par une stratégie nommée.
#[derive(Debug, Clone)]
pub struct StrategyPool {
    pub name: String,
    pub combinations: Vec<Combination>,
}

impl StrategyPool {
    pub fn new(name: impl Into<String>, combinations: Vec<Combination>) -> Self {
        Self {
            name: name.into(),
            combinations,
        }
    }
}

/// Tire `take` numéros distincts de `pool` non déjà présents dans `used`.
fn pick_distinct(pool: &[u8], used: &[u8], take: usize, rng: &mut StdRng) -> Vec<u8> {
    let mut available: Vec<u8> = pool.iter().copied().filter(|n| !used.contains(n)).collect();
    let mut picked = Vec::with_capacity(take);
    while picked.len() < take && !available.is_empty() {
        let idx = rng.random_range(0..available.len());
        picked.push(available.remove(idx));
    }
    picked
}

/// Fusion croisée : répartition de positions fixe sur trois lots sources
/// nommés (2 numéros du premier, 2 du deuxième, 1 du troisième), les numéros
/// déjà pris dans la grille sont sautés, et l'union des sources sert de
/// réserve quand un lot est épuisé.
pub fn cross_strategy_fusion(
    sources: &[StrategyPool],
    count: usize,
    rules: &GameRules,
    rng: &mut StdRng,
) -> Result<Vec<Combination>> {
    if count < 1 {
        return Err(PredictionError::InvalidParameter(
            "count doit être >= 1".into(),
        ));
    }
    if sources.len() < 3 || sources.iter().take(3).any(|s| s.combinations.is_empty()) {
        return Err(PredictionError::InvalidParameter(
            "au moins 3 lots sources non vides requis".into(),
        ));
    }

    let split = [2usize, 2, 1];

    let mut fusions = Vec::with_capacity(count);
    for i in 0..count {
        let mut numbers: Vec<u8> = Vec::with_capacity(rules.main_count);
        let mut parent_scores = Vec::with_capacity(3);
        let mut bonus_union: Vec<u8> = Vec::new();

        for (pool_idx, &take) in split.iter().enumerate() {
            let pool = &sources[pool_idx];
            let combo = &pool.combinations[i % pool.combinations.len()];
            numbers.extend(pick_distinct(&combo.numbers, &numbers, take, rng));
            parent_scores.push(combo.score);
            for &b in &combo.bonus {
                if !bonus_union.contains(&b) {
                    bonus_union.push(b);
                }
            }
        }

        // réserve : tous les numéros de toutes les sources
        if numbers.len() < rules.main_count {
            let union: Vec<u8> = sources
                .iter()
                .flat_map(|s| s.combinations.iter())
                .flat_map(|c| c.numbers.iter().copied())
                .collect();
            let missing = rules.main_count - numbers.len();
            numbers.extend(pick_distinct(&union, &numbers, missing, rng));
        }
        // dernier recours : le domaine entier, la grille doit rester valide
        while numbers.len() < rules.main_count {
            let n = rng.random_range(1..=rules.main_domain);
            if !numbers.contains(&n) {
                numbers.push(n);
            }
        }

        let mut bonus = pick_distinct(&bonus_union, &[], rules.bonus_count, rng);
        while bonus.len() < rules.bonus_count {
            let b = rng.random_range(1..=rules.bonus_domain);
            if !bonus.contains(&b) {
                bonus.push(b);
            }
        }

        let score = parent_scores.iter().sum::<f64>() / parent_scores.len() as f64;
        fusions.push(Combination::new(
            rules,
            numbers,
            bonus,
            score,
            "Cross-Strategy Fusion",
        )?);
    }
    Ok(fusions)
}

/// Fusion par moyenne positionnelle : chaque position triée des deux parents
/// est moyennée (arrondi), les collisions sont dédupliquées puis comblées
/// depuis l'union des parents. Moyenner une grille avec elle-même la rend
/// inchangée.
pub fn positional_average_fusion(
    a: &Combination,
    b: &Combination,
    rules: &GameRules,
    rng: &mut StdRng,
) -> Result<Combination> {
    let mut numbers: Vec<u8> = Vec::with_capacity(rules.main_count);
    for pos in 0..rules.main_count {
        let avg = ((a.numbers[pos] as f64 + b.numbers[pos] as f64) / 2.0).round() as u8;
        if !numbers.contains(&avg) {
            numbers.push(avg);
        }
    }

    // collisions : compléter depuis l'union des deux parents
    if numbers.len() < rules.main_count {
        let union: Vec<u8> = a
            .numbers
            .iter()
            .chain(b.numbers.iter())
            .copied()
            .collect();
        let missing = rules.main_count - numbers.len();
        numbers.extend(pick_distinct(&union, &numbers, missing, rng));
    }
    while numbers.len() < rules.main_count {
        let n = rng.random_range(1..=rules.main_domain);
        if !numbers.contains(&n) {
            numbers.push(n);
        }
    }

    // bonus : union des parents, tronquée au format du jeu
    let mut bonus: Vec<u8> = Vec::new();
    for &x in a.bonus.iter().chain(b.bonus.iter()) {
        if !bonus.contains(&x) {
            bonus.push(x);
        }
    }
    bonus.sort_unstable();
    bonus.truncate(rules.bonus_count);
    while bonus.len() < rules.bonus_count {
        let x = rng.random_range(1..=rules.bonus_domain);
        if !bonus.contains(&x) {
            bonus.push(x);
        }
    }

    let score = (a.score + b.score) / 2.0;
    Combination::new(rules, numbers, bonus, score, "Positional Averaging Fusion")
}

/// Fusion par fréquence pondérée : à chaque position triée, on garde celui
/// des deux parents dont le numéro a la plus forte fréquence pondérée ; le
/// complément éventuel vient de l'union des parents, les plus fréquents
/// d'abord. Entièrement déterministe.
pub fn frequency_weighted_fusion(
    a: &Combination,
    b: &Combination,
    stats: &DistributionStats,
    rules: &GameRules,
    recent_weight: f64,
) -> Result<Combination> {
    let main_weights = stats.weighted_frequency(Pool::Main, recent_weight)?;
    let bonus_weights = stats.weighted_frequency(Pool::Bonus, recent_weight)?;
    let weight_of = |w: &[f64], n: u8| w.get((n as usize).wrapping_sub(1)).copied().unwrap_or(0.0);

    let mut numbers: Vec<u8> = Vec::with_capacity(rules.main_count);
    for pos in 0..rules.main_count {
        let (x, y) = (a.numbers[pos], b.numbers[pos]);
        let keep = if weight_of(&main_weights, x) >= weight_of(&main_weights, y) {
            x
        } else {
            y
        };
        if !numbers.contains(&keep) {
            numbers.push(keep);
        }
    }

    if numbers.len() < rules.main_count {
        let mut union: Vec<u8> = a
            .numbers
            .iter()
            .chain(b.numbers.iter())
            .copied()
            .filter(|n| !numbers.contains(n))
            .collect();
        union.sort_unstable();
        union.dedup();
        union.sort_by(|&x, &y| {
            weight_of(&main_weights, y)
                .partial_cmp(&weight_of(&main_weights, x))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let missing = rules.main_count - numbers.len();
        numbers.extend(union.into_iter().take(missing));
    }
    // deux parents valides couvrent toujours le format, mais la grille doit
    // rester valide même sur des entrées dégénérées
    let mut fallback = 1u8;
    while numbers.len() < rules.main_count && fallback <= rules.main_domain {
        if !numbers.contains(&fallback) {
            numbers.push(fallback);
        }
        fallback += 1;
    }

    let mut bonus: Vec<u8> = Vec::with_capacity(rules.bonus_count);
    for pos in 0..rules.bonus_count {
        let (x, y) = (a.bonus[pos], b.bonus[pos]);
        let keep = if weight_of(&bonus_weights, x) >= weight_of(&bonus_weights, y) {
            x
        } else {
            y
        };
        if !bonus.contains(&keep) {
            bonus.push(keep);
        }
    }
    if bonus.len() < rules.bonus_count {
        let mut union: Vec<u8> = a
            .bonus
            .iter()
            .chain(b.bonus.iter())
            .copied()
            .filter(|x| !bonus.contains(x))
            .collect();
        union.sort_unstable();
        union.dedup();
        let missing = rules.bonus_count - bonus.len();
        bonus.extend(union.into_iter().take(missing));
    }

    let score = (a.score + b.score) / 2.0;
    Combination::new(rules, numbers, bonus, score, "Frequency-Weighted Fusion")
}
