use std::collections::HashMap;

use lotoscope_model::{Combination, DrawRecord, Pool, PredictionError, Result};
use rand::Rng;
use rand::rngs::StdRng;

use crate::sampler::sample_weighted;
use crate::strategies::{EngineContext, Strategy, check_count};

// poids des trois niveaux de transitions dans le score d'un candidat
const DIRECT_WEIGHT: f64 = 2.0;
const LAG_WEIGHT: f64 = 1.5;
const PAIR_WEIGHT: f64 = 3.0;

/// Tables de transitions multi-niveaux sur les tirages triés : voisins
/// immédiats, numéros à `lag` positions d'écart, et paire → troisième.
/// Construites une fois par invocation, en lecture seule ensuite.
pub struct TransitionModel {
    direct: HashMap<u8, HashMap<u8, u32>>,
    lagged: HashMap<u8, HashMap<u8, u32>>,
    pair_to_third: HashMap<(u8, u8), HashMap<u8, u32>>,
}

impl TransitionModel {
    pub fn build(draws: &[DrawRecord], lag: usize) -> Self {
        let mut direct: HashMap<u8, HashMap<u8, u32>> = HashMap::new();
        let mut lagged: HashMap<u8, HashMap<u8, u32>> = HashMap::new();
        let mut pair_to_third: HashMap<(u8, u8), HashMap<u8, u32>> = HashMap::new();

        for draw in draws {
            let mut numbers: Vec<u8> = draw.numbers(Pool::Main).to_vec();
            numbers.sort_unstable();

            for i in 0..numbers.len().saturating_sub(1) {
                *direct
                    .entry(numbers[i])
                    .or_default()
                    .entry(numbers[i + 1])
                    .or_insert(0) += 1;
            }
            for i in 0..numbers.len().saturating_sub(lag) {
                *lagged
                    .entry(numbers[i])
                    .or_default()
                    .entry(numbers[i + lag])
                    .or_insert(0) += 1;
            }
            for i in 0..numbers.len().saturating_sub(2) {
                *pair_to_third
                    .entry((numbers[i], numbers[i + 1]))
                    .or_default()
                    .entry(numbers[i + 2])
                    .or_insert(0) += 1;
            }
        }

        Self {
            direct,
            lagged,
            pair_to_third,
        }
    }

    /// Score d'un candidat sachant les numéros déjà retenus dans la même
    /// grille : somme pondérée des trois niveaux, paire → troisième le plus
    /// lourd.
    pub fn score(&self, candidate: u8, chosen: &[u8]) -> f64 {
        let mut score = 0.0;

        for &existing in chosen {
            if let Some(count) = self.direct.get(&existing).and_then(|t| t.get(&candidate)) {
                score += *count as f64 * DIRECT_WEIGHT;
            }
            if let Some(count) = self.lagged.get(&existing).and_then(|t| t.get(&candidate)) {
                score += *count as f64 * LAG_WEIGHT;
            }
        }

        let mut sorted = chosen.to_vec();
        sorted.sort_unstable();
        for pair in sorted.windows(2) {
            if let Some(count) = self
                .pair_to_third
                .get(&(pair[0], pair[1]))
                .and_then(|t| t.get(&candidate))
            {
                score += *count as f64 * PAIR_WEIGHT;
            }
        }

        score
    }

    pub fn direct_count(&self, from: u8, to: u8) -> u32 {
        self.direct
            .get(&from)
            .and_then(|t| t.get(&to))
            .copied()
            .unwrap_or(0)
    }
}

/// Stratégie de chaîne de transitions : chaque grille démarre sur un germe
/// fréquent puis s'étend numéro par numéro, tirée au poids des transitions
/// observées depuis les numéros déjà retenus.
pub struct MarkovStrategy {
    lag: usize,
}

impl MarkovStrategy {
    pub fn new(lag: usize) -> Result<Self> {
        if !(1..=5).contains(&lag) {
            return Err(PredictionError::InvalidParameter(format!(
                "lag {} hors [1,5]",
                lag
            )));
        }
        Ok(Self { lag })
    }
}

impl Default for MarkovStrategy {
    fn default() -> Self {
        Self { lag: 1 }
    }
}

impl Strategy for MarkovStrategy {
    fn name(&self) -> &str {
        "Markov"
    }

    fn generate(
        &self,
        ctx: &EngineContext<'_>,
        count: usize,
        rng: &mut StdRng,
    ) -> Result<Vec<Combination>> {
        check_count(count)?;
        if ctx.draws.len() < 2 {
            return Err(PredictionError::InsufficientData(
                "au moins 2 tirages requis pour des transitions".into(),
            ));
        }

        let rules = ctx.rules;
        let model = TransitionModel::build(ctx.draws, self.lag);
        let seeds = ctx.stats.hot(Pool::Main, 20);

        let bonus_entries: Vec<(u8, f64)> = ctx
            .stats
            .frequency(Pool::Bonus)
            .iter()
            .map(|(n, c)| (n, c as f64 + 1.0))
            .collect();

        let mut raw_batch: Vec<(Vec<u8>, Vec<u8>, f64)> = Vec::with_capacity(count);
        for i in 0..count {
            // germe varié pour diversifier le lot
            let seed = seeds[i % seeds.len()];
            let mut numbers = vec![seed];

            while numbers.len() < rules.main_count {
                let candidates: Vec<(u8, f64)> = (1..=rules.main_domain)
                    .filter(|n| !numbers.contains(n))
                    .map(|n| (n, model.score(n, &numbers)))
                    .filter(|(_, s)| *s > 0.0)
                    .collect();

                let next = if candidates.is_empty() {
                    // aucune transition connue : n'importe quel numéro libre
                    loop {
                        let n = rng.random_range(1..=rules.main_domain);
                        if !numbers.contains(&n) {
                            break n;
                        }
                    }
                } else {
                    sample_weighted(&candidates, 1, rng)?[0]
                };
                numbers.push(next);
            }

            let bonus = sample_weighted(&bonus_entries, rules.bonus_count, rng)?;

            // masse de transitions de la grille finie, normalisée ensuite
            // sur le lot
            let raw: f64 = (1..numbers.len())
                .map(|k| model.score(numbers[k], &numbers[..k]))
                .sum();
            raw_batch.push((numbers, bonus, raw));
        }

        let max_raw = raw_batch
            .iter()
            .map(|(_, _, r)| *r)
            .fold(0.0f64, f64::max)
            .max(1.0);

        let mut combinations = Vec::with_capacity(count);
        for (numbers, bonus, raw) in raw_batch {
            let score = raw / max_raw * 100.0;
            combinations.push(Combination::new(&rules, numbers, bonus, score, self.name())?);
        }
        Ok(combinations)
    }
}
