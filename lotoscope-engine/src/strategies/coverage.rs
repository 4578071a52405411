use std::collections::HashSet;

use lotoscope_model::{Combination, Pool, Result};
use rand::rngs::StdRng;

use super::{EngineContext, Strategy, check_count, max_weight, mean_weight};
use crate::sampler::sample_without_replacement;

/// Stratégie de couverture : chaque grille du lot privilégie les numéros pas
/// encore couverts par les précédentes, pour étaler le lot sur le domaine.
pub struct CoverageStrategy {
    balanced: bool,
}

impl CoverageStrategy {
    pub fn new(balanced: bool) -> Self {
        Self { balanced }
    }
}

impl Default for CoverageStrategy {
    fn default() -> Self {
        Self { balanced: true }
    }
}

impl Strategy for CoverageStrategy {
    fn name(&self) -> &str {
        "Coverage"
    }

    fn generate(
        &self,
        ctx: &EngineContext<'_>,
        count: usize,
        rng: &mut StdRng,
    ) -> Result<Vec<Combination>> {
        check_count(count)?;

        let rules = ctx.rules;
        let base_weights: Vec<f64> = ctx
            .stats
            .frequency(Pool::Main)
            .as_weights()
            .iter()
            .map(|&w| w + 1.0)
            .collect();
        let base_bonus: Vec<f64> = ctx
            .stats
            .frequency(Pool::Bonus)
            .as_weights()
            .iter()
            .map(|&w| w + 1.0)
            .collect();
        let max = max_weight(&base_weights);

        let mut covered: HashSet<u8> = HashSet::new();
        let mut covered_bonus: HashSet<u8> = HashSet::new();
        let mut covered_pairs: HashSet<(u8, u8)> = HashSet::new();

        let mut combinations = Vec::with_capacity(count);
        for i in 0..count {
            let (weights, bonus_weights) = if i == 0 || !self.balanced {
                (base_weights.clone(), base_bonus.clone())
            } else {
                // déjà couvert ×0.3, pas encore couvert ×3.0
                let adjust = |weights: &[f64], covered: &HashSet<u8>| {
                    weights
                        .iter()
                        .enumerate()
                        .map(|(idx, &w)| {
                            if covered.contains(&((idx + 1) as u8)) {
                                w * 0.3
                            } else {
                                w * 3.0
                            }
                        })
                        .collect::<Vec<f64>>()
                };
                (
                    adjust(&base_weights, &covered),
                    adjust(&base_bonus, &covered_bonus),
                )
            };

            let numbers = sample_without_replacement(&weights, rules.main_count, rng)?;
            let bonus = sample_without_replacement(&bonus_weights, rules.bonus_count, rng)?;

            // couverture nouvellement apportée : numéros et paires
            let mut sorted = numbers.clone();
            sorted.sort_unstable();
            let mut newly = numbers.iter().filter(|n| !covered.contains(n)).count();
            for a in 0..sorted.len() {
                for b in (a + 1)..sorted.len() {
                    if covered_pairs.insert((sorted[a], sorted[b])) {
                        newly += 1;
                    }
                }
            }

            covered.extend(numbers.iter().copied());
            covered_bonus.extend(bonus.iter().copied());

            // apport de cette grille : numéros et paires jamais vus, sur le
            // maximum possible (5 numéros + 10 paires)
            let pair_max = rules.main_count * (rules.main_count - 1) / 2;
            let newly_ratio = newly as f64 / (rules.main_count + pair_max) as f64;
            let batch_ratio = 0.5
                * (covered.len() as f64 / rules.size(Pool::Main) as f64
                    + covered_bonus.len() as f64 / rules.size(Pool::Bonus) as f64);
            let coverage_score = 0.5 * (newly_ratio + batch_ratio);
            let freq_score = mean_weight(&base_weights, &numbers) / max;

            // la couverture pèse de plus en plus lourd au fil du lot
            let coverage_weight = if self.balanced {
                (0.2 + i as f64 * 0.15).min(0.8)
            } else {
                0.2
            };
            let score =
                (coverage_weight * coverage_score + (1.0 - coverage_weight) * freq_score) * 100.0;

            combinations.push(Combination::new(&rules, numbers, bonus, score, self.name())?);
        }
        Ok(combinations)
    }
}
