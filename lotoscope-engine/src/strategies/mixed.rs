use lotoscope_model::{Combination, Pool, PredictionError, Result};
use rand::rngs::StdRng;

use super::{EngineContext, Strategy, check_count, max_weight, mean_weight, std_dev};
use crate::sampler::sample_weighted;

/// Mélange de valeurs sûres et d'outsiders : `hot_ratio` pilote la part de
/// numéros tirés de la moitié haute des fréquences, le reste vient de la
/// moitié basse.
pub struct MixedStrategy {
    hot_ratio: f64,
}

impl MixedStrategy {
    pub fn new(hot_ratio: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&hot_ratio) {
            return Err(PredictionError::InvalidParameter(format!(
                "hot_ratio {} hors [0,1]",
                hot_ratio
            )));
        }
        Ok(Self { hot_ratio })
    }
}

impl Default for MixedStrategy {
    fn default() -> Self {
        Self { hot_ratio: 0.7 }
    }
}

impl Strategy for MixedStrategy {
    fn name(&self) -> &str {
        "Mixed"
    }

    fn generate(
        &self,
        ctx: &EngineContext<'_>,
        count: usize,
        rng: &mut StdRng,
    ) -> Result<Vec<Combination>> {
        check_count(count)?;

        let rules = ctx.rules;
        let freq = ctx.stats.frequency(Pool::Main);
        let weights = freq.as_weights();
        let max = max_weight(&weights);

        // moitié haute par fréquence, moitié basse = son complément, pour
        // que les deux urnes restent disjointes même à fréquences égales
        let half = rules.size(Pool::Main) / 2;
        let hot_pool = ctx.stats.hot(Pool::Main, half);

        let hot_entries: Vec<(u8, f64)> = hot_pool
            .iter()
            .map(|&n| (n, freq.count(n) as f64 + 1.0))
            .collect();
        let cold_entries: Vec<(u8, f64)> = (1..=rules.main_domain)
            .filter(|n| !hot_pool.contains(n))
            .map(|n| (n, freq.count(n) as f64 + 1.0))
            .collect();

        let bonus_entries: Vec<(u8, f64)> = ctx
            .stats
            .frequency(Pool::Bonus)
            .iter()
            .map(|(n, c)| (n, c as f64 + 1.0))
            .collect();

        let num_hot = ((self.hot_ratio * rules.main_count as f64).round() as usize)
            .min(rules.main_count)
            .min(hot_entries.len());
        let num_cold = rules.main_count - num_hot;

        let mut combinations = Vec::with_capacity(count);
        for _ in 0..count {
            let mut numbers = sample_weighted(&hot_entries, num_hot, rng)?;
            numbers.extend(sample_weighted(&cold_entries, num_cold.min(cold_entries.len()), rng)?);

            // complément depuis la moitié haute si la moitié basse est trop
            // petite pour le quota
            while numbers.len() < rules.main_count {
                let leftover: Vec<(u8, f64)> = hot_entries
                    .iter()
                    .chain(cold_entries.iter())
                    .filter(|(n, _)| !numbers.contains(n))
                    .copied()
                    .collect();
                numbers.extend(sample_weighted(&leftover, 1, rng)?);
            }

            let bonus = sample_weighted(&bonus_entries, rules.bonus_count, rng)?;

            // score : fréquence moyenne plus un bonus de dispersion
            let base = mean_weight(&weights, &numbers) / max;
            let diversity_bonus = (std_dev(&numbers) / 15.0).min(0.05);
            let score = (base + diversity_bonus) * 100.0;

            combinations.push(Combination::new(&rules, numbers, bonus, score, self.name())?);
        }
        Ok(combinations)
    }
}
