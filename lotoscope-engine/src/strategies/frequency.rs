use lotoscope_model::{Combination, Pool, PredictionError, Result};
use rand::rngs::StdRng;

use super::{EngineContext, Strategy, check_count, max_weight, mean_weight};
use crate::sampler::sample_without_replacement;

/// Stratégie par fréquences : échantillonne chaque grille selon la
/// fréquence pondérée historique/récent.
pub struct FrequencyStrategy {
    recent_weight: f64,
}

impl FrequencyStrategy {
    pub fn new(recent_weight: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&recent_weight) {
            return Err(PredictionError::InvalidParameter(format!(
                "recent_weight {} hors [0,1]",
                recent_weight
            )));
        }
        Ok(Self { recent_weight })
    }
}

impl Default for FrequencyStrategy {
    fn default() -> Self {
        Self { recent_weight: 0.6 }
    }
}

impl Strategy for FrequencyStrategy {
    fn name(&self) -> &str {
        "Frequency"
    }

    fn generate(
        &self,
        ctx: &EngineContext<'_>,
        count: usize,
        rng: &mut StdRng,
    ) -> Result<Vec<Combination>> {
        check_count(count)?;

        let main_weights = ctx.stats.weighted_frequency(Pool::Main, self.recent_weight)?;
        let bonus_weights = ctx
            .stats
            .weighted_frequency(Pool::Bonus, self.recent_weight)?;
        let main_max = max_weight(&main_weights);
        let bonus_max = max_weight(&bonus_weights);

        let mut combinations = Vec::with_capacity(count);
        for _ in 0..count {
            let numbers = sample_without_replacement(&main_weights, ctx.rules.main_count, rng)?;
            let bonus = sample_without_replacement(&bonus_weights, ctx.rules.bonus_count, rng)?;

            // fréquence pondérée moyenne de la sélection, normalisée par le
            // maximum de la table
            let score = 100.0
                * 0.5
                * (mean_weight(&main_weights, &numbers) / main_max
                    + mean_weight(&bonus_weights, &bonus) / bonus_max);

            combinations.push(Combination::new(&ctx.rules, numbers, bonus, score, self.name())?);
        }
        Ok(combinations)
    }
}
