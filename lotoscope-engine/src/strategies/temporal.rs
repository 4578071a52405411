use lotoscope_model::{Combination, Pool, PredictionError, Result};
use rand::rngs::StdRng;

use super::{EngineContext, Strategy, check_count, clamp_window};
use crate::sampler::sample_without_replacement;
use crate::stats::FrequencyTable;

/// Stratégie temporelle : fréquences restreintes aux `lookback_period`
/// derniers tirages, avec surpondération des numéros en retard d'après
/// l'analyse des écarts.
pub struct TemporalStrategy {
    lookback_period: usize,
}

impl TemporalStrategy {
    pub fn new(lookback_period: usize) -> Result<Self> {
        if !(10..=100).contains(&lookback_period) {
            return Err(PredictionError::InvalidParameter(format!(
                "lookback_period {} hors [10,100]",
                lookback_period
            )));
        }
        Ok(Self { lookback_period })
    }
}

impl Default for TemporalStrategy {
    fn default() -> Self {
        Self { lookback_period: 30 }
    }
}

impl Strategy for TemporalStrategy {
    fn name(&self) -> &str {
        "Temporal"
    }

    fn generate(
        &self,
        ctx: &EngineContext<'_>,
        count: usize,
        rng: &mut StdRng,
    ) -> Result<Vec<Combination>> {
        check_count(count)?;
        let lookback = clamp_window(self.lookback_period, ctx.draws.len())?;
        let window = &ctx.draws[..lookback];

        let rules = ctx.rules;
        let main_size = rules.size(Pool::Main);
        let recent_freq = FrequencyTable::from_draws(window, main_size, Pool::Main);
        let bonus_freq =
            FrequencyTable::from_draws(window, rules.size(Pool::Bonus), Pool::Bonus);

        // poids = fréquence récente lissée, dopée pour les numéros en retard
        let mut weights = vec![0.0f64; main_size];
        let mut overdue = vec![false; main_size];
        for (idx, w) in weights.iter_mut().enumerate() {
            let n = (idx + 1) as u8;
            *w = recent_freq.count(n) as f64 + 1.0;
            let gap = ctx.stats.gap_analysis(Pool::Main, n)?;
            if gap.overdue {
                let boost = (gap.draws_since_last as f64 / gap.mean_gap.max(1.0)).min(2.0);
                *w *= 1.0 + boost;
                overdue[idx] = true;
            }
        }

        let bonus_weights: Vec<f64> = bonus_freq
            .as_weights()
            .iter()
            .map(|&w| w + 1.0)
            .collect();

        let mut combinations = Vec::with_capacity(count);
        for _ in 0..count {
            let numbers = sample_without_replacement(&weights, rules.main_count, rng)?;
            let bonus = sample_without_replacement(&bonus_weights, rules.bonus_count, rng)?;

            // force du motif : part de numéros en retard dans la sélection ;
            // récence : masse de la sélection dans la fenêtre
            let pattern_strength = numbers
                .iter()
                .filter(|&&n| overdue[(n - 1) as usize])
                .count() as f64
                / rules.main_count as f64;
            let recency = numbers
                .iter()
                .map(|&n| recent_freq.count(n) as f64)
                .sum::<f64>()
                / (lookback * rules.main_count) as f64;
            let score = (0.7 * pattern_strength + 0.3 * recency) * 100.0;

            combinations.push(Combination::new(&rules, numbers, bonus, score, self.name())?);
        }
        Ok(combinations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::make_test_draws;
    use crate::stats::DistributionStats;
    use lotoscope_model::GameRules;
    use rand::SeedableRng;

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(TemporalStrategy::new(9).is_err());
        assert!(TemporalStrategy::new(101).is_err());
        assert!(TemporalStrategy::new(30).is_ok());
    }

    #[test]
    fn test_insufficient_history_surfaced() {
        let rules = GameRules::euromillions();
        let draws = make_test_draws(20, &rules);
        let stats = DistributionStats::build(&draws, rules).unwrap();
        let ctx = EngineContext::new(&draws, rules, &stats);

        // 20 tirages pour une fenêtre de 100 : dégradation > 50 %
        let strategy = TemporalStrategy::new(100).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let err = strategy.generate(&ctx, 3, &mut rng).unwrap_err();
        assert!(matches!(err, PredictionError::InsufficientData(_)));
    }

    #[test]
    fn test_degraded_window_tolerated() {
        let rules = GameRules::euromillions();
        let draws = make_test_draws(20, &rules);
        let stats = DistributionStats::build(&draws, rules).unwrap();
        let ctx = EngineContext::new(&draws, rules, &stats);

        // 20 tirages pour une fenêtre de 30 : dégradation tolérée
        let strategy = TemporalStrategy::new(30).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(strategy.generate(&ctx, 3, &mut rng).unwrap().len(), 3);
    }

    #[test]
    fn test_scores_within_bounds() {
        let rules = GameRules::french_loto();
        let draws = make_test_draws(45, &rules);
        let stats = DistributionStats::build(&draws, rules).unwrap();
        let ctx = EngineContext::new(&draws, rules, &stats);
        let strategy = TemporalStrategy::default();
        let mut rng = StdRng::seed_from_u64(8);
        for combo in strategy.generate(&ctx, 10, &mut rng).unwrap() {
            assert!((0.0..=100.0).contains(&combo.score));
        }
    }
}
