use lotoscope_model::{Combination, Pool, PredictionError, Result};
use rand::Rng;
use rand::rngs::StdRng;

use super::{EngineContext, Strategy, check_count, max_weight, std_dev};
use crate::sampler::sample_without_replacement;

/// Niveau de risque accepté aux deux échelles historiques : entier 1-10 ou
/// fraction 0.0-1.0. Normalisé une seule fois à la frontière, le cœur ne
/// voit que le facteur interne.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RiskLevel {
    Scale(u8),
    Fraction(f64),
}

impl RiskLevel {
    pub fn normalize(self) -> Result<f64> {
        match self {
            RiskLevel::Scale(n) if (1..=10).contains(&n) => Ok(n as f64 / 10.0),
            RiskLevel::Scale(n) => Err(PredictionError::InvalidParameter(format!(
                "risk_level {} hors [1,10]",
                n
            ))),
            RiskLevel::Fraction(f) if (0.0..=1.0).contains(&f) => Ok(f),
            RiskLevel::Fraction(f) => Err(PredictionError::InvalidParameter(format!(
                "risk_level {} hors [0,1]",
                f
            ))),
        }
    }
}

/// Stratégie risque/récompense : à faible risque elle colle aux fréquences,
/// à risque élevé elle inverse la pondération et fuit les sommes banales.
pub struct RiskRewardStrategy {
    risk_factor: f64,
}

impl RiskRewardStrategy {
    pub fn new(level: RiskLevel) -> Result<Self> {
        Ok(Self {
            risk_factor: level.normalize()?,
        })
    }
}

impl Default for RiskRewardStrategy {
    fn default() -> Self {
        Self { risk_factor: 0.5 }
    }
}

impl RiskRewardStrategy {
    /// Pondération selon le profil : inversée au-dessus de 0.5, bruitée en
    /// dessous.
    fn profile_weights(&self, relative: &[f64], rng: &mut StdRng) -> Vec<f64> {
        if self.risk_factor > 0.5 {
            relative
                .iter()
                .map(|&r| (1.0 - r * self.risk_factor).max(0.05))
                .collect()
        } else {
            let randomness = (self.risk_factor * 2.0).min(1.0);
            relative
                .iter()
                .map(|&r| r * (1.0 - randomness) + randomness * rng.random::<f64>())
                .collect()
        }
    }
}

impl Strategy for RiskRewardStrategy {
    fn name(&self) -> &str {
        "RiskReward"
    }

    fn generate(
        &self,
        ctx: &EngineContext<'_>,
        count: usize,
        rng: &mut StdRng,
    ) -> Result<Vec<Combination>> {
        check_count(count)?;

        let rules = ctx.rules;
        let main_raw = ctx.stats.frequency(Pool::Main).as_weights();
        let bonus_raw = ctx.stats.frequency(Pool::Bonus).as_weights();
        let main_max = max_weight(&main_raw);
        let bonus_max = max_weight(&bonus_raw);
        let main_rel: Vec<f64> = main_raw.iter().map(|&w| w / main_max).collect();
        let bonus_rel: Vec<f64> = bonus_raw.iter().map(|&w| w / bonus_max).collect();

        let sum_dist = ctx.stats.sum_distribution();
        // les trois bandes de sommes les plus banales
        let mut by_count: Vec<usize> = (0..sum_dist.buckets.len()).collect();
        by_count.sort_by(|&a, &b| sum_dist.buckets[b].count.cmp(&sum_dist.buckets[a].count));
        let common_buckets: Vec<usize> = by_count.into_iter().take(3).collect();
        let in_common = |sum: u32| {
            common_buckets.iter().any(|&i| {
                let b = &sum_dist.buckets[i];
                b.count > 0 && b.lo <= sum && sum <= b.hi
            })
        };

        let mut combinations = Vec::with_capacity(count);
        for _ in 0..count {
            let weights = self.profile_weights(&main_rel, rng);
            let mut numbers = sample_without_replacement(&weights, rules.main_count, rng)?;

            let bonus_weights = self.profile_weights(&bonus_rel, rng);
            let bonus = sample_without_replacement(&bonus_weights, rules.bonus_count, rng)?;

            // à risque élevé, fuir les sommes banales en remplaçant un numéro
            let mut sum: u32 = numbers.iter().map(|&n| n as u32).sum();
            if self.risk_factor > 0.5 && in_common(sum) && rng.random::<f64>() < self.risk_factor {
                for _ in 0..20 {
                    let replacement = rng.random_range(1..=rules.main_domain);
                    if numbers.contains(&replacement) {
                        continue;
                    }
                    let slot = rng.random_range(0..numbers.len());
                    let candidate_sum = sum - numbers[slot] as u32 + replacement as u32;
                    if !in_common(candidate_sum) {
                        numbers[slot] = replacement;
                        sum = candidate_sum;
                        break;
                    }
                }
            }

            let score = if self.risk_factor <= 0.5 {
                // profil prudent : la fréquence fait le score
                let avg = 0.5
                    * (numbers.iter().map(|&n| main_rel[(n - 1) as usize]).sum::<f64>()
                        / rules.main_count as f64
                        + bonus.iter().map(|&b| bonus_rel[(b - 1) as usize]).sum::<f64>()
                            / rules.bonus_count as f64);
                avg * 100.0
            } else {
                // profil joueur : rareté, somme atypique, espacement irrégulier
                let uniqueness = 1.0
                    - numbers.iter().map(|&n| main_rel[(n - 1) as usize]).sum::<f64>()
                        / rules.main_count as f64;
                let sum_commonality = sum_dist.commonality(sum);
                let mut sorted = numbers.clone();
                sorted.sort_unstable();
                let gaps: Vec<u8> = sorted.windows(2).map(|w| w[1] - w[0]).collect();
                let gap_variability = (std_dev(&gaps) / 10.0).min(1.0);
                (0.4 * uniqueness + 0.4 * (1.0 - sum_commonality) + 0.2 * gap_variability) * 100.0
            };

            combinations.push(Combination::new(&rules, numbers, bonus, score, self.name())?);
        }
        Ok(combinations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::DistributionStats;
    use chrono::NaiveDate;
    use lotoscope_model::{DrawRecord, GameRules};
    use rand::SeedableRng;

    #[test]
    fn test_risk_level_normalization() {
        assert_eq!(RiskLevel::Scale(1).normalize().unwrap(), 0.1);
        assert_eq!(RiskLevel::Scale(10).normalize().unwrap(), 1.0);
        assert_eq!(RiskLevel::Fraction(0.35).normalize().unwrap(), 0.35);
        assert!(RiskLevel::Scale(0).normalize().is_err());
        assert!(RiskLevel::Scale(11).normalize().is_err());
        assert!(RiskLevel::Fraction(1.5).normalize().is_err());
        assert!(RiskLevel::Fraction(-0.1).normalize().is_err());
    }

    /// Historique très asymétrique : les numéros 1-10 sortent sans arrêt.
    fn skewed_history() -> Vec<DrawRecord> {
        (0..30)
            .map(|i| DrawRecord {
                date: NaiveDate::from_ymd_opt(2024, 1, (i % 28) + 1).unwrap(),
                main: if i % 2 == 0 {
                    [1, 2, 3, 4, 5]
                } else {
                    [6, 7, 8, 9, 10]
                },
                bonus: vec![(i % 10) as u8 + 1],
            })
            .collect()
    }

    fn mean_uniqueness(level: RiskLevel, samples: usize) -> f64 {
        let rules = GameRules::french_loto();
        let draws = skewed_history();
        let stats = DistributionStats::build(&draws, rules).unwrap();
        let ctx = EngineContext::new(&draws, rules, &stats);
        let strategy = RiskRewardStrategy::new(level).unwrap();
        let mut rng = StdRng::seed_from_u64(4242);
        let combos = strategy.generate(&ctx, samples, &mut rng).unwrap();

        let freq = stats.frequency(Pool::Main);
        let max = freq.iter().map(|(_, c)| c).max().unwrap() as f64;
        let mut total = 0.0;
        let mut n = 0usize;
        for combo in combos {
            for &v in &combo.numbers {
                total += 1.0 - freq.count(v) as f64 / max;
                n += 1;
            }
        }
        total / n as f64
    }

    #[test]
    fn test_uniqueness_rises_with_risk_level() {
        let low = mean_uniqueness(RiskLevel::Scale(1), 40);
        let mid = mean_uniqueness(RiskLevel::Scale(5), 40);
        let high = mean_uniqueness(RiskLevel::Scale(10), 40);
        assert!(
            low + 0.1 < mid,
            "uniqueness devrait croître : low={low:.3} mid={mid:.3}"
        );
        assert!(
            mid + 0.05 < high,
            "uniqueness devrait croître : mid={mid:.3} high={high:.3}"
        );
    }

    #[test]
    fn test_high_risk_avoids_common_sums() {
        let rules = GameRules::french_loto();
        let draws = skewed_history();
        let stats = DistributionStats::build(&draws, rules).unwrap();
        let ctx = EngineContext::new(&draws, rules, &stats);

        let strategy = RiskRewardStrategy::new(RiskLevel::Scale(10)).unwrap();
        let mut rng = StdRng::seed_from_u64(77);
        let combos = strategy.generate(&ctx, 10, &mut rng).unwrap();
        assert_eq!(combos.len(), 10);
        for combo in combos {
            assert!((0.0..=100.0).contains(&combo.score));
        }
    }
}
