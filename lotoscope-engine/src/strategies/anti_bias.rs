use lotoscope_model::{Combination, Pool, Result};
use rand::rngs::StdRng;

use super::{EngineContext, Strategy, check_count};
use crate::sampler::sample_without_replacement;

// numéros boudés par superstition, donc moins joués par les humains
const UNPOPULAR_MAIN: [u8; 6] = [4, 13, 17, 39, 40, 44];
const UNPOPULAR_BONUS: [u8; 3] = [4, 7, 8];

/// Stratégie anti-biais cognitifs : évite ce que les joueurs humains
/// choisissent massivement (dates de naissance ≤ 31, suites, sommes rondes),
/// pour réduire le partage du gain le jour où la grille sort.
pub struct AntiBiasStrategy;

impl AntiBiasStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AntiBiasStrategy {
    fn default() -> Self {
        Self
    }
}

/// Score inverse-biais d'une grille : plus elle ressemble à ce qu'un humain
/// ne jouerait pas, plus il est haut. Borné par construction à [0, 100].
fn inverse_bias_score(numbers: &[u8], half_domain: u8) -> f64 {
    let sum: u32 = numbers.iter().map(|&n| n as u32).sum();

    // les joueurs aiment les sommes rondes
    let mut sum_score = 0.5;
    if sum % 10 != 0 {
        sum_score += 0.15;
    }
    if sum % 5 != 0 {
        sum_score += 0.1;
    }

    // et les suites consécutives
    let mut sorted = numbers.to_vec();
    sorted.sort_unstable();
    let has_consecutive = sorted.windows(2).any(|w| w[1] - w[0] == 1);
    let mut pattern_score = 0.2;
    if !has_consecutive {
        pattern_score += 0.15;
    }

    // et le regroupement dans une moitié du tableau
    let low_half = numbers.iter().filter(|&&n| n <= half_domain).count();
    let mut distribution_score = 0.0;
    if low_half == 2 || low_half == 3 {
        distribution_score += 0.2;
    }

    (sum_score + pattern_score + distribution_score) / 1.3 * 100.0
}

impl Strategy for AntiBiasStrategy {
    fn name(&self) -> &str {
        "AntiBias"
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

        // sous-pondérer les dates de naissance revient à doper le reste
        let weights: Vec<f64> = (1..=rules.main_domain)
            .map(|n| {
                let mut w = freq.count(n) as f64 + 1.0;
                if n > 31 {
                    w *= 1.3;
                }
                if UNPOPULAR_MAIN.contains(&n) {
                    w *= 1.2;
                }
                w
            })
            .collect();

        let bonus_weights: Vec<f64> = (1..=rules.bonus_domain)
            .map(|b| {
                let mut w = ctx.stats.frequency(Pool::Bonus).count(b) as f64 + 1.0;
                if UNPOPULAR_BONUS.contains(&b) {
                    w *= 1.2;
                }
                w
            })
            .collect();

        let half_domain = rules.main_domain / 2;
        let mut combinations = Vec::with_capacity(count);
        for _ in 0..count {
            let numbers = sample_without_replacement(&weights, rules.main_count, rng)?;
            let bonus = sample_without_replacement(&bonus_weights, rules.bonus_count, rng)?;
            let score = inverse_bias_score(&numbers, half_domain);
            combinations.push(Combination::new(&rules, numbers, bonus, score, self.name())?);
        }
        Ok(combinations)
    }
}
