use lotoscope_model::{Combination, Pool, PredictionError, Result};
use rand::rngs::StdRng;

use super::{EngineContext, Strategy, check_count};
use crate::sampler::sample_weighted;

/// Axe de stratification du domaine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrataType {
    /// Plages de valeurs (dizaines).
    Range,
    /// Motif pair/impair.
    Pattern,
    /// Bande de somme cible.
    Sum,
}

/// Échantillonnage stratifié : répartit les tirages entre strates du domaine,
/// `balance_factor` dosant l'équilibre (1.0 = strates égales, 0.0 = calqué
/// sur la distribution historique).
pub struct StratifiedStrategy {
    strata: StrataType,
    balance_factor: f64,
}

impl StratifiedStrategy {
    pub fn new(strata: StrataType, balance_factor: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&balance_factor) {
            return Err(PredictionError::InvalidParameter(format!(
                "balance_factor {} hors [0,1]",
                balance_factor
            )));
        }
        Ok(Self { strata, balance_factor })
    }
}

impl Default for StratifiedStrategy {
    fn default() -> Self {
        Self {
            strata: StrataType::Range,
            balance_factor: 0.7,
        }
    }
}

/// Convertit des effectifs attendus fractionnaires en effectifs entiers de
/// somme `total`, les restes les plus forts servis d'abord.
fn distribute_selections(expected: &[f64], total: usize) -> Vec<usize> {
    let mut counts: Vec<usize> = expected.iter().map(|&e| e.max(0.0) as usize).collect();
    let assigned: usize = counts.iter().sum();
    let mut remaining = total.saturating_sub(assigned);

    let mut order: Vec<usize> = (0..expected.len()).collect();
    order.sort_by(|&a, &b| {
        let fa = expected[a] - expected[a].floor();
        let fb = expected[b] - expected[b].floor();
        fb.partial_cmp(&fa).unwrap_or(std::cmp::Ordering::Equal)
    });
    for &idx in order.iter().cycle().take(expected.len().max(1) * 8) {
        if remaining == 0 {
            break;
        }
        counts[idx] += 1;
        remaining -= 1;
    }
    counts
}

impl StratifiedStrategy {
    fn generate_range(
        &self,
        ctx: &EngineContext<'_>,
        rng: &mut StdRng,
    ) -> Result<(Vec<u8>, f64)> {
        let rules = ctx.rules;
        let freq = ctx.stats.frequency(Pool::Main);
        let buckets = ctx.stats.range_distribution(5)?;
        let total: u32 = buckets.iter().map(|b| b.count).sum();

        let n = buckets.len() as f64;
        let ideal = rules.main_count as f64 / n;
        let targets: Vec<f64> = buckets
            .iter()
            .map(|b| {
                let hist = if total > 0 {
                    b.count as f64 / total as f64 * rules.main_count as f64
                } else {
                    ideal
                };
                ideal * self.balance_factor + hist * (1.0 - self.balance_factor)
            })
            .collect();
        let per_bucket = distribute_selections(&targets, rules.main_count);

        let mut numbers = Vec::with_capacity(rules.main_count);
        for (bucket, &take) in buckets.iter().zip(per_bucket.iter()) {
            if take == 0 {
                continue;
            }
            let entries: Vec<(u8, f64)> = (bucket.lo..=bucket.hi)
                .map(|v| (v, freq.count(v) as f64 + 1.0))
                .collect();
            numbers.extend(sample_weighted(&entries, take.min(entries.len()), rng)?);
        }

        // dispersion effective contre cible : distance L1 ramenée en similarité
        let mut selected_share = vec![0.0f64; buckets.len()];
        for &v in &numbers {
            if let Some(idx) = buckets.iter().position(|b| b.lo <= v && v <= b.hi) {
                selected_share[idx] += 1.0 / rules.main_count as f64;
            }
        }
        let l1: f64 = selected_share
            .iter()
            .zip(targets.iter())
            .map(|(s, t)| (s - t / rules.main_count as f64).abs())
            .sum();
        let score = (1.0 - l1 / 2.0).max(0.0) * 100.0;

        Ok((numbers, score))
    }

    fn generate_pattern(
        &self,
        ctx: &EngineContext<'_>,
        rng: &mut StdRng,
    ) -> Result<(Vec<u8>, f64)> {
        let rules = ctx.rules;
        let freq = ctx.stats.frequency(Pool::Main);
        let eo = ctx.stats.even_odd_distribution();

        // nombre de pairs le plus fréquent par tirage
        let modal_even = eo
            .histogram
            .iter()
            .enumerate()
            .max_by_key(|&(_, &c)| c)
            .map(|(i, _)| i)
            .unwrap_or(2);

        let domain = rules.main_domain;
        let evens: Vec<u8> = (1..=domain).filter(|n| n % 2 == 0).collect();
        let odds: Vec<u8> = (1..=domain).filter(|n| n % 2 == 1).collect();

        let historical_ratio = modal_even as f64 / rules.main_count as f64;
        let population_ratio = evens.len() as f64 / domain as f64;
        let target_ratio =
            historical_ratio * self.balance_factor + population_ratio * (1.0 - self.balance_factor);

        let even_take = ((rules.main_count as f64 * target_ratio).round() as usize)
            .min(rules.main_count)
            .min(evens.len());
        let odd_take = (rules.main_count - even_take).min(odds.len());

        let even_entries: Vec<(u8, f64)> =
            evens.iter().map(|&n| (n, freq.count(n) as f64 + 1.0)).collect();
        let odd_entries: Vec<(u8, f64)> =
            odds.iter().map(|&n| (n, freq.count(n) as f64 + 1.0)).collect();

        let mut numbers = sample_weighted(&even_entries, even_take, rng)?;
        numbers.extend(sample_weighted(&odd_entries, odd_take, rng)?);

        let even_count = numbers.iter().filter(|&&n| n % 2 == 0).count();
        let similarity =
            1.0 - (even_count as f64 - modal_even as f64).abs() / rules.main_count as f64;
        let score = similarity.max(0.0) * 100.0;

        Ok((numbers, score))
    }

    fn generate_sum(&self, ctx: &EngineContext<'_>, rng: &mut StdRng) -> Result<(Vec<u8>, f64)> {
        let rules = ctx.rules;
        let freq = ctx.stats.frequency(Pool::Main);
        let dist = ctx.stats.sum_distribution();
        let total: u32 = dist.buckets.iter().map(|b| b.count).sum();

        // bande de somme cible : historique dosé par balance_factor
        let bucket_entries: Vec<(u8, f64)> = dist
            .buckets
            .iter()
            .enumerate()
            .map(|(i, b)| {
                let hist = if total > 0 {
                    b.count as f64 / total as f64
                } else {
                    0.0
                };
                let uniform = 1.0 / dist.buckets.len() as f64;
                (
                    i as u8,
                    self.balance_factor * hist + (1.0 - self.balance_factor) * uniform,
                )
            })
            .collect();
        let target_idx = sample_weighted(&bucket_entries, 1, rng)?[0] as usize;
        let target = &dist.buckets[target_idx];
        let center = (target.lo + target.hi) as f64 / 2.0;

        let entries: Vec<(u8, f64)> = (1..=rules.main_domain)
            .map(|n| (n, freq.count(n) as f64 + 1.0))
            .collect();

        // tirages répétés jusqu'à tomber dans la bande, 20 essais au plus,
        // sinon on garde le plus proche du centre
        let mut best: Option<(Vec<u8>, f64)> = None;
        for _ in 0..20 {
            let candidate = sample_weighted(&entries, rules.main_count, rng)?;
            let sum: u32 = candidate.iter().map(|&n| n as u32).sum();
            let distance = (sum as f64 - center).abs();
            if target.lo <= sum && sum <= target.hi {
                best = Some((candidate, distance));
                break;
            }
            if best.as_ref().is_none_or(|(_, d)| distance < *d) {
                best = Some((candidate, distance));
            }
        }
        let (numbers, distance) =
            best.ok_or_else(|| PredictionError::InsufficientData("aucun candidat".into()))?;

        let (lo_possible, hi_possible) = ctx.stats.possible_sum_range();
        let span = (hi_possible - lo_possible) as f64;
        let score = (1.0 - distance / span.max(1.0)).max(0.0) * 100.0;

        Ok((numbers, score))
    }
}

impl Strategy for StratifiedStrategy {
    fn name(&self) -> &str {
        "Stratified"
    }

    fn generate(
        &self,
        ctx: &EngineContext<'_>,
        count: usize,
        rng: &mut StdRng,
    ) -> Result<Vec<Combination>> {
        check_count(count)?;

        let bonus_entries: Vec<(u8, f64)> = ctx
            .stats
            .frequency(Pool::Bonus)
            .iter()
            .map(|(n, c)| (n, c as f64 + 1.0))
            .collect();

        let mut combinations = Vec::with_capacity(count);
        for _ in 0..count {
            let (numbers, score) = match self.strata {
                StrataType::Range => self.generate_range(ctx, rng)?,
                StrataType::Pattern => self.generate_pattern(ctx, rng)?,
                StrataType::Sum => self.generate_sum(ctx, rng)?,
            };
            let bonus = sample_weighted(&bonus_entries, ctx.rules.bonus_count, rng)?;
            combinations.push(Combination::new(&ctx.rules, numbers, bonus, score, self.name())?);
        }
        Ok(combinations)
    }
}
