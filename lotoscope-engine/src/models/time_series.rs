use lotoscope_model::{Combination, DrawRecord, Pool, PredictionError, Result};
use rand::rngs::StdRng;

use crate::sampler::sample_without_replacement;
use crate::strategies::{EngineContext, Strategy, check_count, clamp_window};

/// Composantes d'une série d'indicatrices d'apparition, alignées sur
/// l'indice chronologique. Recalculées pour chaque taille de fenêtre.
#[derive(Debug, Clone)]
pub struct DecomposedSeries {
    pub trend: Vec<f64>,
    /// Une composante par position du cycle (longueur = fenêtre).
    pub seasonal: Vec<f64>,
    pub residual: Vec<f64>,
}

/// Décompose une série en tendance (moyenne mobile centrée sur `window`),
/// saisonnalité (écart moyen à la tendance par position de cycle) et résidu.
pub fn decompose(series: &[f64], window: usize) -> DecomposedSeries {
    let n = series.len();
    let half = window / 2;

    let trend: Vec<f64> = (0..n)
        .map(|t| {
            let lo = t.saturating_sub(half);
            let hi = (t + half + 1).min(n);
            series[lo..hi].iter().sum::<f64>() / (hi - lo) as f64
        })
        .collect();

    let mut seasonal_sum = vec![0.0f64; window];
    let mut seasonal_count = vec![0usize; window];
    for t in 0..n {
        seasonal_sum[t % window] += series[t] - trend[t];
        seasonal_count[t % window] += 1;
    }
    let seasonal: Vec<f64> = seasonal_sum
        .iter()
        .zip(seasonal_count.iter())
        .map(|(&s, &c)| if c > 0 { s / c as f64 } else { 0.0 })
        .collect();

    let residual: Vec<f64> = (0..n)
        .map(|t| series[t] - trend[t] - seasonal[t % window])
        .collect();

    DecomposedSeries {
        trend,
        seasonal,
        residual,
    }
}

impl DecomposedSeries {
    /// Propension prévue pour le pas suivant : fin de tendance plus la
    /// composante saisonnière à venir, plancher à zéro.
    pub fn forecast_next(&self, series_len: usize) -> f64 {
        let trend_end = self.trend.last().copied().unwrap_or(0.0);
        let next_seasonal = if self.seasonal.is_empty() {
            0.0
        } else {
            self.seasonal[series_len % self.seasonal.len()]
        };
        (trend_end + next_seasonal).max(0.0)
    }
}

/// Extrait la série d'indicatrices d'un numéro en ordre chronologique
/// (l'instantané est du plus récent au plus ancien, on inverse).
fn occurrence_series(draws: &[DrawRecord], pool: Pool, number: u8) -> Vec<f64> {
    draws
        .iter()
        .rev()
        .map(|d| {
            if d.numbers(pool).contains(&number) {
                1.0
            } else {
                0.0
            }
        })
        .collect()
}

/// Prévisionniste par décomposition de séries : pour chaque numéro, la
/// série de présence est décomposée sur une fenêtre glissante, et la grille
/// est échantillonnée proportionnellement à la propension prévue.
pub struct TimeSeriesStrategy {
    window_size: usize,
}

impl TimeSeriesStrategy {
    pub fn new(window_size: usize) -> Result<Self> {
        if !(5..=30).contains(&window_size) {
            return Err(PredictionError::InvalidParameter(format!(
                "window_size {} hors [5,30]",
                window_size
            )));
        }
        Ok(Self { window_size })
    }

    fn forecast_weights(&self, draws: &[DrawRecord], pool: Pool, size: usize, window: usize) -> Vec<f64> {
        (1..=size as u8)
            .map(|n| {
                let series = occurrence_series(draws, pool, n);
                let decomposed = decompose(&series, window);
                // petit plancher pour que les numéros éteints restent
                // atteignables
                decomposed.forecast_next(series.len()) + 0.01
            })
            .collect()
    }
}

impl Default for TimeSeriesStrategy {
    fn default() -> Self {
        Self { window_size: 10 }
    }
}

impl Strategy for TimeSeriesStrategy {
    fn name(&self) -> &str {
        "TimeSeries"
    }

    fn generate(
        &self,
        ctx: &EngineContext<'_>,
        count: usize,
        rng: &mut StdRng,
    ) -> Result<Vec<Combination>> {
        check_count(count)?;
        let window = clamp_window(self.window_size, ctx.draws.len())?;

        let rules = ctx.rules;
        let main_weights =
            self.forecast_weights(ctx.draws, Pool::Main, rules.size(Pool::Main), window);
        let bonus_weights =
            self.forecast_weights(ctx.draws, Pool::Bonus, rules.size(Pool::Bonus), window);
        let main_max = main_weights.iter().cloned().fold(0.0f64, f64::max).max(1e-9);

        let mut combinations = Vec::with_capacity(count);
        for _ in 0..count {
            let numbers = sample_without_replacement(&main_weights, rules.main_count, rng)?;
            let bonus = sample_without_replacement(&bonus_weights, rules.bonus_count, rng)?;

            // score = masse de prévision sélectionnée, rapportée au maximum
            let score = numbers
                .iter()
                .map(|&n| main_weights[(n - 1) as usize] / main_max)
                .sum::<f64>()
                / rules.main_count as f64
                * 100.0;

            combinations.push(Combination::new(&rules, numbers, bonus, score, self.name())?);
        }
        Ok(combinations)
    }
}
