use lotoscope_model::{Combination, DrawRecord, GameRules, Pool, PredictionError, Result};
use rand::rngs::StdRng;

use crate::sampler::sample_without_replacement;
use crate::strategies::{EngineContext, Strategy, check_count, clamp_window};

/// Forme de la distribution a priori.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorType {
    /// Équiprobable sur tout le domaine.
    Uniform,
    /// Fréquences historiques lissées (Laplace).
    Frequency,
}

/// Méthode de mise à jour du posterior sur la fenêtre récente.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMethod {
    /// Une seule mise à jour en bloc, vraisemblance binomiale.
    Full,
    /// Mise à jour séquentielle, tirage par tirage.
    Incremental,
}

/// Échantillonneur bayésien : prior sur l'historique profond, posterior
/// recalculé à chaque appel sur la fenêtre récente bornée. Le mélange reste
/// celui, heuristique, de l'implémentation d'origine : c'est lui qui porte
/// la sémantique des scores.
pub struct BayesianStrategy {
    recent_draws_count: usize,
    prior_type: PriorType,
    update_method: UpdateMethod,
    smoothing_factor: f64,
}

impl BayesianStrategy {
    pub fn new(
        recent_draws_count: usize,
        prior_type: PriorType,
        update_method: UpdateMethod,
    ) -> Result<Self> {
        if !(5..=50).contains(&recent_draws_count) {
            return Err(PredictionError::InvalidParameter(format!(
                "recent_draws_count {} hors [5,50]",
                recent_draws_count
            )));
        }
        Ok(Self {
            recent_draws_count,
            prior_type,
            update_method,
            smoothing_factor: 0.1,
        })
    }
}

impl Default for BayesianStrategy {
    fn default() -> Self {
        Self {
            recent_draws_count: 20,
            prior_type: PriorType::Frequency,
            update_method: UpdateMethod::Full,
            smoothing_factor: 0.1,
        }
    }
}

fn log_factorial(n: u64) -> f64 {
    if n <= 1 {
        return 0.0;
    }
    if n <= 20 {
        return (2..=n).map(|i| (i as f64).ln()).sum();
    }
    // Stirling pour les grands n
    let x = n as f64;
    x * x.ln() - x + 0.5 * (2.0 * std::f64::consts::PI * x).ln()
}

/// PMF binomiale, calculée en log pour la stabilité numérique.
fn binomial_pmf(k: u64, n: u64, p: f64) -> f64 {
    if p <= 0.0 {
        return if k == 0 { 1.0 } else { 0.0 };
    }
    if p >= 1.0 {
        return if k == n { 1.0 } else { 0.0 };
    }
    let log_coef = log_factorial(n) - log_factorial(k) - log_factorial(n - k);
    let log_prob = k as f64 * p.ln() + (n - k) as f64 * (1.0 - p).ln();
    (log_coef + log_prob).exp()
}

/// Posterior ∝ prior × vraisemblance ; une évidence nulle retombe sur le
/// prior plutôt que de produire des NaN.
fn normalize_posteriors(priors: &[f64], likelihoods: &[f64]) -> Vec<f64> {
    let evidence: f64 = priors
        .iter()
        .zip(likelihoods.iter())
        .map(|(p, l)| p * l)
        .sum();
    if evidence > 0.0 {
        priors
            .iter()
            .zip(likelihoods.iter())
            .map(|(p, l)| p * l / evidence)
            .collect()
    } else {
        priors.to_vec()
    }
}

impl BayesianStrategy {
    fn priors(&self, prior_data: &[DrawRecord], rules: &GameRules, pool: Pool) -> Vec<f64> {
        let size = rules.size(pool);
        match self.prior_type {
            PriorType::Uniform => vec![1.0 / size as f64; size],
            PriorType::Frequency => {
                let mut counts = vec![0u32; size];
                for draw in prior_data {
                    for &n in draw.numbers(pool) {
                        let idx = (n as usize).wrapping_sub(1);
                        if idx < size {
                            counts[idx] += 1;
                        }
                    }
                }
                let denom = prior_data.len() as f64 * rules.pick_count(pool) as f64
                    + size as f64 * self.smoothing_factor;
                counts
                    .iter()
                    .map(|&c| (c as f64 + self.smoothing_factor) / denom)
                    .collect()
            }
        }
    }

    fn posterior(
        &self,
        recent: &[DrawRecord],
        priors: &[f64],
        rules: &GameRules,
        pool: Pool,
    ) -> Vec<f64> {
        let size = rules.size(pool);
        let pick = rules.pick_count(pool);

        match self.update_method {
            UpdateMethod::Full => {
                let mut counts = vec![0u64; size];
                for draw in recent {
                    for &n in draw.numbers(pool) {
                        let idx = (n as usize).wrapping_sub(1);
                        if idx < size {
                            counts[idx] += 1;
                        }
                    }
                }
                let trials = (recent.len() * pick) as u64;
                let likelihoods: Vec<f64> = (0..size)
                    .map(|i| binomial_pmf(counts[i], trials, priors[i]))
                    .collect();
                normalize_posteriors(priors, &likelihoods)
            }
            UpdateMethod::Incremental => {
                let mut posteriors = priors.to_vec();
                for draw in recent {
                    let likelihoods: Vec<f64> = (1..=size as u8)
                        .map(|n| {
                            if draw.numbers(pool).contains(&n) {
                                pick as f64 / size as f64
                            } else {
                                (size - pick) as f64 / size as f64
                            }
                        })
                        .collect();
                    posteriors = normalize_posteriors(&posteriors, &likelihoods);
                }
                posteriors
            }
        }
    }
}

impl Strategy for BayesianStrategy {
    fn name(&self) -> &str {
        "Bayesian"
    }

    fn generate(
        &self,
        ctx: &EngineContext<'_>,
        count: usize,
        rng: &mut StdRng,
    ) -> Result<Vec<Combination>> {
        check_count(count)?;
        let window = clamp_window(self.recent_draws_count, ctx.draws.len())?;
        let recent = &ctx.draws[..window];
        let prior_data = &ctx.draws[window..];

        let rules = ctx.rules;
        let main_priors = self.priors(prior_data, &rules, Pool::Main);
        let bonus_priors = self.priors(prior_data, &rules, Pool::Bonus);
        let main_post = self.posterior(recent, &main_priors, &rules, Pool::Main);
        let bonus_post = self.posterior(recent, &bonus_priors, &rules, Pool::Bonus);

        log::debug!(
            "posterior bayésien recalculé sur {} tirages récents ({} en prior)",
            window,
            prior_data.len()
        );

        let mut combinations = Vec::with_capacity(count);
        for _ in 0..count {
            let numbers = sample_without_replacement(&main_post, rules.main_count, rng)?;
            let bonus = sample_without_replacement(&bonus_post, rules.bonus_count, rng)?;

            // score = masse de posterior sélectionnée, mise à l'échelle du
            // domaine pour rester comparable entre jeux
            let main_mass: f64 = numbers
                .iter()
                .map(|&n| main_post[(n - 1) as usize])
                .sum::<f64>()
                / rules.main_count as f64;
            let bonus_mass: f64 = bonus
                .iter()
                .map(|&b| bonus_post[(b - 1) as usize])
                .sum::<f64>()
                / rules.bonus_count as f64;
            let score = 0.5 * (main_mass * rules.size(Pool::Main) as f64
                + bonus_mass * rules.size(Pool::Bonus) as f64)
                * 10.0;

            combinations.push(Combination::new(&rules, numbers, bonus, score, self.name())?);
        }
        Ok(combinations)
    }
}
