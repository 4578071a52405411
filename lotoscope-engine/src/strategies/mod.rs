pub mod anti_bias;
pub mod coverage;
pub mod frequency;
pub mod mixed;
pub mod risk_reward;
pub mod stratified;
pub mod temporal;

use lotoscope_model::{Combination, DrawRecord, GameRules, PredictionError, Result};
use rand::rngs::StdRng;

use crate::stats::DistributionStats;

/// Contexte d'une session de génération : l'instantané d'historique et les
/// statistiques pré-construites, partagés en lecture seule entre toutes les
/// stratégies. Tirage d'indice 0 = le plus récent.
pub struct EngineContext<'a> {
    pub draws: &'a [DrawRecord],
    pub rules: GameRules,
    pub stats: &'a DistributionStats,
}

impl<'a> EngineContext<'a> {
    pub fn new(draws: &'a [DrawRecord], rules: GameRules, stats: &'a DistributionStats) -> Self {
        Self { draws, rules, stats }
    }
}

/// Un générateur de combinaisons candidates. Déterministe pour un RNG donné,
/// sans effet de bord : plusieurs stratégies peuvent tourner en parallèle
/// sur le même contexte.
pub trait Strategy: Send + Sync {
    fn name(&self) -> &str;

    /// Génère `count` combinaisons scorées, toutes valides vis-à-vis des
    /// règles du jeu.
    fn generate(
        &self,
        ctx: &EngineContext<'_>,
        count: usize,
        rng: &mut StdRng,
    ) -> Result<Vec<Combination>>;
}

/// Toutes les stratégies canoniques avec leurs paramètres par défaut,
/// une implémentation unique par nom.
pub fn all_strategies() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(frequency::FrequencyStrategy::default()),
        Box::new(mixed::MixedStrategy::default()),
        Box::new(temporal::TemporalStrategy::default()),
        Box::new(stratified::StratifiedStrategy::default()),
        Box::new(coverage::CoverageStrategy::default()),
        Box::new(risk_reward::RiskRewardStrategy::default()),
        Box::new(anti_bias::AntiBiasStrategy::default()),
        Box::new(crate::models::bayesian::BayesianStrategy::default()),
        Box::new(crate::models::markov::MarkovStrategy::default()),
        Box::new(crate::models::time_series::TimeSeriesStrategy::default()),
    ]
}

/// Registre nom → implémentation.
pub fn strategy_by_name(name: &str) -> Option<Box<dyn Strategy>> {
    all_strategies().into_iter().find(|s| s.name() == name)
}

/// Contrôle commun du nombre de combinaisons demandé.
pub(crate) fn check_count(count: usize) -> Result<()> {
    if count < 1 {
        return Err(PredictionError::InvalidParameter(
            "count doit être >= 1".into(),
        ));
    }
    Ok(())
}

/// Réduit une fenêtre demandée à l'historique disponible. La dégradation est
/// tolérée jusqu'à la moitié de la fenêtre demandée ; au-delà elle est
/// remontée en `InsufficientData`.
pub(crate) fn clamp_window(requested: usize, available: usize) -> Result<usize> {
    if available == 0 {
        return Err(PredictionError::InsufficientData("historique vide".into()));
    }
    let effective = requested.min(available);
    if effective * 2 < requested {
        return Err(PredictionError::InsufficientData(format!(
            "fenêtre demandée {requested}, seulement {available} tirages disponibles"
        )));
    }
    Ok(effective)
}

/// Poids moyen des valeurs sélectionnées.
pub(crate) fn mean_weight(weights: &[f64], values: &[u8]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values
        .iter()
        .map(|&v| {
            weights
                .get((v as usize).wrapping_sub(1))
                .copied()
                .unwrap_or(0.0)
        })
        .sum::<f64>()
        / values.len() as f64
}

/// Poids maximal d'une table, 1.0 pour une table vide ou nulle afin de
/// rester un dénominateur sûr.
pub(crate) fn max_weight(weights: &[f64]) -> f64 {
    let max = weights.iter().cloned().fold(0.0f64, f64::max);
    if max > 0.0 { max } else { 1.0 }
}

/// Écart-type d'un jeu de numéros.
pub(crate) fn std_dev(values: &[u8]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|&v| (v as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    variance.sqrt()
}
