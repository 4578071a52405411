pub mod gaps;
pub mod patterns;

use lotoscope_model::{DrawRecord, GameRules, Pool, PredictionError, Result};

pub use gaps::GapAnalysis;
pub use patterns::{
    ConsecutiveAnalysis, EvenOddDistribution, RangeBucket, SumBucket, SumDistribution,
};

/// Table de fréquences zéro-remplie sur tout le domaine : un numéro jamais
/// sorti a un compte de 0, jamais d'entrée absente.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: Vec<u32>,
}

impl FrequencyTable {
    /// Compte les apparitions sur un instantané ; les valeurs hors domaine
    /// sont ignorées silencieusement.
    pub fn from_draws(draws: &[DrawRecord], size: usize, pool: Pool) -> Self {
        let mut counts = vec![0u32; size];
        for draw in draws {
            for &n in draw.numbers(pool) {
                let idx = (n as usize).wrapping_sub(1);
                if idx < size {
                    counts[idx] += 1;
                }
            }
        }
        Self { counts }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Nombre d'apparitions du numéro `n` (0 si hors domaine).
    pub fn count(&self, n: u8) -> u32 {
        let idx = (n as usize).wrapping_sub(1);
        self.counts.get(idx).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Poids flottants indexés par numéro - 1, pour l'échantillonneur.
    pub fn as_weights(&self) -> Vec<f64> {
        self.counts.iter().map(|&c| c as f64).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &c)| ((i + 1) as u8, c))
    }
}

/// Statistiques de distribution dérivées d'un instantané d'historique
/// (tirage 0 = le plus récent).
///
/// Construites une seule fois en début de session puis passées par
/// référence à chaque appel de stratégie ; jamais modifiées ensuite, donc
/// partageables entre threads sans verrou.
#[derive(Debug, Clone)]
pub struct DistributionStats {
    rules: GameRules,
    draws_count: usize,
    main_freq: FrequencyTable,
    bonus_freq: FrequencyTable,
    recent_main_freq: FrequencyTable,
    recent_bonus_freq: FrequencyTable,
    // indices de tirages où chaque numéro apparaît, du plus récent au plus ancien
    main_occurrences: Vec<Vec<u32>>,
    bonus_occurrences: Vec<Vec<u32>>,
    draw_sums: Vec<u32>,
    even_counts: Vec<u8>,
    consecutive_counts: Vec<u32>,
}

impl DistributionStats {
    /// Construit toutes les tables dérivées depuis l'instantané.
    pub fn build(draws: &[DrawRecord], rules: GameRules) -> Result<Self> {
        if draws.is_empty() {
            return Err(PredictionError::InsufficientData("historique vide".into()));
        }

        let main_size = rules.size(Pool::Main);
        let bonus_size = rules.size(Pool::Bonus);

        // fenêtre récente : les 20 % de tirages les plus récents
        let recent_len = (draws.len() / 5).max(1);
        let recent = &draws[..recent_len];

        let main_freq = FrequencyTable::from_draws(draws, main_size, Pool::Main);
        let bonus_freq = FrequencyTable::from_draws(draws, bonus_size, Pool::Bonus);
        let recent_main_freq = FrequencyTable::from_draws(recent, main_size, Pool::Main);
        let recent_bonus_freq = FrequencyTable::from_draws(recent, bonus_size, Pool::Bonus);

        let mut main_occurrences = vec![Vec::new(); main_size];
        let mut bonus_occurrences = vec![Vec::new(); bonus_size];
        for (t, draw) in draws.iter().enumerate() {
            for &n in draw.numbers(Pool::Main) {
                let idx = (n as usize).wrapping_sub(1);
                if idx < main_size {
                    main_occurrences[idx].push(t as u32);
                }
            }
            for &b in draw.numbers(Pool::Bonus) {
                let idx = (b as usize).wrapping_sub(1);
                if idx < bonus_size {
                    bonus_occurrences[idx].push(t as u32);
                }
            }
        }

        let in_domain = |n: u8| n >= 1 && n <= rules.main_domain;
        let draw_sums: Vec<u32> = draws
            .iter()
            .map(|d| {
                d.main
                    .iter()
                    .filter(|&&n| in_domain(n))
                    .map(|&n| n as u32)
                    .sum()
            })
            .collect();
        let even_counts: Vec<u8> = draws
            .iter()
            .map(|d| d.main.iter().filter(|&&n| in_domain(n) && n % 2 == 0).count() as u8)
            .collect();
        let consecutive_counts: Vec<u32> = draws
            .iter()
            .map(|d| {
                let mut sorted: Vec<u8> = d.main.iter().copied().filter(|&n| in_domain(n)).collect();
                sorted.sort_unstable();
                sorted.windows(2).filter(|w| w[1] - w[0] == 1).count() as u32
            })
            .collect();

        log::debug!(
            "statistiques construites : {} tirages, fenêtre récente {}",
            draws.len(),
            recent_len
        );

        Ok(Self {
            rules,
            draws_count: draws.len(),
            main_freq,
            bonus_freq,
            recent_main_freq,
            recent_bonus_freq,
            main_occurrences,
            bonus_occurrences,
            draw_sums,
            even_counts,
            consecutive_counts,
        })
    }

    pub fn rules(&self) -> GameRules {
        self.rules
    }

    pub fn draws_count(&self) -> usize {
        self.draws_count
    }

    pub fn frequency(&self, pool: Pool) -> &FrequencyTable {
        match pool {
            Pool::Main => &self.main_freq,
            Pool::Bonus => &self.bonus_freq,
        }
    }

    pub fn recent_frequency(&self, pool: Pool) -> &FrequencyTable {
        match pool {
            Pool::Main => &self.recent_main_freq,
            Pool::Bonus => &self.recent_bonus_freq,
        }
    }

    /// Fréquence pondérée : `(1-blend)·historique + blend·récent`, la fenêtre
    /// récente étant d'abord remise à l'échelle de la masse historique pour
    /// que le mélange compare des masses égales.
    pub fn weighted_frequency(&self, pool: Pool, blend: f64) -> Result<Vec<f64>> {
        if !(0.0..=1.0).contains(&blend) {
            return Err(PredictionError::InvalidParameter(format!(
                "blend {} hors [0,1]",
                blend
            )));
        }
        let full = self.frequency(pool);
        let recent = self.recent_frequency(pool);
        let full_total = full.total() as f64;
        let recent_total = recent.total() as f64;
        let scale = if recent_total > 0.0 {
            full_total / recent_total
        } else {
            0.0
        };

        Ok(full
            .counts
            .iter()
            .zip(recent.counts.iter())
            .map(|(&f, &r)| (1.0 - blend) * f as f64 + blend * r as f64 * scale)
            .collect())
    }

    /// Les `n` numéros les plus fréquents, égalités départagées par valeur
    /// croissante.
    pub fn hot(&self, pool: Pool, n: usize) -> Vec<u8> {
        let mut entries: Vec<(u8, u32)> = self.frequency(pool).iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries.into_iter().take(n).map(|(v, _)| v).collect()
    }

    /// Les `n` numéros les moins fréquents, mêmes règles d'égalité.
    pub fn cold(&self, pool: Pool, n: usize) -> Vec<u8> {
        let mut entries: Vec<(u8, u32)> = self.frequency(pool).iter().collect();
        entries.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));
        entries.into_iter().take(n).map(|(v, _)| v).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::make_test_draws;
    use chrono::NaiveDate;

    /// 10 tirages dégénérés où seul le numéro 7 est dans le domaine.
    fn lone_seven_draws() -> Vec<DrawRecord> {
        (0..10)
            .map(|i| DrawRecord {
                date: NaiveDate::from_ymd_opt(2024, 1, i + 1).unwrap(),
                main: [7, 0, 0, 0, 0],
                bonus: vec![1],
            })
            .collect()
    }

    #[test]
    fn test_build_empty_history_fails() {
        let err = DistributionStats::build(&[], GameRules::euromillions()).unwrap_err();
        assert!(matches!(err, PredictionError::InsufficientData(_)));
    }

    #[test]
    fn test_frequency_sum_invariant() {
        let rules = GameRules::euromillions();
        let draws = make_test_draws(40, &rules);
        let stats = DistributionStats::build(&draws, rules).unwrap();
        assert_eq!(stats.frequency(Pool::Main).total(), 40 * 5);
        assert_eq!(stats.frequency(Pool::Bonus).total(), 40 * 2);

        let loto = GameRules::french_loto();
        let draws = make_test_draws(33, &loto);
        let stats = DistributionStats::build(&draws, loto).unwrap();
        assert_eq!(stats.frequency(Pool::Main).total(), 33 * 5);
        assert_eq!(stats.frequency(Pool::Bonus).total(), 33);
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let rules = GameRules::euromillions();
        let draws = make_test_draws(50, &rules);
        let a = DistributionStats::build(&draws, rules).unwrap();
        let b = DistributionStats::build(&draws, rules).unwrap();
        assert_eq!(a.frequency(Pool::Main), b.frequency(Pool::Main));
        assert_eq!(a.frequency(Pool::Bonus), b.frequency(Pool::Bonus));
        assert_eq!(a.recent_frequency(Pool::Main), b.recent_frequency(Pool::Main));
    }

    #[test]
    fn test_lone_seven_frequency_and_hot() {
        let rules = GameRules::french_loto();
        let stats = DistributionStats::build(&lone_seven_draws(), rules).unwrap();
        assert_eq!(stats.frequency(Pool::Main).count(7), 10);
        for n in (1..=49).filter(|&n| n != 7) {
            assert_eq!(stats.frequency(Pool::Main).count(n), 0);
        }
        assert_eq!(stats.hot(Pool::Main, 1), vec![7]);
    }

    #[test]
    fn test_hot_cold_tie_break_ascending() {
        let rules = GameRules::french_loto();
        let stats = DistributionStats::build(&lone_seven_draws(), rules).unwrap();
        // tout le monde à 0 sauf 7 : les plus froids sont 1, 2, 3 par valeur
        assert_eq!(stats.cold(Pool::Main, 3), vec![1, 2, 3]);
        // à égalité derrière 7, l'ordre croissant départage
        assert_eq!(stats.hot(Pool::Main, 3), vec![7, 1, 2]);
    }

    #[test]
    fn test_weighted_frequency_blend_bounds() {
        let rules = GameRules::euromillions();
        let draws = make_test_draws(30, &rules);
        let stats = DistributionStats::build(&draws, rules).unwrap();
        assert!(stats.weighted_frequency(Pool::Main, -0.1).is_err());
        assert!(stats.weighted_frequency(Pool::Main, 1.1).is_err());
    }

    #[test]
    fn test_weighted_frequency_blend_zero_is_full_history() {
        let rules = GameRules::euromillions();
        let draws = make_test_draws(30, &rules);
        let stats = DistributionStats::build(&draws, rules).unwrap();
        let w = stats.weighted_frequency(Pool::Main, 0.0).unwrap();
        for (n, c) in stats.frequency(Pool::Main).iter() {
            assert_eq!(w[(n - 1) as usize], c as f64);
        }
    }

    #[test]
    fn test_weighted_frequency_mass_preserved() {
        // le rééchelonnage égalise les masses : la somme du mélange reste
        // la masse historique, quel que soit le blend
        let rules = GameRules::euromillions();
        let draws = make_test_draws(40, &rules);
        let stats = DistributionStats::build(&draws, rules).unwrap();
        let full_total = stats.frequency(Pool::Main).total() as f64;
        for blend in [0.0, 0.3, 0.6, 1.0] {
            let w = stats.weighted_frequency(Pool::Main, blend).unwrap();
            let total: f64 = w.iter().sum();
            assert!(
                (total - full_total).abs() < 1e-6,
                "blend={} : masse {} au lieu de {}",
                blend,
                total,
                full_total
            );
        }
    }

    #[test]
    fn test_frequency_table_unseen_is_zero() {
        let rules = GameRules::euromillions();
        let draws = make_test_draws(3, &rules);
        let table = FrequencyTable::from_draws(&draws, rules.size(Pool::Main), Pool::Main);
        assert_eq!(table.len(), 50);
        assert_eq!(table.count(50), 0);
        assert_eq!(table.count(0), 0);
        assert_eq!(table.count(200), 0);
    }
}
