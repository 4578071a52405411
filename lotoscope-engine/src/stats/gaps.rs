use lotoscope_model::{Pool, PredictionError, Result};

use super::DistributionStats;

/// Analyse des écarts d'apparition d'un numéro, indices du plus récent au
/// plus ancien.
#[derive(Debug, Clone)]
pub struct GapAnalysis {
    pub number: u8,
    /// Écarts entre apparitions consécutives (tirages sautés entre deux
    /// sorties).
    pub gaps: Vec<u32>,
    pub mean_gap: f64,
    pub draws_since_last: u32,
    /// Le numéro est « en retard » : absent depuis plus longtemps que son
    /// écart moyen.
    pub overdue: bool,
}

impl DistributionStats {
    /// Analyse des écarts pour un numéro.
    pub fn gap_analysis(&self, pool: Pool, number: u8) -> Result<GapAnalysis> {
        let size = self.rules.size(pool);
        let idx = (number as usize).wrapping_sub(1);
        if idx >= size {
            return Err(PredictionError::InvalidParameter(format!(
                "numéro {} hors domaine (1-{})",
                number, size
            )));
        }

        let occurrences = match pool {
            Pool::Main => &self.main_occurrences[idx],
            Pool::Bonus => &self.bonus_occurrences[idx],
        };

        let gaps: Vec<u32> = occurrences.windows(2).map(|w| w[1] - w[0] - 1).collect();
        let mean_gap = if gaps.is_empty() {
            // moins de deux apparitions : estimation par le ratio théorique
            size as f64 / self.rules.pick_count(pool) as f64
        } else {
            gaps.iter().sum::<u32>() as f64 / gaps.len() as f64
        };
        let draws_since_last = occurrences
            .first()
            .copied()
            .unwrap_or(self.draws_count as u32);
        let overdue = draws_since_last as f64 > mean_gap;

        Ok(GapAnalysis {
            number,
            gaps,
            mean_gap,
            draws_since_last,
            overdue,
        })
    }

    /// Analyse des écarts pour tout le domaine.
    pub fn gap_analysis_all(&self, pool: Pool) -> Vec<GapAnalysis> {
        (1..=self.rules.size(pool) as u8)
            .filter_map(|n| self.gap_analysis(pool, n).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::DistributionStats;
    use chrono::NaiveDate;
    use lotoscope_model::{DrawRecord, GameRules};

    fn draw(day: u32, main: [u8; 5]) -> DrawRecord {
        DrawRecord {
            date: NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
            main,
            bonus: vec![1],
        }
    }

    #[test]
    fn test_gap_analysis_known_pattern() {
        // le 9 sort aux indices 0, 3 et 5 : écarts de 2 et 1 tirages sautés
        let draws = vec![
            draw(6, [9, 20, 30, 40, 45]),
            draw(5, [1, 2, 3, 4, 5]),
            draw(4, [1, 2, 3, 4, 5]),
            draw(3, [9, 21, 31, 41, 46]),
            draw(2, [1, 2, 3, 4, 5]),
            draw(1, [9, 22, 32, 42, 47]),
        ];
        let stats = DistributionStats::build(&draws, GameRules::french_loto()).unwrap();
        let gap = stats.gap_analysis(Pool::Main, 9).unwrap();
        assert_eq!(gap.gaps, vec![2, 1]);
        assert!((gap.mean_gap - 1.5).abs() < 1e-10);
        assert_eq!(gap.draws_since_last, 0);
        assert!(!gap.overdue);
    }

    #[test]
    fn test_gap_analysis_overdue() {
        // le 9 est sorti aux indices 3 et 4 (écart 0) puis plus rien depuis
        // 3 tirages : nettement en retard
        let draws = vec![
            draw(5, [1, 2, 3, 4, 5]),
            draw(4, [1, 2, 3, 4, 5]),
            draw(3, [1, 2, 3, 4, 5]),
            draw(2, [9, 20, 30, 40, 45]),
            draw(1, [9, 21, 31, 41, 46]),
        ];
        let stats = DistributionStats::build(&draws, GameRules::french_loto()).unwrap();
        let gap = stats.gap_analysis(Pool::Main, 9).unwrap();
        assert_eq!(gap.gaps, vec![0]);
        assert_eq!(gap.draws_since_last, 3);
        assert!(gap.overdue);
    }

    #[test]
    fn test_gap_analysis_never_seen_uses_theoretical_mean() {
        let draws = vec![draw(1, [1, 2, 3, 4, 5]); 12];
        let stats = DistributionStats::build(&draws, GameRules::french_loto()).unwrap();
        let gap = stats.gap_analysis(Pool::Main, 48).unwrap();
        assert!(gap.gaps.is_empty());
        // 49 numéros / 5 tirés par grille
        assert!((gap.mean_gap - 49.0 / 5.0).abs() < 1e-10);
        assert_eq!(gap.draws_since_last, 12);
        assert!(gap.overdue);
    }

    #[test]
    fn test_gap_analysis_out_of_domain() {
        let draws = vec![draw(1, [1, 2, 3, 4, 5]); 3];
        let stats = DistributionStats::build(&draws, GameRules::french_loto()).unwrap();
        assert!(stats.gap_analysis(Pool::Main, 0).is_err());
        assert!(stats.gap_analysis(Pool::Main, 50).is_err());
        assert!(stats.gap_analysis(Pool::Bonus, 11).is_err());
    }

    #[test]
    fn test_gap_analysis_all_covers_domain() {
        let draws = vec![draw(1, [1, 2, 3, 4, 5]); 6];
        let stats = DistributionStats::build(&draws, GameRules::french_loto()).unwrap();
        let all = stats.gap_analysis_all(Pool::Main);
        assert_eq!(all.len(), 49);
        assert_eq!(all[0].number, 1);
        assert_eq!(all[48].number, 49);
    }
}
