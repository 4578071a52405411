use lotoscope_model::{Pool, PredictionError, Result};

use super::DistributionStats;

/// Un godet de la répartition par plages de valeurs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeBucket {
    pub lo: u8,
    pub hi: u8,
    pub count: u32,
}

impl RangeBucket {
    pub fn label(&self) -> String {
        format!("{}-{}", self.lo, self.hi)
    }
}

/// Répartition pair/impair : ratios agrégés plus histogramme du nombre de
/// pairs par tirage (0 à 5).
#[derive(Debug, Clone, PartialEq)]
pub struct EvenOddDistribution {
    pub even_ratio: f64,
    pub odd_ratio: f64,
    pub histogram: [u32; 6],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SumBucket {
    pub lo: u32,
    pub hi: u32,
    pub count: u32,
}

/// Distribution des sommes par tirage.
#[derive(Debug, Clone, PartialEq)]
pub struct SumDistribution {
    pub min: u32,
    pub max: u32,
    pub mean: f64,
    pub median: f64,
    pub buckets: Vec<SumBucket>,
}

impl SumDistribution {
    /// Le godet contenant `sum`, s'il existe.
    pub fn bucket_of(&self, sum: u32) -> Option<&SumBucket> {
        self.buckets.iter().find(|b| b.lo <= sum && sum <= b.hi)
    }

    /// Fraction des tirages dont la somme tombe dans le même godet que `sum`.
    pub fn commonality(&self, sum: u32) -> f64 {
        let total: u32 = self.buckets.iter().map(|b| b.count).sum();
        if total == 0 {
            return 0.0;
        }
        self.bucket_of(sum)
            .map(|b| b.count as f64 / total as f64)
            .unwrap_or(0.0)
    }
}

/// Paires adjacentes (écart de 1) par tirage, agrégées.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsecutiveAnalysis {
    pub per_draw: Vec<u32>,
    pub max: u32,
    pub mean: f64,
    /// Pourcentage de tirages contenant au moins une paire adjacente.
    pub with_any_pct: f64,
}

impl DistributionStats {
    /// Répartition des numéros principaux en `n_buckets` plages contiguës.
    pub fn range_distribution(&self, n_buckets: usize) -> Result<Vec<RangeBucket>> {
        if n_buckets == 0 {
            return Err(PredictionError::InvalidParameter(
                "n_buckets doit être >= 1".into(),
            ));
        }
        let domain = self.rules.main_domain as usize;
        let width = domain.div_ceil(n_buckets);

        let mut buckets: Vec<RangeBucket> = (0..n_buckets)
            .map(|i| RangeBucket {
                lo: (i * width + 1) as u8,
                hi: ((i + 1) * width).min(domain) as u8,
                count: 0,
            })
            .filter(|b| (b.lo as usize) <= domain)
            .collect();

        for (n, c) in self.frequency(Pool::Main).iter() {
            if c == 0 {
                continue;
            }
            let idx = (n as usize - 1) / width;
            if let Some(bucket) = buckets.get_mut(idx) {
                bucket.count += c;
            }
        }
        Ok(buckets)
    }

    pub fn even_odd_distribution(&self) -> EvenOddDistribution {
        let mut histogram = [0u32; 6];
        for &e in &self.even_counts {
            histogram[(e as usize).min(5)] += 1;
        }

        let total = self.frequency(Pool::Main).total();
        let even_total: u64 = self
            .frequency(Pool::Main)
            .iter()
            .filter(|(n, _)| n % 2 == 0)
            .map(|(_, c)| c as u64)
            .sum();
        let even_ratio = if total > 0 {
            even_total as f64 / total as f64
        } else {
            0.0
        };

        EvenOddDistribution {
            even_ratio,
            odd_ratio: 1.0 - even_ratio,
            histogram,
        }
    }

    /// Min/max/moyenne/médiane des sommes par tirage, plus un histogramme en
    /// godets de 25 couvrant les sommes possibles du jeu.
    pub fn sum_distribution(&self) -> SumDistribution {
        let mut sums = self.draw_sums.clone();
        sums.sort_unstable();

        let min = *sums.first().unwrap_or(&0);
        let max = *sums.last().unwrap_or(&0);
        let mean = sums.iter().map(|&s| s as f64).sum::<f64>() / sums.len().max(1) as f64;
        let median = if sums.is_empty() {
            0.0
        } else if sums.len() % 2 == 1 {
            sums[sums.len() / 2] as f64
        } else {
            (sums[sums.len() / 2 - 1] + sums[sums.len() / 2]) as f64 / 2.0
        };

        let (lo_possible, hi_possible) = self.possible_sum_range();
        let width = 25u32;
        let n_buckets = ((hi_possible - lo_possible) / width + 1) as usize;
        let mut buckets: Vec<SumBucket> = (0..n_buckets)
            .map(|i| SumBucket {
                lo: lo_possible + i as u32 * width,
                hi: (lo_possible + (i as u32 + 1) * width - 1).min(hi_possible),
                count: 0,
            })
            .collect();
        for &s in &self.draw_sums {
            let idx = (s.saturating_sub(lo_possible) / width) as usize;
            if let Some(bucket) = buckets.get_mut(idx.min(n_buckets - 1)) {
                bucket.count += 1;
            }
        }

        SumDistribution {
            min,
            max,
            mean,
            median,
            buckets,
        }
    }

    /// Bornes des sommes atteignables : 5 plus petits et 5 plus grands
    /// numéros du domaine.
    pub fn possible_sum_range(&self) -> (u32, u32) {
        let d = self.rules.main_domain as u32;
        let k = self.rules.main_count as u32;
        let lo = k * (k + 1) / 2;
        let hi = (0..k).map(|i| d - i).sum();
        (lo, hi)
    }

    pub fn consecutive_analysis(&self) -> ConsecutiveAnalysis {
        let per_draw = self.consecutive_counts.clone();
        let max = per_draw.iter().copied().max().unwrap_or(0);
        let mean = per_draw.iter().map(|&c| c as f64).sum::<f64>() / per_draw.len().max(1) as f64;
        let with_any = per_draw.iter().filter(|&&c| c > 0).count();
        let with_any_pct = 100.0 * with_any as f64 / per_draw.len().max(1) as f64;

        ConsecutiveAnalysis {
            per_draw,
            max,
            mean,
            with_any_pct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::DistributionStats;
    use chrono::NaiveDate;
    use lotoscope_model::{DrawRecord, GameRules};

    fn draw(main: [u8; 5]) -> DrawRecord {
        DrawRecord {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            main,
            bonus: vec![1],
        }
    }

    /// 10 tirages dégénérés où seul le numéro 7 est dans le domaine.
    fn lone_seven_stats() -> DistributionStats {
        let draws = vec![draw([7, 0, 0, 0, 0]); 10];
        DistributionStats::build(&draws, GameRules::euromillions()).unwrap()
    }

    #[test]
    fn test_range_distribution_lone_seven() {
        let stats = lone_seven_stats();
        let buckets = stats.range_distribution(5).unwrap();
        let labels: Vec<String> = buckets.iter().map(|b| b.label()).collect();
        assert_eq!(labels, vec!["1-10", "11-20", "21-30", "31-40", "41-50"]);
        assert_eq!(
            buckets.iter().map(|b| b.count).collect::<Vec<u32>>(),
            vec![10, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_range_distribution_uneven_domain() {
        let draws = vec![draw([1, 2, 3, 48, 49]); 4];
        let stats = DistributionStats::build(&draws, GameRules::french_loto()).unwrap();
        let buckets = stats.range_distribution(5).unwrap();
        assert_eq!(buckets.last().unwrap().label(), "41-49");
        assert_eq!(buckets[0].count, 12);
        assert_eq!(buckets[4].count, 8);
    }

    #[test]
    fn test_range_distribution_zero_buckets() {
        let stats = lone_seven_stats();
        assert!(stats.range_distribution(0).is_err());
    }

    #[test]
    fn test_even_odd_distribution() {
        let draws = vec![
            draw([2, 4, 6, 8, 10]),
            draw([1, 3, 5, 7, 9]),
            draw([1, 2, 3, 4, 6]),
        ];
        let stats = DistributionStats::build(&draws, GameRules::euromillions()).unwrap();
        let dist = stats.even_odd_distribution();
        assert_eq!(dist.histogram[5], 1);
        assert_eq!(dist.histogram[0], 1);
        assert_eq!(dist.histogram[3], 1);
        // 8 pairs sur 15 numéros tirés
        assert!((dist.even_ratio - 8.0 / 15.0).abs() < 1e-10);
        assert!((dist.even_ratio + dist.odd_ratio - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_sum_distribution_stats() {
        let draws = vec![
            draw([1, 2, 3, 4, 5]),   // somme 15
            draw([10, 20, 30, 40, 50]), // somme 150
            draw([1, 2, 3, 4, 10]),  // somme 20
        ];
        let stats = DistributionStats::build(&draws, GameRules::euromillions()).unwrap();
        let dist = stats.sum_distribution();
        assert_eq!(dist.min, 15);
        assert_eq!(dist.max, 150);
        assert!((dist.median - 20.0).abs() < 1e-10);
        assert!((dist.mean - (15.0 + 150.0 + 20.0) / 3.0).abs() < 1e-10);
        // les deux petites sommes partagent le premier godet 15-39
        assert_eq!(dist.commonality(16), 2.0 / 3.0);
    }

    #[test]
    fn test_sum_distribution_buckets_cover_possible_range() {
        let stats = lone_seven_stats();
        let (lo, hi) = stats.possible_sum_range();
        assert_eq!(lo, 15);
        assert_eq!(hi, 240);
        let dist = stats.sum_distribution();
        assert_eq!(dist.buckets.first().unwrap().lo, 15);
        assert_eq!(dist.buckets.last().unwrap().hi, 240);
    }

    #[test]
    fn test_consecutive_analysis() {
        let draws = vec![
            draw([1, 2, 3, 20, 30]), // deux paires adjacentes
            draw([5, 10, 15, 20, 25]), // aucune
            draw([7, 8, 30, 40, 49]), // une
        ];
        let stats = DistributionStats::build(&draws, GameRules::french_loto()).unwrap();
        let analysis = stats.consecutive_analysis();
        assert_eq!(analysis.per_draw, vec![2, 0, 1]);
        assert_eq!(analysis.max, 2);
        assert!((analysis.mean - 1.0).abs() < 1e-10);
        assert!((analysis.with_any_pct - 200.0 / 3.0).abs() < 1e-9);
    }
}
