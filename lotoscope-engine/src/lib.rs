pub mod ensemble;
pub mod models;
pub mod sampler;
pub mod stats;
pub mod strategies;

pub use stats::DistributionStats;
pub use strategies::{EngineContext, Strategy, all_strategies, strategy_by_name};

use chrono::NaiveDate;
use lotoscope_model::{DrawRecord, GameRules};

/// Historique synthétique déterministe pour les tests : fenêtres de 5
/// numéros consécutifs qui tournent sur le domaine, bonus qui cyclent.
pub fn make_test_draws(n: usize, rules: &GameRules) -> Vec<DrawRecord> {
    let windows = ((rules.main_domain as usize - 5) / 5 + 1).max(1);
    (0..n)
        .map(|i| {
            let base = ((i % windows) * 5) as u8;
            let main = [base + 1, base + 2, base + 3, base + 4, base + 5];
            let b0 = (i % rules.bonus_domain as usize) as u8 + 1;
            let bonus = if rules.bonus_count == 2 {
                let b1 = b0 % rules.bonus_domain + 1;
                vec![b0.min(b1), b0.max(b1)]
            } else {
                vec![b0]
            };
            DrawRecord {
                date: NaiveDate::from_ymd_opt(2024, 1, (i % 28) as u32 + 1).unwrap(),
                main,
                bonus,
            }
        })
        .collect()
}
