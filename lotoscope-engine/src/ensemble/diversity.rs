use std::collections::HashMap;

use lotoscope_model::Combination;

pub const DEFAULT_NUMBER_CAP: usize = 2;
pub const DEFAULT_STRATEGY_CAP: usize = 3;

/// Sélection plafonnée : parcourt le lot par score décroissant et n'accepte
/// une grille que si aucun de ses numéros ni sa stratégie d'origine ne
/// dépasse son plafond d'utilisation. S'arrête à `count` acceptées ou au
/// bout du lot.
pub fn select_diverse(
    pool: &[Combination],
    count: usize,
    number_cap: usize,
    strategy_cap: usize,
) -> Vec<Combination> {
    let mut ordered: Vec<&Combination> = pool.iter().collect();
    ordered.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut number_usage: HashMap<u8, usize> = HashMap::new();
    let mut strategy_usage: HashMap<&str, usize> = HashMap::new();
    let mut selected = Vec::with_capacity(count);

    for combo in ordered {
        if selected.len() >= count {
            break;
        }
        let numbers_ok = combo
            .numbers
            .iter()
            .all(|n| number_usage.get(n).copied().unwrap_or(0) < number_cap);
        let strategy_ok =
            strategy_usage.get(combo.strategy.as_str()).copied().unwrap_or(0) < strategy_cap;

        if numbers_ok && strategy_ok {
            for &n in &combo.numbers {
                *number_usage.entry(n).or_insert(0) += 1;
            }
            *strategy_usage.entry(combo.strategy.as_str()).or_insert(0) += 1;
            selected.push(combo.clone());
        }
    }

    selected
}
