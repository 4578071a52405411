use serde::{Deserialize, Serialize};

use crate::error::{PredictionError, Result};
use crate::game::{GameRules, Pool};

/// Une combinaison candidate produite par une stratégie.
///
/// Enregistrement canonique `{numbers, bonus, score, strategy}` : les
/// collaborateurs externes (persistance, visualisation) en dépendent tel
/// quel. Numéros stockés triés, score borné à [0, 100], immuable une fois
/// construite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combination {
    pub numbers: [u8; 5],
    pub bonus: Vec<u8>,
    pub score: f64,
    pub strategy: String,
}

impl Combination {
    /// Construit une combinaison triée et validée. Toute violation des
    /// invariants (doublon, hors domaine, mauvais compte) échoue
    /// bruyamment : un générateur qui produit ça est défectueux.
    pub fn new(
        rules: &GameRules,
        mut numbers: Vec<u8>,
        mut bonus: Vec<u8>,
        score: f64,
        strategy: impl Into<String>,
    ) -> Result<Self> {
        if numbers.len() != rules.main_count {
            return Err(PredictionError::DomainViolation(format!(
                "{} numéros principaux au lieu de {}",
                numbers.len(),
                rules.main_count
            )));
        }
        numbers.sort_unstable();
        bonus.sort_unstable();

        if numbers.windows(2).any(|w| w[0] == w[1]) {
            return Err(PredictionError::DomainViolation(format!(
                "numéros en double dans {:?}",
                numbers
            )));
        }
        for &n in &numbers {
            if !rules.in_domain(Pool::Main, n) {
                return Err(PredictionError::DomainViolation(format!(
                    "numéro {} hors limites (1-{})",
                    n, rules.main_domain
                )));
            }
        }

        if bonus.len() != rules.bonus_count {
            return Err(PredictionError::DomainViolation(format!(
                "{} numéros bonus au lieu de {}",
                bonus.len(),
                rules.bonus_count
            )));
        }
        if bonus.windows(2).any(|w| w[0] == w[1]) {
            return Err(PredictionError::DomainViolation(format!(
                "bonus en double dans {:?}",
                bonus
            )));
        }
        for &b in &bonus {
            if !rules.in_domain(Pool::Bonus, b) {
                return Err(PredictionError::DomainViolation(format!(
                    "bonus {} hors limites (1-{})",
                    b, rules.bonus_domain
                )));
            }
        }

        let mut arr = [0u8; 5];
        arr.copy_from_slice(&numbers);

        Ok(Self {
            numbers: arr,
            bonus,
            score: score.clamp(0.0, 100.0),
            strategy: strategy.into(),
        })
    }

    pub fn contains(&self, n: u8) -> bool {
        self.numbers.contains(&n)
    }

    /// Somme des numéros principaux.
    pub fn sum(&self) -> u32 {
        self.numbers.iter().map(|&n| n as u32).sum()
    }
}
