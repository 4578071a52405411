use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PredictionError, Result};
use crate::game::{GameRules, Pool};

/// Un tirage historique. L'instantané d'historique est détenu par
/// l'application appelante et remis au moteur en lecture seule,
/// tirage d'indice 0 = le plus récent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawRecord {
    pub date: NaiveDate,
    pub main: [u8; 5],
    pub bonus: Vec<u8>,
}

impl DrawRecord {
    pub fn numbers(&self, pool: Pool) -> &[u8] {
        match pool {
            Pool::Main => &self.main,
            Pool::Bonus => &self.bonus,
        }
    }
}

/// Valide un tirage contre les règles du jeu : plages, doublons, compte.
pub fn validate_draw(rules: &GameRules, main: &[u8; 5], bonus: &[u8]) -> Result<()> {
    for &n in main {
        if !rules.in_domain(Pool::Main, n) {
            return Err(PredictionError::DomainViolation(format!(
                "numéro {} hors limites (1-{})",
                n, rules.main_domain
            )));
        }
    }
    for i in 0..main.len() {
        for j in (i + 1)..main.len() {
            if main[i] == main[j] {
                return Err(PredictionError::DomainViolation(format!(
                    "numéro en double : {}",
                    main[i]
                )));
            }
        }
    }

    if bonus.len() != rules.bonus_count {
        return Err(PredictionError::DomainViolation(format!(
            "{} numéros bonus au lieu de {}",
            bonus.len(),
            rules.bonus_count
        )));
    }
    for &b in bonus {
        if !rules.in_domain(Pool::Bonus, b) {
            return Err(PredictionError::DomainViolation(format!(
                "bonus {} hors limites (1-{})",
                b, rules.bonus_domain
            )));
        }
    }
    for i in 0..bonus.len() {
        for j in (i + 1)..bonus.len() {
            if bonus[i] == bonus[j] {
                return Err(PredictionError::DomainViolation(format!(
                    "bonus en double : {}",
                    bonus[i]
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_draw_ok() {
        let rules = GameRules::euromillions();
        assert!(validate_draw(&rules, &[1, 2, 3, 4, 5], &[1, 2]).is_ok());
        assert!(validate_draw(&rules, &[50, 49, 48, 47, 46], &[11, 12]).is_ok());

        let loto = GameRules::french_loto();
        assert!(validate_draw(&loto, &[1, 2, 3, 4, 49], &[10]).is_ok());
    }

    #[test]
    fn test_validate_draw_main_out_of_range() {
        let rules = GameRules::euromillions();
        assert!(validate_draw(&rules, &[0, 2, 3, 4, 5], &[1, 2]).is_err());
        assert!(validate_draw(&rules, &[1, 2, 3, 4, 51], &[1, 2]).is_err());

        let loto = GameRules::french_loto();
        assert!(validate_draw(&loto, &[1, 2, 3, 4, 50], &[1]).is_err());
    }

    #[test]
    fn test_validate_draw_bonus_out_of_range() {
        let rules = GameRules::euromillions();
        assert!(validate_draw(&rules, &[1, 2, 3, 4, 5], &[0, 2]).is_err());
        assert!(validate_draw(&rules, &[1, 2, 3, 4, 5], &[1, 13]).is_err());
    }

    #[test]
    fn test_validate_draw_duplicates() {
        let rules = GameRules::euromillions();
        assert!(validate_draw(&rules, &[1, 1, 3, 4, 5], &[1, 2]).is_err());
        assert!(validate_draw(&rules, &[1, 2, 3, 4, 5], &[3, 3]).is_err());
    }

    #[test]
    fn test_validate_draw_bonus_count() {
        let rules = GameRules::french_loto();
        assert!(validate_draw(&rules, &[1, 2, 3, 4, 5], &[1, 2]).is_err());
        assert!(validate_draw(&rules, &[1, 2, 3, 4, 5], &[]).is_err());
    }

    #[test]
    fn test_numbers_from_pool() {
        let draw = DrawRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            main: [1, 2, 3, 4, 5],
            bonus: vec![6, 7],
        };
        assert_eq!(draw.numbers(Pool::Main), &[1, 2, 3, 4, 5]);
        assert_eq!(draw.numbers(Pool::Bonus), &[6, 7]);
    }
}
