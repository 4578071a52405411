use serde::{Deserialize, Serialize};

/// Côté d'un tirage : numéros principaux ou numéros bonus
/// (étoiles EuroMillions, numéro chance du Loto).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pool {
    Main,
    Bonus,
}

/// Paramétrage d'un jeu : tailles de domaines et nombre de numéros tirés.
/// C'est de la configuration, jamais des constantes en dur dans le moteur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRules {
    pub main_domain: u8,
    pub main_count: usize,
    pub bonus_domain: u8,
    pub bonus_count: usize,
}

impl GameRules {
    /// EuroMillions : 5 numéros sur 1-50, 2 étoiles sur 1-12.
    pub fn euromillions() -> Self {
        Self {
            main_domain: 50,
            main_count: 5,
            bonus_domain: 12,
            bonus_count: 2,
        }
    }

    /// Loto français : 5 numéros sur 1-49, 1 numéro chance sur 1-10.
    pub fn french_loto() -> Self {
        Self {
            main_domain: 49,
            main_count: 5,
            bonus_domain: 10,
            bonus_count: 1,
        }
    }

    pub fn size(&self, pool: Pool) -> usize {
        match pool {
            Pool::Main => self.main_domain as usize,
            Pool::Bonus => self.bonus_domain as usize,
        }
    }

    pub fn pick_count(&self, pool: Pool) -> usize {
        match pool {
            Pool::Main => self.main_count,
            Pool::Bonus => self.bonus_count,
        }
    }

    pub fn in_domain(&self, pool: Pool, n: u8) -> bool {
        let max = match pool {
            Pool::Main => self.main_domain,
            Pool::Bonus => self.bonus_domain,
        };
        n >= 1 && n <= max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euromillions_sizes() {
        let rules = GameRules::euromillions();
        assert_eq!(rules.size(Pool::Main), 50);
        assert_eq!(rules.size(Pool::Bonus), 12);
        assert_eq!(rules.pick_count(Pool::Main), 5);
        assert_eq!(rules.pick_count(Pool::Bonus), 2);
    }

    #[test]
    fn test_french_loto_sizes() {
        let rules = GameRules::french_loto();
        assert_eq!(rules.size(Pool::Main), 49);
        assert_eq!(rules.size(Pool::Bonus), 10);
        assert_eq!(rules.pick_count(Pool::Bonus), 1);
    }

    #[test]
    fn test_in_domain() {
        let rules = GameRules::french_loto();
        assert!(rules.in_domain(Pool::Main, 1));
        assert!(rules.in_domain(Pool::Main, 49));
        assert!(!rules.in_domain(Pool::Main, 0));
        assert!(!rules.in_domain(Pool::Main, 50));
        assert!(rules.in_domain(Pool::Bonus, 10));
        assert!(!rules.in_domain(Pool::Bonus, 11));
    }
}
