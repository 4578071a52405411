use thiserror::Error;

/// Erreurs du moteur de prédiction.
///
/// Trois familles seulement : paramètre hors plage (l'appelant corrige et
/// rappelle), historique trop court pour la fenêtre demandée, et violation
/// des invariants du domaine (toujours un défaut, jamais corrigé en douce).
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("paramètre invalide : {0}")]
    InvalidParameter(String),

    #[error("données insuffisantes : {0}")]
    InsufficientData(String),

    #[error("violation d'invariant : {0}")]
    DomainViolation(String),
}

pub type Result<T> = std::result::Result<T, PredictionError>;
