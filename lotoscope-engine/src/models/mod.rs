//! Générateurs à modèle : stratégies spécialisées qui portent leur propre
//! état dérivé (tables a priori/a posteriori, tables de transitions, séries
//! décomposées), construit à chaque invocation et jamais modifié ensuite.

pub mod bayesian;
pub mod markov;
pub mod time_series;
