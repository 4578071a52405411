pub mod combination;
pub mod draw;
pub mod error;
pub mod game;

pub use combination::Combination;
pub use draw::{DrawRecord, validate_draw};
pub use error::{PredictionError, Result};
pub use game::{GameRules, Pool};
