pub mod scoring;
pub mod state;

pub use scoring::GuessOutcome;
pub use state::{GameMessage, GameState, GameStatus, Point, ShapeKind, Stroke, StrokeKind};
