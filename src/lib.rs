pub mod board;
pub mod config;
pub mod game;
pub mod recorder;
pub mod sync;
mod zobrist;

pub use board::{Board, Color, Move, MoveRequest, Piece, Square};
pub use config::EngineConfig;
pub use game::{Game, GameError, GameStatus};
pub use sync::SharedGame;
