//! Game module tests.
//!
//! - `lifecycle.rs` - Submitting, rejecting and taking back moves
//! - `draw.rs` - Automatic draw rules and their toggles

mod lifecycle;

use crate::board::{Board, MoveRequest, Square};
use crate::config::EngineConfig;

use super::Game;

fn sq(s: &str) -> Square {
    s.parse().unwrap()
}

fn request(uci: &str) -> MoveRequest {
    uci.parse().unwrap()
}

fn game_from(fen: &str, config: EngineConfig) -> Game {
    Game::from_board(Board::try_from_fen(fen).unwrap(), config).unwrap()
}

fn play(game: &mut Game, moves: &[&str]) {
    for uci in moves {
        game.submit(request(uci))
            .unwrap_or_else(|err| panic!("{uci} rejected: {err}"));
    }
}
