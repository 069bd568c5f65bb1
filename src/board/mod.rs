//! Chess board representation and move rules.
//!
//! Uses bitboards for placement and attack detection. Supports the full rules
//! of movement including castling, en passant and promotion. A [`Board`] is an
//! immutable value: applying a move yields a new position.
//!
//! # Example
//! ```
//! use live_chess::board::{Board, MoveRequest};
//!
//! let board = Board::new();
//! println!("Starting position has {} legal moves", board.legal_moves().len());
//!
//! let request: MoveRequest = "e2e4".parse().unwrap();
//! let (mv, next) = board.apply_request(&request).unwrap();
//! assert!(mv.is_double_pawn_push());
//! assert_eq!(next.en_passant_target(), Some("e3".parse().unwrap()));
//! ```

mod apply;
mod attack_tables;
mod builder;
mod error;
mod fen;
mod movegen;
pub mod prelude;
mod san;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use builder::BoardBuilder;
pub use error::{
    FenError, IllegalMoveError, InvariantViolation, MoveParseError, SanError, SquareError,
};
pub use state::Board;
pub use types::{
    Bitboard, BitboardIter, CastlingRights, Color, Move, MoveKind, MoveList, MoveRequest, Piece,
    Square,
};

pub(crate) use types::PROMOTION_PIECES;
