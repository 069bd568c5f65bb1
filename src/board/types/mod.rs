//! Core chess types.
//!
//! This module contains the fundamental value types used by the rules engine:
//! - `Piece` and `Color` - chess piece types and colors
//! - `Square` - bounds-checked board square
//! - `Bitboard` - 64-bit board representation
//! - `Move`, `MoveRequest` and `MoveList` - move representation
//! - `CastlingRights` - castling state

mod bitboard;
mod castling;
mod moves;
mod piece;
mod square;

pub use bitboard::{Bitboard, BitboardIter};
pub use castling::CastlingRights;
pub use moves::{Move, MoveKind, MoveList, MoveRequest};
pub use piece::{Color, Piece};
pub use square::Square;

pub(crate) use piece::PROMOTION_PIECES;
