//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used board types.
//!
//! # Example
//! ```
//! use live_chess::board::prelude::*;
//!
//! let board = Board::new();
//! assert_eq!(board.side_to_move(), Color::White);
//! ```

pub use super::{
    Board, BoardBuilder, CastlingRights, Color, FenError, IllegalMoveError, Move, MoveKind,
    MoveList, MoveRequest, Piece, Square,
};
