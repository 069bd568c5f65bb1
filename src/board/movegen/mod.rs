//! Move generation and legality filtering.
//!
//! Pseudo-legal moves follow each piece's movement pattern and board
//! occupancy. A pseudo-legal move is legal when the mover's king is not
//! attacked in the resulting position.

mod kings;
mod knights;
mod pawns;
mod sliders;

pub(crate) use sliders::SliderType;

use super::{Board, Move, MoveList, Piece, Square};

impl Board {
    fn generate_pseudo_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        let color = self.side_to_move;

        for from in self.pieces(color, Piece::Pawn).iter() {
            self.generate_pawn_moves(from, &mut moves);
        }
        for from in self.pieces(color, Piece::Knight).iter() {
            self.generate_knight_moves(from, &mut moves);
        }
        for from in self.pieces(color, Piece::Bishop).iter() {
            self.generate_slider_moves(from, SliderType::Bishop, &mut moves);
        }
        for from in self.pieces(color, Piece::Rook).iter() {
            self.generate_slider_moves(from, SliderType::Rook, &mut moves);
        }
        for from in self.pieces(color, Piece::Queen).iter() {
            self.generate_slider_moves(from, SliderType::Queen, &mut moves);
        }
        for from in self.pieces(color, Piece::King).iter() {
            self.generate_king_moves(from, &mut moves);
        }
        moves
    }

    /// Quiet move or capture, depending on what stands on `to`
    pub(crate) fn create_simple_move(&self, from: Square, to: Square) -> Move {
        if self.is_empty(to) {
            Move::quiet(from, to)
        } else {
            Move::capture(from, to)
        }
    }

    /// Every legal move for the side to move.
    ///
    /// Castling additionally requires the king's start, transit and landing
    /// squares to be safe; every other move only requires that the mover's
    /// king is not attacked afterwards.
    #[must_use]
    pub fn legal_moves(&self) -> MoveList {
        let color = self.side_to_move;
        let opponent = color.opponent();
        let mut moves = self.generate_pseudo_moves();

        moves.retain(|m| {
            if m.is_castling() {
                let mid_file = (m.from().file() + m.to().file()) / 2;
                let king_path = [Square::new(m.from().rank(), mid_file), Some(m.to())];
                if self.is_square_attacked(m.from(), opponent)
                    || king_path
                        .iter()
                        .flatten()
                        .any(|&sq| self.is_square_attacked(sq, opponent))
                {
                    return false;
                }
            }
            !self.play(*m).is_in_check(color)
        });
        moves
    }

    /// Legal destinations of the piece on `from`, for move hints
    #[must_use]
    pub fn legal_destinations(&self, from: Square) -> Vec<Square> {
        self.legal_moves().destinations_from(from)
    }

    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.is_in_check(self.side_to_move) && self.legal_moves().is_empty()
    }

    #[must_use]
    pub fn is_stalemate(&self) -> bool {
        !self.is_in_check(self.side_to_move) && self.legal_moves().is_empty()
    }

    /// Count leaf nodes of the legal move tree to `depth`
    #[must_use]
    pub fn perft(&self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }

        let moves = self.legal_moves();
        if depth == 1 {
            return moves.len() as u64;
        }

        moves.iter().map(|m| self.play(*m).perft(depth - 1)).sum()
    }
}
