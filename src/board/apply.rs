//! Producing successor positions.
//!
//! [`Board::apply`] is the only public way to advance a position. It checks
//! the move against the legal set and returns a fresh `Board`; the receiver
//! is left untouched.

use crate::zobrist::ZOBRIST;

use super::error::IllegalMoveError;
use super::{Board, Color, Move, MoveKind, MoveRequest, Piece, Square};

impl Board {
    fn put(&mut self, sq: Square, color: Color, piece: Piece) {
        self.set_piece(sq, color, piece);
        self.hash ^= ZOBRIST.piece(color, piece, sq);
    }

    fn take(&mut self, sq: Square, color: Color, piece: Piece) {
        self.remove_piece(sq, color, piece);
        self.hash ^= ZOBRIST.piece(color, piece, sq);
    }

    /// Play `mv` without checking legality.
    ///
    /// `mv` must come from this position's pseudo-legal move generation.
    pub(crate) fn play(&self, mv: Move) -> Board {
        let mut next = *self;
        let color = self.side_to_move;
        let opponent = color.opponent();
        let (from, to) = (mv.from(), mv.to());

        next.hash ^= ZOBRIST.castling(next.castling_rights);
        next.hash ^= ZOBRIST.en_passant(self.capturable_en_passant());

        let Some(moving) = self.piece_on(from) else {
            return next;
        };

        match mv.kind() {
            MoveKind::EnPassant => {
                if let Some(victim_sq) = to.offset(-color.pawn_direction(), 0) {
                    next.take(victim_sq, opponent, Piece::Pawn);
                }
            }
            MoveKind::Capture => {
                if let Some((victim_color, victim)) = self.piece_at(to) {
                    next.take(to, victim_color, victim);
                }
            }
            _ => {}
        }

        next.take(from, color, moving);
        next.put(to, color, mv.promotion().unwrap_or(moving));

        let rook_files = match mv.kind() {
            MoveKind::CastleKingside => Some((7, 5)),
            MoveKind::CastleQueenside => Some((0, 3)),
            _ => None,
        };
        if let Some((rook_from, rook_to)) = rook_files {
            let rank = color.back_rank();
            if let (Some(rook_from), Some(rook_to)) =
                (Square::new(rank, rook_from), Square::new(rank, rook_to))
            {
                next.take(rook_from, color, Piece::Rook);
                next.put(rook_to, color, Piece::Rook);
            }
        }

        if moving == Piece::King {
            next.castling_rights.remove_color(color);
        }
        for sq in [from, to] {
            revoke_corner_right(&mut next, sq);
        }

        next.en_passant_target = if mv.is_double_pawn_push() {
            from.offset(color.pawn_direction(), 0)
        } else {
            None
        };

        if moving == Piece::Pawn || mv.is_capture() {
            next.halfmove_clock = 0;
        } else {
            next.halfmove_clock += 1;
        }
        if color == Color::Black {
            next.fullmove_number += 1;
        }
        next.side_to_move = opponent;

        next.hash ^= ZOBRIST.side();
        next.hash ^= ZOBRIST.castling(next.castling_rights);
        next.hash ^= ZOBRIST.en_passant(next.capturable_en_passant());
        next
    }

    /// Apply a fully classified move, returning the successor position.
    ///
    /// # Errors
    ///
    /// Returns [`IllegalMoveError`] if `mv` is not in [`Board::legal_moves`].
    pub fn apply(&self, mv: Move) -> Result<Board, IllegalMoveError> {
        if !self.legal_moves().contains(&mv) {
            return Err(IllegalMoveError {
                request: MoveRequest::from(mv),
            });
        }
        Ok(self.play(mv))
    }

    /// Resolve `request` against the legal set and apply it.
    ///
    /// # Errors
    ///
    /// Returns [`IllegalMoveError`] when no legal move matches the request.
    pub fn apply_request(&self, request: &MoveRequest) -> Result<(Move, Board), IllegalMoveError> {
        let mv = self.resolve(request)?;
        Ok((mv, self.play(mv)))
    }

    /// Find the legal move `request` describes.
    ///
    /// # Errors
    ///
    /// Returns [`IllegalMoveError`] when nothing in the legal set matches.
    pub fn resolve(&self, request: &MoveRequest) -> Result<Move, IllegalMoveError> {
        self.legal_moves()
            .find(request)
            .ok_or(IllegalMoveError { request: *request })
    }
}

/// Moving from or capturing on a rook's home corner drops that castling right
fn revoke_corner_right(board: &mut Board, sq: Square) {
    for color in Color::BOTH {
        if sq.rank() != color.back_rank() {
            continue;
        }
        match sq.file() {
            0 => board.castling_rights.remove(color, false),
            7 => board.castling_rights.remove(color, true),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(uci: &str) -> MoveRequest {
        uci.parse().unwrap()
    }

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_apply_leaves_original_untouched() {
        let start = Board::new();
        let (_, next) = start.apply_request(&req("e2e4")).unwrap();
        assert_eq!(start, Board::new());
        assert_eq!(next.piece_at(sq("e4")), Some((Color::White, Piece::Pawn)));
        assert!(next.is_empty(sq("e2")));
        assert_eq!(next.side_to_move(), Color::Black);
    }

    #[test]
    fn test_double_push_sets_en_passant_target() {
        let (mv, next) = Board::new().apply_request(&req("e2e4")).unwrap();
        assert_eq!(mv.kind(), MoveKind::DoublePawnAdvance);
        assert_eq!(next.en_passant_target(), Some(sq("e3")));

        let (_, after) = next.apply_request(&req("g8f6")).unwrap();
        assert_eq!(after.en_passant_target(), None);
    }

    #[test]
    fn test_incremental_hash_matches_full_recompute() {
        let mut board = Board::new();
        for uci in ["e2e4", "d7d5", "e4d5", "g8f6", "f1b5", "c7c6", "g1f3", "c6b5", "e1g1"] {
            board = board.apply_request(&req(uci)).unwrap().1;
            assert_eq!(board.hash(), board.calculate_hash(), "after {uci}");
        }
    }

    #[test]
    fn test_counters() {
        let mut board = Board::new();
        board = board.apply_request(&req("g1f3")).unwrap().1;
        assert_eq!(board.halfmove_clock(), 1);
        assert_eq!(board.fullmove_number(), 1);
        board = board.apply_request(&req("g8f6")).unwrap().1;
        assert_eq!(board.halfmove_clock(), 2);
        assert_eq!(board.fullmove_number(), 2);
        board = board.apply_request(&req("e2e4")).unwrap().1;
        assert_eq!(board.halfmove_clock(), 0);
    }

    #[test]
    fn test_king_move_drops_both_rights() {
        let mut board = Board::new();
        for uci in ["e2e4", "e7e5", "e1e2"] {
            board = board.apply_request(&req(uci)).unwrap().1;
        }
        assert!(!board.castling_rights().has(Color::White, true));
        assert!(!board.castling_rights().has(Color::White, false));
        assert!(board.castling_rights().has(Color::Black, true));
    }

    #[test]
    fn test_illegal_request_is_rejected() {
        let err = Board::new().apply_request(&req("e2e5")).unwrap_err();
        assert_eq!(err.request, req("e2e5"));

        let bogus = Move::quiet(sq("a1"), sq("a5"));
        assert!(Board::new().apply(bogus).is_err());
    }
}
