//! Adapting board-recognition output to move requests.
//!
//! The recognizer reports what it saw: either a from/to pair with the piece
//! it believes moved, or just the set of squares whose contents changed.
//! Neither is trusted for legality; both are resolved against the legal
//! move set of the current position.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Move, MoveKind, MoveRequest, Piece, Square};

use super::{Game, GameError};

/// A move as reported by the recognizer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedMove {
    pub from: Square,
    pub to: Square,
    /// The piece the recognizer saw moving, if it could tell
    #[serde(default)]
    pub piece: Option<Piece>,
}

impl From<DetectedMove> for MoveRequest {
    fn from(detected: DetectedMove) -> Self {
        MoveRequest::new(detected.from, detected.to)
    }
}

/// Find the move that explains a set of changed squares.
///
/// Castling moves whose king and rook squares all changed win outright;
/// with `castle_hint` set the king's two squares are enough. Otherwise every
/// unordered pair of changed squares is tried in both directions and the
/// first legal from/to pair is returned. Promotion is left unset so the
/// game's promotion policy can decide.
#[must_use]
pub fn resolve_changed_squares(
    board: &Board,
    changed: &[Square],
    castle_hint: bool,
) -> Option<MoveRequest> {
    let moves = board.legal_moves();
    let touched = |sq: Option<Square>| sq.is_some_and(|sq| changed.contains(&sq));

    let castle = moves.iter().find(|mv| {
        let (rook_from, rook_to) = rook_squares(mv);
        let king_moved = touched(Some(mv.from())) && touched(Some(mv.to()));
        mv.is_castling() && king_moved && (castle_hint || (touched(rook_from) && touched(rook_to)))
    });
    if let Some(mv) = castle {
        return Some(MoveRequest::from(*mv));
    }
    if castle_hint {
        log::warn!("Castling flagged but no castling move matches the changed squares");
    }

    for (idx, &a) in changed.iter().enumerate() {
        for &b in &changed[idx + 1..] {
            for (from, to) in [(a, b), (b, a)] {
                if moves.iter().any(|mv| mv.from() == from && mv.to() == to) {
                    return Some(MoveRequest::new(from, to));
                }
            }
        }
    }
    None
}

fn rook_squares(mv: &Move) -> (Option<Square>, Option<Square>) {
    let rank = mv.from().rank();
    match mv.kind() {
        MoveKind::CastleKingside => (Square::new(rank, 7), Square::new(rank, 5)),
        MoveKind::CastleQueenside => (Square::new(rank, 0), Square::new(rank, 3)),
        _ => (None, None),
    }
}

impl Game {
    /// Submit a recognized move.
    ///
    /// A disagreement between the reported piece and the board is logged;
    /// the board is authoritative.
    ///
    /// # Errors
    ///
    /// Same as [`Game::submit`].
    pub fn submit_detected(&mut self, detected: DetectedMove) -> Result<Move, GameError> {
        if let Some(seen) = detected.piece {
            let on_board = self.board().piece_on(detected.from);
            if on_board != Some(seen) {
                log::warn!(
                    "Recognizer saw {seen:?} on {} but the board has {on_board:?}",
                    detected.from
                );
            }
        }
        self.submit(MoveRequest::from(detected))
    }

    /// Resolve a set of changed squares and submit the resulting move.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Unresolved`] when no legal move explains the
    /// change, otherwise the same errors as [`Game::submit`].
    pub fn submit_changed_squares(
        &mut self,
        changed: &[Square],
        castle_hint: bool,
    ) -> Result<Move, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver {
                status: self.status(),
            });
        }
        let request =
            resolve_changed_squares(self.board(), changed, castle_hint).ok_or_else(|| {
                log::warn!("No legal move matches {} changed squares", changed.len());
                GameError::Unresolved {
                    squares: changed.to_vec(),
                }
            })?;
        self.submit(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn squares(names: &[&str]) -> Vec<Square> {
        names.iter().map(|s| sq(s)).collect()
    }

    #[test]
    fn test_pair_resolves_in_either_order() {
        let board = Board::new();
        let expected = MoveRequest::new(sq("e2"), sq("e4"));
        assert_eq!(
            resolve_changed_squares(&board, &squares(&["e2", "e4"]), false),
            Some(expected)
        );
        assert_eq!(
            resolve_changed_squares(&board, &squares(&["e4", "e2"]), false),
            Some(expected)
        );
        assert_eq!(
            resolve_changed_squares(&board, &squares(&["e2", "e5"]), false),
            None
        );
    }

    #[test]
    fn test_en_passant_three_squares() {
        let board =
            Board::try_from_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 1")
                .unwrap();
        let request =
            resolve_changed_squares(&board, &squares(&["d5", "e5", "d6"]), false).unwrap();
        assert_eq!(request, MoveRequest::new(sq("e5"), sq("d6")));
    }

    #[test]
    fn test_castling_beats_rook_slide() {
        let board = Board::try_from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let changed = squares(&["h1", "f1", "g1", "e1"]);

        let request = resolve_changed_squares(&board, &changed, false).unwrap();
        assert_eq!(request, MoveRequest::new(sq("e1"), sq("g1")));

        let hinted = resolve_changed_squares(&board, &squares(&["e1", "g1"]), true).unwrap();
        assert_eq!(hinted, MoveRequest::new(sq("e1"), sq("g1")));
    }
}
