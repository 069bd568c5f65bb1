use super::super::attack_tables::{slider_attacks, KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS};
use super::super::{Bitboard, Board, Color, Move, MoveList, Piece, Square};

impl Board {
    pub(crate) fn generate_king_moves(&self, from: Square, moves: &mut MoveList) {
        let color = self.side_to_move;
        let own_occ = self.occupied_by(color).0;
        let targets = Bitboard(KING_ATTACKS[from.as_index()] & !own_occ);

        for to_sq in targets.iter() {
            moves.push(self.create_simple_move(from, to_sq));
        }

        let back_rank = color.back_rank();
        if Square::new(back_rank, 4) != Some(from) {
            return;
        }

        let on_back_rank = |file: usize| Square::new(back_rank, file);
        let all_empty = |files: &[usize]| {
            files
                .iter()
                .filter_map(|&file| on_back_rank(file))
                .all(|sq| self.is_empty(sq))
        };
        let rook_home = |file: usize| {
            on_back_rank(file).and_then(|sq| self.piece_at(sq)) == Some((color, Piece::Rook))
        };

        if self.castling_rights.has(color, true) && all_empty(&[5, 6]) && rook_home(7) {
            if let Some(to_sq) = on_back_rank(6) {
                moves.push(Move::castle_kingside(from, to_sq));
            }
        }
        if self.castling_rights.has(color, false) && all_empty(&[1, 2, 3]) && rook_home(0) {
            if let Some(to_sq) = on_back_rank(2) {
                moves.push(Move::castle_queenside(from, to_sq));
            }
        }
    }

    /// Whether any piece of `by` attacks `square`, regardless of pins
    #[must_use]
    pub fn is_square_attacked(&self, square: Square, by: Color) -> bool {
        let target_idx = square.as_index();
        let attackers = |piece: Piece| self.pieces(by, piece).0;

        // A pawn of `by` attacks `square` iff a pawn of the other color on
        // `square` would attack it back.
        if attackers(Piece::Pawn) & PAWN_ATTACKS[by.opponent().index()][target_idx] != 0 {
            return true;
        }
        if attackers(Piece::Knight) & KNIGHT_ATTACKS[target_idx] != 0 {
            return true;
        }
        if attackers(Piece::King) & KING_ATTACKS[target_idx] != 0 {
            return true;
        }

        let queens = attackers(Piece::Queen);
        let rook_like = attackers(Piece::Rook) | queens;
        let bishop_like = attackers(Piece::Bishop) | queens;

        slider_attacks(target_idx, self.all_occupied.0, false) & rook_like != 0
            || slider_attacks(target_idx, self.all_occupied.0, true) & bishop_like != 0
    }

    /// Whether `color`'s king is attacked
    #[must_use]
    pub fn is_in_check(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|king_sq| self.is_square_attacked(king_sq, color.opponent()))
    }
}
