use std::fmt;

use crate::zobrist::ZOBRIST;

use super::attack_tables::PAWN_ATTACKS;
use super::error::InvariantViolation;
use super::{Bitboard, CastlingRights, Color, Piece, Square};

/// A complete position: placement, side to move, castling rights, en passant
/// target and move counters.
///
/// `Board` is a small `Copy` value. It is never mutated once handed out;
/// [`Board::apply`] returns the successor position instead, so earlier
/// positions stay valid for replay and undo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    pub(crate) pieces: [[Bitboard; 6]; 2],
    pub(crate) occupied: [Bitboard; 2],
    pub(crate) all_occupied: Bitboard,
    pub(crate) side_to_move: Color,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) en_passant_target: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) hash: u64, // Zobrist hash
}

pub(crate) const BACK_RANK: [Piece; 8] = [
    Piece::Rook,
    Piece::Knight,
    Piece::Bishop,
    Piece::Queen,
    Piece::King,
    Piece::Bishop,
    Piece::Knight,
    Piece::Rook,
];

impl Board {
    /// The standard initial position
    #[must_use]
    pub fn new() -> Self {
        let mut board = Board::empty();
        for (file, piece) in BACK_RANK.iter().enumerate() {
            for color in Color::BOTH {
                let back = color.back_rank();
                let pawns = color.pawn_start_rank();
                if let (Some(back_sq), Some(pawn_sq)) =
                    (Square::new(back, file), Square::new(pawns, file))
                {
                    board.set_piece(back_sq, color, *piece);
                    board.set_piece(pawn_sq, color, Piece::Pawn);
                }
            }
        }

        board.castling_rights = CastlingRights::all();
        board.hash = board.calculate_hash();
        board
    }

    pub(crate) fn empty() -> Self {
        Board {
            pieces: [[Bitboard::EMPTY; 6]; 2],
            occupied: [Bitboard::EMPTY; 2],
            all_occupied: Bitboard::EMPTY,
            side_to_move: Color::White,
            castling_rights: CastlingRights::none(),
            en_passant_target: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
        }
    }

    pub(crate) fn set_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        self.pieces[color.index()][piece.index()].insert(sq);
        self.occupied[color.index()].insert(sq);
        self.all_occupied.insert(sq);
    }

    pub(crate) fn remove_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        self.pieces[color.index()][piece.index()].remove(sq);
        self.occupied[color.index()].remove(sq);
        self.all_occupied.remove(sq);
    }

    /// The piece standing on `sq`, if any
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        if !self.all_occupied.contains(sq) {
            return None;
        }
        let color = if self.occupied[Color::White.index()].contains(sq) {
            Color::White
        } else {
            Color::Black
        };
        Piece::ALL
            .into_iter()
            .find(|piece| self.pieces[color.index()][piece.index()].contains(sq))
            .map(|piece| (color, piece))
    }

    /// Get just the piece type on a square (without color)
    #[must_use]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.piece_at(sq).map(|(_, piece)| piece)
    }

    /// Get just the color of the piece on a square
    #[must_use]
    pub fn color_on(&self, sq: Square) -> Option<Color> {
        self.piece_at(sq).map(|(color, _)| color)
    }

    #[must_use]
    pub fn is_empty(&self, sq: Square) -> bool {
        !self.all_occupied.contains(sq)
    }

    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[must_use]
    pub fn white_to_move(&self) -> bool {
        self.side_to_move == Color::White
    }

    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[must_use]
    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    /// Plies since the last capture or pawn move
    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Squares holding `piece`s of `color`
    #[must_use]
    pub fn pieces(&self, color: Color, piece: Piece) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    #[must_use]
    pub fn occupied_by(&self, color: Color) -> Bitboard {
        self.occupied[color.index()]
    }

    #[must_use]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces(color, Piece::King).iter().next()
    }

    /// Rank-major snapshot for renderers: `squares()[rank][file]`, rank 0 = rank 1
    #[must_use]
    pub fn squares(&self) -> [[Option<(Color, Piece)>; 8]; 8] {
        let mut grid = [[None; 8]; 8];
        for sq in self.all_occupied.iter() {
            grid[sq.rank()][sq.file()] = self.piece_at(sq);
        }
        grid
    }

    pub(crate) fn calculate_hash(&self) -> u64 {
        let mut hash: u64 = 0;

        for color in Color::BOTH {
            for piece in Piece::ALL {
                for sq in self.pieces(color, piece).iter() {
                    hash ^= ZOBRIST.piece(color, piece, sq);
                }
            }
        }

        if self.side_to_move == Color::Black {
            hash ^= ZOBRIST.side();
        }
        hash ^= ZOBRIST.castling(self.castling_rights);
        hash ^= ZOBRIST.en_passant(self.capturable_en_passant());
        hash
    }

    /// The en passant target, if a pawn of the side to move could take on it.
    ///
    /// Only this square enters the hash, so a double push nobody can answer
    /// en passant hashes like the same placement reached any other way.
    pub(crate) fn capturable_en_passant(&self) -> Option<Square> {
        let target = self.en_passant_target?;
        let us = self.side_to_move;
        let capturers = PAWN_ATTACKS[us.opponent().index()][target.as_index()]
            & self.pieces(us, Piece::Pawn).0;
        (capturers != 0).then_some(target)
    }

    /// Check the structural invariants every playable position satisfies.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        for color in Color::BOTH {
            match self.pieces(color, Piece::King).popcount() {
                0 => return Err(InvariantViolation::MissingKing { color }),
                1 => {}
                count => return Err(InvariantViolation::ExtraKing { color, count }),
            }
        }

        for color in Color::BOTH {
            if let Some(square) = self
                .pieces(color, Piece::Pawn)
                .iter()
                .find(|sq| sq.rank() == 0 || sq.rank() == 7)
            {
                return Err(InvariantViolation::PawnOnBackRank { square });
            }
        }

        let waiting = self.side_to_move.opponent();
        if self.is_in_check(waiting) {
            return Err(InvariantViolation::OpponentInCheck { color: waiting });
        }

        if let Some(square) = self.en_passant_target {
            if !self.en_passant_target_is_consistent(square) {
                return Err(InvariantViolation::BadEnPassant { square });
            }
        }

        Ok(())
    }

    fn en_passant_target_is_consistent(&self, target: Square) -> bool {
        // The side that just moved pushed a pawn over `target`
        let mover = self.side_to_move.opponent();
        let dir = mover.pawn_direction();
        let expected_rank = mover.pawn_start_rank() as isize + dir;
        if target.rank() as isize != expected_rank {
            return false;
        }
        let pawn_sq = target.offset(dir, 0);
        let origin_sq = target.offset(-dir, 0);
        match (pawn_sq, origin_sq) {
            (Some(pawn_sq), Some(origin_sq)) => {
                self.piece_at(pawn_sq) == Some((mover, Piece::Pawn))
                    && self.is_empty(target)
                    && self.is_empty(origin_sq)
            }
            _ => false,
        }
    }

    /// Neither side can possibly deliver mate: K v K, K+minor v K, or
    /// only same-colored bishops besides the kings.
    #[must_use]
    pub fn is_insufficient_material(&self) -> bool {
        let both = |piece: Piece| {
            self.pieces(Color::White, piece).0 | self.pieces(Color::Black, piece).0
        };

        if both(Piece::Pawn) != 0 || both(Piece::Rook) != 0 || both(Piece::Queen) != 0 {
            return false;
        }

        let knights = both(Piece::Knight).count_ones();
        let bishops = both(Piece::Bishop);

        if knights + bishops.count_ones() <= 1 {
            return true;
        }

        if knights == 0 {
            return bishops & Bitboard::LIGHT_SQUARES.0 == 0
                || bishops & Bitboard::DARK_SQUARES.0 == 0;
        }

        false
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

/// ASCII diagram, rank 8 on top, followed by the FEN
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grid = self.squares();
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for cell in grid[rank] {
                let c = cell.map_or('.', |(color, piece)| piece.to_fen_char(color));
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "   a b c d e f g h")?;
        write!(f, "{}", self.to_fen())
    }
}
