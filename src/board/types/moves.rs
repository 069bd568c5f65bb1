//! Move types and move list.

use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::piece::Piece;
use super::square::Square;
use crate::board::error::MoveParseError;

/// How a move changes the board beyond relocating the mover.
///
/// Always derived by the move generator; a [`Move`] whose kind disagrees with
/// the position is not a member of the legal move set and gets rejected.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    Normal,
    Capture,
    CastleKingside,
    CastleQueenside,
    EnPassant,
    DoublePawnAdvance,
}

impl MoveKind {
    /// Single-letter tag used in compact move logs
    #[must_use]
    pub const fn tag(self) -> char {
        match self {
            MoveKind::Normal => '-',
            MoveKind::Capture => 'x',
            MoveKind::CastleKingside => 'k',
            MoveKind::CastleQueenside => 'q',
            MoveKind::EnPassant => 'e',
            MoveKind::DoublePawnAdvance => 'd',
        }
    }
}

/// A classified move: source, destination, kind and optional promotion piece.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    from: Square,
    to: Square,
    kind: MoveKind,
    promotion: Option<Piece>,
}

impl Move {
    #[inline]
    const fn with_kind(from: Square, to: Square, kind: MoveKind) -> Self {
        Move {
            from,
            to,
            kind,
            promotion: None,
        }
    }

    /// Create a quiet move (no capture, no special flags)
    #[inline]
    #[must_use]
    pub const fn quiet(from: Square, to: Square) -> Self {
        Move::with_kind(from, to, MoveKind::Normal)
    }

    /// Create a capture move
    #[inline]
    #[must_use]
    pub const fn capture(from: Square, to: Square) -> Self {
        Move::with_kind(from, to, MoveKind::Capture)
    }

    /// Create a double pawn push move
    #[inline]
    #[must_use]
    pub const fn double_pawn_push(from: Square, to: Square) -> Self {
        Move::with_kind(from, to, MoveKind::DoublePawnAdvance)
    }

    /// Create an en passant capture
    #[inline]
    #[must_use]
    pub const fn en_passant(from: Square, to: Square) -> Self {
        Move::with_kind(from, to, MoveKind::EnPassant)
    }

    /// Create a kingside castle move (king squares)
    #[inline]
    #[must_use]
    pub const fn castle_kingside(from: Square, to: Square) -> Self {
        Move::with_kind(from, to, MoveKind::CastleKingside)
    }

    /// Create a queenside castle move (king squares)
    #[inline]
    #[must_use]
    pub const fn castle_queenside(from: Square, to: Square) -> Self {
        Move::with_kind(from, to, MoveKind::CastleQueenside)
    }

    /// Create a promotion move, capturing or not
    #[inline]
    #[must_use]
    pub const fn new_promotion(from: Square, to: Square, piece: Piece, capture: bool) -> Self {
        let kind = if capture {
            MoveKind::Capture
        } else {
            MoveKind::Normal
        };
        Move {
            from,
            to,
            kind,
            promotion: Some(piece),
        }
    }

    /// Get the source square
    #[inline]
    #[must_use]
    pub const fn from(self) -> Square {
        self.from
    }

    /// Get the destination square
    #[inline]
    #[must_use]
    pub const fn to(self) -> Square {
        self.to
    }

    #[inline]
    #[must_use]
    pub const fn kind(self) -> MoveKind {
        self.kind
    }

    /// Returns true if this move captures a piece (including en passant)
    #[inline]
    #[must_use]
    pub const fn is_capture(self) -> bool {
        matches!(self.kind, MoveKind::Capture | MoveKind::EnPassant)
    }

    #[inline]
    #[must_use]
    pub const fn is_en_passant(self) -> bool {
        matches!(self.kind, MoveKind::EnPassant)
    }

    /// Returns true if this move is castling (kingside or queenside)
    #[inline]
    #[must_use]
    pub const fn is_castling(self) -> bool {
        matches!(
            self.kind,
            MoveKind::CastleKingside | MoveKind::CastleQueenside
        )
    }

    #[inline]
    #[must_use]
    pub const fn is_double_pawn_push(self) -> bool {
        matches!(self.kind, MoveKind::DoublePawnAdvance)
    }

    #[inline]
    #[must_use]
    pub const fn is_promotion(self) -> bool {
        self.promotion.is_some()
    }

    /// Get the promotion piece, if this is a promotion move
    #[inline]
    #[must_use]
    pub const fn promotion(self) -> Option<Piece> {
        self.promotion
    }

    /// True when the request names this move
    #[must_use]
    pub fn matches(self, request: &MoveRequest) -> bool {
        self.from == request.from && self.to == request.to && self.promotion == request.promotion
    }

    /// Positionally unambiguous log form: `e2e4d`, `e1g1k`, `e7e8q-`
    #[must_use]
    pub fn to_log_string(self) -> String {
        format!("{}{}", self, self.kind.tag())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({}{}", self.from, self.to)?;
        if let Some(promo) = self.promotion {
            write!(f, "={}", promo.to_char().to_ascii_uppercase())?;
        }
        match self.kind {
            MoveKind::Normal => {}
            MoveKind::Capture => write!(f, " cap")?,
            MoveKind::CastleKingside | MoveKind::CastleQueenside => write!(f, " castle")?,
            MoveKind::EnPassant => write!(f, " ep")?,
            MoveKind::DoublePawnAdvance => write!(f, " double")?,
        }
        write!(f, ")")
    }
}

/// UCI coordinate form (`e2e4`, `e7e8q`)
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promo) = self.promotion {
            write!(f, "{}", promo.to_char())?;
        }
        Ok(())
    }
}

/// An unclassified move as produced by a collaborator: squares plus an
/// optional promotion piece. Resolved against the legal move set before use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRequest {
    pub from: Square,
    pub to: Square,
    #[serde(default)]
    pub promotion: Option<Piece>,
}

impl MoveRequest {
    #[must_use]
    pub const fn new(from: Square, to: Square) -> Self {
        MoveRequest {
            from,
            to,
            promotion: None,
        }
    }

    #[must_use]
    pub const fn with_promotion(mut self, piece: Piece) -> Self {
        self.promotion = Some(piece);
        self
    }
}

impl From<Move> for MoveRequest {
    fn from(mv: Move) -> Self {
        MoveRequest {
            from: mv.from,
            to: mv.to,
            promotion: mv.promotion,
        }
    }
}

impl fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promo) = self.promotion {
            write!(f, "{}", promo.to_char())?;
        }
        Ok(())
    }
}

/// Parse UCI long algebraic notation (e.g., "e2e4", "e7e8q").
impl FromStr for MoveRequest {
    type Err = MoveParseError;

    fn from_str(uci: &str) -> Result<Self, Self::Err> {
        if !uci.is_ascii() || uci.len() < 4 || uci.len() > 5 {
            return Err(MoveParseError::InvalidLength { len: uci.len() });
        }
        let invalid_square = || MoveParseError::InvalidSquare {
            notation: uci.to_string(),
        };
        let from: Square = uci[0..2].parse().map_err(|_| invalid_square())?;
        let to: Square = uci[2..4].parse().map_err(|_| invalid_square())?;

        let promotion = match uci[4..].chars().next() {
            None => None,
            Some(c) => {
                let piece = Piece::from_char(c)
                    .filter(|p| p.is_promotable())
                    .ok_or(MoveParseError::InvalidPromotion { char: c })?;
                Some(piece)
            }
        };

        Ok(MoveRequest {
            from,
            to,
            promotion,
        })
    }
}

pub(crate) const MAX_MOVES: usize = 256;
const EMPTY_MOVE: Move = Move::quiet(
    Square::from_index_unchecked(0),
    Square::from_index_unchecked(0),
);

/// List of moves with fixed-size backing array.
#[derive(Clone, Debug)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    pub(crate) fn new() -> Self {
        MoveList {
            moves: [EMPTY_MOVE; MAX_MOVES],
            len: 0,
        }
    }

    pub(crate) fn push(&mut self, mv: Move) {
        debug_assert!(self.len < MAX_MOVES, "move list overflow");
        self.moves[self.len] = mv;
        self.len += 1;
    }

    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&Move) -> bool) {
        let mut kept = 0;
        for idx in 0..self.len {
            let mv = self.moves[idx];
            if keep(&mv) {
                self.moves[kept] = mv;
                kept += 1;
            }
        }
        self.len = kept;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    #[must_use]
    pub fn contains(&self, mv: &Move) -> bool {
        self.iter().any(|m| m == mv)
    }

    /// First move matching the request's squares and promotion piece
    #[must_use]
    pub fn find(&self, request: &MoveRequest) -> Option<Move> {
        self.iter().copied().find(|m| m.matches(request))
    }

    /// Destination squares reachable from `from`, deduplicated across promotion choices
    #[must_use]
    pub fn destinations_from(&self, from: Square) -> Vec<Square> {
        let mut targets: Vec<Square> = self
            .iter()
            .filter(|m| m.from() == from)
            .map(|m| m.to())
            .collect();
        targets.sort_unstable();
        targets.dedup();
        targets
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        MoveList::new()
    }
}

/// Order-insensitive: two lists are equal when they hold the same moves
impl PartialEq for MoveList {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().all(|m| other.contains(m))
    }
}

impl Index<usize> for MoveList {
    type Output = Move;

    fn index(&self, idx: usize) -> &Self::Output {
        assert!(
            idx < self.len,
            "MoveList index {} out of bounds (len {})",
            idx,
            self.len
        );
        &self.moves[idx]
    }
}
