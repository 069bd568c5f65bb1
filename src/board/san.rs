//! Standard Algebraic Notation (SAN) support.
//!
//! SAN is what players read on a scoresheet and what the game transcript is
//! built from. Examples: "e4", "Nf3", "Bxc6+", "O-O", "e8=Q#"
//!
//! # Examples
//! ```
//! use live_chess::board::Board;
//!
//! let board = Board::new();
//! let mv = board.parse_san("e4").unwrap();
//! assert_eq!(board.move_to_san(&mv), "e4");
//! ```

use super::error::SanError;
use super::{Board, Move, MoveKind, Piece, Square};

impl Board {
    /// Format a legal move in Standard Algebraic Notation.
    ///
    /// Returns notation like "e4", "Nf3", "Bxc6+", "O-O-O", "e8=Q#"
    #[must_use]
    pub fn move_to_san(&self, mv: &Move) -> String {
        let mut san = match mv.kind() {
            MoveKind::CastleKingside => "O-O".to_string(),
            MoveKind::CastleQueenside => "O-O-O".to_string(),
            _ => self.piece_move_san(mv),
        };

        let after = self.play(*mv);
        if after.is_checkmate() {
            san.push('#');
        } else if after.is_in_check(after.side_to_move()) {
            san.push('+');
        }
        san
    }

    fn piece_move_san(&self, mv: &Move) -> String {
        let mut san = String::new();
        let piece = self.piece_on(mv.from()).unwrap_or(Piece::Pawn);

        if piece == Piece::Pawn {
            if mv.is_capture() {
                san.push(file_char(mv.from()));
            }
        } else {
            san.push(piece.to_char().to_ascii_uppercase());
            let (needs_file, needs_rank) = self.needs_disambiguation(mv, piece);
            if needs_file {
                san.push(file_char(mv.from()));
            }
            if needs_rank {
                san.push(rank_char(mv.from()));
            }
        }

        if mv.is_capture() {
            san.push('x');
        }
        san.push_str(&mv.to().to_string());

        if let Some(promo) = mv.promotion() {
            san.push('=');
            san.push(promo.to_char().to_ascii_uppercase());
        }
        san
    }

    /// Determine if disambiguation is needed for a piece move.
    /// Returns (`needs_file`, `needs_rank`).
    fn needs_disambiguation(&self, mv: &Move, piece: Piece) -> (bool, bool) {
        let moves = self.legal_moves();
        let rivals: Vec<&Move> = moves
            .iter()
            .filter(|m| {
                m.to() == mv.to() && m.from() != mv.from() && self.piece_on(m.from()) == Some(piece)
            })
            .collect();

        if rivals.is_empty() {
            return (false, false);
        }

        let same_file = rivals.iter().any(|m| m.from().file() == mv.from().file());
        let same_rank = rivals.iter().any(|m| m.from().rank() == mv.from().rank());

        match (same_file, same_rank) {
            (false, _) => (true, false),
            (true, false) => (false, true),
            (true, true) => (true, true),
        }
    }

    /// Parse a move in Standard Algebraic Notation and resolve it against
    /// the legal moves of this position.
    ///
    /// Accepts notation like "e4", "Nf3", "Bxc6", "O-O", "e8=Q"
    /// with optional check indicators (+, #).
    ///
    /// # Errors
    ///
    /// Returns a [`SanError`] if the text is malformed, matches no legal
    /// move, or matches more than one.
    pub fn parse_san(&self, san: &str) -> Result<Move, SanError> {
        let san = san.trim().trim_end_matches(['+', '#', '!', '?']);
        if san.is_empty() {
            return Err(SanError::Empty);
        }

        match san {
            "O-O" | "0-0" => return self.find_castling_move(MoveKind::CastleKingside, san),
            "O-O-O" | "0-0-0" => return self.find_castling_move(MoveKind::CastleQueenside, san),
            _ => {}
        }

        let (piece, rest) = match san.chars().next() {
            Some(c) if c.is_ascii_uppercase() => {
                let piece = Piece::from_char(c).ok_or_else(|| SanError::NoMatchingMove {
                    san: san.to_string(),
                })?;
                (piece, &san[1..])
            }
            _ => (Piece::Pawn, san),
        };

        let (rest, promotion) = split_promotion(rest)?;
        if rest.len() < 2 || !rest.is_ascii() {
            return Err(SanError::InvalidSquare {
                notation: rest.to_string(),
            });
        }
        let (prefix, dest) = rest.split_at(rest.len() - 2);
        let dest: Square = dest.parse().map_err(|_| SanError::InvalidSquare {
            notation: dest.to_string(),
        })?;

        // A pawn named without a file stays on its own file
        let mut from_file = (piece == Piece::Pawn).then_some(dest.file());
        let mut from_rank = None;
        for c in prefix.chars().filter(|&c| c != 'x') {
            match c {
                'a'..='h' => from_file = Some(c as usize - 'a' as usize),
                '1'..='8' => from_rank = Some(c as usize - '1' as usize),
                _ => {
                    return Err(SanError::InvalidSquare {
                        notation: prefix.to_string(),
                    })
                }
            }
        }

        let moves = self.legal_moves();
        let mut matching = moves.iter().filter(|mv| {
            mv.to() == dest
                && self.piece_on(mv.from()) == Some(piece)
                && mv.promotion() == promotion
                && from_file.map_or(true, |file| mv.from().file() == file)
                && from_rank.map_or(true, |rank| mv.from().rank() == rank)
        });

        match (matching.next(), matching.next()) {
            (Some(mv), None) => Ok(*mv),
            (Some(_), Some(_)) => Err(SanError::AmbiguousMove {
                san: san.to_string(),
            }),
            (None, _) => Err(SanError::NoMatchingMove {
                san: san.to_string(),
            }),
        }
    }

    fn find_castling_move(&self, kind: MoveKind, san: &str) -> Result<Move, SanError> {
        self.legal_moves()
            .iter()
            .find(|mv| mv.kind() == kind)
            .copied()
            .ok_or_else(|| SanError::NoMatchingMove {
                san: san.to_string(),
            })
    }
}

/// Split a trailing "=Q" (or bare "Q") promotion suffix off `text`
fn split_promotion(text: &str) -> Result<(&str, Option<Piece>), SanError> {
    let Some(last) = text.chars().last() else {
        return Ok((text, None));
    };
    if !last.is_ascii_uppercase() {
        return Ok((text, None));
    }

    let piece = Piece::from_char(last)
        .filter(|p| p.is_promotable())
        .ok_or(SanError::InvalidPromotion { char: last })?;
    let body = &text[..text.len() - 1];
    Ok((body.strip_suffix('=').unwrap_or(body), Some(piece)))
}

fn file_char(sq: Square) -> char {
    (b'a' + sq.file() as u8) as char
}

fn rank_char(sq: Square) -> char {
    (b'1' + sq.rank() as u8) as char
}
