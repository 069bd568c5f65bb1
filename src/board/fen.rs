use std::str::FromStr;

use super::error::FenError;
use super::{Board, Color, Piece, Square};

impl Board {
    /// Parse a board position from FEN notation.
    ///
    /// The halfmove clock and fullmove number are optional and default to
    /// `0` and `1`. The resulting position must pass [`Board::validate`].
    ///
    /// # Errors
    ///
    /// Returns a [`FenError`] if the text is malformed or describes an
    /// impossible position.
    pub fn try_from_fen(fen: &str) -> Result<Self, FenError> {
        let mut board = Board::empty();
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        // Piece placement, rank 8 first
        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidRank { rank: ranks.len() });
        }
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx;
            let mut file = 0;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as usize;
                    continue;
                }
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                let sq = Square::new(rank, file).ok_or(FenError::WrongFileCount {
                    rank: rank + 1,
                    files: file + 1,
                })?;
                board.set_piece(sq, color, piece);
                file += 1;
            }
            if file != 8 {
                return Err(FenError::WrongFileCount {
                    rank: rank + 1,
                    files: file,
                });
            }
        }

        board.side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        if parts[2] != "-" {
            for c in parts[2].chars() {
                match c {
                    'K' => board.castling_rights.set(Color::White, true),
                    'Q' => board.castling_rights.set(Color::White, false),
                    'k' => board.castling_rights.set(Color::Black, true),
                    'q' => board.castling_rights.set(Color::Black, false),
                    _ => return Err(FenError::InvalidCastling { char: c }),
                }
            }
        }

        board.en_passant_target = match parts[3] {
            "-" => None,
            notation => Some(notation.parse::<Square>().map_err(|_| {
                FenError::InvalidEnPassant {
                    found: notation.to_string(),
                }
            })?),
        };

        let counter = |text: &str| {
            text.parse::<u32>().map_err(|_| FenError::InvalidCounter {
                found: text.to_string(),
            })
        };
        if let Some(halfmove) = parts.get(4) {
            board.halfmove_clock = counter(halfmove)?;
        }
        if let Some(fullmove) = parts.get(5) {
            board.fullmove_number = counter(fullmove)?.max(1);
        }

        board.validate()?;
        board.hash = board.calculate_hash();
        Ok(board)
    }

    /// Convert the board position to FEN notation.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let grid = self.squares();
        let mut rows: Vec<String> = Vec::with_capacity(8);
        for rank in (0..8).rev() {
            let mut row = String::new();
            let mut empty = 0;
            for cell in grid[rank] {
                match cell {
                    Some((color, piece)) => {
                        if empty > 0 {
                            row.push_str(&empty.to_string());
                            empty = 0;
                        }
                        row.push(piece.to_fen_char(color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }

        let active = match self.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        };
        let ep = self
            .en_passant_target
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{} {} {} {} {} {}",
            rows.join("/"),
            active,
            self.castling_rights,
            ep,
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::try_from_fen(s)
    }
}
