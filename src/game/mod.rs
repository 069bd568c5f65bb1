//! Game state machine.
//!
//! A [`Game`] sequences moves on top of persistent [`Board`] values: it keeps
//! every `(before, move, after)` ply, decides when the game is over and hands
//! accepted moves to an optional [`GameRecorder`]. Once the status is terminal
//! the game is frozen until [`Game::undo`] or [`Game::new_game`].

mod detection;
mod error;
mod repetition;

#[cfg(test)]
mod tests;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Color, Move, MoveList, MoveRequest, Piece, Square};
use crate::config::{EngineConfig, PromotionPolicy};
use crate::recorder::GameRecorder;

pub use detection::{resolve_changed_squares, DetectedMove};
pub use error::GameError;

use repetition::RepetitionTable;

/// Where a game stands after the latest move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Checkmate { winner: Color },
    Stalemate,
    Draw(DrawReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawReason {
    FiftyMoveRule,
    ThreefoldRepetition,
    InsufficientMaterial,
}

impl GameStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    /// PGN-style result: "1-0", "0-1", "1/2-1/2", or "*" while in progress
    #[must_use]
    pub const fn result(self) -> &'static str {
        match self {
            GameStatus::InProgress => "*",
            GameStatus::Checkmate {
                winner: Color::White,
            } => "1-0",
            GameStatus::Checkmate {
                winner: Color::Black,
            } => "0-1",
            GameStatus::Stalemate | GameStatus::Draw(_) => "1/2-1/2",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::InProgress => write!(f, "in progress"),
            GameStatus::Checkmate { winner } => write!(f, "checkmate, {winner} wins"),
            GameStatus::Stalemate => write!(f, "stalemate"),
            GameStatus::Draw(DrawReason::FiftyMoveRule) => write!(f, "draw by fifty-move rule"),
            GameStatus::Draw(DrawReason::ThreefoldRepetition) => {
                write!(f, "draw by threefold repetition")
            }
            GameStatus::Draw(DrawReason::InsufficientMaterial) => {
                write!(f, "draw by insufficient material")
            }
        }
    }
}

/// One accepted move with the positions on either side of it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ply {
    pub before: Board,
    pub mv: Move,
    pub after: Board,
    /// The move in SAN, with check and mate suffixes
    pub san: String,
}

#[derive(Debug)]
pub struct Game {
    config: EngineConfig,
    start: Board,
    current: Board,
    plies: Vec<Ply>,
    status: GameStatus,
    repetitions: RepetitionTable,
    recorder: Option<GameRecorder>,
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

impl Game {
    /// A game from the initial position with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Game::with_config(EngineConfig::default())
    }

    /// A game from the initial position. A recorder is attached when the
    /// configuration names one.
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Game::start_from(Board::new(), config)
    }

    /// A game continuing from an arbitrary position.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InconsistentState`] if `board` breaks a board
    /// invariant.
    pub fn from_board(board: Board, config: EngineConfig) -> Result<Self, GameError> {
        board.validate()?;
        Ok(Game::start_from(board, config))
    }

    fn start_from(board: Board, config: EngineConfig) -> Self {
        let recorder = config.recorder.as_ref().map(GameRecorder::from_config);
        let mut game = Game {
            config,
            start: board,
            current: board,
            plies: Vec::new(),
            status: GameStatus::InProgress,
            repetitions: RepetitionTable::new(),
            recorder,
        };
        game.repetitions.increment(board.hash());
        game.status = game.evaluate_status();
        game
    }

    /// Replace the recorder, e.g. with one pointing at a test directory
    #[must_use]
    pub fn with_recorder(mut self, recorder: GameRecorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.current
    }

    #[must_use]
    pub fn start_position(&self) -> &Board {
        &self.start
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.current.side_to_move()
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn recorder(&self) -> Option<&GameRecorder> {
        self.recorder.as_ref()
    }

    /// Legal moves in the current position; empty once the game is over
    #[must_use]
    pub fn legal_moves(&self) -> MoveList {
        if self.is_over() {
            MoveList::default()
        } else {
            self.current.legal_moves()
        }
    }

    /// Where the piece on `from` may go, for highlighting in the viewer
    #[must_use]
    pub fn legal_destinations(&self, from: Square) -> Vec<Square> {
        self.legal_moves().destinations_from(from)
    }

    #[must_use]
    pub fn last_move(&self) -> Option<Move> {
        self.plies.last().map(|ply| ply.mv)
    }

    #[must_use]
    pub fn history(&self) -> &[Ply] {
        &self.plies
    }

    #[must_use]
    pub fn san_moves(&self) -> Vec<String> {
        self.plies.iter().map(|ply| ply.san.clone()).collect()
    }

    /// Numbered move text, e.g. "1. f3 e5 2. g4 Qh4#"
    #[must_use]
    pub fn transcript(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(self.plies.len() * 3 / 2);
        for (idx, ply) in self.plies.iter().enumerate() {
            let number = ply.before.fullmove_number();
            match ply.before.side_to_move() {
                Color::White => parts.push(format!("{number}.")),
                Color::Black if idx == 0 => parts.push(format!("{number}...")),
                Color::Black => {}
            }
            parts.push(ply.san.clone());
        }
        parts.join(" ")
    }

    /// Submit a move request for the side to move.
    ///
    /// On success the move is applied, the status recomputed and the move
    /// handed to the recorder.
    ///
    /// # Errors
    ///
    /// * [`GameError::GameOver`] if the game already ended.
    /// * [`GameError::PromotionUnsupported`] for promotions under
    ///   [`PromotionPolicy::Reject`].
    /// * [`GameError::IllegalMove`] if no legal move matches.
    ///
    /// In all of these cases the game is unchanged. A
    /// [`GameError::Recorder`] failure is reported after the move has been
    /// applied; the game state stays valid and play can continue.
    pub fn submit(&mut self, request: MoveRequest) -> Result<Move, GameError> {
        if self.is_over() {
            log::warn!("Rejected {request}: game is over ({})", self.status);
            return Err(GameError::GameOver {
                status: self.status,
            });
        }

        let request = self.apply_promotion_policy(request)?;
        let mv = self.current.resolve(&request).map_err(|err| {
            log::warn!("Rejected {request}: not a legal move");
            GameError::from(err)
        })?;

        let before = self.current;
        let after = before.play(mv);
        let san = before.move_to_san(&mv);
        log::debug!("Accepted {} ({san})", mv.to_log_string());

        self.current = after;
        self.repetitions.increment(after.hash());
        self.plies.push(Ply {
            before,
            mv,
            after,
            san,
        });
        self.status = self.evaluate_status();
        if self.is_over() {
            log::info!("Game over: {} ({})", self.status, self.status.result());
        }

        self.record_latest()?;
        Ok(mv)
    }

    fn apply_promotion_policy(&self, request: MoveRequest) -> Result<MoveRequest, GameError> {
        let is_promotion = self
            .current
            .legal_moves()
            .iter()
            .any(|m| m.from() == request.from && m.to() == request.to && m.is_promotion());
        if !is_promotion {
            return Ok(request);
        }

        match self.config.promotion {
            PromotionPolicy::Reject => {
                log::warn!("Rejected {request}: promotion is not supported");
                Err(GameError::PromotionUnsupported { request })
            }
            PromotionPolicy::AutoQueen if request.promotion.is_none() => {
                Ok(request.with_promotion(Piece::Queen))
            }
            PromotionPolicy::AutoQueen => Ok(request),
        }
    }

    fn record_latest(&mut self) -> Result<(), GameError> {
        let outcome = self
            .status
            .is_terminal()
            .then(|| (self.status, self.transcript()));
        // A finished record stays as written, even if the game is reopened
        let recorder = self.recorder.as_mut().filter(|r| !r.is_finished());
        let (Some(recorder), Some(ply)) = (recorder, self.plies.last()) else {
            return Ok(());
        };

        // Queue the outcome even if the move write failed
        let moved = recorder.record_move(self.plies.len(), ply);
        let finished = match outcome {
            Some((status, transcript)) => recorder.finish(status, transcript),
            None => Ok(()),
        };
        moved.and(finished).map_err(|err| {
            log::warn!("Recording failed: {err}");
            GameError::from(err)
        })
    }

    /// Write any records a previous failure left queued.
    ///
    /// Works on finished games too, so a game whose outcome could not be
    /// written can still complete its file.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Recorder`] if writing fails again; the queue is
    /// kept for the next attempt.
    pub fn retry_recording(&mut self) -> Result<(), GameError> {
        match self.recorder.as_mut() {
            Some(recorder) => recorder.flush().map_err(GameError::from),
            None => Ok(()),
        }
    }

    /// Take back the last move, reopening a finished game.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NothingToUndo`] when no move was played, or
    /// [`GameError::Recorder`] if the retraction could not be recorded (the
    /// move is taken back regardless).
    pub fn undo(&mut self) -> Result<Move, GameError> {
        let ply = self.plies.pop().ok_or(GameError::NothingToUndo)?;
        self.repetitions.decrement(ply.after.hash());
        self.current = ply.before;
        self.status = self.evaluate_status();
        log::debug!("Undid {}", ply.mv.to_log_string());

        if let Some(recorder) = self.recorder.as_mut().filter(|r| !r.is_finished()) {
            recorder.record_undo(self.plies.len() + 1)?;
        }
        Ok(ply.mv)
    }

    /// Start over from the initial position with the same configuration.
    ///
    /// A configured recorder moves on to a fresh game file.
    pub fn new_game(&mut self) {
        log::info!("New game after {} plies", self.plies.len());
        if let Some(unwritten) = self
            .recorder
            .as_ref()
            .map(GameRecorder::pending_records)
            .filter(|&n| n > 0)
        {
            log::warn!("Discarding {unwritten} unwritten record(s) of the previous game");
        }
        let config = self.config.clone();
        let recorder = self.recorder.as_ref().map(GameRecorder::fresh);
        *self = Game::start_from(Board::new(), config);
        self.recorder = recorder;
    }

    fn evaluate_status(&self) -> GameStatus {
        let board = &self.current;
        if board.legal_moves().is_empty() {
            return if board.is_in_check(board.side_to_move()) {
                GameStatus::Checkmate {
                    winner: board.side_to_move().opponent(),
                }
            } else {
                GameStatus::Stalemate
            };
        }

        let rules = self.config.draw_rules;
        if rules.insufficient_material && board.is_insufficient_material() {
            GameStatus::Draw(DrawReason::InsufficientMaterial)
        } else if rules.fifty_move && board.halfmove_clock() >= 100 {
            GameStatus::Draw(DrawReason::FiftyMoveRule)
        } else if rules.threefold_repetition && self.repetitions.get(board.hash()) >= 3 {
            GameStatus::Draw(DrawReason::ThreefoldRepetition)
        } else {
            GameStatus::InProgress
        }
    }
}
