use std::fmt;

use crate::board::{IllegalMoveError, InvariantViolation, MoveRequest, Square};
use crate::recorder::RecorderError;

use super::GameStatus;

/// Why a game operation was refused.
#[derive(Debug)]
pub enum GameError {
    /// The request matches no legal move; the game is unchanged
    IllegalMove(IllegalMoveError),
    /// The game already reached a terminal status
    GameOver { status: GameStatus },
    /// Promotion moves are refused under `PromotionPolicy::Reject`
    PromotionUnsupported { request: MoveRequest },
    /// `undo` on a game without moves
    NothingToUndo,
    /// No legal move explains the detected square changes
    Unresolved { squares: Vec<Square> },
    /// The starting position breaks a board invariant
    InconsistentState(InvariantViolation),
    /// The move was accepted but could not be persisted
    Recorder(RecorderError),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::IllegalMove(err) => write!(f, "{err}"),
            GameError::GameOver { status } => write!(f, "Game is over ({status})"),
            GameError::PromotionUnsupported { request } => {
                write!(f, "Promotion '{request}' is not supported")
            }
            GameError::NothingToUndo => write!(f, "No move to undo"),
            GameError::Unresolved { squares } => {
                let names: Vec<String> = squares.iter().map(Square::to_string).collect();
                write!(f, "No legal move matches changed squares [{}]", names.join(", "))
            }
            GameError::InconsistentState(violation) => {
                write!(f, "Inconsistent state: {violation}")
            }
            GameError::Recorder(err) => write!(f, "Recording failed: {err}"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::IllegalMove(err) => Some(err),
            GameError::InconsistentState(violation) => Some(violation),
            GameError::Recorder(err) => Some(err),
            _ => None,
        }
    }
}

impl From<IllegalMoveError> for GameError {
    fn from(err: IllegalMoveError) -> Self {
        GameError::IllegalMove(err)
    }
}

impl From<InvariantViolation> for GameError {
    fn from(violation: InvariantViolation) -> Self {
        GameError::InconsistentState(violation)
    }
}

impl From<RecorderError> for GameError {
    fn from(err: RecorderError) -> Self {
        GameError::Recorder(err)
    }
}
