//! Sharing a game between the recognition and rendering threads.
//!
//! [`Game`] itself is single-threaded. [`SharedGame`] puts it behind a
//! `parking_lot::RwLock` so the renderer can take snapshots while the
//! recognition side submits moves one at a time.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::board::{Board, Move, MoveRequest, Square};
use crate::game::{Game, GameError, GameStatus};

/// What the renderer needs to draw one frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameSnapshot {
    pub board: Board,
    pub last_move: Option<Move>,
    pub status: GameStatus,
}

/// A cloneable, lock-guarded handle to one [`Game`].
#[derive(Clone, Debug)]
pub struct SharedGame(Arc<RwLock<Game>>);

impl SharedGame {
    #[must_use]
    pub fn new(game: Game) -> Self {
        SharedGame(Arc::new(RwLock::new(game)))
    }

    /// Shared access; blocks only while a move is being submitted.
    #[inline]
    pub fn read(&self) -> RwLockReadGuard<'_, Game> {
        self.0.read()
    }

    #[inline]
    pub fn write(&self) -> RwLockWriteGuard<'_, Game> {
        self.0.write()
    }

    /// Copy out the current position, last move and status
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        let game = self.read();
        GameSnapshot {
            board: *game.board(),
            last_move: game.last_move(),
            status: game.status(),
        }
    }

    #[must_use]
    pub fn legal_destinations(&self, from: Square) -> Vec<Square> {
        self.read().legal_destinations(from)
    }

    /// # Errors
    ///
    /// Same as [`Game::submit`].
    pub fn submit(&self, request: MoveRequest) -> Result<Move, GameError> {
        self.write().submit(request)
    }

    /// # Errors
    ///
    /// Same as [`Game::undo`].
    pub fn undo(&self) -> Result<Move, GameError> {
        self.write().undo()
    }

    /// # Errors
    ///
    /// Same as [`Game::retry_recording`].
    pub fn retry_recording(&self) -> Result<(), GameError> {
        self.write().retry_recording()
    }

    pub fn new_game(&self) {
        self.write().new_game();
    }

    /// Number of handles sharing this game
    #[must_use]
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

impl Default for SharedGame {
    fn default() -> Self {
        Self::new(Game::new())
    }
}

impl From<Game> for SharedGame {
    fn from(game: Game) -> Self {
        SharedGame::new(game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_snapshot_follows_submissions() {
        let shared = SharedGame::default();
        let snap = shared.snapshot();
        assert_eq!(snap.board, Board::new());
        assert_eq!(snap.last_move, None);
        assert_eq!(snap.status, GameStatus::InProgress);

        let mv = shared.submit("e2e4".parse().unwrap()).unwrap();
        let snap = shared.snapshot();
        assert_eq!(snap.last_move, Some(mv));
        assert_eq!(snap.board, *shared.read().board());

        shared.undo().unwrap();
        assert_eq!(shared.snapshot().board, Board::new());
    }

    #[test]
    fn test_handles_share_one_game() {
        let shared = SharedGame::default();
        let writer = shared.clone();
        assert_eq!(shared.handle_count(), 2);

        let handle = thread::spawn(move || {
            for uci in ["e2e4", "e7e5", "g1f3"] {
                writer.submit(uci.parse().unwrap()).unwrap();
            }
        });
        // Readers never observe a half-applied move
        for _ in 0..100 {
            let snap = shared.snapshot();
            assert!(snap.board.validate().is_ok());
        }
        handle.join().unwrap();

        assert_eq!(shared.read().san_moves(), vec!["e4", "e5", "Nf3"]);
        shared.new_game();
        assert!(shared.read().history().is_empty());
    }
}
