//! Durable game records.
//!
//! Each game is written to its own `game{N}.jsonl` file under the games
//! directory, where `N` is the first number not yet taken. A file holds one
//! JSON object per line: a `move` record per ply, an `undo` record for every
//! taken-back move, and a final `outcome` record once the game ends.
//!
//! ```text
//! {"type":"move","ply":1,"uci":"f2f3","kind":"normal","san":"f3","fen_after":"..."}
//! ...
//! {"type":"outcome","status":{"checkmate":{"winner":"black"}},"result":"0-1","transcript":"1. f3 e5 2. g4 Qh4#"}
//! ```
//!
//! Writes happen inside a scope that opens the file in append mode, writes,
//! flushes and syncs before returning, so a record is either fully on disk or
//! reported as an error.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::board::MoveKind;
use crate::config::RecorderConfig;
use crate::game::{GameStatus, Ply};

/// When records reach the disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlushPolicy {
    /// Append each record as soon as it is produced
    #[default]
    EveryMove,
    /// Buffer records and write the whole game at `finish`
    OnFinish,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// 1-based ply number
    pub ply: usize,
    pub uci: String,
    pub kind: MoveKind,
    pub san: String,
    pub fen_after: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub status: GameStatus,
    pub result: String,
    pub transcript: String,
}

/// One line of a game file
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameRecord {
    Move(MoveRecord),
    Undo { ply: usize },
    Outcome(OutcomeRecord),
}

#[derive(Debug)]
pub enum RecorderError {
    /// Creating or writing the game file failed
    Io { path: PathBuf, source: io::Error },
    /// A record could not be encoded
    Encode(serde_json::Error),
    /// The game was already finished; its file is closed
    Finished,
}

impl fmt::Display for RecorderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecorderError::Io { path, source } => {
                write!(f, "I/O error on '{}': {source}", path.display())
            }
            RecorderError::Encode(err) => write!(f, "Failed to encode record: {err}"),
            RecorderError::Finished => write!(f, "Game record is already finished"),
        }
    }
}

impl std::error::Error for RecorderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RecorderError::Io { source, .. } => Some(source),
            RecorderError::Encode(err) => Some(err),
            RecorderError::Finished => None,
        }
    }
}

impl From<serde_json::Error> for RecorderError {
    fn from(err: serde_json::Error) -> Self {
        RecorderError::Encode(err)
    }
}

/// Appends the records of a single game to its numbered file.
///
/// Records that could not be written stay queued and go out first, in
/// order, on the next write or [`GameRecorder::flush`].
#[derive(Debug)]
pub struct GameRecorder {
    games_dir: PathBuf,
    policy: FlushPolicy,
    path: Option<PathBuf>,
    pending: Vec<GameRecord>,
    // The outcome has been queued; nothing else may follow it
    closed: bool,
}

impl GameRecorder {
    /// A recorder for a new game. Nothing touches the disk until the first
    /// record is written.
    #[must_use]
    pub fn new(games_dir: impl Into<PathBuf>, policy: FlushPolicy) -> Self {
        GameRecorder {
            games_dir: games_dir.into(),
            policy,
            path: None,
            pending: Vec::new(),
            closed: false,
        }
    }

    #[must_use]
    pub fn from_config(config: &RecorderConfig) -> Self {
        GameRecorder::new(config.games_dir.clone(), config.flush)
    }

    /// A recorder for the next game in the same directory
    #[must_use]
    pub fn fresh(&self) -> Self {
        GameRecorder::new(self.games_dir.clone(), self.policy)
    }

    /// The game file, once it has been claimed
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub fn policy(&self) -> FlushPolicy {
        self.policy
    }

    /// The outcome has been handed over; it may still be waiting in the queue.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.closed
    }

    /// Number of records not yet on disk
    #[must_use]
    pub fn pending_records(&self) -> usize {
        self.pending.len()
    }

    /// Record ply number `ply` (1-based).
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError`] if the record cannot be written or the
    /// recorder is already finished. A record that failed to write stays
    /// queued.
    pub fn record_move(&mut self, ply: usize, entry: &Ply) -> Result<(), RecorderError> {
        let record = GameRecord::Move(MoveRecord {
            ply,
            uci: entry.mv.to_string(),
            kind: entry.mv.kind(),
            san: entry.san.clone(),
            fen_after: entry.after.to_fen(),
        });
        self.push(record)
    }

    /// Record that ply number `ply` was taken back.
    ///
    /// A move still in the queue is simply dropped; one already written gets
    /// an `undo` line.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError`] if the record cannot be written or the
    /// recorder is already finished.
    pub fn record_undo(&mut self, ply: usize) -> Result<(), RecorderError> {
        if self.closed {
            return Err(RecorderError::Finished);
        }
        let queued = self
            .pending
            .iter()
            .rposition(|r| matches!(r, GameRecord::Move(m) if m.ply == ply));
        match (queued, self.policy) {
            (Some(idx), _) => {
                self.pending.truncate(idx);
                Ok(())
            }
            (None, FlushPolicy::EveryMove) => self.push(GameRecord::Undo { ply }),
            (None, FlushPolicy::OnFinish) => Ok(()),
        }
    }

    /// Queue the outcome, write everything still pending and close the record.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError`] if writing fails or the recorder is already
    /// finished. After a failed write the outcome stays queued and
    /// [`GameRecorder::flush`] retries it.
    pub fn finish(&mut self, status: GameStatus, transcript: String) -> Result<(), RecorderError> {
        if self.closed {
            return Err(RecorderError::Finished);
        }
        self.pending.push(GameRecord::Outcome(OutcomeRecord {
            status,
            result: status.result().to_string(),
            transcript,
        }));
        self.closed = true;
        self.flush()
    }

    /// Write every queued record.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError`] if writing fails; the queue is kept intact.
    pub fn flush(&mut self) -> Result<(), RecorderError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let path = match &self.path {
            Some(path) => path.clone(),
            None => {
                let path = claim_game_file(&self.games_dir)?;
                self.path = Some(path.clone());
                path
            }
        };

        write_records(&path, &self.pending)?;
        log::debug!("Wrote {} record(s) to {}", self.pending.len(), path.display());
        let ends_game = matches!(self.pending.last(), Some(GameRecord::Outcome(_)));
        self.pending.clear();
        if ends_game {
            log::info!("Game record finished: {}", path.display());
        }
        Ok(())
    }

    fn push(&mut self, record: GameRecord) -> Result<(), RecorderError> {
        if self.closed {
            return Err(RecorderError::Finished);
        }
        self.pending.push(record);
        match self.policy {
            FlushPolicy::EveryMove => self.flush(),
            FlushPolicy::OnFinish => Ok(()),
        }
    }
}

/// Append `records` to `path`, one JSON object per line, and sync.
fn write_records(path: &Path, records: &[GameRecord]) -> Result<(), RecorderError> {
    let file = OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(|source| io_error(path, source))?;

    let mut writer = BufWriter::new(file);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer
            .write_all(b"\n")
            .map_err(|source| io_error(path, source))?;
    }
    let file = writer
        .into_inner()
        .map_err(|err| io_error(path, err.into_error()))?;
    file.sync_all().map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: io::Error) -> RecorderError {
    RecorderError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Create the games directory if needed and take the first free `game{N}.jsonl`
fn claim_game_file(games_dir: &Path) -> Result<PathBuf, RecorderError> {
    fs::create_dir_all(games_dir).map_err(|source| io_error(games_dir, source))?;

    let mut number = 1u32;
    loop {
        let path = game_file_path(games_dir, number);
        match OpenOptions::new().append(true).create_new(true).open(&path) {
            Ok(_) => {
                log::info!("Recording game to {}", path.display());
                return Ok(path);
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => number += 1,
            Err(source) => return Err(io_error(&path, source)),
        }
    }
}

/// Path of game number `number` inside `games_dir`
#[must_use]
pub fn game_file_path(games_dir: &Path, number: u32) -> PathBuf {
    games_dir.join(format!("game{number}.jsonl"))
}

/// Read back every record of a game file
///
/// # Errors
///
/// Returns [`RecorderError`] if the file cannot be read or a line is not a
/// valid record.
pub fn read_records(path: &Path) -> Result<Vec<GameRecord>, RecorderError> {
    let text = fs::read_to_string(path).map_err(|source| io_error(path, source))?;
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(RecorderError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Color;

    #[test]
    fn test_record_line_format() {
        let record = GameRecord::Undo { ply: 3 };
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"type":"undo","ply":3}"#
        );

        let outcome = GameRecord::Outcome(OutcomeRecord {
            status: GameStatus::Checkmate {
                winner: Color::Black,
            },
            result: "0-1".to_string(),
            transcript: "1. f3 e5 2. g4 Qh4#".to_string(),
        });
        let line = serde_json::to_string(&outcome).unwrap();
        assert!(line.starts_with(r#"{"type":"outcome","status":{"checkmate":{"winner":"black"}}"#));
        assert_eq!(serde_json::from_str::<GameRecord>(&line).unwrap(), outcome);
    }

    #[test]
    fn test_game_file_path() {
        let path = game_file_path(Path::new("games"), 3);
        assert_eq!(path, PathBuf::from("games").join("game3.jsonl"));
    }

    #[test]
    fn test_nothing_written_before_first_record() {
        let dir = std::env::temp_dir().join(format!("live_chess_unused_{}", std::process::id()));
        let recorder = GameRecorder::new(&dir, FlushPolicy::EveryMove);
        assert!(recorder.path().is_none());
        assert!(!dir.exists());
    }
}
