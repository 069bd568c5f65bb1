use super::{game_from, play, request, sq};
use crate::board::{Board, BoardBuilder, Color, MoveKind, Piece};
use crate::config::{EngineConfig, PromotionPolicy};
use crate::game::{DetectedMove, Game, GameError, GameStatus};

const FOOLS_MATE: [&str; 4] = ["f2f3", "e7e5", "g2g4", "d8h4"];

fn auto_queen() -> EngineConfig {
    EngineConfig {
        promotion: PromotionPolicy::AutoQueen,
        ..EngineConfig::default()
    }
}

#[test]
fn test_new_game_state() {
    let game = Game::new();
    assert_eq!(game.board(), &Board::new());
    assert_eq!(game.status(), GameStatus::InProgress);
    assert_eq!(game.status().result(), "*");
    assert_eq!(game.side_to_move(), Color::White);
    assert_eq!(game.legal_moves().len(), 20);
    assert!(game.history().is_empty());
    assert!(game.last_move().is_none());
    assert!(game.recorder().is_none());
}

#[test]
fn test_fools_mate_ends_game() {
    let mut game = Game::new();
    play(&mut game, &FOOLS_MATE);

    assert_eq!(
        game.status(),
        GameStatus::Checkmate {
            winner: Color::Black
        }
    );
    assert!(game.is_over());
    assert_eq!(game.status().result(), "0-1");
    assert_eq!(game.status().to_string(), "checkmate, Black wins");
    assert_eq!(game.san_moves(), vec!["f3", "e5", "g4", "Qh4#"]);
    assert_eq!(game.transcript(), "1. f3 e5 2. g4 Qh4#");
    assert!(game.legal_moves().is_empty());
    assert!(game.legal_destinations(sq("e1")).is_empty());

    let err = game.submit(request("e2e4")).unwrap_err();
    assert!(matches!(err, GameError::GameOver { .. }));
    assert_eq!(game.history().len(), 4);
}

#[test]
fn test_rejected_move_leaves_game_unchanged() {
    let mut game = Game::new();
    play(&mut game, &["e2e4"]);
    let before = *game.board();

    // Pawn jump, wrong side, empty square
    for uci in ["e7e4", "d2d4", "e3e4"] {
        let err = game.submit(request(uci)).unwrap_err();
        assert!(matches!(err, GameError::IllegalMove(_)), "{uci}: {err}");
    }
    assert_eq!(game.board(), &before);
    assert_eq!(game.history().len(), 1);
    assert_eq!(game.status(), GameStatus::InProgress);
}

#[test]
fn test_history_records_plies() {
    let mut game = Game::new();
    play(&mut game, &["e2e4", "d7d5", "e4d5"]);

    let history = game.history();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].before, Board::new());
    assert_eq!(history[0].after, history[1].before);
    assert_eq!(history[2].after, *game.board());
    assert_eq!(history[2].mv.kind(), MoveKind::Capture);
    assert_eq!(history[2].san, "exd5");
    assert_eq!(game.last_move(), Some(history[2].mv));
    assert_eq!(game.start_position(), &Board::new());
}

#[test]
fn test_promotion_rejected_by_default() {
    let mut game = game_from("8/P6k/8/8/8/8/8/K7 w - - 0 1", EngineConfig::default());
    let before = *game.board();

    for uci in ["a7a8", "a7a8q"] {
        let err = game.submit(request(uci)).unwrap_err();
        assert!(matches!(err, GameError::PromotionUnsupported { .. }), "{uci}: {err}");
    }
    assert_eq!(game.board(), &before);

    // Other moves still go through
    play(&mut game, &["a1b1"]);
}

#[test]
fn test_auto_queen_promotion() {
    let mut game = game_from("8/P6k/8/8/8/8/8/K7 w - - 0 1", auto_queen());
    let mv = game.submit(request("a7a8")).unwrap();
    assert_eq!(mv.promotion(), Some(Piece::Queen));
    assert_eq!(game.board().piece_at(sq("a8")), Some((Color::White, Piece::Queen)));
    assert_eq!(game.san_moves(), vec!["a8=Q"]);

    // An explicit piece is honored
    let mut game = game_from("8/P6k/8/8/8/8/8/K7 w - - 0 1", auto_queen());
    let mv = game.submit(request("a7a8n")).unwrap();
    assert_eq!(mv.promotion(), Some(Piece::Knight));
    assert_eq!(game.board().piece_on(sq("a8")), Some(Piece::Knight));
}

#[test]
fn test_undo() {
    let mut game = Game::new();
    assert!(matches!(game.undo(), Err(GameError::NothingToUndo)));

    play(&mut game, &["e2e4", "e7e5"]);
    let undone = game.undo().unwrap();
    assert_eq!(undone.to_string(), "e7e5");
    assert_eq!(game.side_to_move(), Color::Black);
    assert_eq!(game.history().len(), 1);

    game.undo().unwrap();
    assert_eq!(game.board(), &Board::new());
    assert!(matches!(game.undo(), Err(GameError::NothingToUndo)));
}

#[test]
fn test_undo_reopens_finished_game() {
    let mut game = Game::new();
    play(&mut game, &FOOLS_MATE);
    assert!(game.is_over());

    game.undo().unwrap();
    assert_eq!(game.status(), GameStatus::InProgress);
    play(&mut game, &["d8g5"]);
    assert!(!game.is_over());
}

#[test]
fn test_new_game_resets() {
    let mut game = game_from("8/P6k/8/8/8/8/8/K7 w - - 0 1", auto_queen());
    play(&mut game, &["a1b1"]);

    game.new_game();
    assert_eq!(game.board(), &Board::new());
    assert!(game.history().is_empty());
    assert_eq!(game.status(), GameStatus::InProgress);
    assert_eq!(game.config().promotion, PromotionPolicy::AutoQueen);
}

#[test]
fn test_stalemate_ends_game() {
    let mut game = game_from("7k/4Q3/6K1/8/8/8/8/8 w - - 0 1", EngineConfig::default());
    play(&mut game, &["e7f7"]);
    assert_eq!(game.status(), GameStatus::Stalemate);
    assert_eq!(game.status().result(), "1/2-1/2");
    assert!(game.legal_moves().is_empty());
}

#[test]
fn test_transcript_starting_with_black() {
    let mut game = game_from(
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
        EngineConfig::default(),
    );
    play(&mut game, &["e7e5", "g1f3"]);
    assert_eq!(game.transcript(), "1... e5 2. Nf3");
}

#[test]
fn test_from_board_validates() {
    let mut lonely = Board::empty();
    lonely.set_piece(sq("e1"), Color::White, Piece::King);
    let err = Game::from_board(lonely, EngineConfig::default()).unwrap_err();
    assert!(matches!(err, GameError::InconsistentState(_)), "{err}");

    let built = BoardBuilder::new()
        .piece(sq("e1"), Color::White, Piece::King)
        .piece(sq("e8"), Color::Black, Piece::King)
        .piece(sq("a2"), Color::White, Piece::Rook)
        .build()
        .unwrap();
    let game = Game::from_board(built, EngineConfig::default()).unwrap();
    assert_eq!(game.status(), GameStatus::InProgress);
    assert_eq!(game.start_position(), &built);
}

#[test]
fn test_legal_destinations() {
    let game = Game::new();
    let mut targets = game.legal_destinations(sq("e2"));
    targets.sort();
    assert_eq!(targets, vec![sq("e3"), sq("e4")]);
    assert!(game.legal_destinations(sq("e7")).is_empty());
}

#[test]
fn test_submit_detected() {
    let mut game = Game::new();
    // The recognizer's piece guess is advisory
    let detected = DetectedMove {
        from: sq("g1"),
        to: sq("f3"),
        piece: Some(Piece::Bishop),
    };
    let mv = game.submit_detected(detected).unwrap();
    assert_eq!(mv.to_string(), "g1f3");
    assert_eq!(game.san_moves(), vec!["Nf3"]);
}

#[test]
fn test_submit_changed_squares() {
    let mut game = Game::new();
    let mv = game
        .submit_changed_squares(&[sq("e4"), sq("e2")], false)
        .unwrap();
    assert_eq!(mv.to_string(), "e2e4");

    let err = game
        .submit_changed_squares(&[sq("a7"), sq("h2")], false)
        .unwrap_err();
    assert!(matches!(err, GameError::Unresolved { ref squares } if squares.len() == 2));
    assert_eq!(game.history().len(), 1);
}
