//! Edge case tests for special chess positions and moves.

use crate::board::{Board, Color, Move, MoveKind, MoveRequest, Piece, Square};

fn sq(s: &str) -> Square {
    s.parse().unwrap()
}

fn fen(fen: &str) -> Board {
    Board::try_from_fen(fen).unwrap()
}

fn play_uci(board: Board, moves: &[&str]) -> Board {
    moves.iter().fold(board, |board, uci| {
        let request: MoveRequest = uci.parse().unwrap();
        board.apply_request(&request).unwrap().1
    })
}

#[test]
fn test_stalemate_position() {
    let board = fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    assert!(!board.is_checkmate());
    assert!(board.is_stalemate());
    assert!(board.legal_moves().is_empty());
}

#[test]
fn test_fools_mate() {
    let board = play_uci(Board::new(), &["f2f3", "e7e5", "g2g4", "d8h4"]);
    assert!(board.is_checkmate());
    assert!(!board.is_stalemate());
    assert_eq!(board.side_to_move(), Color::White);
    assert!(board.legal_moves().is_empty());
}

#[test]
fn test_back_rank_mate() {
    let board = fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
    let mate = Move::quiet(sq("a1"), sq("a8"));
    assert!(board.legal_moves().contains(&mate));

    let after = board.apply(mate).unwrap();
    assert!(after.is_checkmate());
}

#[test]
fn test_underpromotion_to_knight() {
    let board = fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1");
    let moves = board.legal_moves();

    for piece in [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight] {
        assert!(
            moves.iter().any(|m| m.promotion() == Some(piece)),
            "{piece:?} promotion should be available"
        );
    }

    let request = MoveRequest::new(sq("a7"), sq("a8")).with_promotion(Piece::Knight);
    let (mv, after) = board.apply_request(&request).unwrap();
    assert_eq!(mv.kind(), MoveKind::Normal);
    assert_eq!(after.piece_at(sq("a8")), Some((Color::White, Piece::Knight)));
    assert!(after.pieces(Color::White, Piece::Pawn).is_empty());
}

#[test]
fn test_promotion_without_piece_is_not_a_legal_request() {
    let board = fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1");
    let request = MoveRequest::new(sq("a7"), sq("a8"));
    assert!(board.apply_request(&request).is_err());
}

#[test]
fn test_promotion_capture_is_classified_as_capture() {
    let board = fen("1n6/P7/8/8/8/8/8/K1k5 w - - 0 1");
    let request = MoveRequest::new(sq("a7"), sq("b8")).with_promotion(Piece::Queen);
    let (mv, after) = board.apply_request(&request).unwrap();
    assert_eq!(mv.kind(), MoveKind::Capture);
    assert!(mv.is_promotion());
    assert_eq!(after.piece_at(sq("b8")), Some((Color::White, Piece::Queen)));
    assert_eq!(after.halfmove_clock(), 0);
}

#[test]
fn test_en_passant_removes_correct_pawn() {
    let board = fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 1");
    let ep = Move::en_passant(sq("e5"), sq("d6"));
    assert!(board.legal_moves().contains(&ep));

    let after = board.apply(ep).unwrap();
    assert!(after.is_empty(sq("d5")), "Captured pawn should be removed");
    assert!(after.is_empty(sq("e5")));
    assert_eq!(after.piece_at(sq("d6")), Some((Color::White, Piece::Pawn)));

    // The original position is untouched
    assert_eq!(board.piece_at(sq("d5")), Some((Color::Black, Piece::Pawn)));
}

#[test]
fn test_en_passant_only_immediately() {
    let board = play_uci(Board::new(), &["e2e4", "a7a6", "e4e5", "d7d5"]);
    assert_eq!(board.en_passant_target(), Some(sq("d6")));
    assert!(board.legal_moves().iter().any(|m| m.is_en_passant()));

    let later = play_uci(board, &["a2a3", "a6a5"]);
    assert_eq!(later.en_passant_target(), None);
    assert!(!later.legal_moves().iter().any(|m| m.is_en_passant()));
}

#[test]
fn test_en_passant_target_lifecycle() {
    let after_push = play_uci(Board::new(), &["e2e4"]);
    assert_eq!(after_push.en_passant_target(), Some(sq("e3")));

    let after_single = play_uci(Board::new(), &["e2e3"]);
    assert_eq!(after_single.en_passant_target(), None);

    let after_reply = play_uci(after_push, &["b8c6"]);
    assert_eq!(after_reply.en_passant_target(), None);
}

#[test]
fn test_castling_available_when_path_is_safe() {
    let board = fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1");
    let castle = Move::castle_kingside(sq("e1"), sq("g1"));
    assert!(board.legal_moves().contains(&castle));

    let after = board.apply(castle).unwrap();
    assert_eq!(after.piece_at(sq("g1")), Some((Color::White, Piece::King)));
    assert_eq!(after.piece_at(sq("f1")), Some((Color::White, Piece::Rook)));
    assert!(after.is_empty(sq("h1")));
    assert!(after.castling_rights().is_empty());
}

#[test]
fn test_castling_through_attacked_square() {
    // Black rook on f2 covers f1
    let board = fen("4k3/8/8/8/8/8/5r2/R3K2R w KQ - 0 1");
    let moves = board.legal_moves();
    assert!(!moves.iter().any(|m| m.kind() == MoveKind::CastleKingside));
    assert!(moves.iter().any(|m| m.kind() == MoveKind::CastleQueenside));
}

#[test]
fn test_queenside_castling_ignores_attacked_b_file() {
    let board = fen("4k3/8/8/8/8/8/1r6/R3K3 w Q - 0 1");
    assert!(board
        .legal_moves()
        .iter()
        .any(|m| m.kind() == MoveKind::CastleQueenside));
}

#[test]
fn test_castling_blocked_by_check() {
    let board = fen("r3k2r/8/8/8/4Q3/8/8/R3K2R b KQkq - 0 1");
    assert!(board.is_in_check(Color::Black));
    assert!(!board.legal_moves().iter().any(|m| m.is_castling()));
}

#[test]
fn test_castling_needs_rook_on_home_square() {
    let board = fen("4k3/8/8/8/8/8/8/4K1R1 w K - 0 1");
    assert!(!board.legal_moves().iter().any(|m| m.is_castling()));
}

#[test]
fn test_capturing_home_rook_drops_right() {
    let board = fen("r3k2r/8/8/8/8/8/6B1/R3K2R w KQkq - 0 1");
    let after = board
        .apply_request(&MoveRequest::new(sq("g2"), sq("a8")))
        .unwrap()
        .1;
    assert!(!after.castling_rights().has(Color::Black, false));
    assert!(after.castling_rights().has(Color::Black, true));
    assert!(after.castling_rights().has(Color::White, true));
}

#[test]
fn test_double_check_only_king_can_move() {
    // Knight on f3 and rook on h1 both give check
    let board = fen("4k3/8/8/8/R7/5n2/8/4K2r w - - 0 1");
    let moves = board.legal_moves();
    assert!(!moves.is_empty());
    for mv in moves.iter() {
        assert_eq!(mv.from(), sq("e1"), "only the king may move, got {mv}");
    }
}

#[test]
fn test_pinned_piece_cannot_leave_the_line() {
    let board = fen("4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1");
    assert!(board.legal_destinations(sq("e2")).is_empty());

    let rook_pinned = fen("4k3/4r3/8/8/8/8/4R3/4K3 w - - 0 1");
    let destinations = rook_pinned.legal_destinations(sq("e2"));
    assert!(destinations.iter().all(|d| d.file() == 4));
    assert!(destinations.contains(&sq("e7")));
}

#[test]
fn test_pawn_attacks_count_on_empty_squares() {
    // The black pawn on e3 covers d2 and f2 even though both are empty
    let board = fen("4k3/8/8/8/8/4p3/8/4K3 w - - 0 1");
    assert!(board.is_square_attacked(sq("d2"), Color::Black));
    assert!(board.is_square_attacked(sq("f2"), Color::Black));
    let destinations = board.legal_destinations(sq("e1"));
    assert!(!destinations.contains(&sq("d2")));
    assert!(!destinations.contains(&sq("f2")));
}

#[test]
fn test_legal_destinations_for_hints() {
    let board = Board::new();
    assert_eq!(board.legal_destinations(sq("g1")), vec![sq("f3"), sq("h3")]);
    assert_eq!(board.legal_destinations(sq("e2")), vec![sq("e3"), sq("e4")]);
    assert!(board.legal_destinations(sq("e1")).is_empty());
    assert!(board.legal_destinations(sq("e4")).is_empty());
}

#[test]
fn test_board_from_str() {
    let board: Board = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        .parse()
        .unwrap();
    assert!(board.white_to_move());

    let result: Result<Board, _> = "invalid fen".parse();
    assert!(result.is_err());
}

#[test]
fn test_most_crowded_move_list_fits() {
    let board = fen("R6R/3Q4/1Q4Q1/4Q3/2Q4Q/Q4Q2/pp1Q4/kBNN1KB1 w - - 0 1");
    assert_eq!(board.legal_moves().len(), 218);
}
