use std::env;
use std::process::ExitCode;

use live_chess::board::MoveRequest;
use live_chess::Game;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("usage: game_status <move1> <move2> ...");
        return ExitCode::FAILURE;
    }

    let mut game = Game::new();
    for uci in &args {
        let request: MoveRequest = match uci.parse() {
            Ok(request) => request,
            Err(err) => {
                eprintln!("{uci}: {err}");
                return ExitCode::FAILURE;
            }
        };
        if let Err(err) = game.submit(request) {
            eprintln!("{uci}: {err}");
            return ExitCode::FAILURE;
        }
    }

    let legal_moves = game.legal_moves();
    println!("side_to_move: {}", game.side_to_move());
    println!("status: {}", game.status());
    println!("result: {}", game.status().result());
    println!("fen: {}", game.board().to_fen());
    println!("transcript: {}", game.transcript());
    println!("legal_moves: {}", legal_moves.len());
    for mv in legal_moves.iter() {
        println!("{mv}");
    }
    ExitCode::SUCCESS
}
