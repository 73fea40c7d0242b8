use chess_scribe_core::replay::{replay_pgn_file, replay_pgn_string, ReplayedGame};
use chess_scribe_core::GameSession;
use std::env;
use std::process;

fn main() {
    tracing_subscriber::fmt::init();

    println!("Chess Scribe");
    println!("============");
    println!();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        process::exit(1);
    }

    match args[1].as_str() {
        "demo" => {
            run_demo();
        }
        "replay" => {
            if args.len() < 3 {
                println!("Error: Please provide a PGN file");
                println!("Usage: {} replay <pgn_file> [--json]", args[0]);
                process::exit(1);
            }
            let json = args.iter().any(|a| a == "--json");
            replay_file(&args[2], json);
        }
        _ => {
            print_usage(&args[0]);
            process::exit(1);
        }
    }
}

fn print_usage(program: &str) {
    println!("Usage: {} <command> [arguments]", program);
    println!();
    println!("Commands:");
    println!("  demo                     Run the built-in reconstruction demo");
    println!("  replay <pgn_file>        Replay games as simulated snapshots");
    println!("                           and reconstruct them from occupancy only");
    println!("          --json           Emit one JSON report per observation");
    println!();
    println!("Examples:");
    println!("  {} demo", program);
    println!("  {} replay games.pgn", program);
}

fn run_demo() {
    println!("---- Sequential reconstruction (turn known by tracking) ----");

    let opening = first_game("1. e4 e5 2. Nf3 *");
    let mut session = GameSession::new();

    for grid in &opening.grids {
        println!("Observed snapshot:");
        println!("{}", grid);
        match session.update(grid, None) {
            Some(fragment) => println!("Detected move: {}", fragment),
            None => println!("No valid move detected"),
        }
        println!();
    }

    println!("Full PGN:");
    println!("{}", session.pgn());
    println!();

    println!("---- Automatic turn inference ----");

    // Fresh session fed the same frames, but without saying who moved.
    let mut session = GameSession::new();
    for grid in &opening.grids {
        match session.process(grid) {
            Some(fragment) => println!("Inferred and detected: {}", fragment),
            None => println!("Couldn't infer a move"),
        }
    }
    println!();

    println!("---- Capture implicates the mover across skipped frames ----");

    let ruy = first_game("1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 4. Bxc6 *");
    let mut session = GameSession::new();

    // Observe everything up to 3...a6, then skip straight to the position
    // after the capture.
    for grid in &ruy.grids[..ruy.grids.len() - 1] {
        session.process(grid);
    }
    match session.process(ruy.grids.last().unwrap()) {
        Some(fragment) => println!("Recovered without turn information: {}", fragment),
        None => println!("No valid move detected"),
    }
    println!();
    println!("Full PGN:");
    println!("{}", session.pgn());
}

fn first_game(pgn: &str) -> ReplayedGame {
    match replay_pgn_string(pgn) {
        Ok(mut games) => games.remove(0),
        Err(e) => {
            println!("[ERROR] {}", e);
            process::exit(1);
        }
    }
}

fn replay_file(file_path: &str, json: bool) {
    println!("Loading: {}", file_path);
    println!();

    let games = match replay_pgn_file(file_path) {
        Ok(g) => g,
        Err(e) => {
            println!("[ERROR] {}", e);
            process::exit(1);
        }
    };

    println!("[OK] Found {} game(s)", games.len());
    println!();

    for (index, game) in games.iter().enumerate() {
        println!("================================================================");
        println!("Game {}: {} ({} plies)", index + 1, game.summary(), game.ply_count());
        if let Some(event) = &game.event {
            println!("Event: {}", event);
        }
        println!("================================================================");

        let mut session = GameSession::new();
        let mut recovered: Vec<String> = Vec::new();

        for grid in &game.grids {
            if json {
                let report = session.observe(grid);
                println!("{}", serde_json::to_string(&report).unwrap());
                if let Some(san) = report.detected_san {
                    recovered.push(san);
                }
            } else {
                match session.process(grid) {
                    Some(fragment) => {
                        print!("{} ", fragment);
                        if let Some(ply) = session.record().plies().last() {
                            recovered.push(ply.san.clone());
                        }
                    }
                    None => print!("(?) "),
                }
            }
        }
        if !json {
            println!();
        }
        println!();

        let matching = recovered
            .iter()
            .zip(&game.sans)
            .filter(|(got, want)| {
                got.trim_end_matches(['+', '#']) == want.trim_end_matches(['+', '#'])
            })
            .count();
        println!(
            "Recovered {}/{} plies, {} matching the source notation",
            recovered.len(),
            game.ply_count(),
            matching
        );
        println!();
        println!("{}", session.pgn());
        println!();
    }

    println!("[OK] Replay complete!");
}
