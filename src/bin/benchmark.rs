use clap::Parser;
use colored::Colorize;
use minimax::game_wrapper::{EvaluatorWrapper, GameWrapper};
use minimax::games::checkers::CheckersState;
use minimax::games::connect4::Connect4State;
use minimax::games::tictactoe::TicTacToeState;
use minimax::{GameState, Minimax, Player, RandomAgent};
use rayon::prelude::*;
use serde::Serialize;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Game to play ("connect4" | "tictactoe" | "checkers").
    #[arg(long, default_value = "connect4", value_parser = ["connect4", "tictactoe", "checkers"])]
    game: String,

    /// Search depth in plies for engine A, which plays Player One.
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..=10))]
    depth_a: u32,

    /// Search depth in plies for engine B, which plays Player Two.
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..=10))]
    depth_b: u32,

    /// Abort a match that is still running after this many plies.
    #[arg(long, default_value_t = 64, value_parser = clap::value_parser!(u32).range(4..=200))]
    max_turns: u32,

    /// Number of matches to play.
    #[arg(long, default_value_t = 1)]
    games: usize,

    /// Worker threads for a match series. 0 uses one per CPU.
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Replace engine B with a seeded random player.
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    random_b: bool,

    /// Base seed for the random player; match i in a series adds i.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Print every turn as it is played (single-match mode only).
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    verbose: bool,

    /// Skip search-tree capture to keep per-move memory flat.
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    no_tree: bool,

    /// Emit the full report as JSON instead of text.
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    json: bool,
}

#[derive(Clone)]
struct MatchSettings {
    game: String,
    depth_a: u32,
    depth_b: u32,
    max_turns: u32,
    random_b: bool,
    seed: u64,
    no_tree: bool,
    verbose: bool,
}

impl MatchSettings {
    fn from_args(args: &Args) -> Self {
        MatchSettings {
            game: args.game.clone(),
            depth_a: args.depth_a,
            depth_b: args.depth_b,
            max_turns: args.max_turns,
            random_b: args.random_b,
            seed: args.seed,
            no_tree: args.no_tree,
            verbose: args.verbose,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct TurnRecord {
    turn: u32,
    engine: String,
    as_player: Player,
    mv: String,
    best_score: Option<i32>,
    nodes_expanded: u64,
    duration: Duration,
}

#[derive(Debug, Clone, Serialize)]
struct MatchReport {
    game: String,
    rows: usize,
    cols: usize,
    depth_a: u32,
    depth_b: u32,
    random_b: bool,
    turns: Vec<TurnRecord>,
    over: bool,
    winner: Option<Player>,
    max_turns_hit: bool,
    total_nodes: u64,
    total_time: Duration,
    final_board: String,
    error: Option<String>,
}

enum Opponent {
    Search(Minimax<GameWrapper>),
    Random(RandomAgent),
}

fn make_game(name: &str) -> GameWrapper {
    match name {
        "tictactoe" => GameWrapper::TicTacToe(TicTacToeState::new()),
        "checkers" => GameWrapper::Checkers(CheckersState::new()),
        _ => GameWrapper::Connect4(Connect4State::default()),
    }
}

fn run_match(settings: &MatchSettings) -> MatchReport {
    let mut game = make_game(&settings.game);
    let (rows, cols) = game.board_size();

    let engine_a = Minimax::new(settings.depth_a, Box::new(EvaluatorWrapper::for_game(&game)))
        .with_tree_capture(!settings.no_tree);
    let mut engine_b = if settings.random_b {
        Opponent::Random(RandomAgent::new(settings.seed))
    } else {
        Opponent::Search(
            Minimax::new(settings.depth_b, Box::new(EvaluatorWrapper::for_game(&game)))
                .with_tree_capture(!settings.no_tree),
        )
    };

    let mut turns: Vec<TurnRecord> = Vec::new();
    let mut total_nodes = 0u64;
    let mut total_time = Duration::ZERO;
    let mut error = None;

    for turn in 0..settings.max_turns {
        if game.game_over().0 {
            break;
        }
        let (label, as_player) = if turn % 2 == 0 {
            ("A", Player::One)
        } else {
            ("B", Player::Two)
        };

        let (mv, diagnostics) = if as_player == Player::One {
            let (mv, diag) = engine_a.choose_move(&game, as_player);
            (mv, Some(diag))
        } else {
            match &mut engine_b {
                Opponent::Search(engine) => {
                    let (mv, diag) = engine.choose_move(&game, as_player);
                    (mv, Some(diag))
                }
                Opponent::Random(agent) => (agent.choose_move(&game, as_player), None),
            }
        };

        let mv = match mv {
            Some(mv) => mv,
            None => {
                error = Some(format!("engine {} had no move on turn {}", label, turn + 1));
                break;
            }
        };
        if let Err(rejection) = game.drop_piece(&mv, as_player) {
            error = Some(format!(
                "engine {} played an illegal move on turn {}: {}",
                label,
                turn + 1,
                rejection
            ));
            break;
        }

        let (best_score, nodes, took) = match &diagnostics {
            Some(diag) => (
                diag.evaluated_moves.iter().find(|e| e.mv == mv).map(|e| e.score),
                diag.nodes_expanded,
                diag.duration,
            ),
            None => (None, 0, Duration::ZERO),
        };
        total_nodes += nodes;
        total_time += took;

        if settings.verbose {
            println!("turn {:>3}  {}  {}  {}", turn + 1, label, as_player, mv);
        }

        turns.push(TurnRecord {
            turn: turn + 1,
            engine: label.to_string(),
            as_player,
            mv: mv.to_string(),
            best_score,
            nodes_expanded: nodes,
            duration: took,
        });
    }

    let (over, winner) = game.game_over();
    let max_turns_hit = turns.len() as u32 >= settings.max_turns && !over;
    MatchReport {
        game: settings.game.clone(),
        rows,
        cols,
        depth_a: settings.depth_a,
        depth_b: settings.depth_b,
        random_b: settings.random_b,
        turns,
        over,
        winner,
        max_turns_hit,
        total_nodes,
        total_time,
        final_board: game.to_string(),
        error,
    }
}

fn print_report(index: usize, report: &MatchReport, series: bool) {
    if series {
        println!("\nMatch {}:", index + 1);
    } else {
        println!();
    }

    if let Some(error) = &report.error {
        println!("  {}", error.red());
    }

    let engine_b = if report.random_b {
        "Engine B (random)".to_string()
    } else {
        format!("Engine B (depth {})", report.depth_b)
    };
    let verdict = match report.winner {
        Some(Player::One) => format!(
            "Engine A (depth {}) prevailed while playing as {}.",
            report.depth_a,
            Player::One
        )
        .green(),
        Some(Player::Two) => format!("{} prevailed while playing as {}.", engine_b, Player::Two).red(),
        None if report.over => "The engines fought to a draw.".yellow(),
        None => format!("No decision within {} plies.", report.turns.len()).yellow(),
    };
    println!("  {}", verdict);

    let secs = report.total_time.as_secs_f64();
    let nps = if secs > 0.0 { report.total_nodes as f64 / secs } else { 0.0 };
    println!(
        "  Across {} plies the engines expanded {} nodes in {:.3}s.",
        report.turns.len(),
        report.total_nodes,
        secs
    );
    println!("  NPS: {:.0} nodes/sec", nps);
    if report.max_turns_hit {
        println!("  {}", "Turn limit reached before a result.".yellow());
    }

    if !series {
        println!("\nFinal board:\n{}", report.final_board);
    }
}

fn print_series_summary(reports: &[MatchReport]) {
    let a_wins = reports.iter().filter(|r| r.winner == Some(Player::One)).count();
    let b_wins = reports.iter().filter(|r| r.winner == Some(Player::Two)).count();
    let draws = reports.len() - a_wins - b_wins;
    let total_nodes: u64 = reports.iter().map(|r| r.total_nodes).sum();
    let total_secs: f64 = reports.iter().map(|r| r.total_time.as_secs_f64()).sum();

    println!("\nSeries Results:");
    println!("  {}", format!("A wins: {}", a_wins).green());
    println!("  {}", format!("B wins: {}", b_wins).red());
    println!("  {}", format!("Draws:  {}", draws).yellow());
    println!("  Total Nodes: {}", total_nodes);
    println!("  Search Time: {:.3}s", total_secs);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let threads = if args.threads == 0 { num_cpus::get() } else { args.threads };

    if !args.json {
        println!("Minimax Arena - Match Runner");
        println!("============================");
        println!("Game: {}", args.game);
        println!("Engine A: depth {}", args.depth_a);
        if args.random_b {
            println!("Engine B: random (seed {})", args.seed);
        } else {
            println!("Engine B: depth {}", args.depth_b);
        }
        println!("Matches: {} | Max turns: {} | Threads: {}", args.games, args.max_turns, threads);
        println!("----------------------------");
    }

    let reports: Vec<MatchReport> = if args.games > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .expect("failed to build the match worker pool");
        pool.install(|| {
            (0..args.games)
                .into_par_iter()
                .map(|i| {
                    let mut settings = MatchSettings::from_args(&args);
                    settings.seed = args.seed.wrapping_add(i as u64);
                    // Per-turn lines from parallel workers interleave, so
                    // series mode keeps them off.
                    settings.verbose = false;
                    run_match(&settings)
                })
                .collect()
        })
    } else {
        vec![run_match(&MatchSettings::from_args(&args))]
    };

    if args.json {
        let rendered = serde_json::to_string_pretty(&reports).expect("report serialization failed");
        println!("{}", rendered);
        return;
    }

    let series = reports.len() > 1;
    for (i, report) in reports.iter().enumerate() {
        print_report(i, report, series);
    }
    if series {
        print_series_summary(&reports);
    }
}
