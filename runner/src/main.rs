// ═══════════════════════════════════════════════════════════════════════
// Runner — CLI entry point for single games and tournaments
// ═══════════════════════════════════════════════════════════════════════

use clap::{Parser, Subcommand};
use conquest_agents::Agent;
use conquest_engine::{PlayerId, StrategyKind, TournamentSpec, TurnEngine};
use conquest_tournament::{run_game, run_tournament, Database, EventLog};

#[derive(Parser)]
#[command(name = "conquest", about = "Territory-conquest strategy lab")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single game on one map
    Play {
        #[arg(short, long)]
        map: String,
        /// Strategy roster, e.g. "Aggressive,Benevolent"
        #[arg(short, long, value_delimiter = ',', default_value = "Aggressive,Benevolent")]
        players: Vec<String>,
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(short = 't', long, default_value_t = 30)]
        max_turns: u32,
        /// Append event lines to this file
        #[arg(short, long)]
        log: Option<String>,
    },
    /// Run a map x strategy tournament grid
    Tournament {
        #[arg(short = 'M', long, value_delimiter = ',', required = true)]
        maps: Vec<String>,
        #[arg(short = 'P', long, value_delimiter = ',', required = true)]
        players: Vec<String>,
        #[arg(short = 'G', long, default_value_t = 1)]
        games: u32,
        #[arg(short = 'D', long, default_value_t = 30)]
        max_turns: u32,
        #[arg(long, default_value = "results.db")]
        db: String,
        #[arg(long, default_value = "gamelog.txt")]
        log: String,
        /// Print the report as JSON instead of the text summary
        #[arg(long)]
        json: bool,
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
    },
    /// Show strategy standings from the results database
    Leaderboard {
        #[arg(long, default_value = "results.db")]
        db: String,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            map,
            players,
            seed,
            max_turns,
            log,
        } => cmd_play(&map, &players, seed, max_turns, log.as_deref()),
        Commands::Tournament {
            maps,
            players,
            games,
            max_turns,
            db,
            log,
            json,
            seed,
        } => cmd_tournament(maps, &players, games, max_turns, &db, &log, json, seed),
        Commands::Leaderboard { db } => cmd_leaderboard(&db),
    }
}

fn cmd_play(map: &str, players: &[String], seed: u64, max_turns: u32, log: Option<&str>) {
    let kinds = match parse_kinds(players) {
        Ok(kinds) => kinds,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };
    if !(2..=6).contains(&kinds.len()) {
        eprintln!("play needs 2 to 6 players, got {}", kinds.len());
        return;
    }

    let mut engine = TurnEngine::new(seed);
    if !engine.process_command(&format!("loadmap {map}")) {
        eprintln!("could not load '{map}'");
        return;
    }
    if !engine.process_command("validatemap") {
        eprintln!("'{map}' is not a valid map");
        return;
    }
    for (i, kind) in kinds.iter().enumerate() {
        engine.process_command(&format!("addplayer {}-{} {}", kind, i + 1, kind));
    }
    engine.process_command("gamestart");
    engine.draw_cards(2);

    let mut agents: Vec<Agent> = kinds.iter().map(|&k| Agent::from_kind(k)).collect();
    let outcome = run_game(&mut engine, &mut agents, max_turns);

    let events = engine.drain_events();
    if let Some(path) = log {
        match EventLog::file(path) {
            Ok(mut sink) => sink.lines(events.iter().map(ToString::to_string)),
            Err(err) => eprintln!("cannot open log '{path}': {err}"),
        }
    }

    match &outcome.winner {
        Some(winner) => println!("Winner: {winner} (round {})", outcome.rounds),
        None => println!("Draw after {} rounds", outcome.rounds),
    }
    println!("\nFinal standings:");
    for (i, player) in engine.players().iter().enumerate() {
        let held = engine
            .map()
            .map_or(0, |m| m.owned_count(PlayerId(i as u8)));
        println!(
            "  {:<20} territories: {:>3}{}",
            player.name,
            held,
            if player.eliminated { "  [eliminated]" } else { "" },
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_tournament(
    maps: Vec<String>,
    players: &[String],
    games: u32,
    max_turns: u32,
    db_path: &str,
    log_path: &str,
    json: bool,
    seed: u64,
) {
    let kinds = match parse_kinds(players) {
        Ok(kinds) => kinds,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("{}", TournamentSpec::USAGE);
            return;
        }
    };
    let spec = TournamentSpec {
        maps,
        strategies: kinds,
        games_per_map: games,
        max_turns,
    };
    let report = match run_tournament(&spec, seed) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("{}", TournamentSpec::USAGE);
            return;
        }
    };

    match EventLog::file(log_path) {
        Ok(mut sink) => {
            for row in &report.cells {
                for cell in row {
                    sink.lines(cell.log.iter());
                }
            }
            sink.block(&report.summary());
        }
        Err(err) => eprintln!("cannot open log '{log_path}': {err}"),
    }

    if json {
        println!("{}", report.to_json());
    } else {
        print!("{}", report.summary());
    }

    let db = Database::new(db_path);
    db.store_report(&report);
    println!("\nResults saved to: {db_path} ({} games stored)", db.game_count());
}

fn cmd_leaderboard(db_path: &str) {
    let db = Database::new(db_path);
    let board = db.leaderboard();
    if board.is_empty() {
        println!("No strategies recorded yet. Run a tournament first.");
        return;
    }
    println!("=== Leaderboard ===\n");
    println!("{:<16} {:>8} {:>8} {:>8}", "Strategy", "Games", "Wins", "Win %");
    println!("{}", "-".repeat(44));
    for (name, games, wins) in &board {
        let pct = if *games > 0 {
            *wins as f64 / *games as f64 * 100.0
        } else {
            0.0
        };
        println!("{name:<16} {games:>8} {wins:>8} {pct:>7.1}%");
    }
}

fn parse_kinds(names: &[String]) -> Result<Vec<StrategyKind>, String> {
    names.iter().map(|name| name.parse::<StrategyKind>()).collect()
}
