// ═══════════════════════════════════════════════════════════════════════
// Tournament harness — the map x game grid
//
// Each cell is a fresh, fully independent engine; nothing mutable crosses
// cell boundaries, so the grid fans out over rayon and the matrix is
// assembled in deterministic order afterwards. Cell seeds come from one
// seeded stream, so a whole tournament replays from its master seed.
// ═══════════════════════════════════════════════════════════════════════

use crate::runner::{run_game, GameOutcome};
use conquest_agents::Agent;
use conquest_engine::{GameEvent, TournamentParamError, TournamentSpec, TurnEngine};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameVerdict {
    Winner(String),
    Draw,
    InvalidMap,
}

impl std::fmt::Display for GameVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameVerdict::Winner(name) => write!(f, "{name}"),
            GameVerdict::Draw => write!(f, "Draw"),
            GameVerdict::InvalidMap => write!(f, "InvalidMap"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellOutcome {
    pub verdict: GameVerdict,
    pub rounds: u32,
    /// Formatted engine event lines from this game, in firing order.
    pub log: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentReport {
    pub spec: TournamentSpec,
    pub seed: u64,
    /// `cells[map_index][game_index]`, always `maps x games_per_map`.
    pub cells: Vec<Vec<CellOutcome>>,
}

impl TournamentReport {
    /// The consolidated block appended to the log sink after a run.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Tournament mode:");
        let _ = writeln!(out, "M: {}", self.spec.maps.join(", "));
        let strategies: Vec<String> = self
            .spec
            .strategies
            .iter()
            .map(ToString::to_string)
            .collect();
        let _ = writeln!(out, "P: {}", strategies.join(", "));
        let _ = writeln!(out, "G: {}", self.spec.games_per_map);
        let _ = writeln!(out, "D: {}", self.spec.max_turns);
        let _ = writeln!(out);
        let _ = write!(out, "{:<24}", "");
        for game in 1..=self.spec.games_per_map {
            let _ = write!(out, "{:<14}", format!("Game {game}"));
        }
        let _ = writeln!(out);
        for (mi, row) in self.cells.iter().enumerate() {
            let _ = write!(out, "{:<24}", self.spec.maps[mi]);
            for cell in row {
                let _ = write!(out, "{:<14}", cell.verdict.to_string());
            }
            let _ = writeln!(out);
        }
        out
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Run the whole grid. Parameter bounds are checked before any game is
/// played; a violation aborts the run without playing anything.
pub fn run_tournament(
    spec: &TournamentSpec,
    seed: u64,
) -> Result<TournamentReport, TournamentParamError> {
    spec.validate()?;
    let mut seed_rng = ChaCha8Rng::seed_from_u64(seed);
    let cell_seeds: Vec<Vec<u64>> = (0..spec.maps.len())
        .map(|_| (0..spec.games_per_map).map(|_| seed_rng.gen()).collect())
        .collect();
    let cells: Vec<Vec<CellOutcome>> = spec
        .maps
        .par_iter()
        .enumerate()
        .map(|(mi, path)| {
            (0..spec.games_per_map as usize)
                .map(|gi| play_cell(path, spec, cell_seeds[mi][gi]))
                .collect()
        })
        .collect();
    Ok(TournamentReport {
        spec: spec.clone(),
        seed,
        cells,
    })
}

/// One independent game: fresh engine, one player per strategy (named after
/// it), two cards each, then the round loop. A map that fails to load or
/// validate records `InvalidMap` without playing.
fn play_cell(map_path: &str, spec: &TournamentSpec, seed: u64) -> CellOutcome {
    let mut engine = TurnEngine::new(seed);
    if !engine.process_command(&format!("loadmap {map_path}"))
        || !engine.process_command("validatemap")
    {
        return CellOutcome {
            verdict: GameVerdict::InvalidMap,
            rounds: 0,
            log: drain_log(&mut engine),
        };
    }
    for kind in &spec.strategies {
        engine.process_command(&format!("addplayer {kind} {kind}"));
    }
    engine.process_command("gamestart");
    engine.draw_cards(2);
    let mut agents: Vec<Agent> = spec
        .strategies
        .iter()
        .map(|&kind| Agent::from_kind(kind))
        .collect();
    let GameOutcome { winner, rounds } = run_game(&mut engine, &mut agents, spec.max_turns);
    CellOutcome {
        verdict: winner.map_or(GameVerdict::Draw, GameVerdict::Winner),
        rounds,
        log: drain_log(&mut engine),
    }
}

fn drain_log(engine: &mut TurnEngine) -> Vec<String> {
    engine.drain_events().iter().map(GameEvent::to_string).collect()
}
