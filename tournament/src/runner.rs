// ═══════════════════════════════════════════════════════════════════════
// Game runner — drives one agent-controlled game to completion
// ═══════════════════════════════════════════════════════════════════════

use conquest_agents::Agent;
use conquest_engine::{PlayerId, TurnEngine};

#[derive(Debug, Clone)]
pub struct GameOutcome {
    pub winner: Option<String>,
    pub rounds: u32,
}

/// Play up to `max_turns` rounds of reinforcement / issue / execute. The
/// engine must already be set up (map validated, players added, territories
/// assigned). Agents are re-derived from the engine's strategy tags each
/// round, so a reclassification takes effect immediately. Returns the
/// winner's name, or None for a draw at the turn limit.
pub fn run_game(engine: &mut TurnEngine, agents: &mut [Agent], max_turns: u32) -> GameOutcome {
    for round in 1..=max_turns {
        engine.reinforcement_phase();
        engine.transition("issueorder");
        for idx in 0..agents.len() {
            let id = PlayerId(idx as u8);
            let Some(player) = engine.players().get(idx) else {
                continue;
            };
            if player.eliminated {
                continue;
            }
            let kind = player.strategy;
            if agents[idx].kind() != kind {
                agents[idx] = Agent::from_kind(kind);
            }
            let plan = {
                let Some(map) = engine.map() else {
                    return GameOutcome {
                        winner: None,
                        rounds: round - 1,
                    };
                };
                agents[idx].issue_orders(map, engine.players(), id)
            };
            engine.apply_plan(id, plan);
        }
        engine.transition("endissueorders");
        if let Some(winner) = engine.execute_orders_phase() {
            engine.transition("win");
            let name = engine.players()[winner.0 as usize].name.clone();
            return GameOutcome {
                winner: Some(name),
                rounds: round,
            };
        }
        engine.transition("endexecorders");
    }
    GameOutcome {
        winner: None,
        rounds: max_turns,
    }
}
