// ═══════════════════════════════════════════════════════════════════════
// Events — what the engine reports instead of logging
//
// Every state-relevant mutation appends one event to the engine's buffer.
// A logging component drains the buffer and formats lines; the core never
// touches a sink, which keeps it testable without one.
// ═══════════════════════════════════════════════════════════════════════

use crate::types::{GameState, StrategyKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    StateChanged {
        from: GameState,
        to: GameState,
    },
    CommandRejected {
        state: GameState,
        keyword: String,
    },
    CommandFailed {
        state: GameState,
        keyword: String,
    },
    MapLoaded {
        path: String,
        territories: usize,
    },
    MapRejected {
        path: String,
        reason: String,
    },
    MapValidated {
        ok: bool,
    },
    PlayerAdded {
        name: String,
        strategy: StrategyKind,
    },
    TerritoriesAssigned {
        players: usize,
        territories: usize,
    },
    ReinforcementsGranted {
        player: String,
        amount: u32,
        pool: u32,
    },
    OrderIssued {
        player: String,
        order: String,
    },
    OrderRejected {
        player: String,
        order: String,
    },
    OrderExecuted {
        player: String,
        order: String,
        success: bool,
    },
    CardPlayed {
        player: String,
        card: String,
    },
    TruceDeclared {
        a: String,
        b: String,
    },
    TerritoryConquered {
        player: String,
        territory: String,
        armies: u32,
    },
    TerritoryAnnexed {
        player: String,
        territory: String,
    },
    StrategyChanged {
        player: String,
        from: StrategyKind,
        to: StrategyKind,
    },
    PlayerEliminated {
        player: String,
    },
    GameWon {
        player: String,
    },
}

impl std::fmt::Display for GameEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameEvent::StateChanged { from, to } => {
                write!(f, "STATE | {from} -> {to}")
            }
            GameEvent::CommandRejected { state, keyword } => {
                write!(f, "COMMAND_REJECTED | '{keyword}' is not valid in state '{state}'")
            }
            GameEvent::CommandFailed { state, keyword } => {
                write!(f, "COMMAND_FAILED | '{keyword}' failed in state '{state}'")
            }
            GameEvent::MapLoaded { path, territories } => {
                write!(f, "MAP_LOADED | {path} ({territories} territories)")
            }
            GameEvent::MapRejected { path, reason } => {
                write!(f, "MAP_REJECTED | {path}: {reason}")
            }
            GameEvent::MapValidated { ok } => {
                write!(f, "MAP_VALIDATED | map is {}", if *ok { "valid" } else { "NOT valid" })
            }
            GameEvent::PlayerAdded { name, strategy } => {
                write!(f, "PLAYER_ADDED | {name} ({strategy})")
            }
            GameEvent::TerritoriesAssigned { players, territories } => {
                write!(f, "TERRITORIES_ASSIGNED | {territories} territories across {players} players")
            }
            GameEvent::ReinforcementsGranted { player, amount, pool } => {
                write!(f, "REINFORCEMENT | {player} +{amount} (pool={pool})")
            }
            GameEvent::OrderIssued { player, order } => {
                write!(f, "ORDER_ADDED | {player}: {order}")
            }
            GameEvent::OrderRejected { player, order } => {
                write!(f, "ORDER_REJECTED | {player}: {order}")
            }
            GameEvent::OrderExecuted { player, order, success } => {
                write!(
                    f,
                    "ORDER_EXECUTED | {player}: {order} ({})",
                    if *success { "ok" } else { "invalid" }
                )
            }
            GameEvent::CardPlayed { player, card } => {
                write!(f, "CARD_PLAYED | {player}: {card}")
            }
            GameEvent::TruceDeclared { a, b } => {
                write!(f, "TRUCE | {a} and {b} cease fire for this round")
            }
            GameEvent::TerritoryConquered { player, territory, armies } => {
                write!(f, "CONQUEST | {player} took {territory} with {armies} armies")
            }
            GameEvent::TerritoryAnnexed { player, territory } => {
                write!(f, "ANNEXED | {player} absorbed {territory}")
            }
            GameEvent::StrategyChanged { player, from, to } => {
                write!(f, "STRATEGY_CHANGED | {player}: {from} -> {to}")
            }
            GameEvent::PlayerEliminated { player } => {
                write!(f, "ELIMINATED | {player}")
            }
            GameEvent::GameWon { player } => {
                write!(f, "WINNER | {player} controls the whole map")
            }
        }
    }
}
