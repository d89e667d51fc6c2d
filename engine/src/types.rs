// ═══════════════════════════════════════════════════════════════════════
// Core types — identifiers, the command state machine, players
// ═══════════════════════════════════════════════════════════════════════

use crate::cards::{Deck, Hand};
use crate::orders::Order;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

// ── Game lifecycle ─────────────────────────────────────────────────────

/// The command legality machine. A game walks `Start` through setup into the
/// reinforcement/issue/execute round loop, and leaves it only through `Win`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    Start,
    MapLoaded,
    MapValidated,
    PlayersAdded,
    AssignReinforcement,
    IssueOrders,
    ExecuteOrders,
    Win,
    End,
}

impl GameState {
    pub const ALL: [GameState; 9] = [
        GameState::Start,
        GameState::MapLoaded,
        GameState::MapValidated,
        GameState::PlayersAdded,
        GameState::AssignReinforcement,
        GameState::IssueOrders,
        GameState::ExecuteOrders,
        GameState::Win,
        GameState::End,
    ];
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GameState::Start => "start",
            GameState::MapLoaded => "map loaded",
            GameState::MapValidated => "map validated",
            GameState::PlayersAdded => "players added",
            GameState::AssignReinforcement => "assign reinforcement",
            GameState::IssueOrders => "issue orders",
            GameState::ExecuteOrders => "execute orders",
            GameState::Win => "win",
            GameState::End => "end",
        };
        write!(f, "{name}")
    }
}

// ── Strategy tags ──────────────────────────────────────────────────────

/// Which playing policy controls a seat. The engine only stores the tag;
/// the agents crate maps tags to behavior each round, so a tag flip
/// (Neutral turning Aggressive after being conquered) takes effect on the
/// very next round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    Human,
    Aggressive,
    Benevolent,
    Neutral,
    Cheater,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::Human,
        StrategyKind::Aggressive,
        StrategyKind::Benevolent,
        StrategyKind::Neutral,
        StrategyKind::Cheater,
    ];

    /// Everything except Human can run unattended.
    pub fn is_computer(self) -> bool {
        self != StrategyKind::Human
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StrategyKind::Human => "Human",
            StrategyKind::Aggressive => "Aggressive",
            StrategyKind::Benevolent => "Benevolent",
            StrategyKind::Neutral => "Neutral",
            StrategyKind::Cheater => "Cheater",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(StrategyKind::Human),
            "aggressive" => Ok(StrategyKind::Aggressive),
            "benevolent" => Ok(StrategyKind::Benevolent),
            "neutral" => Ok(StrategyKind::Neutral),
            "cheater" => Ok(StrategyKind::Cheater),
            other => Err(format!("unknown strategy '{other}'")),
        }
    }
}

// ── Player ID ──────────────────────────────────────────────────────────
// Compact, copyable seat identifier. Index into the engine's player arena;
// stays stable across eliminations.

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord,
)]
pub struct PlayerId(pub u8);

// ── Territory ownership ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Owner {
    #[default]
    Neutral,
    Player(PlayerId),
}

impl Owner {
    pub fn player(self) -> Option<PlayerId> {
        match self {
            Owner::Neutral => None,
            Owner::Player(id) => Some(id),
        }
    }

    pub fn is_player(self, id: PlayerId) -> bool {
        self == Owner::Player(id)
    }
}

// ── Player ─────────────────────────────────────────────────────────────

/// One seat at the table. Territory ownership lives on the map arena, so the
/// owned set is derived rather than stored; everything the player carries
/// around (pool, queue, cards) lives here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub strategy: StrategyKind,
    pub reinforcement_pool: u32,
    pub orders: VecDeque<Order>,
    pub deck: Deck,
    pub hand: Hand,
    pub eliminated: bool,
}

impl Player {
    pub fn new(name: impl Into<String>, strategy: StrategyKind) -> Self {
        Player {
            name: name.into(),
            strategy,
            reinforcement_pool: 0,
            orders: VecDeque::new(),
            deck: Deck::new(),
            hand: Hand::default(),
            eliminated: false,
        }
    }
}
