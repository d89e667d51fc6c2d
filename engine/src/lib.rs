pub mod cards;
pub mod command;
pub mod engine;
pub mod events;
pub mod map;
pub mod orders;
pub mod types;


pub use cards::{Card, Deck, Hand};
pub use command::{CommandProcessor, CommandRecord, Dispatch, TournamentParamError, TournamentSpec};
pub use engine::TurnEngine;
pub use events::GameEvent;
pub use map::{Continent, ContinentId, Map, MapError, Territory, TerritoryId};
pub use orders::{resolve_combat, CombatOutcome, Order, RoundPlan};
pub use types::{GameState, Owner, Player, PlayerId, StrategyKind};
