// ═══════════════════════════════════════════════════════════════════════
// Orders — queued single-use commands and combat resolution
//
// Orders hold arena ids, never references, so a queued order stays sound
// across eliminations. Execution is validate-first: an order whose
// precondition no longer holds is a no-op returning false, and the caller
// discards it either way.
// ═══════════════════════════════════════════════════════════════════════

use crate::cards::Card;
use crate::events::GameEvent;
use crate::map::{Map, TerritoryId};
use crate::types::{Owner, Player, PlayerId, StrategyKind};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Chance that the attacker removes one defending unit per step.
pub const ATTACKER_KILL_ODDS: f64 = 0.6;
/// Chance that the defender removes one attacking unit per step.
pub const DEFENDER_KILL_ODDS: f64 = 0.7;

/// Active cease-fires this round, keyed by normalized player pair.
pub type TruceSet = HashSet<(PlayerId, PlayerId)>;

pub fn truce_key(a: PlayerId, b: PlayerId) -> (PlayerId, PlayerId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Order {
    Deploy {
        issuer: PlayerId,
        target: TerritoryId,
        armies: u32,
    },
    Advance {
        issuer: PlayerId,
        source: TerritoryId,
        target: TerritoryId,
        armies: u32,
    },
    Bomb {
        issuer: PlayerId,
        target: TerritoryId,
    },
    Blockade {
        issuer: PlayerId,
        target: TerritoryId,
    },
    Airlift {
        issuer: PlayerId,
        source: TerritoryId,
        target: TerritoryId,
        armies: u32,
    },
    Negotiate {
        issuer: PlayerId,
        other: PlayerId,
    },
}

impl Order {
    pub fn issuer(&self) -> PlayerId {
        match *self {
            Order::Deploy { issuer, .. }
            | Order::Advance { issuer, .. }
            | Order::Bomb { issuer, .. }
            | Order::Blockade { issuer, .. }
            | Order::Airlift { issuer, .. }
            | Order::Negotiate { issuer, .. } => issuer,
        }
    }

    pub fn validate(&self, map: &Map, players: &[Player], truces: &TruceSet) -> bool {
        match *self {
            Order::Deploy {
                issuer,
                target,
                armies,
            } => armies > 0 && map.territory(target).owner.is_player(issuer),
            Order::Advance {
                issuer,
                source,
                target,
                armies,
            } => {
                if armies == 0 {
                    return false;
                }
                let src = map.territory(source);
                if !src.owner.is_player(issuer) || src.armies < armies {
                    return false;
                }
                if !map.are_adjacent(source, target) {
                    return false;
                }
                // A cease-fire blocks attacks between the two parties.
                if let Owner::Player(defender) = map.territory(target).owner {
                    if defender != issuer && truces.contains(&truce_key(issuer, defender)) {
                        return false;
                    }
                }
                true
            }
            Order::Bomb { issuer, target } => {
                !map.territory(target).owner.is_player(issuer)
                    && map
                        .territory(target)
                        .adjacent
                        .iter()
                        .any(|&adj| map.territory(adj).owner.is_player(issuer))
            }
            Order::Blockade { issuer, target } => map.territory(target).owner.is_player(issuer),
            Order::Airlift {
                issuer,
                source,
                target,
                armies,
            } => {
                armies > 0
                    && map.territory(source).owner.is_player(issuer)
                    && map.territory(target).owner.is_player(issuer)
                    && map.territory(source).armies >= armies
            }
            Order::Negotiate { issuer, other } => {
                other != issuer
                    && (other.0 as usize) < players.len()
                    && !players[other.0 as usize].eliminated
            }
        }
    }

    /// Validate-first execution against the live arenas. Returns whether the
    /// order took effect.
    pub fn execute(
        &self,
        map: &mut Map,
        players: &mut [Player],
        truces: &mut TruceSet,
        rng: &mut impl Rng,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        if !self.validate(map, players, truces) {
            return false;
        }
        match *self {
            Order::Deploy { target, armies, .. } => {
                map.territory_mut(target).armies += armies;
            }
            Order::Advance {
                issuer,
                source,
                target,
                armies,
            } => {
                map.territory_mut(source).armies -= armies;
                if map.territory(target).owner.is_player(issuer) {
                    // fortify
                    map.territory_mut(target).armies += armies;
                } else {
                    resolve_assault(map, players, issuer, target, armies, rng, events);
                }
            }
            Order::Bomb { target, .. } => {
                map.territory_mut(target).armies /= 2;
            }
            Order::Blockade { target, .. } => {
                let territory = map.territory_mut(target);
                territory.armies *= 2;
                territory.owner = Owner::Neutral;
            }
            Order::Airlift {
                source,
                target,
                armies,
                ..
            } => {
                map.territory_mut(source).armies -= armies;
                map.territory_mut(target).armies += armies;
            }
            Order::Negotiate { issuer, other } => {
                truces.insert(truce_key(issuer, other));
                events.push(GameEvent::TruceDeclared {
                    a: players[issuer.0 as usize].name.clone(),
                    b: players[other.0 as usize].name.clone(),
                });
            }
        }
        true
    }

    /// One-line description resolving ids against the live arenas.
    pub fn describe(&self, map: &Map, players: &[Player]) -> String {
        let name = |id: TerritoryId| map.territory(id).name.as_str();
        match *self {
            Order::Deploy { target, armies, .. } => {
                format!("deploy {armies} to {}", name(target))
            }
            Order::Advance {
                source,
                target,
                armies,
                ..
            } => format!("advance {armies} from {} to {}", name(source), name(target)),
            Order::Bomb { target, .. } => format!("bomb {}", name(target)),
            Order::Blockade { target, .. } => format!("blockade {}", name(target)),
            Order::Airlift {
                source,
                target,
                armies,
                ..
            } => format!("airlift {armies} from {} to {}", name(source), name(target)),
            Order::Negotiate { other, .. } => format!(
                "negotiate with {}",
                players.get(other.0 as usize).map_or("?", |p| p.name.as_str())
            ),
        }
    }
}

/// Everything an agent wants to do in one round, applied through the
/// engine's single entry point so pool accounting stays in one place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundPlan {
    pub orders: Vec<Order>,
    /// Territories to flip without combat (Cheater only).
    pub annexations: Vec<TerritoryId>,
    /// Card kinds to try, in preference order; the first one present in the
    /// hand is played.
    pub card_plays: Vec<Card>,
    pub draw_card: bool,
}

/// Survivors of one simulated battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatOutcome {
    pub attackers_remaining: u32,
    pub defenders_remaining: u32,
}

impl CombatOutcome {
    pub fn conquered(&self) -> bool {
        self.defenders_remaining == 0 && self.attackers_remaining > 0
    }
}

/// Unit-by-unit battle simulation. Each step draws two independent trials:
/// the attacker removes one defender with probability 0.6, then the
/// defender, if any remain, removes one attacker with probability 0.7.
/// The loop runs until one side is gone; it is the contract, not an
/// approximation of one.
pub fn resolve_combat(attackers: u32, defenders: u32, rng: &mut impl Rng) -> CombatOutcome {
    let mut attacking = attackers;
    let mut defending = defenders;
    while attacking > 0 && defending > 0 {
        if rng.gen_bool(ATTACKER_KILL_ODDS) {
            defending -= 1;
        }
        if defending > 0 && rng.gen_bool(DEFENDER_KILL_ODDS) {
            attacking -= 1;
        }
    }
    CombatOutcome {
        attackers_remaining: attacking,
        defenders_remaining: defending,
    }
}

fn resolve_assault(
    map: &mut Map,
    players: &mut [Player],
    attacker: PlayerId,
    target: TerritoryId,
    armies: u32,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) {
    let defender = map.territory(target).owner.player();
    let outcome = resolve_combat(armies, map.territory(target).armies, rng);
    if outcome.conquered() {
        {
            let territory = map.territory_mut(target);
            territory.owner = Owner::Player(attacker);
            territory.armies = outcome.attackers_remaining;
        }
        events.push(GameEvent::TerritoryConquered {
            player: players[attacker.0 as usize].name.clone(),
            territory: map.territory(target).name.clone(),
            armies: outcome.attackers_remaining,
        });
        // A passive defender that loses ground turns hostile, once.
        if let Some(loser_id) = defender {
            let loser = &mut players[loser_id.0 as usize];
            if loser.strategy == StrategyKind::Neutral {
                loser.strategy = StrategyKind::Aggressive;
                events.push(GameEvent::StrategyChanged {
                    player: loser.name.clone(),
                    from: StrategyKind::Neutral,
                    to: StrategyKind::Aggressive,
                });
            }
        }
    } else {
        map.territory_mut(target).armies = outcome.defenders_remaining;
    }
}
