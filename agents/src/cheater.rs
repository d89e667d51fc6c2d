// ═══════════════════════════════════════════════════════════════════════
// Cheater — annexes its whole frontier, no combat
//
// Deliberately overpowered: once per round every territory adjacent to its
// holdings flips ownership unconditionally. Useful for stress-testing
// rosters in tournaments.
// ═══════════════════════════════════════════════════════════════════════

use conquest_engine::{Map, PlayerId, RoundPlan, TerritoryId};

pub fn plan(map: &Map, id: PlayerId) -> RoundPlan {
    RoundPlan {
        annexations: frontier(map, id),
        ..RoundPlan::default()
    }
}

/// Every territory adjacent to the player's holdings but not yet theirs.
pub fn frontier(map: &Map, id: PlayerId) -> Vec<TerritoryId> {
    let mut targets: Vec<TerritoryId> = map
        .owned_by(id)
        .iter()
        .flat_map(|&t| map.territory(t).adjacent.iter().copied())
        .filter(|&t| !map.territory(t).owner.is_player(id))
        .collect();
    targets.sort_unstable();
    targets.dedup();
    targets
}
