// ═══════════════════════════════════════════════════════════════════════
// Aggressive — piles everything on its strongest stack and attacks
// ═══════════════════════════════════════════════════════════════════════

use conquest_engine::{Card, Map, Order, Player, PlayerId, RoundPlan, TerritoryId};

/// Armies above which a territory is considered worth defending.
pub const DEFENSE_THRESHOLD: u32 = 5;

/// Deploy the whole pool onto the strongest territory, then strike from
/// every territory whose neighborhood offers a target the strongest stack
/// outclasses, committing the source's full projected force.
pub fn plan(map: &Map, players: &[Player], id: PlayerId) -> RoundPlan {
    let mut plan = RoundPlan {
        draw_card: true,
        card_plays: vec![Card::Bomb, Card::Reinforcement],
        ..RoundPlan::default()
    };
    let owned = map.owned_by(id);
    let Some(&strongest) = owned.iter().max_by_key(|&&t| map.territory(t).armies) else {
        return plan;
    };
    let pool = players[id.0 as usize].reinforcement_pool;
    if pool > 0 {
        plan.orders.push(Order::Deploy {
            issuer: id,
            target: strongest,
            armies: pool,
        });
    }

    let threshold = map.territory(strongest).armies;
    let sources = std::iter::once(strongest).chain(owned.iter().copied().filter(|&t| t != strongest));
    for source in sources {
        let committed = map.territory(source).armies + if source == strongest { pool } else { 0 };
        if committed == 0 {
            continue;
        }
        let target = map.territory(source).adjacent.iter().copied().find(|&adj| {
            let territory = map.territory(adj);
            !territory.owner.is_player(id) && territory.armies <= threshold
        });
        if let Some(target) = target {
            plan.orders.push(Order::Advance {
                issuer: id,
                source,
                target,
                armies: committed,
            });
        }
    }
    plan
}

/// Every territory someone else holds with no more armies than our
/// strongest stack.
pub fn to_attack(map: &Map, id: PlayerId) -> Vec<TerritoryId> {
    let strongest = map
        .owned_by(id)
        .iter()
        .map(|&t| map.territory(t).armies)
        .max()
        .unwrap_or(0);
    map.ids()
        .filter(|&t| {
            let territory = map.territory(t);
            !territory.owner.is_player(id) && territory.armies <= strongest
        })
        .collect()
}

/// Only stacks strong enough to matter get defended.
pub fn to_defend(map: &Map, id: PlayerId) -> Vec<TerritoryId> {
    map.owned_by(id)
        .into_iter()
        .filter(|&t| map.territory(t).armies > DEFENSE_THRESHOLD)
        .collect()
}
