// ═══════════════════════════════════════════════════════════════════════
// Benevolent — shores up its weakest holdings, never attacks
// ═══════════════════════════════════════════════════════════════════════

use conquest_engine::{Card, Map, Order, Player, PlayerId, RoundPlan, TerritoryId};

/// Spread the pool one army at a time over the weakest territories, then
/// fold the passes into a single deploy per territory. No attacks, ever;
/// supportive cards get played when drawn.
pub fn plan(map: &Map, players: &[Player], id: PlayerId) -> RoundPlan {
    let mut plan = RoundPlan {
        draw_card: true,
        card_plays: vec![
            Card::Reinforcement,
            Card::Airlift,
            Card::Diplomacy,
            Card::Blockade,
        ],
        ..RoundPlan::default()
    };
    let weakest = to_defend(map, id);
    if weakest.is_empty() {
        return plan;
    }
    let pool = players[id.0 as usize].reinforcement_pool;
    let mut grants = vec![0u32; weakest.len()];
    for i in 0..pool as usize {
        grants[i % weakest.len()] += 1;
    }
    for (slot, &territory) in weakest.iter().enumerate() {
        if grants[slot] > 0 {
            plan.orders.push(Order::Deploy {
                issuer: id,
                target: territory,
                armies: grants[slot],
            });
        }
    }
    plan
}

/// Owned territories ordered weakest-first.
pub fn to_defend(map: &Map, id: PlayerId) -> Vec<TerritoryId> {
    let mut owned = map.owned_by(id);
    owned.sort_by_key(|&t| (map.territory(t).armies, t));
    owned
}
