// ═══════════════════════════════════════════════════════════════════════
// Agent — one playing policy per seat, dispatched as a tagged enum
//
// The engine stores only a StrategyKind tag on each player; this enum maps
// tags to behavior. Using a sum type instead of trait objects keeps the
// dispatch exhaustive: adding a strategy without wiring every decision
// fails to compile. Agents are rebuilt from the tag each round, so an
// engine-side reclassification (Neutral turning Aggressive after losing a
// territory) changes behavior on the very next round.
// ═══════════════════════════════════════════════════════════════════════

use crate::{aggressive, benevolent, cheater, human, neutral};
use crate::human::HumanChoices;
use conquest_engine::{Map, Player, PlayerId, RoundPlan, StrategyKind, TerritoryId};

#[derive(Debug, Clone)]
pub enum Agent {
    Human(HumanChoices),
    Aggressive,
    Benevolent,
    Neutral,
    Cheater,
}

impl Agent {
    /// The engine-side tag this agent implements.
    pub fn kind(&self) -> StrategyKind {
        match self {
            Agent::Human(_) => StrategyKind::Human,
            Agent::Aggressive => StrategyKind::Aggressive,
            Agent::Benevolent => StrategyKind::Benevolent,
            Agent::Neutral => StrategyKind::Neutral,
            Agent::Cheater => StrategyKind::Cheater,
        }
    }

    /// Build the agent for a strategy tag. A Human built this way has no
    /// scripted choices and passes every round.
    pub fn from_kind(kind: StrategyKind) -> Agent {
        match kind {
            StrategyKind::Human => Agent::Human(HumanChoices::default()),
            StrategyKind::Aggressive => Agent::Aggressive,
            StrategyKind::Benevolent => Agent::Benevolent,
            StrategyKind::Neutral => Agent::Neutral,
            StrategyKind::Cheater => Agent::Cheater,
        }
    }

    /// Produce this round's plan for player `id`.
    pub fn issue_orders(&mut self, map: &Map, players: &[Player], id: PlayerId) -> RoundPlan {
        match self {
            Agent::Human(choices) => human::plan(choices),
            Agent::Aggressive => aggressive::plan(map, players, id),
            Agent::Benevolent => benevolent::plan(map, players, id),
            Agent::Neutral => neutral::plan(),
            Agent::Cheater => cheater::plan(map, id),
        }
    }

    /// Territories this agent would strike at.
    pub fn to_attack(&self, map: &Map, id: PlayerId) -> Vec<TerritoryId> {
        match self {
            Agent::Human(choices) => choices.attack.clone(),
            Agent::Aggressive => aggressive::to_attack(map, id),
            Agent::Benevolent | Agent::Neutral => Vec::new(),
            Agent::Cheater => cheater::frontier(map, id),
        }
    }

    /// Territories this agent wants to keep reinforced.
    pub fn to_defend(&self, map: &Map, id: PlayerId) -> Vec<TerritoryId> {
        match self {
            Agent::Human(choices) => choices.defend.clone(),
            Agent::Aggressive => aggressive::to_defend(map, id),
            Agent::Benevolent => benevolent::to_defend(map, id),
            Agent::Neutral | Agent::Cheater => map.owned_by(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conquest_engine::{Map, Order, Owner, Player};
    use std::collections::VecDeque;

    const RING: &str = "\
[Continents]
Core=0

[Territories]
Alpha,0,0,Core,Bravo,Delta
Bravo,1,0,Core,Alpha,Charlie
Charlie,2,0,Core,Bravo,Delta
Delta,3,0,Core,Charlie,Alpha
";

    const ME: PlayerId = PlayerId(0);
    const FOE: PlayerId = PlayerId(1);

    /// Ring split between two players: Alpha/Charlie mine, Bravo/Delta the
    /// opponent's, with the given army counts in territory-id order.
    fn board(armies: [u32; 4]) -> (Map, Vec<Player>) {
        let mut map = Map::parse(RING).unwrap();
        for (i, &count) in armies.iter().enumerate() {
            let t = map.territory_mut(TerritoryId(i as u16));
            t.owner = if i % 2 == 0 {
                Owner::Player(ME)
            } else {
                Owner::Player(FOE)
            };
            t.armies = count;
        }
        let players = vec![
            Player::new("Me", StrategyKind::Aggressive),
            Player::new("Foe", StrategyKind::Benevolent),
        ];
        (map, players)
    }

    #[test]
    fn from_kind_round_trips() {
        for kind in StrategyKind::ALL {
            assert_eq!(Agent::from_kind(kind).kind(), kind);
        }
    }

    #[test]
    fn aggressive_commits_the_pool_to_its_strongest_territory() {
        let (map, mut players) = board([5, 1, 2, 1]);
        players[0].reinforcement_pool = 4;
        let plan = Agent::Aggressive.issue_orders(&map, &players, ME);
        match plan.orders.first() {
            Some(&Order::Deploy { target, armies, .. }) => {
                assert_eq!(target, TerritoryId(0)); // Alpha holds 5
                assert_eq!(armies, 4);
            }
            other => panic!("expected a deploy, got {other:?}"),
        }
        // and it strikes from the strongest with its full projected force
        assert!(plan.orders.iter().any(|o| matches!(
            o,
            Order::Advance { source: TerritoryId(0), armies: 9, .. }
        )));
    }

    #[test]
    fn aggressive_attacks_only_what_it_outclasses() {
        let (map, _) = board([5, 3, 2, 9]);
        let attack = Agent::Aggressive.to_attack(&map, ME);
        // Bravo (3) is at or below the strongest stack (5); Delta (9) is not.
        assert!(attack.contains(&TerritoryId(1)));
        assert!(!attack.contains(&TerritoryId(3)));
        // own territories are never targets
        assert!(!attack.contains(&TerritoryId(0)));
        assert!(!attack.contains(&TerritoryId(2)));
    }

    #[test]
    fn aggressive_defends_above_the_threshold() {
        let (map, _) = board([7, 1, 4, 1]);
        assert_eq!(Agent::Aggressive.to_defend(&map, ME), vec![TerritoryId(0)]);
    }

    #[test]
    fn benevolent_reinforces_the_weakest_and_never_attacks() {
        let (map, mut players) = board([5, 1, 0, 1]);
        players[0].reinforcement_pool = 3;
        let plan = Agent::Benevolent.issue_orders(&map, &players, ME);
        assert!(plan.annexations.is_empty());
        let mut deployed = 0;
        for order in &plan.orders {
            match *order {
                Order::Deploy { target, armies, .. } => {
                    deployed += armies;
                    assert!(map.territory(target).owner.is_player(ME));
                }
                ref other => panic!("benevolent issued {other:?}"),
            }
        }
        assert_eq!(deployed, 3);
        // weakest first: Charlie (0 armies) takes the larger share
        match plan.orders.first() {
            Some(&Order::Deploy { target, armies, .. }) => {
                assert_eq!(target, TerritoryId(2));
                assert_eq!(armies, 2);
            }
            other => panic!("expected a deploy, got {other:?}"),
        }
    }

    #[test]
    fn benevolent_defend_list_is_weakest_first() {
        let (map, _) = board([5, 1, 0, 1]);
        assert_eq!(
            Agent::Benevolent.to_defend(&map, ME),
            vec![TerritoryId(2), TerritoryId(0)]
        );
    }

    #[test]
    fn neutral_sits_still() {
        let (map, players) = board([5, 1, 2, 1]);
        let plan = Agent::Neutral.issue_orders(&map, &players, ME);
        assert_eq!(plan, RoundPlan::default());
        assert!(Agent::Neutral.to_attack(&map, ME).is_empty());
        // the whole owned set is reported for inspection
        assert_eq!(
            Agent::Neutral.to_defend(&map, ME),
            vec![TerritoryId(0), TerritoryId(2)]
        );
    }

    #[test]
    fn cheater_annexes_its_whole_frontier() {
        let (map, players) = board([5, 1, 2, 1]);
        let plan = Agent::Cheater.issue_orders(&map, &players, ME);
        assert!(plan.orders.is_empty());
        assert_eq!(
            plan.annexations,
            vec![TerritoryId(1), TerritoryId(3)]
        );
    }

    #[test]
    fn human_plays_back_scripted_rounds_then_passes() {
        let (map, players) = board([5, 1, 2, 1]);
        let scripted = RoundPlan {
            orders: vec![Order::Deploy {
                issuer: ME,
                target: TerritoryId(0),
                armies: 1,
            }],
            ..RoundPlan::default()
        };
        let mut agent = Agent::Human(HumanChoices {
            plans: VecDeque::from([scripted.clone()]),
            attack: vec![TerritoryId(3)],
            defend: vec![TerritoryId(0)],
        });
        assert_eq!(agent.issue_orders(&map, &players, ME), scripted);
        assert_eq!(agent.issue_orders(&map, &players, ME), RoundPlan::default());
        assert_eq!(agent.to_attack(&map, ME), vec![TerritoryId(3)]);
        assert_eq!(agent.to_defend(&map, ME), vec![TerritoryId(0)]);
    }
}
