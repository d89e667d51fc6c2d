// ═══════════════════════════════════════════════════════════════════════
// Turn engine — command state machine and per-round phases
//
// The engine owns the authoritative game state: the map arena, the player
// arena, the round truce set, and the RNG every combat draws from. Commands
// move the machine through the transition table; phase methods are public so
// a programmatic driver (the tournament runner) can invoke them directly and
// step the table with `transition`.
// ═══════════════════════════════════════════════════════════════════════

use crate::cards::Card;
use crate::events::GameEvent;
use crate::map::{Map, TerritoryId};
use crate::orders::{Order, RoundPlan, TruceSet};
use crate::types::{GameState, Owner, Player, PlayerId, StrategyKind};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 6;

/// Armies granted by playing a Reinforcement card.
pub const REINFORCEMENT_CARD_ARMIES: u32 = 5;

/// The command legality relation. Nothing moves the machine except an edge
/// listed here.
const TRANSITIONS: &[(GameState, &str, GameState)] = &[
    (GameState::Start, "loadmap", GameState::MapLoaded),
    (GameState::MapLoaded, "loadmap", GameState::MapLoaded),
    (GameState::MapLoaded, "validatemap", GameState::MapValidated),
    (GameState::MapValidated, "addplayer", GameState::PlayersAdded),
    (GameState::PlayersAdded, "addplayer", GameState::PlayersAdded),
    (GameState::PlayersAdded, "assigncountries", GameState::AssignReinforcement),
    (GameState::PlayersAdded, "gamestart", GameState::AssignReinforcement),
    (GameState::AssignReinforcement, "issueorder", GameState::IssueOrders),
    (GameState::IssueOrders, "endissueorders", GameState::ExecuteOrders),
    (GameState::ExecuteOrders, "endexecorders", GameState::AssignReinforcement),
    (GameState::ExecuteOrders, "win", GameState::Win),
    (GameState::Win, "play", GameState::AssignReinforcement),
    (GameState::Win, "replay", GameState::AssignReinforcement),
    (GameState::Win, "end", GameState::End),
    (GameState::Win, "quit", GameState::End),
];

enum HandlerOutcome {
    /// Handler succeeded; apply the table's target state.
    Success,
    /// Handler succeeded and already moved the machine itself.
    Settled,
    Failure,
}

#[derive(Debug)]
pub struct TurnEngine {
    state: GameState,
    map: Option<Map>,
    players: Vec<Player>,
    /// Names and tags as originally added, for `play`-again resets.
    roster: Vec<(String, StrategyKind)>,
    truces: TruceSet,
    winner: Option<PlayerId>,
    rng: ChaCha8Rng,
    events: Vec<GameEvent>,
}

impl TurnEngine {
    pub fn new(seed: u64) -> Self {
        TurnEngine {
            state: GameState::Start,
            map: None,
            players: Vec::new(),
            roster: Vec::new(),
            truces: TruceSet::default(),
            winner: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    // ── Accessors ──────────────────────────────────────────────────────

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn map(&self) -> Option<&Map> {
        self.map.as_ref()
    }

    pub fn map_mut(&mut self) -> Option<&mut Map> {
        self.map.as_mut()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.0 as usize]
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// Hand the buffered events to the logging component.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Keywords accepted in the current state.
    pub fn available_commands(&self) -> Vec<String> {
        TRANSITIONS
            .iter()
            .filter(|(from, _, _)| *from == self.state)
            .map(|(_, keyword, _)| (*keyword).to_string())
            .collect()
    }

    fn edge(&self, keyword: &str) -> Option<GameState> {
        TRANSITIONS
            .iter()
            .find(|(from, kw, _)| *from == self.state && *kw == keyword)
            .map(|&(_, _, to)| to)
    }

    fn set_state(&mut self, to: GameState) {
        self.events.push(GameEvent::StateChanged {
            from: self.state,
            to,
        });
        self.state = to;
    }

    /// Table-driven transition without a side-effect handler, for drivers
    /// that call the phase methods themselves. Illegal keywords do nothing.
    pub fn transition(&mut self, keyword: &str) -> bool {
        match self.edge(keyword) {
            Some(to) => {
                self.set_state(to);
                true
            }
            None => false,
        }
    }

    // ── Command processing ─────────────────────────────────────────────

    /// Apply one already-tokenized command string: lowercase keyword plus
    /// optional arguments. Returns whether the command took effect; on any
    /// failure the state is untouched.
    pub fn process_command(&mut self, raw: &str) -> bool {
        if self.state == GameState::End {
            return false;
        }
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return false;
        }
        let (keyword, args) = match trimmed.split_once(char::is_whitespace) {
            Some((kw, rest)) => (kw.to_lowercase(), rest.trim()),
            None => (trimmed.to_lowercase(), ""),
        };
        let Some(target) = self.edge(&keyword) else {
            self.events.push(GameEvent::CommandRejected {
                state: self.state,
                keyword,
            });
            return false;
        };
        match self.dispatch(&keyword, args) {
            HandlerOutcome::Success => {
                self.set_state(target);
                true
            }
            HandlerOutcome::Settled => true,
            HandlerOutcome::Failure => {
                self.events.push(GameEvent::CommandFailed {
                    state: self.state,
                    keyword,
                });
                false
            }
        }
    }

    fn dispatch(&mut self, keyword: &str, args: &str) -> HandlerOutcome {
        match keyword {
            "loadmap" => self.on_load_map(args),
            "validatemap" => self.on_validate_map(),
            "addplayer" => self.on_add_player(args),
            "assigncountries" | "gamestart" => self.on_assign_countries(),
            "issueorder" => self.on_issue_order(),
            "endissueorders" => HandlerOutcome::Success,
            "endexecorders" => self.on_end_exec_orders(),
            "win" => HandlerOutcome::Success,
            "play" | "replay" => self.on_play_again(),
            "end" | "quit" => self.on_end(),
            _ => HandlerOutcome::Failure,
        }
    }

    // ── Side-effect handlers ───────────────────────────────────────────

    fn on_load_map(&mut self, args: &str) -> HandlerOutcome {
        if args.is_empty() {
            return HandlerOutcome::Failure;
        }
        match Map::load(args) {
            Ok(map) => {
                self.events.push(GameEvent::MapLoaded {
                    path: args.to_string(),
                    territories: map.len(),
                });
                self.map = Some(map);
                HandlerOutcome::Success
            }
            Err(err) => {
                self.events.push(GameEvent::MapRejected {
                    path: args.to_string(),
                    reason: err.to_string(),
                });
                HandlerOutcome::Failure
            }
        }
    }

    fn on_validate_map(&mut self) -> HandlerOutcome {
        let ok = self.map.as_ref().map_or(false, Map::validate);
        self.events.push(GameEvent::MapValidated { ok });
        if ok {
            HandlerOutcome::Success
        } else {
            HandlerOutcome::Failure
        }
    }

    fn on_add_player(&mut self, args: &str) -> HandlerOutcome {
        let mut parts = args.split_whitespace();
        let Some(name) = parts.next() else {
            return HandlerOutcome::Failure;
        };
        let strategy = match parts.next() {
            Some(tag) => match tag.parse::<StrategyKind>() {
                Ok(kind) => kind,
                Err(_) => return HandlerOutcome::Failure,
            },
            None => StrategyKind::Human,
        };
        if self.players.len() >= MAX_PLAYERS {
            return HandlerOutcome::Failure;
        }
        if self.players.iter().any(|p| p.name == name) {
            return HandlerOutcome::Failure;
        }
        let mut player = Player::new(name, strategy);
        player.deck.shuffle(&mut self.rng);
        self.events.push(GameEvent::PlayerAdded {
            name: name.to_string(),
            strategy,
        });
        self.roster.push((name.to_string(), strategy));
        self.players.push(player);
        HandlerOutcome::Success
    }

    fn on_assign_countries(&mut self) -> HandlerOutcome {
        let player_count = self.players.len();
        let Some(map) = self.map.as_mut() else {
            return HandlerOutcome::Failure;
        };
        if player_count < MIN_PLAYERS {
            return HandlerOutcome::Failure;
        }
        // Round-robin over territory ids, first unassigned index wrapping.
        let mut next = 0usize;
        for i in 0..map.len() {
            map.territory_mut(TerritoryId(i as u16)).owner = Owner::Player(PlayerId(next as u8));
            next = (next + 1) % player_count;
        }
        self.events.push(GameEvent::TerritoriesAssigned {
            players: player_count,
            territories: self.map.as_ref().map_or(0, Map::len),
        });
        HandlerOutcome::Success
    }

    fn on_issue_order(&mut self) -> HandlerOutcome {
        self.reinforcement_phase();
        self.issue_orders_phase();
        HandlerOutcome::Success
    }

    fn on_end_exec_orders(&mut self) -> HandlerOutcome {
        if self.execute_orders_phase().is_some() {
            // Execution surfaced a winner; take the win edge instead of
            // looping back to reinforcement.
            self.transition("win");
            HandlerOutcome::Settled
        } else {
            HandlerOutcome::Success
        }
    }

    fn on_play_again(&mut self) -> HandlerOutcome {
        if self.map.is_none() {
            return HandlerOutcome::Failure;
        }
        // Fresh cycle on the same map: reset the board, rebuild the roster
        // with its original tags, redistribute.
        if let Some(map) = self.map.as_mut() {
            for i in 0..map.len() {
                let territory = map.territory_mut(TerritoryId(i as u16));
                territory.owner = Owner::Neutral;
                territory.armies = 0;
            }
        }
        let roster = std::mem::take(&mut self.roster);
        self.players.clear();
        self.truces.clear();
        self.winner = None;
        for (name, strategy) in &roster {
            let mut player = Player::new(name.clone(), *strategy);
            player.deck.shuffle(&mut self.rng);
            self.players.push(player);
        }
        self.roster = roster;
        self.on_assign_countries()
    }

    fn on_end(&mut self) -> HandlerOutcome {
        self.players.clear();
        self.roster.clear();
        self.truces.clear();
        HandlerOutcome::Success
    }

    // ── Per-round phases ───────────────────────────────────────────────

    /// Round opener: every surviving territory holder gains
    /// `max(3, owned / 3)` armies plus the continent bonus. A no-op without
    /// a map or players.
    pub fn reinforcement_phase(&mut self) {
        let Some(map) = self.map.as_ref() else {
            return;
        };
        if self.players.is_empty() {
            return;
        }
        let mut grants: Vec<(usize, u32)> = Vec::new();
        for (idx, player) in self.players.iter().enumerate() {
            if player.eliminated {
                continue;
            }
            let owned = map.owned_count(PlayerId(idx as u8));
            if owned == 0 {
                continue;
            }
            let base = ((owned / 3) as u32).max(3);
            grants.push((idx, base + continent_bonus()));
        }
        for (idx, amount) in grants {
            self.players[idx].reinforcement_pool += amount;
            self.events.push(GameEvent::ReinforcementsGranted {
                player: self.players[idx].name.clone(),
                amount,
                pool: self.players[idx].reinforcement_pool,
            });
        }
    }

    /// The only way armies leave a reinforcement pool: enqueue an order on
    /// the issuer's queue. Deploys debit the pool immediately, by exactly
    /// the deployed amount.
    pub fn issue_order(&mut self, id: PlayerId, order: Order) -> bool {
        let idx = id.0 as usize;
        if idx >= self.players.len() || self.players[idx].eliminated {
            return false;
        }
        let Some(map) = self.map.as_ref() else {
            return false;
        };
        let summary = order.describe(map, &self.players);
        if let Order::Deploy { armies, .. } = order {
            if armies == 0 || armies > self.players[idx].reinforcement_pool {
                self.events.push(GameEvent::OrderRejected {
                    player: self.players[idx].name.clone(),
                    order: summary,
                });
                return false;
            }
            self.players[idx].reinforcement_pool -= armies;
        }
        self.events.push(GameEvent::OrderIssued {
            player: self.players[idx].name.clone(),
            order: summary,
        });
        self.players[idx].orders.push_back(order);
        true
    }

    /// Scripted order generation for the command-driven path. Deploys drain
    /// every pool one army at a time round-robin, then each player gets one
    /// movement order: an attack on an adjacent hostile territory when one
    /// exists, otherwise a fortify onto an adjacent friendly one.
    pub fn issue_orders_phase(&mut self) {
        if self.map.is_none() || self.players.is_empty() {
            return;
        }
        loop {
            let mut issued = false;
            for idx in 0..self.players.len() {
                let id = PlayerId(idx as u8);
                if self.players[idx].eliminated || self.players[idx].reinforcement_pool == 0 {
                    continue;
                }
                let Some(target) = self.first_owned(id) else {
                    continue;
                };
                if self.issue_order(
                    id,
                    Order::Deploy {
                        issuer: id,
                        target,
                        armies: 1,
                    },
                ) {
                    issued = true;
                }
            }
            if !issued {
                break;
            }
        }
        for idx in 0..self.players.len() {
            let id = PlayerId(idx as u8);
            if self.players[idx].eliminated {
                continue;
            }
            let Some((source, target)) = self.pick_advance(id) else {
                continue;
            };
            let armies = self.projected_armies(id, source);
            if armies > 0 {
                self.issue_order(
                    id,
                    Order::Advance {
                        issuer: id,
                        source,
                        target,
                        armies,
                    },
                );
            }
        }
    }

    fn first_owned(&self, id: PlayerId) -> Option<TerritoryId> {
        let map = self.map.as_ref()?;
        map.territories()
            .iter()
            .position(|t| t.owner.is_player(id))
            .map(|i| TerritoryId(i as u16))
    }

    // Prefer a hostile neighbor; fall back to reinforcing a friendly one.
    fn pick_advance(&self, id: PlayerId) -> Option<(TerritoryId, TerritoryId)> {
        let map = self.map.as_ref()?;
        let owned = map.owned_by(id);
        for &source in &owned {
            for &adj in &map.territory(source).adjacent {
                if !map.territory(adj).owner.is_player(id) {
                    return Some((source, adj));
                }
            }
        }
        for &source in &owned {
            for &adj in &map.territory(source).adjacent {
                if map.territory(adj).owner.is_player(id) {
                    return Some((source, adj));
                }
            }
        }
        None
    }

    /// Armies a territory will hold once the issuer's queued deploys land.
    fn projected_armies(&self, id: PlayerId, territory: TerritoryId) -> u32 {
        let Some(map) = self.map.as_ref() else {
            return 0;
        };
        let queued: u32 = self.players[id.0 as usize]
            .orders
            .iter()
            .filter_map(|order| match *order {
                Order::Deploy { target, armies, .. } if target == territory => Some(armies),
                _ => None,
            })
            .sum();
        map.territory(territory).armies + queued
    }

    /// Round-robin drain: each pass pops and executes one order per live
    /// player until every queue is empty. Eliminations and the win check run
    /// between passes; a win stops the drain immediately. Round truces are
    /// cleared when the phase completes.
    pub fn execute_orders_phase(&mut self) -> Option<PlayerId> {
        let TurnEngine {
            map,
            players,
            truces,
            winner,
            rng,
            events,
            ..
        } = self;
        let Some(map) = map.as_mut() else {
            return None;
        };
        loop {
            let mut executed_any = false;
            for idx in 0..players.len() {
                if players[idx].eliminated {
                    continue;
                }
                let Some(order) = players[idx].orders.pop_front() else {
                    continue;
                };
                executed_any = true;
                let summary = order.describe(map, players);
                let issuer_name = players[idx].name.clone();
                let success = order.execute(map, players, truces, rng, events);
                events.push(GameEvent::OrderExecuted {
                    player: issuer_name,
                    order: summary,
                    success,
                });
            }
            for idx in 0..players.len() {
                if players[idx].eliminated {
                    continue;
                }
                if map.owned_count(PlayerId(idx as u8)) == 0 {
                    players[idx].eliminated = true;
                    players[idx].orders.clear();
                    events.push(GameEvent::PlayerEliminated {
                        player: players[idx].name.clone(),
                    });
                }
            }
            if let Some(champion) = map.sole_owner() {
                events.push(GameEvent::GameWon {
                    player: players[champion.0 as usize].name.clone(),
                });
                truces.clear();
                *winner = Some(champion);
                return *winner;
            }
            if !executed_any {
                truces.clear();
                return None;
            }
        }
    }

    /// A single player owning every territory ends the game.
    pub fn check_win(&self) -> Option<PlayerId> {
        self.map.as_ref().and_then(Map::sole_owner)
    }

    // ── Agent plumbing ─────────────────────────────────────────────────

    /// Apply an agent's round plan: optional draw, at most one card play,
    /// annexations, then the queued orders.
    pub fn apply_plan(&mut self, id: PlayerId, plan: RoundPlan) {
        let idx = id.0 as usize;
        if idx >= self.players.len() || self.players[idx].eliminated {
            return;
        }
        if plan.draw_card {
            self.draw_card(id);
        }
        for kind in plan.card_plays {
            if self.play_card(id, kind) {
                break;
            }
        }
        for territory in plan.annexations {
            self.annex(id, territory);
        }
        for order in plan.orders {
            self.issue_order(id, order);
        }
    }

    pub fn draw_card(&mut self, id: PlayerId) -> Option<Card> {
        let player = self.players.get_mut(id.0 as usize)?;
        let Player { deck, hand, .. } = player;
        deck.draw(hand)
    }

    /// Deal `count` cards to every live player (game setup).
    pub fn draw_cards(&mut self, count: usize) {
        for idx in 0..self.players.len() {
            if self.players[idx].eliminated {
                continue;
            }
            for _ in 0..count {
                self.draw_card(PlayerId(idx as u8));
            }
        }
    }

    /// Play one card of `kind` from the player's hand, if present. The card
    /// resolves into a concrete order (or a pool grant) with a default
    /// target, then goes back under the deck.
    pub fn play_card(&mut self, id: PlayerId, kind: Card) -> bool {
        let idx = id.0 as usize;
        if idx >= self.players.len() || self.players[idx].hand.remove(kind).is_none() {
            return false;
        }
        self.events.push(GameEvent::CardPlayed {
            player: self.players[idx].name.clone(),
            card: kind.to_string(),
        });
        match kind {
            Card::Reinforcement => {
                self.players[idx].reinforcement_pool += REINFORCEMENT_CARD_ARMIES;
            }
            _ => {
                if let Some(order) = self.card_order(id, kind) {
                    self.issue_order(id, order);
                }
            }
        }
        self.players[idx].deck.discard(kind);
        true
    }

    // Default targeting when a card resolves into an order.
    fn card_order(&self, id: PlayerId, kind: Card) -> Option<Order> {
        let map = self.map.as_ref()?;
        let owned = map.owned_by(id);
        match kind {
            Card::Bomb => owned
                .iter()
                .flat_map(|&t| map.territory(t).adjacent.iter().copied())
                .filter(|&t| !map.territory(t).owner.is_player(id))
                .max_by_key(|&t| map.territory(t).armies)
                .map(|target| Order::Bomb { issuer: id, target }),
            Card::Blockade => owned
                .iter()
                .copied()
                .min_by_key(|&t| map.territory(t).armies)
                .map(|target| Order::Blockade { issuer: id, target }),
            Card::Airlift => {
                if owned.len() < 2 {
                    return None;
                }
                let strongest = *owned.iter().max_by_key(|&&t| map.territory(t).armies)?;
                let weakest = *owned.iter().min_by_key(|&&t| map.territory(t).armies)?;
                if strongest == weakest {
                    return None;
                }
                let armies = map.territory(strongest).armies / 2;
                (armies > 0).then_some(Order::Airlift {
                    issuer: id,
                    source: strongest,
                    target: weakest,
                    armies,
                })
            }
            Card::Diplomacy => self
                .players
                .iter()
                .enumerate()
                .filter(|(i, p)| !p.eliminated && PlayerId(*i as u8) != id)
                .max_by_key(|(i, _)| map.owned_count(PlayerId(*i as u8)))
                .map(|(i, _)| Order::Negotiate {
                    issuer: id,
                    other: PlayerId(i as u8),
                }),
            Card::Reinforcement => None,
        }
    }

    /// Unconditional ownership flip of a frontier territory (no combat).
    pub fn annex(&mut self, id: PlayerId, territory: TerritoryId) -> bool {
        let name = {
            let Some(map) = self.map.as_mut() else {
                return false;
            };
            if map.territory(territory).owner.is_player(id) {
                return false;
            }
            let frontier = map
                .territory(territory)
                .adjacent
                .iter()
                .any(|&adj| map.territory(adj).owner.is_player(id));
            if !frontier {
                return false;
            }
            map.territory_mut(territory).owner = Owner::Player(id);
            map.territory(territory).name.clone()
        };
        self.events.push(GameEvent::TerritoryAnnexed {
            player: self.players[id.0 as usize].name.clone(),
            territory: name,
        });
        true
    }
}

// TODO: award Continent::bonus once full-continent ownership detection lands.
fn continent_bonus() -> u32 {
    0
}
