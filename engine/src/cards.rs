// ═══════════════════════════════════════════════════════════════════════
// Cards — per-player deck and hand
//
// Five card kinds; each resolves into the matching order (or a pool grant
// for Reinforcement) when played. Played cards go back under the deck.
// ═══════════════════════════════════════════════════════════════════════

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Card {
    Bomb,
    Reinforcement,
    Blockade,
    Airlift,
    Diplomacy,
}

impl Card {
    pub const ALL: [Card; 5] = [
        Card::Bomb,
        Card::Reinforcement,
        Card::Blockade,
        Card::Airlift,
        Card::Diplomacy,
    ];
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Card::Bomb => "Bomb",
            Card::Reinforcement => "Reinforcement",
            Card::Blockade => "Blockade",
            Card::Airlift => "Airlift",
            Card::Diplomacy => "Diplomacy",
        };
        write!(f, "{name}")
    }
}

const COPIES_PER_KIND: usize = 3;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hand {
    pub cards: Vec<Card>,
}

impl Hand {
    pub fn contains(&self, kind: Card) -> bool {
        self.cards.contains(&kind)
    }

    /// Take the first card of `kind` out of the hand.
    pub fn remove(&mut self, kind: Card) -> Option<Card> {
        let pos = self.cards.iter().position(|&c| c == kind)?;
        Some(self.cards.remove(pos))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// A full deck, in kind order. Shuffle before dealing.
    pub fn new() -> Self {
        let mut cards = Vec::with_capacity(Card::ALL.len() * COPIES_PER_KIND);
        for kind in Card::ALL {
            for _ in 0..COPIES_PER_KIND {
                cards.push(kind);
            }
        }
        Deck { cards }
    }

    pub fn shuffle(&mut self, rng: &mut impl Rng) {
        self.cards.shuffle(rng);
    }

    /// Draw the top card into `hand`; None once the deck is exhausted.
    pub fn draw(&mut self, hand: &mut Hand) -> Option<Card> {
        let card = self.cards.pop()?;
        hand.cards.push(card);
        Some(card)
    }

    /// Played cards go back under the deck.
    pub fn discard(&mut self, card: Card) {
        self.cards.insert(0, card);
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Deck::new()
    }
}
