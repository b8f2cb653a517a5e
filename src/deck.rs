use std::fmt;

use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::hand::rank_value;

pub const DECK_SIZE: usize = 52;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Hearts,
    Diamonds,
    Spades,
    Clubs,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Spades, Suit::Clubs];

    pub fn symbol(&self) -> &'static str {
        match self {
            Suit::Hearts => "♥",
            Suit::Diamonds => "♦",
            Suit::Spades => "♠",
            Suit::Clubs => "♣",
        }
    }

    pub fn is_red(&self) -> bool {
        matches!(self, Suit::Hearts | Suit::Diamonds)
    }
}

/// A playing card. `rank` runs 1..=13 with 1 as the ace and 11..=13 as J/Q/K.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: u8,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: u8, suit: Suit) -> Self {
        debug_assert!((1..=13).contains(&rank), "card rank {rank} out of range");
        Card { rank, suit }
    }

    pub fn value(&self) -> u8 {
        rank_value(self.rank)
    }

    pub fn is_ace(&self) -> bool {
        self.rank == 1
    }

    pub fn is_red(&self) -> bool {
        self.suit.is_red()
    }

    pub fn rank_label(&self) -> String {
        match self.rank {
            1 => "A".to_string(),
            11 => "J".to_string(),
            12 => "Q".to_string(),
            13 => "K".to_string(),
            rank => rank.to_string(),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank_label(), self.suit.symbol())
    }
}

/// Serializable form of a card for the UI.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub rank: String,
    pub suit: &'static str,
    pub value: u8,
    pub is_red: bool,
}

impl From<&Card> for CardView {
    fn from(card: &Card) -> Self {
        CardView {
            rank: card.rank_label(),
            suit: card.suit.symbol(),
            value: card.value(),
            is_red: card.is_red(),
        }
    }
}

/// One card per (suit, rank), in suit order then rank order.
pub fn build() -> Vec<Card> {
    let mut cards = Vec::with_capacity(DECK_SIZE);
    for suit in Suit::ALL {
        for rank in 1..=13 {
            cards.push(Card::new(rank, suit));
        }
    }
    cards
}

pub fn fisher_yates<R: Rng>(cards: &mut [Card], rng: &mut R) {
    for i in (1..cards.len()).rev() {
        let j = rng.gen_range(0..=i);
        cards.swap(i, j);
    }
}

/// Orders a freshly built deck. The last card is drawn first.
pub trait Shuffler {
    fn shuffle(&mut self, cards: &mut [Card]);
}

pub struct RandomShuffler {
    rng: SmallRng,
}

impl RandomShuffler {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        RandomShuffler { rng }
    }
}

impl Shuffler for RandomShuffler {
    fn shuffle(&mut self, cards: &mut [Card]) {
        fisher_yates(cards, &mut self.rng);
    }
}

pub struct Deck {
    cards: Vec<Card>,
    shuffler: Box<dyn Shuffler>,
}

impl Deck {
    pub fn new(shuffler: Box<dyn Shuffler>) -> Self {
        let mut deck = Deck {
            cards: Vec::new(),
            shuffler,
        };
        deck.reset();
        deck
    }

    pub fn reset(&mut self) {
        self.cards = build();
        self.shuffler.shuffle(&mut self.cards);
    }

    /// Draws from the end of the deck, rebuilding a full shuffled deck first
    /// when it has run dry.
    pub fn draw(&mut self) -> Card {
        loop {
            if let Some(card) = self.cards.pop() {
                return card;
            }
            log::debug!("deck exhausted, reshuffling");
            self.reset();
        }
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}
