use serde::{Serialize, Serializer};

use crate::{
    config::TableConfig,
    deck::{Card, CardView, Deck, RandomShuffler, Shuffler},
    hand::{is_blackjack, score, BLACKJACK},
    stats::{Stats, StatsStore, StatsTracker},
};

pub const DEALER_STAND_SCORE: u32 = 17;
const INITIAL_DEAL: usize = 4;

const DRAW_HAPTIC_MS: u32 = 50;
const WIN_HAPTIC_MS: u32 = 100;
const LOSS_HAPTIC_MS: u32 = 200;

/// `Dealing` and `DealerTurn` are in flight: they advance through
/// [`Engine::step`] and refuse player input and new rounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    NotStarted,
    Dealing,
    PlayerTurn,
    DealerTurn,
    Complete,
}

impl GamePhase {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, GamePhase::Dealing | GamePhase::DealerTurn)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    PlayerBust,
    DealerBust,
    Push,
    PlayerBlackjack,
    PlayerWin,
    DealerWin,
}

impl Outcome {
    pub fn is_win(&self) -> bool {
        matches!(
            self,
            Outcome::DealerBust | Outcome::PlayerBlackjack | Outcome::PlayerWin
        )
    }

    pub fn is_loss(&self) -> bool {
        matches!(self, Outcome::PlayerBust | Outcome::DealerWin)
    }

    pub fn message(&self) -> &'static str {
        match self {
            Outcome::PlayerBust => "BUST! YOU LOSE",
            Outcome::DealerBust => "DEALER BUSTED! YOU WIN!",
            Outcome::Push => "PUSH!",
            Outcome::PlayerBlackjack => "BLACKJACK! YOU WIN!",
            Outcome::PlayerWin => "YOU WIN!",
            Outcome::DealerWin => "YOU LOSE",
        }
    }
}

pub fn determine_winner(player_cards: &[Card], dealer_cards: &[Card]) -> Outcome {
    let player = score(player_cards);
    let dealer = score(dealer_cards);

    if player > BLACKJACK {
        Outcome::PlayerBust
    } else if dealer > BLACKJACK {
        Outcome::DealerBust
    } else if player == dealer {
        Outcome::Push
    } else if is_blackjack(player_cards) {
        Outcome::PlayerBlackjack
    } else if player > dealer {
        Outcome::PlayerWin
    } else {
        Outcome::DealerWin
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Seat {
    Player,
    Dealer,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TableEvent {
    CardDealt {
        seat: Seat,
        #[serde(serialize_with = "serialize_card_view")]
        card: Card,
    },
    DealerRevealed,
    Resolved { outcome: Outcome },
}

fn serialize_card_view<S: Serializer>(card: &Card, serializer: S) -> Result<S::Ok, S::Error> {
    CardView::from(card).serialize(serializer)
}

impl TableEvent {
    /// Vibration length a haptic front-end should play for this event.
    pub fn haptic_ms(&self) -> Option<u32> {
        match self {
            TableEvent::CardDealt { .. } => Some(DRAW_HAPTIC_MS),
            TableEvent::DealerRevealed => None,
            TableEvent::Resolved { outcome } if outcome.is_win() => Some(WIN_HAPTIC_MS),
            TableEvent::Resolved { .. } => Some(LOSS_HAPTIC_MS),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub phase: GamePhase,
    pub player_cards: Vec<CardView>,
    pub dealer_cards: Vec<Option<CardView>>,
    pub dealer_hidden: bool,
    pub player_score: u32,
    pub dealer_score: Option<u32>,
    pub outcome: Option<Outcome>,
    pub message: Option<&'static str>,
    pub wins: u32,
    pub losses: u32,
    pub can_hit: bool,
    pub can_stand: bool,
    pub can_new_game: bool,
}

pub struct Engine {
    deck: Deck,
    player: Vec<Card>,
    dealer: Vec<Card>,
    phase: GamePhase,
    dealer_hidden: bool,
    outcome: Option<Outcome>,
    tracker: StatsTracker,
    events: Vec<TableEvent>,
}

impl Engine {
    pub fn new(config: &TableConfig, store: Box<dyn StatsStore>) -> Self {
        let shuffler = RandomShuffler::new(config.seed);
        let tracker = StatsTracker::new(store, config.storage_key.clone());
        Engine::with_shuffler(Box::new(shuffler), tracker)
    }

    pub fn with_shuffler(shuffler: Box<dyn Shuffler>, tracker: StatsTracker) -> Self {
        Engine {
            deck: Deck::new(shuffler),
            player: Vec::new(),
            dealer: Vec::new(),
            phase: GamePhase::NotStarted,
            dealer_hidden: true,
            outcome: None,
            tracker,
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn player_cards(&self) -> &[Card] {
        &self.player
    }

    pub fn dealer_cards(&self) -> &[Card] {
        &self.dealer
    }

    pub fn player_score(&self) -> u32 {
        score(&self.player)
    }

    /// `None` while the dealer's first card is face down.
    pub fn dealer_score(&self) -> Option<u32> {
        if self.dealer_hidden {
            None
        } else {
            Some(score(&self.dealer))
        }
    }

    pub fn dealer_hidden(&self) -> bool {
        self.dealer_hidden
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn stats(&self) -> Stats {
        self.tracker.stats()
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Drains the events produced since the last call. Events a caller never
    /// collects are dropped when the next round starts.
    pub fn take_events(&mut self) -> Vec<TableEvent> {
        std::mem::take(&mut self.events)
    }

    /// Starts a round with a fresh deck. The four opening cards follow
    /// through [`step`](Self::step).
    pub fn new_game(&mut self) -> bool {
        if self.phase.is_in_flight() {
            log::debug!("new game rejected during {:?}", self.phase);
            return false;
        }
        self.deck.reset();
        self.player.clear();
        self.dealer.clear();
        self.outcome = None;
        self.dealer_hidden = true;
        self.events.clear();
        self.phase = GamePhase::Dealing;
        log::debug!("new round started");
        true
    }

    pub fn hit(&mut self) -> bool {
        if self.phase != GamePhase::PlayerTurn {
            log::debug!("hit rejected during {:?}", self.phase);
            return false;
        }
        self.deal_to(Seat::Player);
        if self.player_score() > BLACKJACK {
            log::debug!("player bust on {}", self.player_score());
            self.reveal();
        }
        true
    }

    pub fn stand(&mut self) -> bool {
        if self.phase != GamePhase::PlayerTurn {
            log::debug!("stand rejected during {:?}", self.phase);
            return false;
        }
        self.reveal();
        true
    }

    /// Performs one pending transition. Returns `false` when the round is
    /// waiting on the player or already over.
    pub fn step(&mut self) -> bool {
        match self.phase {
            GamePhase::Dealing => {
                let dealt = self.player.len() + self.dealer.len();
                let seat = if dealt % 2 == 0 { Seat::Player } else { Seat::Dealer };
                self.deal_to(seat);
                if dealt + 1 == INITIAL_DEAL {
                    self.phase = GamePhase::PlayerTurn;
                    if self.player_score() == BLACKJACK {
                        log::debug!("player dealt 21, standing");
                        self.reveal();
                    }
                }
                true
            }
            GamePhase::DealerTurn => {
                if score(&self.dealer) < DEALER_STAND_SCORE {
                    self.deal_to(Seat::Dealer);
                } else {
                    self.resolve();
                }
                true
            }
            GamePhase::NotStarted | GamePhase::PlayerTurn | GamePhase::Complete => false,
        }
    }

    /// Runs every pending transition without pacing.
    pub fn settle(&mut self) {
        while self.step() {}
    }

    pub fn view(&self) -> TableView {
        let dealer_cards = self
            .dealer
            .iter()
            .enumerate()
            .map(|(index, card)| {
                if index == 0 && self.dealer_hidden {
                    None
                } else {
                    Some(CardView::from(card))
                }
            })
            .collect();
        let stats = self.stats();
        TableView {
            phase: self.phase,
            player_cards: self.player.iter().map(CardView::from).collect(),
            dealer_cards,
            dealer_hidden: self.dealer_hidden,
            player_score: self.player_score(),
            dealer_score: self.dealer_score(),
            outcome: self.outcome,
            message: self.outcome.map(|outcome| outcome.message()),
            wins: stats.wins,
            losses: stats.losses,
            can_hit: self.phase == GamePhase::PlayerTurn,
            can_stand: self.phase == GamePhase::PlayerTurn,
            can_new_game: !self.phase.is_in_flight(),
        }
    }

    fn deal_to(&mut self, seat: Seat) {
        let card = self.deck.draw();
        match seat {
            Seat::Player => self.player.push(card),
            Seat::Dealer => self.dealer.push(card),
        }
        self.events.push(TableEvent::CardDealt { seat, card });
    }

    fn reveal(&mut self) {
        self.dealer_hidden = false;
        self.phase = GamePhase::DealerTurn;
        self.events.push(TableEvent::DealerRevealed);
    }

    fn resolve(&mut self) {
        let outcome = determine_winner(&self.player, &self.dealer);
        log::info!(
            "round over: player {} vs dealer {} -> {:?}",
            self.player_score(),
            score(&self.dealer),
            outcome
        );
        self.tracker.record(outcome);
        // Failures are already logged by the tracker and never affect the round.
        let _ = self.tracker.persist();
        self.outcome = Some(outcome);
        self.phase = GamePhase::Complete;
        self.events.push(TableEvent::Resolved { outcome });
    }
}
