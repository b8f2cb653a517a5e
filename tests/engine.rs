use blackjack_table::{
    Card, Engine, FileStore, GamePhase, MemoryStore, Outcome, Seat, Shuffler, Stats,
    StatsError, StatsStore, StatsTracker, Suit, TableConfig, TableEvent,
};

/// Puts `draws` at the end of the deck so they come off in the given order.
struct Stacked {
    draws: Vec<Card>,
}

impl Shuffler for Stacked {
    fn shuffle(&mut self, cards: &mut [Card]) {
        let mut ordered: Vec<Card> = cards
            .iter()
            .copied()
            .filter(|card| !self.draws.contains(card))
            .collect();
        ordered.extend(self.draws.iter().rev().copied());
        cards.copy_from_slice(&ordered);
    }
}

fn card(rank: u8, suit: Suit) -> Card {
    Card::new(rank, suit)
}

/// Reads nothing and refuses every write.
struct ReadOnlyStore;

impl StatsStore for ReadOnlyStore {
    fn load(&self, _key: &str) -> Result<Option<String>, StatsError> {
        Ok(None)
    }

    fn save(&mut self, _key: &str, _value: &str) -> Result<(), StatsError> {
        Err(StatsError::Unavailable("storage is read-only".to_string()))
    }
}

fn stacked_engine(draws: Vec<Card>) -> Engine {
    let tracker = StatsTracker::new(Box::new(MemoryStore::new()), "blackjackStats");
    Engine::with_shuffler(Box::new(Stacked { draws }), tracker)
}

#[test]
fn opening_deal_alternates_player_and_dealer() {
    let mut engine = stacked_engine(vec![
        card(10, Suit::Hearts),
        card(10, Suit::Spades),
        card(9, Suit::Hearts),
        card(7, Suit::Spades),
    ]);

    assert!(engine.new_game());
    assert_eq!(engine.phase(), GamePhase::Dealing);
    assert!(engine.take_events().is_empty());

    engine.settle();
    assert_eq!(engine.phase(), GamePhase::PlayerTurn);
    assert_eq!(
        engine.player_cards(),
        &[card(10, Suit::Hearts), card(9, Suit::Hearts)]
    );
    assert_eq!(
        engine.dealer_cards(),
        &[card(10, Suit::Spades), card(7, Suit::Spades)]
    );
    assert_eq!(engine.deck().remaining(), 48);

    let seats: Vec<Seat> = engine
        .take_events()
        .into_iter()
        .filter_map(|event| match event {
            TableEvent::CardDealt { seat, .. } => Some(seat),
            _ => None,
        })
        .collect();
    assert_eq!(
        seats,
        vec![Seat::Player, Seat::Dealer, Seat::Player, Seat::Dealer]
    );
}

#[test]
fn dealer_busts_after_drawing_a_king() {
    let mut engine = stacked_engine(vec![
        card(10, Suit::Hearts),
        card(10, Suit::Spades),
        card(9, Suit::Hearts),
        card(6, Suit::Spades),
        card(13, Suit::Clubs),
    ]);

    engine.new_game();
    engine.settle();
    assert_eq!(engine.player_score(), 19);

    assert!(engine.stand());
    assert_eq!(engine.phase(), GamePhase::DealerTurn);
    engine.settle();

    assert_eq!(engine.phase(), GamePhase::Complete);
    assert_eq!(engine.dealer_cards().len(), 3);
    assert_eq!(engine.dealer_score(), Some(26));
    assert_eq!(engine.outcome(), Some(Outcome::DealerBust));
    assert_eq!(engine.stats(), Stats { wins: 1, losses: 0 });

    let events = engine.take_events();
    assert_eq!(
        events.last(),
        Some(&TableEvent::Resolved { outcome: Outcome::DealerBust })
    );
}

#[test]
fn dealt_21_stands_without_player_input() {
    let mut engine = stacked_engine(vec![
        card(1, Suit::Hearts),
        card(10, Suit::Spades),
        card(13, Suit::Hearts),
        card(7, Suit::Spades),
    ]);

    engine.new_game();
    for _ in 0..4 {
        assert!(engine.step());
    }
    assert_eq!(engine.phase(), GamePhase::DealerTurn);
    assert!(!engine.dealer_hidden());
    assert!(!engine.hit());

    engine.settle();
    assert_eq!(engine.outcome(), Some(Outcome::PlayerBlackjack));
    assert_eq!(engine.stats(), Stats { wins: 1, losses: 0 });
}

#[test]
fn matching_naturals_push() {
    let mut engine = stacked_engine(vec![
        card(1, Suit::Hearts),
        card(1, Suit::Spades),
        card(13, Suit::Hearts),
        card(13, Suit::Spades),
    ]);

    engine.new_game();
    engine.settle();

    assert_eq!(engine.outcome(), Some(Outcome::Push));
    assert_eq!(engine.stats(), Stats::default());
}

#[test]
fn player_bust_still_plays_dealer_turn() {
    let mut engine = stacked_engine(vec![
        card(10, Suit::Hearts),
        card(10, Suit::Spades),
        card(6, Suit::Hearts),
        card(7, Suit::Spades),
        card(13, Suit::Hearts),
    ]);

    engine.new_game();
    engine.settle();
    assert!(engine.hit());
    assert_eq!(engine.player_score(), 26);
    assert_eq!(engine.phase(), GamePhase::DealerTurn);
    assert_eq!(engine.dealer_score(), Some(17));
    assert!(!engine.hit());
    assert!(!engine.stand());

    engine.settle();
    assert_eq!(engine.outcome(), Some(Outcome::PlayerBust));
    assert_eq!(engine.stats(), Stats { wins: 0, losses: 1 });
}

#[test]
fn actions_out_of_turn_change_nothing() {
    let mut engine = stacked_engine(vec![
        card(10, Suit::Hearts),
        card(10, Suit::Spades),
        card(8, Suit::Hearts),
        card(8, Suit::Spades),
    ]);

    assert!(!engine.hit());
    assert!(!engine.stand());
    assert!(!engine.step());
    assert_eq!(engine.phase(), GamePhase::NotStarted);
    assert!(engine.player_cards().is_empty());

    engine.new_game();
    engine.step();
    assert!(!engine.hit());
    assert!(!engine.stand());
    assert!(!engine.new_game());
    assert_eq!(engine.player_cards().len(), 1);

    engine.settle();
    engine.stand();
    assert!(!engine.new_game());
    engine.settle();
    assert_eq!(engine.outcome(), Some(Outcome::Push));

    let dealt = engine.player_cards().to_vec();
    assert!(!engine.hit());
    assert_eq!(engine.player_cards(), dealt.as_slice());
    assert!(engine.new_game());
}

#[test]
fn view_hides_dealer_hole_card() {
    let mut engine = stacked_engine(vec![
        card(10, Suit::Hearts),
        card(12, Suit::Diamonds),
        card(9, Suit::Hearts),
        card(7, Suit::Spades),
    ]);
    engine.new_game();
    engine.settle();

    let view = engine.view();
    assert_eq!(view.phase, GamePhase::PlayerTurn);
    assert!(view.dealer_hidden);
    assert!(view.dealer_cards[0].is_none());
    assert_eq!(view.dealer_cards[1].as_ref().map(|c| c.value), Some(7));
    assert_eq!(view.dealer_score, None);
    assert_eq!(view.player_score, 19);
    assert!(view.can_hit && view.can_stand && view.can_new_game);
    assert_eq!(view.message, None);

    engine.stand();
    engine.settle();
    let view = engine.view();
    assert_eq!(view.dealer_cards[0].as_ref().map(|c| c.rank.as_str()), Some("Q"));
    assert_eq!(view.dealer_score, Some(17));
    assert_eq!(view.message, Some("YOU WIN!"));
    assert_eq!(view.wins, 1);
    assert!(!view.can_hit);
}

#[test]
fn abandoning_a_round_records_nothing() {
    let mut engine = stacked_engine(vec![
        card(10, Suit::Hearts),
        card(10, Suit::Spades),
        card(2, Suit::Hearts),
        card(7, Suit::Spades),
    ]);
    engine.new_game();
    engine.settle();
    assert!(engine.new_game());
    assert!(engine.player_cards().is_empty());
    assert_eq!(engine.outcome(), None);
    assert_eq!(engine.stats(), Stats::default());
}

#[test]
fn dealer_always_finishes_on_17_or_more() {
    let config = TableConfig {
        seed: Some(2024),
        ..TableConfig::default()
    };
    let mut engine = Engine::new(&config, Box::new(MemoryStore::new()));

    for _ in 0..300 {
        assert!(engine.new_game());
        engine.settle();
        while engine.phase() == GamePhase::PlayerTurn && engine.player_score() < 15 {
            engine.hit();
        }
        engine.stand();
        engine.settle();

        assert_eq!(engine.phase(), GamePhase::Complete);
        assert!(engine.player_cards().len() >= 2);
        assert!(engine.dealer_score().unwrap() >= 17);
    }
    let stats = engine.stats();
    assert!(stats.wins + stats.losses <= 300);
}

#[test]
fn stats_survive_a_new_engine() {
    let dir = std::env::temp_dir().join(format!("blackjack-engine-{}", std::process::id()));
    let draws = vec![
        card(10, Suit::Hearts),
        card(10, Suit::Spades),
        card(9, Suit::Hearts),
        card(6, Suit::Spades),
        card(13, Suit::Clubs),
    ];

    let tracker = StatsTracker::new(Box::new(FileStore::new(&dir)), "blackjackStats");
    let mut engine = Engine::with_shuffler(Box::new(Stacked { draws }), tracker);
    engine.new_game();
    engine.settle();
    engine.stand();
    engine.settle();
    assert_eq!(engine.outcome(), Some(Outcome::DealerBust));
    assert_eq!(engine.stats(), Stats { wins: 1, losses: 0 });

    let reopened = Engine::new(&TableConfig::default(), Box::new(FileStore::new(&dir)));
    assert_eq!(reopened.stats(), Stats { wins: 1, losses: 0 });
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn round_completes_when_stats_cannot_be_saved() {
    let tracker = StatsTracker::new(Box::new(ReadOnlyStore), "blackjackStats");
    let draws = vec![
        card(10, Suit::Hearts),
        card(10, Suit::Spades),
        card(9, Suit::Hearts),
        card(8, Suit::Spades),
    ];
    let mut engine = Engine::with_shuffler(Box::new(Stacked { draws }), tracker);

    engine.new_game();
    engine.settle();
    assert!(engine.stand());
    engine.settle();

    assert_eq!(engine.phase(), GamePhase::Complete);
    assert_eq!(engine.outcome(), Some(Outcome::PlayerWin));
    assert_eq!(engine.stats(), Stats { wins: 1, losses: 0 });
    assert_eq!(
        engine.take_events().last(),
        Some(&TableEvent::Resolved { outcome: Outcome::PlayerWin })
    );
    assert!(engine.new_game());
}

#[test]
fn new_round_drops_undrained_events() {
    let mut engine = stacked_engine(vec![
        card(10, Suit::Hearts),
        card(10, Suit::Spades),
        card(9, Suit::Hearts),
        card(8, Suit::Spades),
    ]);

    for _ in 0..3 {
        assert!(engine.new_game());
        assert!(engine.take_events().is_empty());
        engine.settle();
        engine.stand();
        engine.settle();
        assert_eq!(engine.phase(), GamePhase::Complete);
    }

    let events = engine.take_events();
    let dealt = events
        .iter()
        .filter(|event| matches!(event, TableEvent::CardDealt { .. }))
        .count();
    assert_eq!(dealt, engine.player_cards().len() + engine.dealer_cards().len());
    assert!(matches!(events.last(), Some(TableEvent::Resolved { .. })));
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, TableEvent::Resolved { .. }))
            .count(),
        1
    );
}
