use crate::deck::Card;

pub const BLACKJACK: u32 = 21;

/// Blackjack value of a rank: aces count 11, court cards 10.
pub fn rank_value(rank: u8) -> u8 {
    match rank {
        1 => 11,
        2..=10 => rank,
        _ => 10,
    }
}

/// Hand total with as many aces as needed dropped from 11 to 1.
pub fn score(cards: &[Card]) -> u32 {
    let mut total: u32 = cards.iter().map(|card| u32::from(card.value())).sum();
    let mut soft_aces = cards.iter().filter(|card| card.is_ace()).count();

    while total > BLACKJACK && soft_aces > 0 {
        total -= 10;
        soft_aces -= 1;
    }
    total
}

pub fn is_bust(cards: &[Card]) -> bool {
    score(cards) > BLACKJACK
}

pub fn is_blackjack(cards: &[Card]) -> bool {
    cards.len() == 2 && score(cards) == BLACKJACK
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Suit;

    fn cards(ranks: &[u8]) -> Vec<Card> {
        ranks.iter().map(|&rank| Card::new(rank, Suit::Spades)).collect()
    }

    #[test]
    fn ace_king_is_21() {
        assert_eq!(score(&cards(&[1, 13])), 21);
        assert!(is_blackjack(&cards(&[1, 13])));
    }

    #[test]
    fn two_aces_soften_one() {
        assert_eq!(score(&cards(&[1, 1])), 12);
    }

    #[test]
    fn two_aces_and_nine() {
        assert_eq!(score(&cards(&[1, 1, 9])), 21);
        assert!(!is_blackjack(&cards(&[1, 1, 9])));
    }

    #[test]
    fn four_aces_soften_independently() {
        assert_eq!(score(&cards(&[1, 1, 1, 1])), 14);
        assert_eq!(score(&cards(&[1, 1, 1, 1, 10, 8])), 22);
    }

    #[test]
    fn bust_without_aces() {
        assert_eq!(score(&cards(&[10, 10, 5])), 25);
        assert!(is_bust(&cards(&[10, 10, 5])));
    }

    #[test]
    fn whole_deck_scores_without_overflow() {
        // 380 raw, four aces softened.
        assert_eq!(score(&crate::deck::build()), 340);
        let six_decks: Vec<Card> = (0..6).flat_map(|_| crate::deck::build()).collect();
        assert_eq!(score(&six_decks), 6 * 380 - 24 * 10);
    }

    #[test]
    fn empty_hand_scores_zero() {
        assert_eq!(score(&[]), 0);
    }
}
