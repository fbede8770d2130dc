//! The 32-card deck and the deal.

use arschloch_protocol::Rank;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::{Hand, SEATS};

/// Copies of each rank in the deck.
pub const COPIES_PER_RANK: usize = 4;

/// Cards in the deck: eight ranks, four of each.
pub const DECK_SIZE: usize = Rank::ALL.len() * COPIES_PER_RANK;

/// Cards dealt to each seat.
pub const HAND_SIZE: usize = DECK_SIZE / SEATS;

/// An unshuffled deck, lowest ranks first.
pub fn full_deck() -> Vec<Rank> {
    Rank::ALL
        .iter()
        .flat_map(|&rank| std::iter::repeat_n(rank, COPIES_PER_RANK))
        .collect()
}

/// Shuffles a fresh deck and deals it round-robin into four sorted hands.
///
/// The shuffle is repeated until its first card is a Seven. That card
/// goes to seat 0, so seat 0 always holds a Seven and can open the first
/// round without a separate scan for the lowest card. Each attempt
/// succeeds with probability 1/8, so the loop ends quickly.
pub fn deal<R: Rng + ?Sized>(rng: &mut R) -> [Hand; SEATS] {
    let mut cards = full_deck();
    cards.shuffle(rng);
    while cards[0] != Rank::Seven {
        cards.shuffle(rng);
    }

    std::array::from_fn(|seat| {
        Hand::new(cards.iter().skip(seat).step_by(SEATS).copied().collect())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_full_deck_has_four_of_each() {
        let deck = full_deck();
        assert_eq!(deck.len(), DECK_SIZE);
        for rank in Rank::ALL {
            assert_eq!(deck.iter().filter(|&&c| c == rank).count(), 4);
        }
    }

    #[test]
    fn test_deal_gives_seat_zero_a_seven() {
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let hands = deal(&mut rng);
            assert_eq!(hands[0].cards()[0], Rank::Seven, "seed {seed}");
        }
    }

    #[test]
    fn test_deal_conserves_cards() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let hands = deal(&mut rng);

        let mut all: Vec<Rank> =
            hands.iter().flat_map(|h| h.cards().to_vec()).collect();
        all.sort();
        assert_eq!(all, full_deck());
        assert!(hands.iter().all(|h| h.len() == HAND_SIZE));
    }

    #[test]
    fn test_deal_is_reproducible_with_seed() {
        let a = deal(&mut ChaCha8Rng::seed_from_u64(99));
        let b = deal(&mut ChaCha8Rng::seed_from_u64(99));
        assert_eq!(a, b);
    }
}
