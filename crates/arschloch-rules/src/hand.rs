//! A player's hand: a sorted multiset of ranks.

use arschloch_protocol::Rank;

use crate::GameError;

/// Cards held by one player, always ascending.
///
/// Order only matters for display; every rule looks at counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Rank>,
}

impl Hand {
    /// Creates a hand from arbitrary cards, sorting them.
    pub fn new(mut cards: Vec<Rank>) -> Self {
        cards.sort_unstable();
        Self { cards }
    }

    /// The cards, lowest first.
    pub fn cards(&self) -> &[Rank] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of copies of `rank` held.
    pub fn count(&self, rank: Rank) -> usize {
        self.cards.iter().filter(|&&card| card == rank).count()
    }

    /// Returns `true` if every card in `ranks` is held, with multiplicity:
    /// `[Q, Q]` needs two Queens.
    pub fn contains_all(&self, ranks: &[Rank]) -> bool {
        ranks.iter().all(|&rank| {
            let wanted = ranks.iter().filter(|&&r| r == rank).count();
            self.count(rank) >= wanted
        })
    }

    /// Adds cards, keeping the hand sorted.
    pub fn add(&mut self, ranks: &[Rank]) {
        for &rank in ranks {
            let at = self.cards.partition_point(|&card| card <= rank);
            self.cards.insert(at, rank);
        }
    }

    /// Removes exactly the cards in `ranks`.
    ///
    /// Either all of them are removed or, if any is missing, none are.
    pub fn remove(&mut self, ranks: &[Rank]) -> Result<(), GameError> {
        if !self.contains_all(ranks) {
            return Err(GameError::InsufficientCards);
        }
        for rank in ranks {
            if let Some(at) = self.cards.iter().position(|card| card == rank) {
                self.cards.remove(at);
            }
        }
        Ok(())
    }

    /// Empties the hand, returning what was in it.
    pub fn take_all(&mut self) -> Vec<Rank> {
        std::mem::take(&mut self.cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Rank::*;

    #[test]
    fn test_new_sorts() {
        let hand = Hand::new(vec![Ace, Seven, Jack, Seven]);
        assert_eq!(hand.cards(), &[Seven, Seven, Jack, Ace]);
    }

    #[test]
    fn test_contains_all_respects_multiplicity() {
        let hand = Hand::new(vec![Queen, King, King]);
        assert!(hand.contains_all(&[King, King]));
        assert!(hand.contains_all(&[Queen, King]));
        assert!(!hand.contains_all(&[Queen, Queen]));
        assert!(!hand.contains_all(&[Ace]));
    }

    #[test]
    fn test_add_keeps_order() {
        let mut hand = Hand::new(vec![Seven, Ace]);
        hand.add(&[Ten, Eight, Ace]);
        assert_eq!(hand.cards(), &[Seven, Eight, Ten, Ace, Ace]);
    }

    #[test]
    fn test_remove_is_all_or_nothing() {
        let mut hand = Hand::new(vec![Nine, Nine, Jack]);
        assert_eq!(
            hand.remove(&[Nine, Jack, Jack]),
            Err(GameError::InsufficientCards)
        );
        assert_eq!(hand.len(), 3);

        hand.remove(&[Nine, Jack]).unwrap();
        assert_eq!(hand.cards(), &[Nine]);
    }

    #[test]
    fn test_take_all_empties() {
        let mut hand = Hand::new(vec![Eight, King]);
        assert_eq!(hand.take_all(), vec![Eight, King]);
        assert!(hand.is_empty());
    }
}
