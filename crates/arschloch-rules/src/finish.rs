//! Finish detection and role assignment.

use arschloch_protocol::{Phase, Rank, Role};

use crate::{Round, SEATS};

/// Roles in finishing order. The last slot is what the forced last player
/// gets when nobody escaped on an Ace.
const FINISH_ORDER: [Role; SEATS] = [
    Role::Koenig,
    Role::ViceKoenig,
    Role::ViceArschloch,
    Role::Arschloch,
];

/// Outcome of a player emptying their hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Finish {
    pub(crate) role: Role,
    /// Seat and role of the player forced out when this was the third finish.
    pub(crate) last: Option<(usize, Role)>,
}

impl Round {
    /// Assigns a role to the player at `seat`, who just emptied their hand
    /// with a play of `winning_rank`.
    ///
    /// Finishing on an Ace while nobody is Arschloch yet makes the player
    /// Arschloch outright, outside the normal order. Otherwise the next
    /// role in finishing order is taken. The third finish ends the round:
    /// the remaining player takes the next free slot, their leftover cards
    /// go to the discard pile, and the round moves to [`Phase::Next`].
    pub(crate) fn record_finish(&mut self, seat: usize, winning_rank: Rank) -> Finish {
        let arschloch_taken = self
            .players
            .iter()
            .any(|p| p.role == Some(Role::Arschloch));

        let role = if winning_rank == Rank::Ace && !arschloch_taken {
            Role::Arschloch
        } else {
            let role = FINISH_ORDER[self.finished_count];
            self.finished_count += 1;
            role
        };

        let player = &mut self.players[seat];
        player.role = Some(role);
        player.finished = true;
        tracing::info!(player = %player.id, %role, "player finished");

        if self.active_count() > 1 {
            return Finish { role, last: None };
        }

        let last_seat = self
            .players
            .iter()
            .position(|p| !p.finished)
            .unwrap_or(self.current);
        let last_role = FINISH_ORDER[self.finished_count];

        let last = &mut self.players[last_seat];
        last.role = Some(last_role);
        last.finished = true;
        let leftover = last.hand.take_all();
        self.discard.extend(leftover);
        self.phase = Phase::Next;

        tracing::info!(
            player = %self.players[last_seat].id,
            role = %last_role,
            round = self.number,
            "round over"
        );

        Finish {
            role,
            last: Some((last_seat, last_role)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Hand;
    use arschloch_protocol::PlayerId;
    use Rank::*;

    fn round() -> Round {
        let seating = [PlayerId(1), PlayerId(2), PlayerId(3), PlayerId(4)];
        Round::from_hands(
            seating,
            [vec![Seven], vec![Eight], vec![Nine], vec![Ten, Ace]].map(Hand::new),
        )
    }

    #[test]
    fn test_normal_finishing_order() {
        let mut round = round();
        assert_eq!(round.record_finish(0, Seven).role, Role::Koenig);
        assert_eq!(round.record_finish(1, Eight).role, Role::ViceKoenig);

        let finish = round.record_finish(2, Nine);
        assert_eq!(finish.role, Role::ViceArschloch);
        assert_eq!(finish.last, Some((3, Role::Arschloch)));
        assert_eq!(round.phase, Phase::Next);
        assert!(round.players[3].hand.is_empty());
        assert_eq!(round.discard, vec![Ten, Ace]);
    }

    #[test]
    fn test_ace_escape_takes_arschloch_out_of_order() {
        let mut round = round();
        assert_eq!(round.record_finish(1, Ace).role, Role::Arschloch);
        assert_eq!(round.finished_count, 0);
        assert_eq!(round.record_finish(0, Seven).role, Role::Koenig);

        let finish = round.record_finish(2, Nine);
        assert_eq!(finish.role, Role::ViceKoenig);
        assert_eq!(finish.last, Some((3, Role::ViceArschloch)));
    }

    #[test]
    fn test_second_ace_finish_follows_normal_order() {
        let mut round = round();
        assert_eq!(round.record_finish(0, Ace).role, Role::Arschloch);
        assert_eq!(round.record_finish(1, Ace).role, Role::Koenig);
    }

    #[test]
    fn test_ace_escape_as_third_finish() {
        let mut round = round();
        round.record_finish(0, Seven);
        round.record_finish(1, Eight);
        let finish = round.record_finish(2, Ace);
        assert_eq!(finish.role, Role::Arschloch);
        assert_eq!(finish.last, Some((3, Role::ViceArschloch)));
    }
}
