//! Post-round card trading between the extreme standings.
//!
//! Two independent exchanges run once per round, each in two steps:
//!
//! ```text
//! König      ── asks for 2 ──▶  Arschloch        then gives 2 back
//! Vize-König ── asks for 1 ──▶  Vize-Arschloch   then gives 1 back
//! ```
//!
//! Each exchange carries an explicit [`TradeStep`]; hand sizes are never
//! used to tell the steps apart. When both reach [`TradeStep::Done`] the
//! next round starts running with the Arschloch to play.

use arschloch_protocol::{Phase, PlayerId, Rank, Role};

use crate::{GameError, Round};

/// One of the two trading pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradePair {
    /// König and Arschloch, two cards.
    Koenig,
    /// Vize-König and Vize-Arschloch, one card.
    Vice,
}

impl TradePair {
    /// The standing that drives the exchange.
    pub fn initiator(self) -> Role {
        match self {
            Self::Koenig => Role::Koenig,
            Self::Vice => Role::ViceKoenig,
        }
    }

    /// The standing that hands over cards first.
    pub fn opponent(self) -> Role {
        match self {
            Self::Koenig => Role::Arschloch,
            Self::Vice => Role::ViceArschloch,
        }
    }

    /// Cards moved in each direction.
    pub fn card_count(self) -> usize {
        match self {
            Self::Koenig => 2,
            Self::Vice => 1,
        }
    }

    fn for_initiator(standing: Option<Role>) -> Option<Self> {
        match standing {
            Some(Role::Koenig) => Some(Self::Koenig),
            Some(Role::ViceKoenig) => Some(Self::Vice),
            _ => None,
        }
    }
}

/// Progress of one exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeStep {
    /// Waiting for the initiator to name the cards they want.
    AwaitingRequest,
    /// Initiator has received; waiting for the cards they give back.
    AwaitingReturn,
    /// Exchange complete for this round.
    Done,
}

/// Which half of an exchange a trade command performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeAction {
    /// Cards moved from the opponent to the initiator.
    Requested,
    /// Cards moved from the initiator back to the opponent.
    Returned,
}

/// What an accepted trade command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeReport {
    pub pair: TradePair,
    pub action: TradeAction,
    pub initiator: PlayerId,
    pub opponent: PlayerId,
    pub cards: Vec<Rank>,
    /// Both exchanges are done and the next round is running.
    pub round_started: bool,
}

impl Round {
    /// Performs the next step of `player`'s exchange with `ranks`.
    ///
    /// Only the König and Vize-König act; their opponents wait. A second
    /// attempt after the exchange completed returns
    /// [`GameError::DuplicateTrade`] without touching any hand.
    pub fn trade(&mut self, player: PlayerId, ranks: &[Rank]) -> Result<TradeReport, GameError> {
        if self.phase != Phase::Trading {
            return Err(GameError::WrongPhaseForCommand(self.phase));
        }
        let seat = self.seat_of(player).ok_or(GameError::NotSeated)?;
        let pair = TradePair::for_initiator(self.players[seat].standing)
            .ok_or(GameError::NotYourTrade)?;

        let step = self.trade_step(pair);
        if step == TradeStep::Done {
            return Err(GameError::DuplicateTrade);
        }
        if ranks.len() != pair.card_count() {
            return Err(GameError::InvalidTradeCard);
        }
        let opponent_seat = self
            .seat_with_standing(pair.opponent())
            .ok_or(GameError::NotYourTrade)?;

        let (action, from, to, next) = match step {
            TradeStep::AwaitingRequest => {
                if !self.players[opponent_seat].hand.contains_all(ranks) {
                    return Err(GameError::OpponentLacksCard);
                }
                (TradeAction::Requested, opponent_seat, seat, TradeStep::AwaitingReturn)
            }
            _ => {
                if !self.players[seat].hand.contains_all(ranks) {
                    return Err(GameError::InsufficientCards);
                }
                (TradeAction::Returned, seat, opponent_seat, TradeStep::Done)
            }
        };

        self.players[from].hand.remove(ranks)?;
        self.players[to].hand.add(ranks);
        match pair {
            TradePair::Koenig => self.koenig_trade = next,
            TradePair::Vice => self.vice_trade = next,
        }

        tracing::debug!(%player, ?pair, ?action, cards = ?ranks, "trade step");

        let round_started = self.koenig_traded() && self.vice_traded();
        if round_started {
            self.koenig_trade = TradeStep::AwaitingRequest;
            self.vice_trade = TradeStep::AwaitingRequest;
            self.current = self.seat_with_standing(Role::Arschloch).unwrap_or(0);
            self.phase = Phase::Running;
            tracing::info!(round = self.number, first = %self.current_player(), "round started");
        }

        Ok(TradeReport {
            pair,
            action,
            initiator: self.players[seat].id,
            opponent: self.players[opponent_seat].id,
            cards: ranks.to_vec(),
            round_started,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Hand, SEATS};
    use Rank::*;

    /// Seats 0..4 hold König, Vize-König, Vize-Arschloch, Arschloch.
    fn trading_round() -> Round {
        let seating = [PlayerId(1), PlayerId(2), PlayerId(3), PlayerId(4)];
        let mut round = Round::from_hands(
            seating,
            [
                vec![Seven, Seven, Eight, Eight, Nine, Nine, Ten, Ten],
                vec![Seven, Seven, Eight, Eight, Nine, Nine, Ten, Ten],
                vec![Jack, Jack, Queen, Queen, King, King, Ace, Ace],
                vec![Jack, Jack, Queen, Queen, King, King, Ace, Ace],
            ]
            .map(Hand::new),
        );
        let standings = [
            Role::Koenig,
            Role::ViceKoenig,
            Role::ViceArschloch,
            Role::Arschloch,
        ];
        for seat in 0..SEATS {
            round.players[seat].standing = Some(standings[seat]);
        }
        round.phase = Phase::Trading;
        round
    }

    #[test]
    fn test_pair_metadata() {
        assert_eq!(TradePair::Koenig.card_count(), 2);
        assert_eq!(TradePair::Vice.opponent(), Role::ViceArschloch);
        assert_eq!(TradePair::Vice.initiator(), Role::ViceKoenig);
    }

    #[test]
    fn test_opponent_must_hold_requested_cards() {
        let mut round = trading_round();
        assert_eq!(
            round.trade(PlayerId(1), &[Ace, Seven]),
            Err(GameError::OpponentLacksCard)
        );
        assert_eq!(round.trade_step(TradePair::Koenig), TradeStep::AwaitingRequest);
    }

    #[test]
    fn test_wrong_card_count_is_invalid() {
        let mut round = trading_round();
        assert_eq!(round.trade(PlayerId(1), &[Ace]), Err(GameError::InvalidTradeCard));
        assert_eq!(
            round.trade(PlayerId(2), &[Ace, King]),
            Err(GameError::InvalidTradeCard)
        );
    }

    #[test]
    fn test_opponents_cannot_initiate() {
        let mut round = trading_round();
        assert_eq!(round.trade(PlayerId(4), &[Seven, Seven]), Err(GameError::NotYourTrade));
        assert_eq!(round.trade(PlayerId(3), &[Seven]), Err(GameError::NotYourTrade));
    }

    #[test]
    fn test_return_requires_own_cards() {
        let mut round = trading_round();
        round.trade(PlayerId(1), &[Ace, Ace]).unwrap();
        assert_eq!(
            round.trade(PlayerId(1), &[Jack, Jack]),
            Err(GameError::InsufficientCards)
        );
        assert_eq!(round.trade_step(TradePair::Koenig), TradeStep::AwaitingReturn);
    }
}
