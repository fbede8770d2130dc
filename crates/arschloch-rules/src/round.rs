//! The round: seats, phase and everything the engine mutates.
//!
//! `Round` is the only owner of hands, roles, the stack and the trade
//! state. Its operations are spread over sibling modules by concern
//! (`turn`, `finish`, `trading`); this module holds the data, the
//! lifecycle transitions and the read-only views.
//!
//! A `Round` only ever sits in `Running`, `Next` or `Trading`. The
//! `Queue` phase is the absence of a round; resetting the table means
//! dropping it.

use arschloch_protocol::{Phase, PlayerId, Rank, Role, SeatView, StackEntry};
use rand::Rng;

use crate::trading::{TradePair, TradeStep};
use crate::{GameError, Hand, deck};

/// Seats at the table. The game is only defined for four.
pub const SEATS: usize = 4;

/// One seat's state.
#[derive(Debug, Clone)]
pub struct Player {
    pub(crate) id: PlayerId,
    pub(crate) hand: Hand,
    /// Role earned in the round being played.
    pub(crate) role: Option<Role>,
    /// Role earned in the previous round; decides trading partners.
    pub(crate) standing: Option<Role>,
    pub(crate) finished: bool,
}

impl Player {
    fn seated(id: PlayerId, hand: Hand) -> Self {
        Self {
            id,
            hand,
            role: None,
            standing: None,
            finished: false,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn standing(&self) -> Option<Role> {
        self.standing
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Result of a continue vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// Recorded; `missing` players have yet to agree.
    Pending { missing: usize },
    /// Everyone agreed: cards are dealt and trading has begun.
    TradingStarted,
    /// Someone declined. The caller must tear the table down.
    Disband,
}

/// A four-player round and its lifecycle.
#[derive(Debug, Clone)]
pub struct Round {
    pub(crate) players: [Player; SEATS],
    pub(crate) current: usize,
    pub(crate) stack: StackEntry,
    pub(crate) passes: usize,
    /// Roles handed out in finishing order so far (ace escapes excluded).
    pub(crate) finished_count: usize,
    pub(crate) phase: Phase,
    pub(crate) number: u32,
    pub(crate) koenig_trade: TradeStep,
    pub(crate) vice_trade: TradeStep,
    votes: [bool; SEATS],
    /// Played cards and the forced finisher's leftover hand.
    pub(crate) discard: Vec<Rank>,
}

impl Round {
    /// Deals a fresh deck to `seating` and starts round 1.
    ///
    /// Seat 0 receives the Seven that the deal guarantees and plays first.
    pub fn start<R: Rng + ?Sized>(seating: [PlayerId; SEATS], rng: &mut R) -> Self {
        let hands = deck::deal(rng);
        let round = Self::from_hands(seating, hands);
        tracing::info!(round = round.number, first = %round.current_player(), "round started");
        round
    }

    /// Starts round 1 from a prearranged deal, seat 0 to play.
    ///
    /// No check is made that the hands form a full deck.
    pub fn from_hands(seating: [PlayerId; SEATS], hands: [Hand; SEATS]) -> Self {
        let mut hands = hands.into_iter();
        let players = seating.map(|id| Player::seated(id, hands.next().unwrap_or_default()));
        Self {
            players,
            current: 0,
            stack: StackEntry::Empty,
            passes: 0,
            finished_count: 0,
            phase: Phase::Running,
            number: 1,
            koenig_trade: TradeStep::AwaitingRequest,
            vice_trade: TradeStep::AwaitingRequest,
            votes: [false; SEATS],
            discard: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Records a continue vote from `player` once the round is over.
    ///
    /// A single "no" disbands the table. Repeated "yes" votes from the same
    /// player count once. The fourth distinct "yes" deals the next round
    /// and enters [`Phase::Trading`].
    pub fn vote<R: Rng + ?Sized>(
        &mut self,
        player: PlayerId,
        yes: bool,
        rng: &mut R,
    ) -> Result<VoteOutcome, GameError> {
        if self.phase != Phase::Next {
            return Err(GameError::WrongPhaseForCommand(self.phase));
        }
        let seat = self.seat_of(player).ok_or(GameError::NotSeated)?;

        if !yes {
            tracing::info!(%player, round = self.number, "continue declined");
            return Ok(VoteOutcome::Disband);
        }

        self.votes[seat] = true;
        let missing = self.votes.iter().filter(|&&v| !v).count();
        if missing > 0 {
            return Ok(VoteOutcome::Pending { missing });
        }

        self.begin_trading(rng);
        Ok(VoteOutcome::TradingStarted)
    }

    /// `Next → Trading`: roles become standings and a new deal goes out.
    fn begin_trading<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let hands = deck::deal(rng);
        for (player, hand) in self.players.iter_mut().zip(hands) {
            player.standing = player.role.take();
            player.finished = false;
            player.hand = hand;
        }

        self.number += 1;
        self.stack = StackEntry::Empty;
        self.passes = 0;
        self.finished_count = 0;
        self.votes = [false; SEATS];
        self.discard.clear();
        self.koenig_trade = TradeStep::AwaitingRequest;
        self.vice_trade = TradeStep::AwaitingRequest;
        self.current = self.seat_with_standing(Role::Arschloch).unwrap_or(0);
        self.phase = Phase::Trading;

        tracing::info!(round = self.number, "trading started");
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// 1-based round counter.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Seat index of the player to act.
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_player(&self) -> PlayerId {
        self.players[self.current].id
    }

    pub fn stack(&self) -> StackEntry {
        self.stack
    }

    /// Consecutive passes since the last accepted play.
    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn players(&self) -> &[Player; SEATS] {
        &self.players
    }

    pub fn seating(&self) -> [PlayerId; SEATS] {
        std::array::from_fn(|seat| self.players[seat].id)
    }

    pub fn seat_of(&self, player: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == player)
    }

    pub fn player(&self, player: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player)
    }

    /// Seat holding `role` as a standing from the previous round.
    pub fn seat_with_standing(&self, role: Role) -> Option<usize> {
        self.players.iter().position(|p| p.standing == Some(role))
    }

    pub fn discard(&self) -> &[Rank] {
        &self.discard
    }

    /// Players still holding cards in the running round.
    pub fn active_count(&self) -> usize {
        self.players.iter().filter(|p| !p.finished).count()
    }

    pub fn trade_step(&self, pair: TradePair) -> TradeStep {
        match pair {
            TradePair::Koenig => self.koenig_trade,
            TradePair::Vice => self.vice_trade,
        }
    }

    /// `true` once the König/Arschloch exchange is complete this round.
    pub fn koenig_traded(&self) -> bool {
        self.koenig_trade == TradeStep::Done
    }

    /// `true` once the Vize-König/Vize-Arschloch exchange is complete.
    pub fn vice_traded(&self) -> bool {
        self.vice_trade == TradeStep::Done
    }

    /// The seating order as shown to players. A seat shows the role earned
    /// this round, falling back to last round's standing.
    pub fn seat_views(&self) -> Vec<SeatView> {
        self.players
            .iter()
            .map(|p| SeatView {
                player_id: p.id,
                role: p.role.or(p.standing),
                finished: p.finished,
            })
            .collect()
    }

    /// Copies of each rank across all hands and the discard pile, indexed
    /// by [`Rank::index`]. A full deck reads `[4; 8]`.
    pub fn card_census(&self) -> [usize; 8] {
        let mut census = [0; 8];
        let held = self.players.iter().flat_map(|p| p.hand.cards());
        for rank in held.chain(self.discard.iter()) {
            census[rank.index()] += 1;
        }
        census
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn seating() -> [PlayerId; SEATS] {
        [PlayerId(1), PlayerId(2), PlayerId(3), PlayerId(4)]
    }

    #[test]
    fn test_start_deals_full_deck_and_seat_zero_opens() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let round = Round::start(seating(), &mut rng);

        assert_eq!(round.phase(), Phase::Running);
        assert_eq!(round.number(), 1);
        assert_eq!(round.current(), 0);
        assert_eq!(round.current_player(), PlayerId(1));
        assert!(round.stack().is_empty());
        assert_eq!(round.card_census(), [4; 8]);
        assert!(round.players()[0].hand().count(Rank::Seven) >= 1);
        assert!(round.players().iter().all(|p| p.hand().len() == 8));
    }

    #[test]
    fn test_vote_outside_next_is_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut round = Round::start(seating(), &mut rng);
        assert_eq!(
            round.vote(PlayerId(1), true, &mut rng),
            Err(GameError::WrongPhaseForCommand(Phase::Running))
        );
    }

    #[test]
    fn test_seat_lookup() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let round = Round::start(seating(), &mut rng);
        assert_eq!(round.seat_of(PlayerId(3)), Some(2));
        assert_eq!(round.seat_of(PlayerId(9)), None);
        assert_eq!(round.seating(), seating());
    }
}
