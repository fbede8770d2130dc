//! Turn and trick engine: playing, passing, moving the turn on.

use arschloch_protocol::{Phase, PlayerId, Rank, Role, StackEntry};

use crate::{GameError, Round, SEATS};

/// What an accepted play did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayReport {
    pub seat: usize,
    pub count: u8,
    pub rank: Rank,
    /// Role assigned if the play emptied the hand.
    pub finished: Option<Role>,
    /// Set when the play ended the round: the forced last player's seat
    /// and role. The round is now in [`Phase::Next`].
    pub last: Option<(usize, Role)>,
}

/// What an accepted pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassReport {
    pub seat: usize,
    /// Everyone else passed: the stack was cleared.
    pub trick_complete: bool,
}

/// Returns `true` if playing `count` × `rank` onto `stack` is legal.
///
/// Same count and a strictly higher rank beats the stack. Four of a kind
/// (a bomb) beats anything of fewer cards and a lower bomb. An empty
/// stack accepts any play.
pub fn beats(stack: StackEntry, count: u8, rank: Rank) -> bool {
    match stack {
        StackEntry::Empty => true,
        StackEntry::Cards { count: top_count, rank: top_rank } => {
            (count == top_count && rank > top_rank)
                || (count == 4 && (top_count < 4 || rank > top_rank))
        }
    }
}

impl Round {
    /// Moves the turn to the next seat that still holds cards.
    ///
    /// Visits at most [`SEATS`] seats; while the round is running at least
    /// two players are unfinished, so it always lands on one of them.
    pub(crate) fn advance_turn(&mut self) {
        for _ in 0..SEATS {
            self.current = (self.current + 1) % SEATS;
            if !self.players[self.current].finished {
                return;
            }
        }
    }

    /// Seat of `player` if they may act in the running round right now.
    fn seat_to_act(&self, player: PlayerId) -> Result<usize, GameError> {
        if self.phase != Phase::Running {
            return Err(GameError::WrongPhaseForCommand(self.phase));
        }
        let seat = self.seat_of(player).ok_or(GameError::NotSeated)?;
        if seat != self.current {
            return Err(GameError::NotYourTurn);
        }
        Ok(seat)
    }

    /// Passes on the current trick.
    ///
    /// Once every other active player has passed since the last accepted
    /// play, the trick is complete and the stack is cleared; the turn moves
    /// on either way.
    pub fn pass(&mut self, player: PlayerId) -> Result<PassReport, GameError> {
        let seat = self.seat_to_act(player)?;
        if self.stack.is_empty() {
            return Err(GameError::MustPlayAfterOpeningTrick);
        }

        self.passes += 1;
        let trick_complete = self.passes + 1 == self.active_count();
        if trick_complete {
            self.stack = StackEntry::Empty;
            self.passes = 0;
        }
        self.advance_turn();

        tracing::debug!(%player, trick_complete, "pass");
        Ok(PassReport {
            seat,
            trick_complete,
        })
    }

    /// Plays `count` cards of `rank` from `player`'s hand.
    ///
    /// Validation runs in full before anything changes: turn, count,
    /// ownership, then legality against the stack. An accepted play
    /// replaces the stack, resets the pass counter, moves the turn on and
    /// runs finish detection if the hand is now empty.
    pub fn play(
        &mut self,
        player: PlayerId,
        count: u8,
        rank: Rank,
    ) -> Result<PlayReport, GameError> {
        let seat = self.seat_to_act(player)?;
        if !(1..=4).contains(&count) {
            return Err(GameError::InvalidSyntax);
        }
        if self.players[seat].hand.count(rank) < usize::from(count) {
            return Err(GameError::InsufficientCards);
        }
        if !beats(self.stack, count, rank) {
            return Err(GameError::PlayTooLowOrWrongAmount);
        }

        let played = vec![rank; usize::from(count)];
        self.players[seat].hand.remove(&played)?;
        self.discard.extend(played);
        self.stack = StackEntry::Cards { count, rank };
        self.passes = 0;
        self.advance_turn();

        tracing::debug!(%player, count, %rank, "play accepted");

        let mut report = PlayReport {
            seat,
            count,
            rank,
            finished: None,
            last: None,
        };
        if self.players[seat].hand.is_empty() {
            let finish = self.record_finish(seat, rank);
            report.finished = Some(finish.role);
            report.last = finish.last;
        }
        Ok(report)
    }
}
