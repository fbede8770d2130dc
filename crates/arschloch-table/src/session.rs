//! Everything the table actor owns: lobby, the running round, the deal
//! RNG and each connected player's sink.
//!
//! `Session` is synchronous. The actor feeds it one event at a time, so
//! a command is fully applied and rendered before the next one starts.

use std::collections::HashMap;
use std::time::Duration;

use arschloch_idle::{IdleConfig, IdleVerdict};
use arschloch_protocol::{Command, Phase, PlayerId, Rank, Role};
use arschloch_rules::{GameError, Player, Round, TradeAction, TradePair, TradeReport, VoteOutcome};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::{Lobby, NotificationSink, TableError};

/// A connected player's sink.
pub type BoxedSink = Box<dyn NotificationSink>;

pub struct Session {
    lobby: Lobby,
    round: Option<Round>,
    rng: ChaCha8Rng,
    /// Each sink is tagged with the serial of the connection that owns it.
    sinks: HashMap<PlayerId, (u64, BoxedSink)>,
    next_serial: u64,
    idle: IdleConfig,
}

impl Session {
    /// Creates an empty table. `idle` is only used to word the warning.
    pub fn new(seed: u64, idle: IdleConfig) -> Self {
        Self {
            lobby: Lobby::new(),
            round: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
            sinks: HashMap::new(),
            next_serial: 1,
            idle,
        }
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    pub fn phase(&self) -> Phase {
        self.round.as_ref().map_or(Phase::Queue, Round::phase)
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn lobby(&self) -> &Lobby {
        &self.lobby
    }

    pub fn connected(&self) -> usize {
        self.sinks.len()
    }

    /// Whether anyone is queued or seated; idle supervision runs only then.
    pub fn is_occupied(&self) -> bool {
        !self.lobby.is_empty()
    }

    fn is_seated(&self, player: PlayerId) -> bool {
        self.round
            .as_ref()
            .is_some_and(|round| round.seat_of(player).is_some())
    }

    // -----------------------------------------------------------------------
    // Connections
    // -----------------------------------------------------------------------

    /// Registers `player`'s sink, shows them the current table and returns
    /// the connection serial to pass to [`disconnect`](Self::disconnect).
    ///
    /// A second connection for the same player replaces the first. A seated
    /// player reconnecting gets their full view back.
    pub fn connect(&mut self, player: PlayerId, sink: BoxedSink) -> u64 {
        let serial = self.next_serial;
        self.next_serial += 1;
        if self.sinks.insert(player, (serial, sink)).is_some() {
            info!(%player, "player reconnected");
        } else {
            info!(%player, connected = self.sinks.len(), "player connected");
        }

        if let Some(sink) = self.sink(player) {
            sink.render_lobby(self.phase(), self.lobby.players());
        }
        if let Some(round) = &self.round {
            if let Some(seat) = round.seat_of(player) {
                self.render_seat(round, &round.players()[seat]);
                self.info_to(player, &progress_line(round));
            }
        }
        serial
    }

    /// Drops `player`'s sink if it still belongs to connection `serial`.
    ///
    /// A player only waiting in the queue also loses their place; a seated
    /// player keeps their seat.
    pub fn disconnect(&mut self, player: PlayerId, serial: u64) {
        if self.sinks.get(&player).map(|(owner, _)| *owner) != Some(serial) {
            debug!(%player, serial, "stale disconnect ignored");
            return;
        }
        self.sinks.remove(&player);
        info!(%player, connected = self.sinks.len(), "player disconnected");

        if self.round.is_none() && self.lobby.leave(player).is_ok() {
            self.broadcast_lobby();
        }
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Applies `command` and tells the offender if it was rejected.
    ///
    /// A repeated trade is dropped without a reply.
    pub fn handle(&mut self, player: PlayerId, command: Command) {
        match self.apply(player, command) {
            Ok(()) => {}
            Err(TableError::Rule(GameError::DuplicateTrade)) => {
                debug!(%player, "repeated trade ignored");
            }
            Err(err) => {
                debug!(%player, ?command, %err, "command rejected");
                self.info_to(player, &format!("Rejected: {err}"));
            }
        }
    }

    /// Applies `command` from `player`, rendering the result on success.
    ///
    /// On error nothing changed and nothing was sent.
    pub fn apply(&mut self, player: PlayerId, command: Command) -> Result<(), TableError> {
        match command {
            Command::Join => self.join(player),
            Command::Quit => self.quit(player),
            Command::Pass => self.pass(player),
            Command::Play { count, rank } => self.play(player, count, rank),
            Command::Trade(cards) => self.trade(player, &cards.ranks()),
            Command::Vote(yes) => self.vote(player, yes),
        }
    }

    fn round_mut(&mut self) -> Result<&mut Round, GameError> {
        self.round
            .as_mut()
            .ok_or(GameError::WrongPhaseForCommand(Phase::Queue))
    }

    fn join(&mut self, player: PlayerId) -> Result<(), TableError> {
        let queued = self.lobby.join(player)?;
        info!(%player, queued, "player joined queue");

        let seating = self.lobby.seating().filter(|_| self.round.is_none());
        if let Some(seating) = seating {
            self.round = Some(Round::start(seating, &mut self.rng));
        }
        self.broadcast_lobby();

        if seating.is_some() {
            if let Some(round) = &self.round {
                self.render_table(round);
                self.info_seated(round, &progress_line(round));
            }
        }
        Ok(())
    }

    fn quit(&mut self, player: PlayerId) -> Result<(), TableError> {
        if self.is_seated(player) {
            self.reset(&format!("{player} left the table. The table was reset."));
            return Ok(());
        }
        self.lobby.leave(player)?;
        info!(%player, queued = self.lobby.len(), "player left queue");
        self.broadcast_lobby();
        Ok(())
    }

    fn pass(&mut self, player: PlayerId) -> Result<(), TableError> {
        let report = self.round_mut()?.pass(player)?;
        if let Some(round) = &self.round {
            self.render_table(round);
            if report.trick_complete {
                self.info_seated(round, "Everyone passed, the stack is cleared.");
            }
            self.info_seated(round, &progress_line(round));
        }
        Ok(())
    }

    fn play(&mut self, player: PlayerId, count: u8, rank: Rank) -> Result<(), TableError> {
        let report = self.round_mut()?.play(player, count, rank)?;
        let Some(round) = &self.round else {
            return Ok(());
        };

        self.render_table(round);
        if let Some(role) = report.finished {
            self.info_seated(round, &format!("{player} finished as {role}."));
        }
        if let Some((seat, role)) = report.last {
            let last = round.players()[seat].id();
            self.info_seated(round, &format!("{last} is left over and becomes {role}."));
        }
        self.info_seated(round, &progress_line(round));
        Ok(())
    }

    fn trade(&mut self, player: PlayerId, ranks: &[Rank]) -> Result<(), TableError> {
        let report = self.round_mut()?.trade(player, ranks)?;
        if let Some(round) = &self.round {
            self.render_trade(round, &report);
        }
        Ok(())
    }

    fn vote(&mut self, player: PlayerId, yes: bool) -> Result<(), TableError> {
        let round = self
            .round
            .as_mut()
            .ok_or(GameError::WrongPhaseForCommand(Phase::Queue))?;
        let outcome = round.vote(player, yes, &mut self.rng)?;

        match outcome {
            VoteOutcome::Pending { missing } => {
                self.info_to(player, &format!("Vote counted, waiting for {missing} more ..."));
            }
            VoteOutcome::Disband => {
                self.reset(&format!(
                    "{player} does not want to continue. The table was reset."
                ));
            }
            VoteOutcome::TradingStarted => {
                if let Some(round) = &self.round {
                    self.render_table(round);
                    self.render_trading_instructions(round);
                }
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Resets
    // -----------------------------------------------------------------------

    /// Reacts to the idle supervisor.
    pub fn on_idle(&mut self, verdict: IdleVerdict) {
        match verdict {
            IdleVerdict::Warn => {
                let message = format!(
                    "There was no action for more than {}. The table will reset in {} \
                     if no action is being performed ...",
                    describe(self.idle.idle_after),
                    describe(self.idle.grace),
                );
                self.info_all(&message);
            }
            IdleVerdict::Expire => {
                self.reset("Nobody acted for too long. The table was reset.");
            }
        }
    }

    /// Clears the round and the queue and tells everyone why.
    pub fn reset(&mut self, reason: &str) {
        warn!(
            round = self.round.as_ref().map(Round::number),
            queued = self.lobby.len(),
            reason,
            "table reset"
        );
        self.round = None;
        self.lobby.clear();
        self.broadcast_lobby();
        self.info_all(reason);
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    fn sink(&self, player: PlayerId) -> Option<&dyn NotificationSink> {
        self.sinks.get(&player).map(|(_, sink)| sink.as_ref())
    }

    fn info_to(&self, player: PlayerId, message: &str) {
        if let Some(sink) = self.sink(player) {
            sink.render_info(message);
        }
    }

    fn info_seated(&self, round: &Round, message: &str) {
        for player in round.players() {
            self.info_to(player.id(), message);
        }
    }

    fn info_all(&self, message: &str) {
        for (_, sink) in self.sinks.values() {
            sink.render_info(message);
        }
    }

    fn broadcast_lobby(&self) {
        let phase = self.phase();
        for (_, sink) in self.sinks.values() {
            sink.render_lobby(phase, self.lobby.players());
        }
    }

    /// Round number, order, stack and own hand for one seat.
    fn render_seat(&self, round: &Round, player: &Player) {
        let Some(sink) = self.sink(player.id()) else {
            return;
        };
        sink.render_round(round.number());
        sink.render_order(round.seat_views(), round.current());
        sink.render_stack(round.stack());
        sink.render_hand(player.hand().cards());
    }

    fn render_table(&self, round: &Round) {
        for player in round.players() {
            self.render_seat(round, player);
        }
    }

    fn render_trading_instructions(&self, round: &Round) {
        let holder = |role| {
            round
                .seat_with_standing(role)
                .map(|seat| round.players()[seat].id())
        };
        let (Some(koenig), Some(vice_koenig), Some(vice_arschloch), Some(arschloch)) = (
            holder(Role::Koenig),
            holder(Role::ViceKoenig),
            holder(Role::ViceArschloch),
            holder(Role::Arschloch),
        ) else {
            return;
        };

        for player in round.players() {
            let message = match player.standing() {
                Some(Role::Koenig) => format!(
                    "{arschloch} has to exchange two cards. \
                     Which cards do you want from {arschloch} (e.g. \"A & K\")?"
                ),
                Some(Role::ViceKoenig) => format!(
                    "{vice_arschloch} has to exchange a card. \
                     Which card do you want from {vice_arschloch} (e.g. \"A\")?"
                ),
                Some(Role::ViceArschloch) => {
                    format!("Waiting for {vice_koenig} to ask for a card ...")
                }
                Some(Role::Arschloch) => format!("Waiting for {koenig} to ask for cards ..."),
                None => continue,
            };
            self.info_to(player.id(), &message);
        }
    }

    fn render_trade(&self, round: &Round, report: &TradeReport) {
        let (initiator, opponent) = (report.initiator, report.opponent);
        for id in [initiator, opponent] {
            if let (Some(player), Some(sink)) = (round.player(id), self.sink(id)) {
                sink.render_hand(player.hand().cards());
            }
        }

        let cards = card_list(&report.cards);
        match report.action {
            TradeAction::Requested => {
                let example = match report.pair {
                    TradePair::Koenig => "\"7 & 8\"",
                    TradePair::Vice => "\"7\"",
                };
                self.info_to(
                    initiator,
                    &format!(
                        "{opponent} gave you {cards}. \
                         Which cards do you give {opponent} (e.g. {example})?"
                    ),
                );
                self.info_to(opponent, &format!("{initiator} took {cards} from you ..."));
            }
            TradeAction::Returned => {
                self.info_to(initiator, &format!("You gave {cards} to {opponent}."));
                self.info_to(opponent, &format!("... and gave you {cards}."));
            }
        }

        if report.round_started {
            self.render_table(round);
            self.info_seated(round, &progress_line(round));
        }
    }
}

/// The info line shown to every seat after an accepted action.
fn progress_line(round: &Round) -> String {
    match round.phase() {
        Phase::Next => "The round is over. Would you like to continue? (yes/no)".to_owned(),
        _ => format!("Waiting for {} ...", round.current_player()),
    }
}

fn card_list(ranks: &[Rank]) -> String {
    ranks
        .iter()
        .map(|rank| rank.label())
        .collect::<Vec<_>>()
        .join(" ")
}

fn describe(duration: Duration) -> String {
    let secs = duration.as_secs();
    match secs {
        60 => "1 minute".to_owned(),
        s if s > 60 && s % 60 == 0 => format!("{} minutes", s / 60),
        1 => "1 second".to_owned(),
        s => format!("{s} seconds"),
    }
}
