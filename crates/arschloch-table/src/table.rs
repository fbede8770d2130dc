//! Table actor: an isolated Tokio task that owns the [`Session`].
//!
//! Commands, connection changes and idle verdicts all arrive through one
//! `tokio::select!` loop and are applied one at a time. Nothing else
//! touches the session, so an idle reset can never interleave with a
//! half-applied play.

use arschloch_idle::IdleSupervisor;
use arschloch_protocol::{Command, Phase, PlayerId};
use tokio::sync::{mpsc, oneshot};

use crate::{NotificationSink, Session, TableConfig, TableError};

/// Events sent to the table actor through its inbox.
pub(crate) enum TableEvent {
    /// A parsed command from a connected player.
    Command { player: PlayerId, command: Command },

    /// A player's connection came up.
    Connect {
        player: PlayerId,
        sink: Box<dyn NotificationSink>,
        reply: oneshot::Sender<u64>,
    },

    /// A player's connection went away.
    Disconnect { player: PlayerId, serial: u64 },

    /// Request a snapshot of the table.
    Info { reply: oneshot::Sender<TableInfo> },

    /// Stop the actor.
    Shutdown,
}

/// A snapshot of table metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub phase: Phase,
    /// Round number, while a round exists.
    pub round: Option<u32>,
    /// Players queued or seated.
    pub queued: usize,
    /// Players with a live connection.
    pub connected: usize,
    /// Whether the idle supervisor is counting down.
    pub idle_armed: bool,
}

/// Handle to the running table actor.
///
/// Cheap to clone: it wraps an `mpsc::Sender`. Every connection handler
/// holds one.
#[derive(Clone)]
pub struct TableHandle {
    sender: mpsc::Sender<TableEvent>,
}

impl TableHandle {
    /// Registers `player`'s sink and waits until the table has sent the
    /// initial view. Returns the connection serial for
    /// [`disconnect`](Self::disconnect).
    pub async fn connect(
        &self,
        player: PlayerId,
        sink: impl NotificationSink + 'static,
    ) -> Result<u64, TableError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(TableEvent::Connect {
                player,
                sink: Box::new(sink),
                reply: reply_tx,
            })
            .await
            .map_err(|_| TableError::Unavailable)?;
        reply_rx.await.map_err(|_| TableError::Unavailable)
    }

    /// Drops the sink registered by connection `serial`. Ignored if the
    /// player has reconnected since.
    pub async fn disconnect(&self, player: PlayerId, serial: u64) -> Result<(), TableError> {
        self.sender
            .send(TableEvent::Disconnect { player, serial })
            .await
            .map_err(|_| TableError::Unavailable)
    }

    /// Sends a command (fire-and-forget). Results arrive on the player's sink.
    pub async fn command(&self, player: PlayerId, command: Command) -> Result<(), TableError> {
        self.sender
            .send(TableEvent::Command { player, command })
            .await
            .map_err(|_| TableError::Unavailable)
    }

    pub async fn info(&self) -> Result<TableInfo, TableError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(TableEvent::Info { reply: reply_tx })
            .await
            .map_err(|_| TableError::Unavailable)?;
        reply_rx.await.map_err(|_| TableError::Unavailable)
    }

    pub async fn shutdown(&self) -> Result<(), TableError> {
        self.sender
            .send(TableEvent::Shutdown)
            .await
            .map_err(|_| TableError::Unavailable)
    }
}

struct TableActor {
    session: Session,
    idle: IdleSupervisor,
    inbox: mpsc::Receiver<TableEvent>,
}

impl TableActor {
    async fn run(mut self) {
        tracing::info!("table actor started");

        loop {
            tokio::select! {
                event = self.inbox.recv() => {
                    let Some(event) = event else { break };
                    if !self.handle_event(event) {
                        break;
                    }
                }
                verdict = self.idle.wait_for_verdict() => {
                    self.session.on_idle(verdict);
                    self.sync_idle(false);
                }
            }
        }

        tracing::info!("table actor stopped");
    }

    /// Returns `false` on shutdown.
    fn handle_event(&mut self, event: TableEvent) -> bool {
        match event {
            TableEvent::Command { player, command } => {
                self.session.handle(player, command);
                self.sync_idle(true);
            }
            TableEvent::Connect {
                player,
                sink,
                reply,
            } => {
                let serial = self.session.connect(player, sink);
                let _ = reply.send(serial);
            }
            TableEvent::Disconnect { player, serial } => {
                self.session.disconnect(player, serial);
                self.sync_idle(false);
            }
            TableEvent::Info { reply } => {
                let _ = reply.send(self.info());
            }
            TableEvent::Shutdown => {
                tracing::info!("table shutting down");
                return false;
            }
        }
        true
    }

    /// Arms the supervisor while someone is at the table, disarms it
    /// otherwise. Any command counts as activity, accepted or not.
    fn sync_idle(&mut self, activity: bool) {
        if self.session.is_occupied() {
            self.idle.arm();
            if activity {
                self.idle.record_activity();
            }
        } else {
            self.idle.disarm();
        }
    }

    fn info(&self) -> TableInfo {
        TableInfo {
            phase: self.session.phase(),
            round: self.session.round().map(|round| round.number()),
            queued: self.session.lobby().len(),
            connected: self.session.connected(),
            idle_armed: self.idle.is_armed(),
        }
    }
}

/// Spawns the table actor and returns a handle to it.
///
/// Must be called inside a Tokio runtime.
pub fn spawn_table(config: TableConfig) -> TableHandle {
    let (tx, rx) = mpsc::channel(config.channel_size.max(1));
    let seed = config.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, "table created");

    let actor = TableActor {
        session: Session::new(seed, config.idle),
        idle: IdleSupervisor::new(config.idle),
        inbox: rx,
    };
    tokio::spawn(actor.run());

    TableHandle { sender: tx }
}
