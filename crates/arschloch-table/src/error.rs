//! Error types for the table layer.

use arschloch_rules::GameError;

/// Rejections from the lobby directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LobbyError {
    /// The player is already waiting or seated.
    #[error("you are already in the queue")]
    AlreadyQueued,

    /// Four players are queued or a round is in progress.
    #[error("the table is full")]
    QueueFull,

    /// Quit from a player who never joined.
    #[error("you are not in the queue")]
    NotQueued,
}

/// Errors that can occur during table operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// A rule violation from the round.
    #[error(transparent)]
    Rule(#[from] GameError),

    #[error(transparent)]
    Lobby(#[from] LobbyError),

    /// The table actor's inbox is closed.
    #[error("the table is unavailable")]
    Unavailable,
}
