//! Rule violations.

use arschloch_protocol::Phase;

/// Why a command was rejected.
///
/// Every variant is recoverable: the round is left exactly as it was
/// before the command, and only the offending player is told.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// Someone else is to play.
    #[error("it is not your turn")]
    NotYourTurn,

    /// Passing on an empty stack: whoever opens a trick must play.
    #[error("you must play after you made the trick")]
    MustPlayAfterOpeningTrick,

    /// The command did not parse, or named an impossible card count.
    #[error("invalid syntax")]
    InvalidSyntax,

    /// The hand lacks the cards being played or given back.
    #[error("you don't have enough of these cards")]
    InsufficientCards,

    /// The play neither beats the stack nor is a bomb.
    #[error("those cards are too low or wrong amount")]
    PlayTooLowOrWrongAmount,

    /// A trade named the wrong number of cards for the exchange.
    #[error("invalid syntax or cards for this trade")]
    InvalidTradeCard,

    /// The trading opponent does not hold the requested cards.
    #[error("your opponent doesn't have one or both of these cards")]
    OpponentLacksCard,

    /// This exchange already completed this round.
    #[error("you already traded this round")]
    DuplicateTrade,

    /// The command has no meaning in the current phase.
    #[error("not possible while the table is in phase {0}")]
    WrongPhaseForCommand(Phase),

    /// The sender has no seat at the table.
    #[error("you are not seated at this table")]
    NotSeated,

    /// Only the König and Vize-König initiate trades.
    #[error("wait for your opponent to pick the cards")]
    NotYourTrade,
}
