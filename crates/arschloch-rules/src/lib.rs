//! Rule engine for four-player Arschloch.
//!
//! A [`Round`] is a plain state machine with no I/O: the caller feeds it
//! commands (`play`, `pass`, `vote`, `trade`) one at a time and reads the
//! returned report or [`GameError`]. Every rejected command leaves the
//! round untouched.
//!
//! # Modules
//!
//! - [`deck`]: the 32-card deck and the deal.
//! - `hand`: a player's sorted cards.
//! - `round`: seats, phase transitions and read-only views.
//! - `turn`: plays, passes, trick completion.
//! - `finish`: role assignment when a hand empties.
//! - `trading`: the two post-round exchanges.

pub mod deck;
mod error;
mod finish;
mod hand;
mod round;
mod trading;
mod turn;

pub use error::GameError;
pub use hand::Hand;
pub use round::{Player, Round, SEATS, VoteOutcome};
pub use trading::{TradeAction, TradePair, TradeReport, TradeStep};
pub use turn::{PassReport, PlayReport, beats};
