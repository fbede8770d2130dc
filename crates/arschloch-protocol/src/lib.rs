//! Wire vocabulary for the Arschloch table.
//!
//! - **Types** ([`Rank`], [`Role`], [`Phase`], [`StackEntry`],
//!   [`Notification`], ...) shared by the rule engine, the table actor and
//!   the server front end.
//! - **Commands** ([`Command`]) parsed from the text players type.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) turning notifications
//!   into bytes.
//! - **Errors** ([`ProtocolError`]).
//!
//! ```text
//! text frame → Command → table → Notification → Codec → bytes
//! ```

mod codec;
mod command;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use command::{Command, TradeCards};
pub use error::ProtocolError;
pub use types::{
    Notification, Phase, PlayerId, Rank, Role, SeatView, StackEntry,
};
