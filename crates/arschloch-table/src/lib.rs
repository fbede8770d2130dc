//! The single Arschloch table.
//!
//! One Tokio task owns the lobby, the current round and every player's
//! notification sink. The outside world talks to it through a
//! [`TableHandle`].
//!
//! # Key types
//!
//! - [`TableHandle`]: send commands and connection changes to the actor
//! - [`Session`]: the synchronous table state the actor drives
//! - [`Lobby`]: queue of up to four players waiting for a deal
//! - [`NotificationSink`]: where a player's view is rendered
//! - [`TableConfig`]: idle timings, deal seed, inbox size

mod config;
mod error;
mod lobby;
mod session;
mod sink;
mod table;

pub use config::TableConfig;
pub use error::{LobbyError, TableError};
pub use lobby::Lobby;
pub use session::{BoxedSink, Session};
pub use sink::{NotificationSink, PlayerSender};
pub use table::{TableHandle, TableInfo, spawn_table};
