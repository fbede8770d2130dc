//! # Arschloch
//!
//! WebSocket server for a single four-player table of Arschloch, the
//! shedding card game where the first player out becomes King and the
//! last one becomes the Arschloch.
//!
//! Players connect, send a token as their first text frame and then type
//! commands (`.join`, `2K` to play two Kings, `p` to pass, `10&7` to hand
//! over cards after a round, ...). Everything the table has to say comes
//! back as JSON notifications.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use arschloch::prelude::*;
//!
//! # async fn run() -> Result<(), ArschlochError> {
//! let server = ArschlochServerBuilder::new()
//!     .bind("0.0.0.0:8080")
//!     .build(NumericAuthenticator)
//!     .await?;
//! server.run().await
//! # }
//! ```

mod auth;
mod error;
mod handler;
mod server;
mod transport;

pub use auth::{Authenticator, NumericAuthenticator};
pub use error::{ArschlochError, AuthError, TransportError};
pub use server::{ArschlochServer, ArschlochServerBuilder};
pub use transport::ConnectionId;

/// Everything needed to configure and run a server.
pub mod prelude {
    pub use crate::{
        ArschlochError, ArschlochServer, ArschlochServerBuilder, AuthError, Authenticator,
        NumericAuthenticator, TransportError,
    };

    pub use arschloch_idle::IdleConfig;
    pub use arschloch_protocol::{Command, JsonCodec, Notification, Phase, PlayerId, Rank, Role};
    pub use arschloch_rules::GameError;
    pub use arschloch_table::{TableConfig, TableError, TableHandle, TableInfo};
}
