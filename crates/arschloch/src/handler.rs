//! Per-connection handler: token handshake, then command routing.
//!
//! Each accepted connection gets its own Tokio task running this handler:
//!   1. Receive the first text frame and authenticate it as a token
//!   2. Queue `Welcome`, register the player's sink with the table
//!   3. Spawn a writer task draining the sink into the socket
//!   4. Loop: parse text frames as commands and forward them to the table
//!
//! The table holds the only strong sender of a player's sink. When the same
//! player connects again, the table drops the old sink, the old writer task
//! drains and closes its socket, and this loop stops reading.

use std::sync::Arc;
use std::time::Duration;

use arschloch_protocol::{Codec, Command, Notification, PlayerId};
use arschloch_rules::GameError;
use arschloch_table::{NotificationSink, PlayerSender, TableHandle};
use tokio::sync::{mpsc, oneshot};

use crate::server::ServerState;
use crate::transport::{ConnectionWriter, WebSocketConnection};
use crate::{ArschlochError, Authenticator, TransportError};

const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

/// Tells the table the player left when the handler exits, including on
/// panic. `Drop` is synchronous, so the async send runs in its own task.
struct DisconnectGuard {
    player_id: PlayerId,
    serial: u64,
    table: TableHandle,
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        let (player_id, serial) = (self.player_id, self.serial);
        let table = self.table.clone();
        tokio::spawn(async move {
            let _ = table.disconnect(player_id, serial).await;
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<A, C>(
    mut conn: WebSocketConnection,
    state: Arc<ServerState<A, C>>,
) -> Result<(), ArschlochError>
where
    A: Authenticator,
    C: Codec,
{
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    let player_id = match perform_handshake(&mut conn, &state).await {
        Ok(player_id) => player_id,
        Err(ArschlochError::Auth(err)) => {
            let notice = Notification::Info {
                message: format!("Unauthorized: {err}"),
            };
            conn.send(state.codec.encode(&notice)?).await?;
            return Err(err.into());
        }
        Err(err) => return Err(err),
    };
    tracing::info!(%conn_id, %player_id, "player authenticated");

    let (sink, outbound) = mpsc::unbounded_channel();
    sink.deliver(Notification::Welcome { player_id });
    let rejections = sink.downgrade();
    let serial = state.table.connect(player_id, sink).await?;
    let _guard = DisconnectGuard {
        player_id,
        serial,
        table: state.table.clone(),
    };

    let (writer, mut reader) = conn.split();
    let writer_state = Arc::clone(&state);
    let (writer_done_tx, mut writer_done) = oneshot::channel::<()>();
    tokio::spawn(async move {
        if let Err(e) = write_loop(writer, outbound, &writer_state.codec).await {
            tracing::debug!(%player_id, error = %e, "writer stopped");
        }
        let _ = writer_done_tx.send(());
    });

    loop {
        let received = tokio::select! {
            received = reader.recv_text() => received,
            _ = &mut writer_done => {
                tracing::info!(%player_id, %conn_id, "connection superseded");
                break;
            }
        };
        let text = match received {
            Ok(Some(text)) => text,
            Ok(None) => {
                tracing::info!(%player_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "recv error");
                break;
            }
        };

        match text.parse::<Command>() {
            Ok(command) => state.table.command(player_id, command).await?,
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "unparseable command");
                if let Some(sink) = rejections.upgrade() {
                    reject(&sink, GameError::InvalidSyntax);
                }
            }
        }
    }

    Ok(())
}

/// Reads the token frame, authenticates it and returns the player's id.
async fn perform_handshake<A, C>(
    conn: &mut WebSocketConnection,
    state: &ServerState<A, C>,
) -> Result<PlayerId, ArschlochError>
where
    A: Authenticator,
    C: Codec,
{
    let token = match tokio::time::timeout(HANDSHAKE_TIMEOUT, conn.recv_text()).await {
        Ok(Ok(Some(token))) => token,
        Ok(Ok(None)) => {
            return Err(TransportError::ConnectionClosed("closed before handshake".into()).into());
        }
        Ok(Err(e)) => return Err(e.into()),
        Err(_) => return Err(TransportError::Timeout("auth token").into()),
    };

    Ok(state.auth.authenticate(&token).await?)
}

/// Forwards queued notifications to the socket until every sender is gone.
async fn write_loop(
    mut writer: ConnectionWriter,
    mut outbound: mpsc::UnboundedReceiver<Notification>,
    codec: &impl Codec,
) -> Result<(), ArschlochError> {
    while let Some(notification) = outbound.recv().await {
        let bytes = codec.encode(&notification)?;
        writer.send(bytes).await?;
    }
    writer.close().await?;
    Ok(())
}

fn reject(sink: &PlayerSender, err: GameError) {
    sink.render_info(&format!("Rejected: {err}"));
}
