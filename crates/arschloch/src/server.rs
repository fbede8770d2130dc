//! `ArschlochServer` builder and accept loop.
//!
//! Ties the layers together: WebSocket transport, token auth, one table
//! actor shared by every connection.

use std::sync::Arc;

use arschloch_protocol::{Codec, JsonCodec};
use arschloch_table::{TableConfig, TableHandle, spawn_table};

use crate::handler::handle_connection;
use crate::transport::WebSocketTransport;
use crate::{ArschlochError, Authenticator};

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState<A: Authenticator, C: Codec> {
    pub(crate) table: TableHandle,
    pub(crate) auth: A,
    pub(crate) codec: C,
}

/// Builder for configuring and starting the server.
///
/// # Example
///
/// ```rust,no_run
/// use arschloch::prelude::*;
///
/// # async fn run() -> Result<(), ArschlochError> {
/// let server = ArschlochServerBuilder::new()
///     .bind("0.0.0.0:8080")
///     .table_config(TableConfig::default())
///     .build(NumericAuthenticator)
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct ArschlochServerBuilder {
    bind_addr: String,
    table_config: TableConfig,
}

impl ArschlochServerBuilder {
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            table_config: TableConfig::default(),
        }
    }

    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    pub fn table_config(mut self, config: TableConfig) -> Self {
        self.table_config = config;
        self
    }

    /// Binds the listener and spawns the table actor.
    ///
    /// Notifications are encoded with [`JsonCodec`].
    pub async fn build<A: Authenticator>(
        self,
        auth: A,
    ) -> Result<ArschlochServer<A, JsonCodec>, ArschlochError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;
        let table = spawn_table(self.table_config);

        let state = Arc::new(ServerState {
            table,
            auth,
            codec: JsonCodec,
        });

        Ok(ArschlochServer { transport, state })
    }
}

impl Default for ArschlochServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound server. Call [`run()`](Self::run) to start accepting players.
pub struct ArschlochServer<A: Authenticator, C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<A, C>>,
}

impl<A, C> ArschlochServer<A, C>
where
    A: Authenticator,
    C: Codec,
{
    pub fn builder() -> ArschlochServerBuilder {
        ArschlochServerBuilder::new()
    }

    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Handle to the table, for diagnostics.
    pub fn table(&self) -> TableHandle {
        self.state.table.clone()
    }

    /// Runs the accept loop until the process is terminated.
    pub async fn run(self) -> Result<(), ArschlochError> {
        tracing::info!("arschloch server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
